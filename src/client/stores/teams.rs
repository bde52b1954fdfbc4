use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::shared::{Commit, Committed, IdentityScoped, RequestSequence, SharedStore};
use crate::client::api::GatewayApi;
use crate::client::mount::ViewMount;
use crate::domain::{DomainError, Session, TeamId, TeamSummary};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamsState {
    pub teams: Vec<TeamSummary>,
    /// Last team picked by the user. May name a team a later load no longer
    /// lists; read it through [`TeamsState::selected`].
    pub selected_team_id: Option<TeamId>,
}

impl TeamsState {
    /// The selection, if that team is currently listed
    pub fn selected(&self) -> Option<&TeamId> {
        self.selected_team_id
            .as_ref()
            .filter(|id| self.teams.iter().any(|t| &t.team_id == *id))
    }
}

/// The user's teams and the current team selection.
///
/// [`TeamsStore::select_team`] is the only writer of the selection.
pub struct TeamsStore {
    api: Arc<dyn GatewayApi>,
    state: SharedStore<TeamsState>,
    load_sequence: RequestSequence,
}

impl TeamsStore {
    pub fn new(api: Arc<dyn GatewayApi>, session: watch::Receiver<Session>) -> Self {
        Self {
            api,
            state: SharedStore::new("teams", session),
            load_sequence: RequestSequence::new(),
        }
    }

    pub fn snapshot(&self) -> TeamsState {
        self.state.snapshot()
    }

    pub fn teams(&self) -> Vec<TeamSummary> {
        self.state.snapshot().teams
    }

    pub fn selected_team_id(&self) -> Option<TeamId> {
        self.state.snapshot().selected().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Committed<TeamsState>> {
        self.state.subscribe()
    }

    /// Fetch the user's teams. The selection is left alone; one that is no
    /// longer listed reads as `None`.
    pub async fn load_teams(&self, mount: &ViewMount) -> Result<Commit<usize>, DomainError> {
        let ticket = self.state.begin(&self.load_sequence)?;

        let teams = self
            .api
            .list_teams(ticket.token().clone())
            .await
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Loading teams failed"))?;

        let outcome = self
            .state
            .commit(&ticket, &self.load_sequence, mount, |state| {
                state.teams = teams;
                state.teams.len()
            });

        debug!(store = self.state.name(), outcome = ?outcome, "Teams load resolved");
        Ok(outcome)
    }

    /// Change the selected team, or clear it with `None`.
    /// The team must be one of the loaded teams.
    pub fn select_team(&self, team_id: Option<TeamId>) -> Result<(), DomainError> {
        self.state.update(|state| {
            if let Some(id) = &team_id {
                if !state.teams.iter().any(|t| &t.team_id == id) {
                    return Err(DomainError::validation(format!("Unknown team '{}'", id)));
                }
            }

            state.selected_team_id = team_id;
            Ok(())
        })
    }

    pub fn reset(&self) {
        self.state.reset();
    }
}

impl IdentityScoped for TeamsStore {
    fn clear(&self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::MockGatewayApi;
    use crate::domain::BearerToken;

    fn summary(id: &str, name: &str) -> TeamSummary {
        TeamSummary {
            team_id: TeamId::new(id).unwrap(),
            team_name: name.to_string(),
            league_id: Some(1234),
            year: Some(2025),
        }
    }

    fn signed_in() -> (watch::Sender<Session>, watch::Receiver<Session>) {
        let session = Session::anonymous().authenticated(BearerToken::new("tok").unwrap());
        let (tx, rx) = watch::channel(session);
        (tx, rx)
    }

    #[tokio::test]
    async fn test_load_then_select() {
        let mut mock = MockGatewayApi::new();
        mock.expect_list_teams()
            .withf(|token| token.as_str() == "tok")
            .times(1)
            .returning(|_| Ok(vec![summary("team42", "Ballers"), summary("team7", "Bricks")]));

        let (_tx, rx) = signed_in();
        let store = TeamsStore::new(Arc::new(mock), rx);
        let mount = ViewMount::new();

        let outcome = store.load_teams(&mount).await.unwrap();
        assert_eq!(outcome, Commit::Applied(2));

        store.select_team(Some(TeamId::new("team7").unwrap())).unwrap();
        assert_eq!(store.selected_team_id().unwrap().as_str(), "team7");
    }

    #[tokio::test]
    async fn test_select_unknown_team_is_rejected() {
        let mock = MockGatewayApi::new();
        let (_tx, rx) = signed_in();
        let store = TeamsStore::new(Arc::new(mock), rx);

        let result = store.select_team(Some(TeamId::new("ghost").unwrap()));
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(store.selected_team_id().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_call() {
        let mut mock = MockGatewayApi::new();
        mock.expect_list_teams().times(0);

        let (_tx, rx) = watch::channel(Session::anonymous());
        let store = TeamsStore::new(Arc::new(mock), rx);

        let result = store.load_teams(&ViewMount::new()).await;
        assert_eq!(result, Err(DomainError::MissingCredential));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_teams() {
        let mut mock = MockGatewayApi::new();
        let mut calls = 0;
        mock.expect_list_teams().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(vec![summary("team42", "Ballers")])
            } else {
                Err(DomainError::backend(500, "boom"))
            }
        });

        let (_tx, rx) = signed_in();
        let store = TeamsStore::new(Arc::new(mock), rx);
        let mount = ViewMount::new();

        store.load_teams(&mount).await.unwrap();
        assert!(store.load_teams(&mount).await.is_err());
        assert_eq!(store.teams().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_never_writes_the_selection() {
        let mut mock = MockGatewayApi::new();
        let mut calls = 0;
        mock.expect_list_teams().times(3).returning(move |_| {
            calls += 1;
            if calls == 2 {
                Ok(vec![summary("team7", "Bricks")])
            } else {
                Ok(vec![summary("team42", "Ballers")])
            }
        });

        let (_tx, rx) = signed_in();
        let store = TeamsStore::new(Arc::new(mock), rx);
        let mount = ViewMount::new();

        store.load_teams(&mount).await.unwrap();
        store.select_team(Some(TeamId::new("team42").unwrap())).unwrap();

        store.load_teams(&mount).await.unwrap();
        assert!(store.selected_team_id().is_none());
        assert_eq!(
            store.snapshot().selected_team_id.unwrap().as_str(),
            "team42"
        );

        store.load_teams(&mount).await.unwrap();
        assert_eq!(store.selected_team_id().unwrap().as_str(), "team42");
    }

    #[tokio::test]
    async fn test_logout_hides_teams() {
        let mut mock = MockGatewayApi::new();
        mock.expect_list_teams()
            .times(1)
            .returning(|_| Ok(vec![summary("team42", "Ballers")]));

        let (tx, rx) = signed_in();
        let store = TeamsStore::new(Arc::new(mock), rx);
        store.load_teams(&ViewMount::new()).await.unwrap();

        tx.send_modify(|s| *s = s.cleared());

        assert!(store.teams().is_empty());
        assert!(store.selected_team_id().is_none());
    }
}
