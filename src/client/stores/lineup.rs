//! Generated and saved lineups for the selected team

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::shared::{Commit, Committed, IdentityScoped, RequestSequence, SharedStore};
use super::teams::TeamsStore;
use crate::client::api::GatewayApi;
use crate::client::mount::ViewMount;
use crate::domain::{DomainError, GenerateLineupParams, Lineup, Session, TeamId};

/// Lineups of one team. Read against any other team selection it is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineupState {
    /// Team the lineups below belong to
    pub team_id: Option<TeamId>,
    /// Lineups the backend holds for that team
    pub saved: Vec<Lineup>,
    /// The lineup shown in the UI
    pub active: Option<Lineup>,
}

impl LineupState {
    /// Rebind to `team_id`, dropping lineups of any other team
    fn scope_to(&mut self, team_id: Option<TeamId>) {
        if self.team_id != team_id {
            *self = Self {
                team_id,
                ..Self::default()
            };
        }
    }
}

/// Result of saving the active lineup
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Lineup),
    /// The backend answered `success: false`
    NotConfirmed,
}

/// Held while a save is in flight
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveGuard(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct LineupStore {
    api: Arc<dyn GatewayApi>,
    teams: Arc<TeamsStore>,
    state: SharedStore<LineupState>,
    load_sequence: RequestSequence,
    generate_sequence: RequestSequence,
    save_sequence: RequestSequence,
    saving: AtomicBool,
}

impl LineupStore {
    pub fn new(
        api: Arc<dyn GatewayApi>,
        teams: Arc<TeamsStore>,
        session: watch::Receiver<Session>,
    ) -> Self {
        Self {
            api,
            teams,
            state: SharedStore::new("lineup", session),
            load_sequence: RequestSequence::new(),
            generate_sequence: RequestSequence::new(),
            save_sequence: RequestSequence::new(),
            saving: AtomicBool::new(false),
        }
    }

    /// Lineups of the currently selected team
    pub fn snapshot(&self) -> LineupState {
        let mut state = self.state.snapshot();
        state.scope_to(self.teams.selected_team_id());
        state
    }

    pub fn active(&self) -> Option<Lineup> {
        self.snapshot().active
    }

    pub fn saved(&self) -> Vec<Lineup> {
        self.snapshot().saved
    }

    /// Raw state; compare its `team_id` with the team selection
    pub fn subscribe(&self) -> watch::Receiver<Committed<LineupState>> {
        self.state.subscribe()
    }

    /// Fetch saved lineups for the selected team. With no team selected the
    /// backend is asked with an empty team value. A response for a team that
    /// is no longer selected is [`Commit::Superseded`].
    pub async fn load_lineups(&self, mount: &ViewMount) -> Result<Commit<usize>, DomainError> {
        let ticket = self.state.begin(&self.load_sequence)?;
        let team = self.teams.selected_team_id();

        let payloads = self
            .api
            .list_lineups(ticket.token().clone(), team.clone())
            .await
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Loading lineups failed"))?;

        let now = Utc::now();
        let lineups = payloads
            .into_iter()
            .map(|payload| Lineup::persisted(payload, team.as_ref(), now))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Discarding lineups"))?;

        if self.teams.selected_team_id() != team {
            debug!(store = self.state.name(), "Team changed while loading lineups");
            return Ok(Commit::Superseded);
        }

        let outcome = self
            .state
            .commit(&ticket, &self.load_sequence, mount, |state| {
                state.scope_to(team);
                state.saved = lineups;
                state.saved.len()
            });

        debug!(store = self.state.name(), outcome = ?outcome, "Lineups load resolved");
        Ok(outcome)
    }

    /// Generate a lineup for the selected team. On success it becomes the
    /// active, unsaved lineup.
    pub async fn generate(
        &self,
        constraints: Map<String, Value>,
        mount: &ViewMount,
    ) -> Result<Commit<Lineup>, DomainError> {
        if self.state.session().token().is_none() {
            return Err(DomainError::MissingCredential);
        }

        let team = self
            .teams
            .selected_team_id()
            .ok_or_else(|| DomainError::validation("Select a team before generating a lineup"))?;

        let ticket = self.state.begin(&self.generate_sequence)?;
        let mut params = GenerateLineupParams::new(team.clone());
        params.constraints = constraints;

        let payload = self
            .api
            .generate_lineup(ticket.token().clone(), params)
            .await
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Lineup generation failed"))?;

        let lineup = Lineup::generated(payload, team.clone(), Utc::now())?;

        let outcome = self
            .state
            .commit(&ticket, &self.generate_sequence, mount, |state| {
                state.scope_to(Some(team));
                state.active = Some(lineup.clone());
                lineup
            });

        debug!(store = self.state.name(), applied = outcome.is_applied(), "Lineup generated");
        Ok(outcome)
    }

    /// Persist the active lineup. Only one save runs at a time.
    pub async fn save_active(&self, mount: &ViewMount) -> Result<Commit<SaveOutcome>, DomainError> {
        let active = self
            .snapshot()
            .active
            .ok_or_else(|| DomainError::validation("No active lineup to save"))?;

        if active.is_saved() {
            return Err(DomainError::validation("Active lineup is already saved"));
        }

        let _saving = SaveGuard::acquire(&self.saving)
            .ok_or_else(|| DomainError::validation("A save is already in progress"))?;

        let ticket = self.state.begin(&self.save_sequence)?;

        let confirmation = self
            .api
            .save_lineup(ticket.token().clone(), active.to_payload())
            .await
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Saving lineup failed"))?;

        if !confirmation.success {
            warn!(store = self.state.name(), "Backend did not confirm the save");
            return Ok(self
                .state
                .settle(&ticket, &self.save_sequence, mount, SaveOutcome::NotConfirmed));
        }

        let mut saved = active.clone();
        saved.mark_saved();
        let team = Some(active.source_team_id().clone());

        let outcome = self
            .state
            .commit(&ticket, &self.save_sequence, mount, |state| {
                if state.team_id == team {
                    if let Some(current) = state.active.as_mut() {
                        if *current == active {
                            current.mark_saved();
                        }
                    }
                    state.saved.push(saved.clone());
                }
                SaveOutcome::Saved(saved)
            });

        info!(store = self.state.name(), applied = outcome.is_applied(), "Lineup saved");
        Ok(outcome)
    }

    /// Show one of the saved lineups
    pub fn activate_saved(&self, index: usize) -> Result<Lineup, DomainError> {
        let selected = self.teams.selected_team_id();

        self.state.update(|state| {
            state.scope_to(selected);
            let lineup = state
                .saved
                .get(index)
                .cloned()
                .ok_or_else(|| DomainError::validation(format!("No saved lineup at {}", index)))?;

            state.active = Some(lineup.clone());
            Ok(lineup)
        })
    }

    pub fn reset(&self) {
        self.state.reset();
    }
}

impl IdentityScoped for LineupStore {
    fn clear(&self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::client::api::MockGatewayApi;
    use crate::domain::{
        BearerToken, CreateAccountResponse, Credentials, LineupPayload, LoginResponse, PlayerRef,
        RankingEntry, SaveConfirmation, TeamSummary,
    };

    struct Fixture {
        session: watch::Sender<Session>,
        teams: Arc<TeamsStore>,
        lineups: LineupStore,
    }

    fn team(id: &str) -> TeamSummary {
        TeamSummary {
            team_id: TeamId::new(id).unwrap(),
            team_name: id.to_uppercase(),
            league_id: None,
            year: None,
        }
    }

    fn payload(names: &[&str]) -> LineupPayload {
        LineupPayload {
            players: names.iter().map(|n| PlayerRef::named(*n)).collect(),
            team_id: None,
            generated_at: None,
        }
    }

    /// Signed in, with "team42" and "team7" loaded and "team42" selected
    async fn fixture(mut mock: MockGatewayApi) -> Fixture {
        mock.expect_list_teams()
            .returning(|_| Ok(vec![team("team42"), team("team7")]));

        let api: Arc<dyn GatewayApi> = Arc::new(mock);
        let session = Session::anonymous().authenticated(BearerToken::new("tok").unwrap());
        let (tx, rx) = watch::channel(session);

        let teams = Arc::new(TeamsStore::new(api.clone(), rx.clone()));
        teams.load_teams(&ViewMount::new()).await.unwrap();
        teams.select_team(Some(TeamId::new("team42").unwrap())).unwrap();

        let lineups = LineupStore::new(api, teams.clone(), rx);
        Fixture {
            session: tx,
            teams,
            lineups,
        }
    }

    #[tokio::test]
    async fn test_generate_sets_unsaved_active_lineup() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .withf(|token, params| {
                token.as_str() == "tok"
                    && params.team_id.as_str() == "team42"
                    && params.constraints.get("budget") == Some(&json!(100))
            })
            .times(1)
            .returning(|_, _| Ok(payload(&["Jokic", "Curry"])));

        let f = fixture(mock).await;
        let mut constraints = Map::new();
        constraints.insert("budget".into(), json!(100));

        let lineup = f
            .lineups
            .generate(constraints, &ViewMount::new())
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert!(!lineup.is_saved());
        assert_eq!(lineup.source_team_id().as_str(), "team42");
        assert_eq!(f.lineups.active(), Some(lineup));
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_lineup_unchanged() {
        let mut mock = MockGatewayApi::new();
        let mut calls = 0;
        mock.expect_generate_lineup().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(payload(&["Jokic"]))
            } else {
                Err(DomainError::backend(500, "Internal Server Error"))
            }
        });

        let f = fixture(mock).await;
        let mount = ViewMount::new();

        f.lineups.generate(Map::new(), &mount).await.unwrap();
        let before = f.lineups.snapshot();

        let result = f.lineups.generate(Map::new(), &mount).await;

        assert_eq!(result, Err(DomainError::backend(500, "Internal Server Error")));
        assert_eq!(f.lineups.snapshot(), before);
    }

    #[tokio::test]
    async fn test_generate_requires_selected_team() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup().times(0);

        let f = fixture(mock).await;
        f.teams.select_team(None).unwrap();

        let result = f.lineups.generate(Map::new(), &ViewMount::new()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_empty_generated_lineup_is_invalid() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .times(1)
            .returning(|_, _| Ok(payload(&[])));

        let f = fixture(mock).await;
        let result = f.lineups.generate(Map::new(), &ViewMount::new()).await;

        assert!(matches!(result, Err(DomainError::InvalidResponse { .. })));
        assert!(f.lineups.active().is_none());
    }

    #[tokio::test]
    async fn test_save_marks_active_saved_and_appends_copy() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .times(1)
            .returning(|_, _| Ok(payload(&["Jokic"])));
        mock.expect_save_lineup()
            .withf(|_, lineup| {
                lineup.team_id.as_ref().map(|t| t.as_str()) == Some("team42")
                    && lineup.players.len() == 1
            })
            .times(1)
            .returning(|_, _| Ok(SaveConfirmation { success: true }));

        let f = fixture(mock).await;
        let mount = ViewMount::new();
        f.lineups.generate(Map::new(), &mount).await.unwrap();

        let outcome = f.lineups.save_active(&mount).await.unwrap();
        assert!(matches!(outcome, Commit::Applied(SaveOutcome::Saved(_))));

        let state = f.lineups.snapshot();
        assert!(state.active.unwrap().is_saved());
        assert_eq!(state.saved.len(), 1);
        assert!(state.saved[0].is_saved());

        // saved never goes back to false, and saving twice is refused
        let again = f.lineups.save_active(&mount).await;
        assert!(matches!(again, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_unconfirmed_save_changes_nothing() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .times(1)
            .returning(|_, _| Ok(payload(&["Jokic"])));
        mock.expect_save_lineup()
            .times(1)
            .returning(|_, _| Ok(SaveConfirmation { success: false }));

        let f = fixture(mock).await;
        let mount = ViewMount::new();
        f.lineups.generate(Map::new(), &mount).await.unwrap();

        let outcome = f.lineups.save_active(&mount).await.unwrap();

        assert_eq!(outcome, Commit::Applied(SaveOutcome::NotConfirmed));
        assert!(!f.lineups.active().unwrap().is_saved());
        assert!(f.lineups.saved().is_empty());
    }

    #[tokio::test]
    async fn test_load_scopes_by_selected_team_and_activates_saved() {
        let mut mock = MockGatewayApi::new();
        mock.expect_list_lineups()
            .withf(|_, team| team.as_ref().map(|t| t.as_str()) == Some("team42"))
            .times(1)
            .returning(|_, _| Ok(vec![payload(&["Jokic"]), payload(&["Curry"])]));

        let f = fixture(mock).await;
        let outcome = f.lineups.load_lineups(&ViewMount::new()).await.unwrap();
        assert_eq!(outcome, Commit::Applied(2));

        let lineup = f.lineups.activate_saved(1).unwrap();
        assert!(lineup.is_saved());
        assert_eq!(lineup.players()[0].name, "Curry");
        assert_eq!(lineup.source_team_id().as_str(), "team42");

        assert!(f.lineups.activate_saved(5).is_err());
    }

    #[tokio::test]
    async fn test_unmounted_view_discards_generated_lineup() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .times(1)
            .returning(|_, _| Ok(payload(&["Jokic"])));

        let f = fixture(mock).await;
        let mount = ViewMount::new();
        mount.unmount();

        let outcome = f.lineups.generate(Map::new(), &mount).await.unwrap();

        assert_eq!(outcome, Commit::Unmounted);
        assert!(f.lineups.active().is_none());
    }

    #[tokio::test]
    async fn test_unconfirmed_save_for_closed_view_is_unmounted() {
        let mount = ViewMount::new();
        let closing = mount.clone();

        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup()
            .times(1)
            .returning(|_, _| Ok(payload(&["Jokic"])));
        mock.expect_save_lineup().times(1).returning(move |_, _| {
            closing.unmount();
            Ok(SaveConfirmation { success: false })
        });

        let f = fixture(mock).await;
        f.lineups.generate(Map::new(), &mount).await.unwrap();

        let outcome = f.lineups.save_active(&mount).await.unwrap();
        assert_eq!(outcome, Commit::Unmounted);
    }

    #[tokio::test]
    async fn test_lineups_follow_the_selected_team() {
        let mut mock = MockGatewayApi::new();
        mock.expect_list_lineups()
            .times(1)
            .returning(|_, _| Ok(vec![payload(&["Jokic"])]));

        let f = fixture(mock).await;
        f.lineups.load_lineups(&ViewMount::new()).await.unwrap();
        assert_eq!(f.lineups.saved().len(), 1);

        f.teams.select_team(Some(TeamId::new("team7").unwrap())).unwrap();
        let state = f.lineups.snapshot();
        assert_eq!(state.team_id.unwrap().as_str(), "team7");
        assert!(state.saved.is_empty());
        assert!(f.lineups.activate_saved(0).is_err());

        f.teams.select_team(Some(TeamId::new("team42").unwrap())).unwrap();
        assert_eq!(f.lineups.saved().len(), 1);
    }

    /// Backend whose lineup list and save calls block until released
    #[derive(Default)]
    struct Gated {
        entered: Notify,
        release: Notify,
        saves: AtomicUsize,
    }

    impl Gated {
        async fn hold(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    #[async_trait]
    impl GatewayApi for Gated {
        async fn create_account(
            &self,
            _credentials: Credentials,
        ) -> Result<CreateAccountResponse, DomainError> {
            unimplemented!()
        }

        async fn login(&self, _credentials: Credentials) -> Result<LoginResponse, DomainError> {
            unimplemented!()
        }

        async fn list_lineups(
            &self,
            _token: BearerToken,
            _selected_team: Option<TeamId>,
        ) -> Result<Vec<LineupPayload>, DomainError> {
            self.hold().await;
            Ok(vec![payload(&["Jokic"])])
        }

        async fn generate_lineup(
            &self,
            _token: BearerToken,
            _params: GenerateLineupParams,
        ) -> Result<LineupPayload, DomainError> {
            Ok(payload(&["Curry"]))
        }

        async fn save_lineup(
            &self,
            _token: BearerToken,
            _lineup: LineupPayload,
        ) -> Result<SaveConfirmation, DomainError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.hold().await;
            Ok(SaveConfirmation { success: true })
        }

        async fn list_teams(&self, _token: BearerToken) -> Result<Vec<TeamSummary>, DomainError> {
            Ok(vec![team("team42"), team("team7")])
        }

        async fn list_rankings(
            &self,
            _token: BearerToken,
        ) -> Result<Vec<RankingEntry>, DomainError> {
            unimplemented!()
        }
    }

    async fn gated() -> (Arc<Gated>, Arc<TeamsStore>, Arc<LineupStore>, watch::Sender<Session>) {
        let gate = Arc::new(Gated::default());
        let api: Arc<dyn GatewayApi> = gate.clone();
        let session = Session::anonymous().authenticated(BearerToken::new("tok").unwrap());
        let (tx, rx) = watch::channel(session);

        let teams = Arc::new(TeamsStore::new(api.clone(), rx.clone()));
        teams.load_teams(&ViewMount::new()).await.unwrap();
        teams.select_team(Some(TeamId::new("team42").unwrap())).unwrap();

        let lineups = Arc::new(LineupStore::new(api, teams.clone(), rx));
        (gate, teams, lineups, tx)
    }

    #[tokio::test]
    async fn test_load_for_previous_team_is_superseded() {
        let (gate, teams, lineups, _tx) = gated().await;

        let pending = tokio::spawn({
            let lineups = lineups.clone();
            async move {
                let mount = ViewMount::new();
                lineups.load_lineups(&mount).await
            }
        });

        gate.entered.notified().await;
        teams.select_team(Some(TeamId::new("team7").unwrap())).unwrap();
        gate.release.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), Commit::Superseded);
        assert!(lineups.saved().is_empty());

        teams.select_team(Some(TeamId::new("team42").unwrap())).unwrap();
        assert!(lineups.saved().is_empty());
    }

    #[tokio::test]
    async fn test_second_save_while_one_is_in_flight_is_refused() {
        let (gate, _teams, lineups, _tx) = gated().await;
        let mount = ViewMount::new();
        lineups.generate(Map::new(), &mount).await.unwrap();

        let pending = tokio::spawn({
            let lineups = lineups.clone();
            async move {
                let mount = ViewMount::new();
                lineups.save_active(&mount).await
            }
        });

        gate.entered.notified().await;
        let second = lineups.save_active(&mount).await;
        assert!(matches!(second, Err(DomainError::Validation { .. })));

        gate.release.notify_one();
        let first = pending.await.unwrap().unwrap();
        assert!(matches!(first, Commit::Applied(SaveOutcome::Saved(_))));
        assert_eq!(gate.saves.load(Ordering::SeqCst), 1);
        assert_eq!(lineups.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_signed_out_generate_makes_no_call() {
        let mut mock = MockGatewayApi::new();
        mock.expect_generate_lineup().times(0);

        let f = fixture(mock).await;
        f.session.send_modify(|s| *s = s.cleared());

        let result = f.lineups.generate(Map::new(), &ViewMount::new()).await;
        assert_eq!(result, Err(DomainError::MissingCredential));
    }
}
