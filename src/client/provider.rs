use std::sync::Arc;

use tracing::info;

use super::api::GatewayApi;
use super::stores::{LineupStore, RankingsStore, SessionStore, TeamsStore};

/// Owns one set of stores and hands them to views.
///
/// Stores are wired to the session here; nothing reaches them through
/// globals. The domain stores are attached to the session store, so any
/// login or logout clears them.
#[derive(Clone)]
pub struct StoreProvider {
    session: Arc<SessionStore>,
    teams: Arc<TeamsStore>,
    lineups: Arc<LineupStore>,
    rankings: Arc<RankingsStore>,
}

impl StoreProvider {
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let session = Arc::new(SessionStore::new(api.clone()));
        let teams = Arc::new(TeamsStore::new(api.clone(), session.subscribe()));
        let lineups = Arc::new(LineupStore::new(
            api.clone(),
            teams.clone(),
            session.subscribe(),
        ));
        let rankings = Arc::new(RankingsStore::new(api, session.subscribe()));

        session.attach(teams.clone());
        session.attach(lineups.clone());
        session.attach(rankings.clone());

        Self {
            session,
            teams,
            lineups,
            rankings,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn teams(&self) -> &TeamsStore {
        &self.teams
    }

    pub fn lineups(&self) -> &LineupStore {
        &self.lineups
    }

    pub fn rankings(&self) -> &RankingsStore {
        &self.rankings
    }

    /// Sign out and drop every store's data
    pub fn logout(&self) {
        self.session.logout();
        info!("Stores cleared");
    }
}
