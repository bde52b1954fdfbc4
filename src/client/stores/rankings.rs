use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::shared::{Commit, Committed, IdentityScoped, RequestSequence, SharedStore};
use crate::client::api::GatewayApi;
use crate::client::mount::ViewMount;
use crate::domain::{validate_rankings, DomainError, RankingEntry, Session};

/// Player rankings, ordered by rank
pub struct RankingsStore {
    api: Arc<dyn GatewayApi>,
    state: SharedStore<Vec<RankingEntry>>,
    load_sequence: RequestSequence,
}

impl RankingsStore {
    pub fn new(api: Arc<dyn GatewayApi>, session: watch::Receiver<Session>) -> Self {
        Self {
            api,
            state: SharedStore::new("rankings", session),
            load_sequence: RequestSequence::new(),
        }
    }

    pub fn entries(&self) -> Vec<RankingEntry> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Committed<Vec<RankingEntry>>> {
        self.state.subscribe()
    }

    pub async fn load_rankings(&self, mount: &ViewMount) -> Result<Commit<usize>, DomainError> {
        let ticket = self.state.begin(&self.load_sequence)?;

        let entries = self
            .api
            .list_rankings(ticket.token().clone())
            .await
            .and_then(validate_rankings)
            .inspect_err(|e| warn!(store = self.state.name(), error = %e, "Loading rankings failed"))?;

        let outcome = self
            .state
            .commit(&ticket, &self.load_sequence, mount, |state| {
                *state = entries;
                state.len()
            });

        debug!(store = self.state.name(), outcome = ?outcome, "Rankings load resolved");
        Ok(outcome)
    }

    pub fn reset(&self) {
        self.state.reset();
    }
}

impl IdentityScoped for RankingsStore {
    fn clear(&self) {
        self.reset();
    }
}
