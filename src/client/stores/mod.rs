//! Provider-scoped state stores

pub mod lineup;
pub mod rankings;
pub mod session;
pub mod shared;
pub mod teams;

pub use lineup::{LineupState, LineupStore, SaveOutcome};
pub use rankings::RankingsStore;
pub use session::{SessionStore, SubmitOutcome};
pub use shared::{Commit, Committed, IdentityScoped, RequestSequence, SharedStore, Ticket};
pub use teams::{TeamsState, TeamsStore};
