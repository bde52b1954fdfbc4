//! Domain layer - Core types, invariants, and the backend port

pub mod account;
pub mod backend;
pub mod error;
pub mod lineup;
pub mod rankings;
pub mod session;
pub mod team;

pub use account::{
    AccountForm, AccountIntent, AccountOutcome, AccountValidationError, AuthFlags,
    CreateAccountResponse, Credentials, LoginOutcome, LoginResponse,
};
pub use backend::{BackendClient, BackendRoute, HttpMethod, RequestEnvelope};
pub use error::DomainError;
pub use lineup::{
    GenerateLineupParams, Lineup, LineupPayload, LineupsPayload, PlayerRef, SaveConfirmation,
};
pub use rankings::{validate_rankings, RankingEntry};
pub use session::{BearerToken, Session, SessionStatus};
pub use team::{TeamId, TeamSummary, TeamValidationError};
