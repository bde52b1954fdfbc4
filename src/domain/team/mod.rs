//! Team domain module
//!
//! Team CRUD lives in the backend; this side only needs identifiers and the
//! summaries shown in the team picker.

mod entity;
mod validation;

pub use entity::{TeamId, TeamSummary};
pub use validation::{validate_team_id, TeamValidationError};
