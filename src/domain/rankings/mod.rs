//! Rankings domain module

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One row of the player rankings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Check a rankings table and return it ordered by rank
pub fn validate_rankings(mut entries: Vec<RankingEntry>) -> Result<Vec<RankingEntry>, DomainError> {
    if let Some(entry) = entries.iter().find(|e| e.rank == 0) {
        return Err(DomainError::invalid_response(format!(
            "Ranking for '{}' has rank 0",
            entry.name
        )));
    }

    entries.sort_by_key(|e| e.rank);
    Ok(entries)
}
