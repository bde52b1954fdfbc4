//! Lineup entity and the backend payloads it is parsed from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// A player slot in a lineup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_positions: Vec<String>,
}

impl PlayerRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avg_points: None,
            team: None,
            injury_status: None,
            valid_positions: Vec::new(),
        }
    }
}

/// A lineup object as the backend returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupPayload {
    pub players: Vec<PlayerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Response of the list-lineups call: a bare array or `{ "lineups": [...] }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LineupsPayload {
    List(Vec<LineupPayload>),
    Wrapped { lineups: Vec<LineupPayload> },
}

impl LineupsPayload {
    pub fn into_vec(self) -> Vec<LineupPayload> {
        match self {
            Self::List(lineups) | Self::Wrapped { lineups } => lineups,
        }
    }
}

/// Parameters for a lineup generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateLineupParams {
    pub team_id: TeamId,
    #[serde(flatten)]
    pub constraints: Map<String, Value>,
}

impl GenerateLineupParams {
    pub fn new(team_id: TeamId) -> Self {
        Self {
            team_id,
            constraints: Map::new(),
        }
    }

    pub fn with_constraint(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.insert(key.into(), value.into());
        self
    }
}

/// Backend reply to a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfirmation {
    pub success: bool,
}

/// A lineup held by the client
#[derive(Debug, Clone, PartialEq)]
pub struct Lineup {
    players: Vec<PlayerRef>,
    source_team_id: TeamId,
    generated_at: DateTime<Utc>,
    saved: bool,
}

impl Lineup {
    /// Build a freshly generated, unsaved lineup
    pub fn generated(
        payload: LineupPayload,
        requested_team: TeamId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_players(&payload.players)?;

        Ok(Self {
            players: payload.players,
            source_team_id: payload.team_id.unwrap_or(requested_team),
            generated_at: payload.generated_at.unwrap_or(now),
            saved: false,
        })
    }

    /// Build a lineup the backend reports as already persisted
    pub fn persisted(
        payload: LineupPayload,
        fallback_team: Option<&TeamId>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_players(&payload.players)?;

        let source_team_id = payload
            .team_id
            .or_else(|| fallback_team.cloned())
            .ok_or_else(|| DomainError::invalid_response("Saved lineup has no team_id"))?;

        Ok(Self {
            players: payload.players,
            source_team_id,
            generated_at: payload.generated_at.unwrap_or(now),
            saved: true,
        })
    }

    pub fn players(&self) -> &[PlayerRef] {
        &self.players
    }

    pub fn source_team_id(&self) -> &TeamId {
        &self.source_team_id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Record a successful save. There is no way back to unsaved.
    pub fn mark_saved(&mut self) {
        self.saved = true;
    }

    /// Body sent to the save endpoint
    pub fn to_payload(&self) -> LineupPayload {
        LineupPayload {
            players: self.players.clone(),
            team_id: Some(self.source_team_id.clone()),
            generated_at: Some(self.generated_at),
        }
    }
}

fn validate_players(players: &[PlayerRef]) -> Result<(), DomainError> {
    if players.is_empty() {
        return Err(DomainError::invalid_response("Lineup has no players"));
    }

    if players.iter().any(|p| p.name.trim().is_empty()) {
        return Err(DomainError::invalid_response("Lineup contains a player without a name"));
    }

    Ok(())
}
