//! Lineup domain module

mod entity;

pub use entity::{
    GenerateLineupParams, Lineup, LineupPayload, LineupsPayload, PlayerRef, SaveConfirmation,
};
