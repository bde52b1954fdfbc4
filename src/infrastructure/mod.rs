//! Infrastructure layer - External service implementations

pub mod backend;
pub mod gateway;
pub mod logging;
pub mod observability;
