//! API middleware components

pub mod bearer;
pub mod logging;
pub mod metrics;

pub use bearer::{extract_bearer_token, BearerAuth};
pub use logging::{logging_middleware, truncate_for_log, REQUEST_ID_HEADER};
pub use metrics::metrics_middleware;
