//! Remote gateway - authenticated pass-through to the backend

mod service;

pub use service::{GatewayService, RelayedBody};
