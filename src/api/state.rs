//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::BackendClient;
use crate::infrastructure::gateway::GatewayService;

/// Application state. Holds no per-request or per-user data.
#[derive(Clone)]
pub struct AppState {
    pub gateway: GatewayService,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            gateway: GatewayService::new(backend),
        }
    }
}
