//! Backend data service boundary

mod client;
mod envelope;
mod route;

#[cfg(test)]
pub use client::MockBackendClient;
pub use client::BackendClient;
pub use envelope::RequestEnvelope;
pub use route::{BackendRoute, HttpMethod};
