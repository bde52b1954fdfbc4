//! Client-side state: the session, the domain stores, and the dashboard
//! that shows them. Talks to the backend only through the gateway routes.

pub mod api;
pub mod dashboard;
pub mod mount;
pub mod provider;
pub mod stores;

pub use api::{GatewayApi, HttpGatewayApi};
pub use dashboard::{ActivePage, Dashboard, DashboardView};
pub use mount::ViewMount;
pub use provider::StoreProvider;
