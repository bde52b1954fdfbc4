//! Backend data service client

mod http_client;

pub use http_client::HttpBackendClient;
