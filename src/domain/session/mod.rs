//! Session domain module
//!
//! A session is the browser-tab scoped identity: an optional bearer token plus
//! an epoch that changes on every identity transition.

mod entity;

pub use entity::{BearerToken, Session, SessionStatus};
