//! HTTP collaborators (feature `client`).
//!
//! Thin reqwest clients for the services the core talks to: the streaming
//! chat endpoint, the analytics data endpoint, and the history/save/delete
//! config endpoints. Base URLs are constructor parameters; nothing here
//! holds state beyond a connection pool.

mod chat;
mod dashboard;
mod error;

pub use chat::ChatClient;
pub use dashboard::{DashboardClient, DashboardFilter, SaveConfigRequest};
pub use error::{ApiError, ApiResult};

#[cfg(test)]
mod tests;
