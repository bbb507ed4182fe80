//! service-core: Shared infrastructure for the greeting microservices.
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod startup;

pub use axum;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
