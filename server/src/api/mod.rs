//! HTTP API
//!
//! - `server` - router assembly and graceful shutdown
//! - `routes` - endpoint handlers
//! - `types` - error responses shared by all endpoints

pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;

pub use server::ApiServer;
pub use types::ApiError;
