//! Cached HTTP health-check facade for the Patroni REST API.
//!
//! Load balancers probe `/primary`, `/replica` and friends here; answers are
//! resolved against Patroni at most once per cache ttl.

pub mod backend;
pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use backend::{HttpBackend, StatusKey};
pub use cache::{MemoryCache, StatusCache};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
