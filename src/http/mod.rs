//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, access log)
//!     → handlers.rs (route → StatusKey → backend resolution)
//!     → response.rs (outcome → status code + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::Dispatcher;
pub use request::X_REQUEST_ID;
pub use response::{ProbeOutcome, StatusReply};
pub use server::HttpServer;
