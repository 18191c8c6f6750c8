//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake, protocol floor and cipher policy)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently by axum-server
//! - TLS policy is parsed at validation time so bad settings fail startup

pub mod tls;
