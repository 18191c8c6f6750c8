//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, access log)
//!     → metrics.rs (cache, upstream and probe counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event
//! - Request ID attached to access log lines
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
