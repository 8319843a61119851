//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup and dispatch produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters, latency histograms, route gauge)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - TraceLayer opens one span per HTTP request
//! - Metric updates are no-ops until a recorder is installed, so tests and
//!   embedders that skip `init_metrics` pay nothing

pub mod logging;
pub mod metrics;
