//! Telemetry and logging infrastructure
//!
//! Provides structured logging with tracing and tick-rate measurement.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogConfig, LogGuard};
pub use metrics::TickRate;
