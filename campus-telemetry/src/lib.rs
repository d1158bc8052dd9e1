//! # campus-telemetry
//!
//! Process-wide `tracing` setup: an `EnvFilter`, a console (or JSON) fmt
//! layer, and, with the `otlp` feature, span export to an OTLP collector.
//!
//! ```rust,ignore
//! campus_telemetry::init_with_config(TelemetryConfig::from_env())?;
//! ```

mod init;

pub use init::{TelemetryConfig, TelemetryError, init_telemetry, init_with_config, shutdown_telemetry};

// Re-export the macros so callers need only this crate for logging.
pub use tracing::{debug, error, info, instrument, trace, warn};
