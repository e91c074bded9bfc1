//! # trustloop telemetry
//!
//! Structured logging and distributed tracing for trustloop runs.
//!
//! ## Features
//! - Structured logging with `tracing`
//! - Console output in human-readable or JSON form
//! - Optional OTLP export of spans to an OpenTelemetry collector
//!
//! ## Usage
//!
//! ```rust
//! use trustloop_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     init_telemetry("trustloop")?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use init::{
    LogFormat, init_telemetry, init_telemetry_with_format, init_with_otlp, shutdown_telemetry,
};
pub use spans::*;
