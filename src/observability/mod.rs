//! OpenTelemetry tracing with file export.
//!
//! `tracing` spans from the store, handler and codec are bridged into
//! OpenTelemetry and written as OTLP JSON, one batch per line:
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk → FileSpanExporter → rotating file
//! ```
//!
//! The file lives in `Config::trace_dir()` and rotates at 10 MB, keeping three
//! backups. Nothing is exported unless [`init_tracing`] is called.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `exporter`: the span exporter and tracer provider
//! - `otlp`: OTLP JSON encoding
//! - `rotating`: size-rotated line writer

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use init::{init_tracing, TRACE_FILE_NAME};
pub use rotating::RotatingFile;
