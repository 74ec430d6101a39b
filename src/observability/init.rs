//! Subscriber setup.

use super::exporter::{file_tracer_provider, SCOPE};
use crate::domain::error::Result;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace log inside the trace directory.
pub const TRACE_FILE_NAME: &str = "storefront-filters-otlp.json";

/// Installs the global subscriber exporting spans to the configured trace
/// directory.
///
/// The filter comes from `RUST_LOG` when set, else from
/// `config.trace_level`, else `info`. Calling this more than once leaves the
/// first subscriber in place.
///
/// Returns the path of the trace file.
///
/// # Errors
///
/// Returns [`StorefrontError::Io`](crate::StorefrontError::Io) if the trace
/// directory cannot be created.
///
/// ```no_run
/// use storefront_filters::observability::init_tracing;
/// use storefront_filters::Config;
///
/// let config = Config {
///     trace_level: Some("storefront_filters=debug".to_string()),
///     ..Default::default()
/// };
/// let trace_file = init_tracing(&config)?;
/// tracing::debug!(path = %trace_file.display(), "tracing is now active");
/// # Ok::<(), storefront_filters::StorefrontError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<PathBuf> {
    let trace_dir = config.trace_dir();
    std::fs::create_dir_all(&trace_dir)?;
    let trace_file = trace_dir.join(TRACE_FILE_NAME);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SCOPE),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = file_tracer_provider(trace_file.clone(), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(path = %trace_file.display(), "trace export enabled");
    }

    Ok(trace_file)
}
