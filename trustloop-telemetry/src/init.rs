//! Telemetry initialization and configuration

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Console output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

fn env_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new("info")?),
    }
}

/// Initialize console logging in the default (pretty) format.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Only the first call
/// installs a subscriber; later calls are no-ops.
pub fn init_telemetry(service_name: &str) -> InitResult {
    init_telemetry_with_format(service_name, LogFormat::Pretty)
}

/// Initialize console logging in the given format.
pub fn init_telemetry_with_format(service_name: &str, format: LogFormat) -> InitResult {
    let filter = env_filter()?;
    let mut result: InitResult = Ok(());

    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        result = match format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true),
                )
                .try_init(),
        }
        .map_err(Into::into);

        tracing::info!(service.name = service_name, ?format, "Telemetry initialized");
    });

    result
}

/// Initialize telemetry with OpenTelemetry OTLP span export.
///
/// # Arguments
/// * `service_name` - Name of the service for trace identification
/// * `endpoint` - OTLP collector endpoint (e.g., "http://localhost:4317")
///
/// Must be called from within a Tokio runtime.
pub fn init_with_otlp(service_name: &str, endpoint: &str) -> InitResult {
    use opentelemetry_otlp::WithExportConfig;
    use tracing_opentelemetry::OpenTelemetryLayer;

    let filter = env_filter()?;
    let mut result: InitResult = Ok(());

    INIT.call_once(|| {
        let tracer = match opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint))
            .with_trace_config(opentelemetry_sdk::trace::config().with_resource(
                opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                    "service.name",
                    service_name.to_string(),
                )]),
            ))
            .install_batch(opentelemetry_sdk::runtime::Tokio)
        {
            Ok(tracer) => tracer,
            Err(e) => {
                result = Err(e.into());
                return;
            }
        };

        result = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(OpenTelemetryLayer::new(tracer))
            .try_init()
            .map_err(Into::into);

        tracing::info!(
            service.name = service_name,
            otlp.endpoint = endpoint,
            "Telemetry initialized with OpenTelemetry"
        );
    });

    result
}

/// Flush pending spans. Call before exit when OTLP export is enabled.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
