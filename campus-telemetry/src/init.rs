use std::sync::Once;
use thiserror::Error;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("failed to install OTLP exporter: {0}")]
    Exporter(String),

    #[error("global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Configuration for the telemetry system
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub otlp_endpoint: Option<String>,
    pub default_level: Option<String>,
    pub log_directives: Vec<String>,
    /// Emit one JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new("campus-assistant")
    }
}

impl TelemetryConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            otlp_endpoint: None,
            default_level: None,
            log_directives: Vec::new(),
            json: false,
        }
    }

    /// Export spans to an OTLP collector. Only honored with the `otlp` feature.
    pub fn with_otlp(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    /// Set the default log level (e.g., "debug", "info"). `RUST_LOG` wins when set.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Add a custom tracing directive (e.g., "campus_flow=debug").
    pub fn with_log_directive(mut self, directive: impl Into<String>) -> Self {
        self.log_directives.push(directive.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `SERVICE_NAME` (default: "campus-assistant")
    /// - `OTLP_ENDPOINT`, e.g. "http://localhost:4317"
    /// - `LOG_LEVEL` (default: "info")
    /// - `LOG_JSON`: "true" or "1" for JSON output
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(lookup("SERVICE_NAME").unwrap_or_else(|| "campus-assistant".to_string()));
        config.otlp_endpoint = lookup("OTLP_ENDPOINT").filter(|e| !e.is_empty());
        config.default_level = lookup("LOG_LEVEL");
        config.json = lookup("LOG_JSON").is_some_and(|v| v == "true" || v == "1");
        config
    }
}

/// Initialize telemetry with console logging at the default level.
pub fn init_telemetry(service_name: &str) -> Result<(), TelemetryError> {
    init_with_config(TelemetryConfig::new(service_name))
}

/// Install the global subscriber. Only the first call in a process has any
/// effect; later calls return `Ok(())`.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), TelemetryError> {
    let mut result = Ok(());
    INIT.call_once(|| result = install(&config));
    result
}

/// Flush pending spans. A no-op without the `otlp` feature.
pub fn shutdown_telemetry() {
    #[cfg(feature = "otlp")]
    opentelemetry::global::shutdown_tracer_provider();
}

fn install(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    let plain = (!config.json).then(|| fmt::layer().with_target(true).with_line_number(true));
    let json = config.json.then(|| fmt::layer().json().with_target(true).with_line_number(true));

    let registry = tracing_subscriber::registry().with(filter).with(plain).with(json);

    #[cfg(feature = "otlp")]
    let registry = registry.with(otlp_layer(config)?);

    registry.try_init().map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))?;

    tracing::info!(
        service.name = %config.service_name,
        otlp.enabled = config.otlp_endpoint.is_some(),
        log.json = config.json,
        log.level = config.default_level.as_deref().unwrap_or("env"),
        "telemetry initialized"
    );
    Ok(())
}

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let mut filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.default_level.as_deref().unwrap_or("info"))
            .map_err(|e| TelemetryError::Filter(e.to_string()))?,
    };
    for directive in &config.log_directives {
        let parsed = directive
            .parse::<Directive>()
            .map_err(|e| TelemetryError::Filter(format!("{directive}: {e}")))?;
        filter = filter.add_directive(parsed);
    }
    Ok(filter)
}

#[cfg(feature = "otlp")]
fn otlp_layer<S>(
    config: &TelemetryConfig,
) -> Result<
    Option<tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>>,
    TelemetryError,
>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    use opentelemetry_otlp::WithExportConfig;

    let Some(endpoint) = &config.otlp_endpoint else {
        return Ok(None);
    };
    let resource = opentelemetry_sdk::Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint.clone()))
        .with_trace_config(opentelemetry_sdk::trace::config().with_resource(resource))
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer)))
}
