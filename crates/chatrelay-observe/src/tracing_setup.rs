//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! ```no_run
//! // Logging only, `info` unless RUST_LOG says otherwise
//! chatrelay_observe::tracing_setup::init_tracing(false, "info").unwrap();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer with span close timing.
/// - `RUST_LOG` takes precedence over `default_filter`.
/// - When `enable_otel` is true, spans are also bridged to OpenTelemetry
///   with a stdout exporter.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    enable_otel: bool,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), default_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("chatrelay");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Pick the filter directive: a non-empty `RUST_LOG` wins, then the
/// caller's default. Invalid directives fall back to `info`.
fn build_filter(rust_log: Option<&str>, default_filter: &str) -> EnvFilter {
    let directives = rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_filter);

    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("Warning: invalid log filter '{directives}': {err}, using 'info'");
        EnvFilter::new("info")
    })
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_default() {
        let filter = build_filter(Some("debug"), "warn");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn blank_rust_log_uses_default() {
        let filter = build_filter(Some("  "), "warn");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
