use std::str::FromStr;
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "pinbridge=debug,tower_http=debug";

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TelemetryFormat {
    /// Human-readable single-line events
    #[default]
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for TelemetryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(TelemetryFormat::Compact),
            "json" => Ok(TelemetryFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Initialize tracing with an `EnvFilter` (from `RUST_LOG`) and a console layer.
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(
    service_name: &str,
    format: TelemetryFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    match format {
        TelemetryFormat::Compact => {
            let console_fmt = tracing_subscriber::fmt::layer().event_format(
                Format::default()
                    .compact()
                    .with_target(false),
            );
            tracing_subscriber::registry()
                .with(filter)
                .with(console_fmt)
                .try_init()?;
        }
        TelemetryFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
                .try_init()?;
        }
    }

    tracing::info!(service = %service_name, ?format, "Telemetry initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("compact".parse::<TelemetryFormat>(), Ok(TelemetryFormat::Compact));
        assert_eq!("JSON".parse::<TelemetryFormat>(), Ok(TelemetryFormat::Json));
        assert!("pretty".parse::<TelemetryFormat>().is_err());
    }
}
