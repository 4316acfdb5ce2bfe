use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for TraceFormat {
    type Err = ParseTraceFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ParseTraceFormatError::UnknownFormat {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTraceFormatError {
    #[error("UnknownFormat: {value} (expected `compact` or `json`)")]
    UnknownFormat { value: String },
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn tracing_init(level: &str, format: TraceFormat) -> Result<(), TracingInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|source| TracingInitError::InvalidFilter { source })?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        TraceFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().compact()),
        ),
        TraceFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_current_span(false)),
        ),
    }
    .map_err(|source| TracingInitError::SetGlobalDefault { source })?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Invalid filter config")]
    InvalidFilter {
        #[from]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global default subscriber")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("compact".parse::<TraceFormat>(), Ok(TraceFormat::Compact));
        assert_eq!("JSON".parse::<TraceFormat>(), Ok(TraceFormat::Json));
        assert_eq!(" json ".parse::<TraceFormat>(), Ok(TraceFormat::Json));
        assert_eq!("".parse::<TraceFormat>(), Ok(TraceFormat::Compact));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "pretty".parse::<TraceFormat>().unwrap_err();
        assert_eq!(
            err,
            ParseTraceFormatError::UnknownFormat {
                value: "pretty".to_string()
            }
        );
    }
}
