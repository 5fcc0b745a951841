use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

const REDACTED: &str = "[REDACTED]";

/// `"field": "value"` pairs whose value must never reach a log line
static SENSITIVE_JSON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)"(api_key|apiKey|x-api-key|key|password|secret|token|access_token|authorization)"(\s*:\s*)"[^"]*""#,
    )
    .unwrap()
});

/// `name=value` query parameters that carry credentials
static SENSITIVE_QUERY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([?&](?:key|api_key|apikey|token|access_token)=)[^&#]*").unwrap());

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(&config.level);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Redact sensitive string values in a JSON text
pub fn redact_json_sensitive_fields(json: &str) -> String {
    SENSITIVE_JSON_FIELD
        .replace_all(json, format!(r#""$1"$2"{}""#, REDACTED).as_str())
        .into_owned()
}

/// Redact credential-bearing query parameters in a URI or query string
pub fn redact_query_params(uri: &str) -> String {
    SENSITIVE_QUERY_PARAM
        .replace_all(uri, format!("${{1}}{}", REDACTED).as_str())
        .into_owned()
}
