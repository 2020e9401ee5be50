use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// Install a global tracing subscriber using the provided logging settings.
///
/// Directives in `RUST_LOG` replace the configured level; unparsable ones are
/// skipped rather than failing startup.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let overrides = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(logging.level, overrides.as_deref());

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .flatten_event(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("subscriber already installed: {err}")))
}

fn build_filter(level: LevelFilter, overrides: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(overrides.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_applies_without_overrides() {
        let filter = build_filter(LevelFilter::DEBUG, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn env_directives_replace_the_configured_level() {
        let filter = build_filter(LevelFilter::INFO, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn target_directives_are_honoured() {
        let filter = build_filter(LevelFilter::INFO, Some("postboard::http=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn unparsable_directives_fall_back_to_the_configured_level() {
        let filter = build_filter(LevelFilter::ERROR, Some("postboard=loudest"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }
}
