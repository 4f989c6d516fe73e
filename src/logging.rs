//! Subscriber setup for the bootstrap's tracing events
//!
//! Every phase of the bootstrap emits events under the `autowire` target:
//! `info` when a bootstrap starts and finishes, `debug` per constructed
//! component and injected field, `trace` for skipped types, `warn` when the
//! lenient policy leaves something unset.
//!
//! # Features
//!
//! - `logging` - Emit events (default); bring your own subscriber
//! - `logging-json` - Install a JSON subscriber with [`init`]
//! - `logging-pretty` - Install a human-readable subscriber with [`init`]
//!
//! # Example
//!
//! ```rust,ignore
//! use autowire::logging;
//!
//! // JSON if logging-json is enabled, otherwise pretty
//! logging::init();
//!
//! // Or only the wiring events, at trace level
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .autowire_only()
//!     .compact()
//!     .init();
//! ```

use tracing::Level;

/// Target every bootstrap event is emitted under
pub const TARGET: &str = "autowire";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Multi-line colorful output
    Pretty,
    /// Single-line output
    Compact,
}

/// Builder for the subscriber installed by [`LoggingBuilder::init`]
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
    with_file: bool,
    with_line_number: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: if cfg!(feature = "logging-json") {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            target: None,
            with_file: false,
            with_line_number: false,
        }
    }
}

impl LoggingBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Only show events from one target
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show the container's own events
    pub fn autowire_only(self) -> Self {
        self.with_target_filter(TARGET)
    }

    /// Include source file and line of each event
    pub fn with_location(mut self) -> Self {
        self.with_file = true;
        self.with_line_number = true;
        self
    }

    /// Select the output format
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Use JSON output
    pub fn json(self) -> Self {
        self.format(LogFormat::Json)
    }

    /// Use pretty output
    pub fn pretty(self) -> Self {
        self.format(LogFormat::Pretty)
    }

    /// Use compact output
    pub fn compact(self) -> Self {
        self.format(LogFormat::Compact)
    }

    /// The `EnvFilter` directive this builder installs
    pub fn directive(&self) -> String {
        match self.target {
            Some(target) => format!("{}={}", target, self.level),
            None => self.level.to_string(),
        }
    }

    /// Install the subscriber globally.
    ///
    /// Does nothing when neither `logging-json` nor `logging-pretty` is
    /// enabled, or when a global subscriber is already set.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::new(self.directive());
        let layer = fmt::layer()
            .with_file(self.with_file)
            .with_line_number(self.with_line_number)
            .with_target(true);

        let registry = tracing_subscriber::registry().with(filter);
        let _ = match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => registry.with(layer.json()).try_init(),
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => registry.with(layer.pretty()).try_init(),
            LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            LogFormat::Compact => registry.with(layer.compact()).try_init(),
        };
    }

    /// Install the subscriber (no-op without a subscriber feature)
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {}
}

/// Create a new logging builder
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install a subscriber with default settings.
///
/// JSON when `logging-json` is enabled, pretty otherwise.
pub fn init() {
    builder().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = LoggingBuilder::default();
        assert_eq!(builder.level, Level::DEBUG);
        assert!(builder.target.is_none());
        assert_eq!(builder.directive(), "DEBUG");
    }

    #[test]
    fn test_builder_chain() {
        let builder = LoggingBuilder::new()
            .with_level(Level::TRACE)
            .compact()
            .with_location()
            .autowire_only();

        assert_eq!(builder.format, LogFormat::Compact);
        assert!(builder.with_file);
        assert!(builder.with_line_number);
        assert_eq!(builder.directive(), format!("{TARGET}=TRACE"));
        assert_eq!(TARGET, "autowire");
    }
}
