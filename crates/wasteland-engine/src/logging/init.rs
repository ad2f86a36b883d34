use std::sync::Once;

/// Crates that are chatty at `info` and only interesting when something breaks.
const NOISY_CRATES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g. `"debug"` or
/// `"wasteland_viewer=trace,wgpu_core=warn"`. When it is `None`, `RUST_LOG` is
/// consulted before falling back to the defaults.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Prefix records with a millisecond timestamp.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
                for krate in NOISY_CRATES {
                    builder.filter_module(krate, log::LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);
        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        // A logger installed by a test harness wins; that is fine.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
