//! Tracing subscriber setup.

use crate::settings::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this more than once
/// (common in tests) is harmless: later calls are ignored.
pub fn init(settings: &LoggingSettings) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&settings.level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	let result = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(settings.ansi)
		.with_target(true)
		.try_init();

	if result.is_err() {
		tracing::debug!("tracing subscriber already installed");
	}
}
