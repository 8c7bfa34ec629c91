//! Logging setup.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Send client spans and events to stderr, keeping stdout for YAML.
///
/// `--log-level` wins over `RUST_LOG`; with neither set only warnings show.
/// Interactive sessions get human readable output, pipes and CI get JSON
/// lines.
pub fn init(log_level: Option<Level>) {
	let filter = match log_level {
		Some(level) => EnvFilter::new(level.as_str()),
		None => EnvFilter::builder()
			.with_default_directive(Level::WARN.into())
			.from_env_lossy(),
	};

	let output = if std::io::stderr().is_terminal() {
		tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.pretty()
			.boxed()
	} else {
		tracing_subscriber::fmt::layer()
			.with_writer(std::io::stderr)
			.json()
			.boxed()
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(output)
		.init();
}
