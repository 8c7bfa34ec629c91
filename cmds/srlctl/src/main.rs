//! Command line access to Srlinux resources.

use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use srlinux_client::{Clientset, ConnectionOptions, Context};
use srlinux_types::{add_to_scheme, Scheme};
use tracing::Level;

mod commands;
mod output;
mod telemetry;

#[derive(Parser)]
#[command(name = "srlctl")]
#[command(about = "Inspect and manage Srlinux nodes", long_about = None)]
#[command(version)]
struct Cli {
	/// Kubeconfig context to use
	#[arg(long, global = true, conflicts_with = "api_server")]
	context: Option<String>,

	/// API server URL, the kubeconfig context pointing at it is used
	#[arg(long, global = true)]
	api_server: Option<String>,

	/// Namespace, defaults to the one of the kubeconfig context
	#[arg(short = 'n', long, global = true)]
	namespace: Option<String>,

	/// Give up after this many seconds
	#[arg(long, global = true)]
	timeout: Option<u64>,

	/// Log level (overrides RUST_LOG)
	#[arg(long, global = true)]
	log_level: Option<Level>,

	#[command(subcommand)]
	command: commands::Commands,
}

impl Cli {
	/// Explicit cluster selection, if any was given.
	fn connection_options(&self) -> Option<ConnectionOptions> {
		let options = match (&self.api_server, &self.context) {
			(Some(api_server), _) => ConnectionOptions::for_api_server(api_server.clone()),
			(None, Some(context)) => ConnectionOptions::for_context(context.clone()),
			(None, None) => return None,
		};
		Some(options)
	}

	fn context(&self) -> Context {
		match self.timeout {
			Some(secs) => Context::background().with_timeout(Duration::from_secs(secs)),
			None => Context::background(),
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	telemetry::init(cli.log_level);

	add_to_scheme(Scheme::global()).context("registering srlinux kinds")?;

	let clientset = match cli.connection_options() {
		Some(options) => Clientset::connect(&options).await,
		None => Clientset::try_default().await,
	}
	.context("connecting to the cluster")?;

	let client = match &cli.namespace {
		Some(namespace) => clientset.srlinux(namespace.clone()),
		None => clientset.srlinux_default(),
	};

	let ctx = cli.context();
	let interrupt = ctx.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::debug!("interrupted");
			interrupt.cancel();
		}
	});

	let stdout = output::BrokenPipeGuard::new(std::io::stdout());
	commands::run(cli.command, &client, &ctx, stdout).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_is_consistent() {
		use clap::CommandFactory;
		Cli::command().debug_assert();
	}

	#[test]
	fn test_context_and_api_server_conflict() {
		let result = Cli::try_parse_from([
			"srlctl",
			"--context",
			"lab",
			"--api-server",
			"https://lab:6443",
			"list",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn test_connection_options() {
		let cli = Cli::try_parse_from(["srlctl", "get", "r1", "--context", "lab", "-n", "3node"]).unwrap();
		assert_eq!(cli.connection_options(), Some(ConnectionOptions::for_context("lab")));
		assert_eq!(cli.namespace.as_deref(), Some("3node"));

		let cli = Cli::try_parse_from(["srlctl", "list"]).unwrap();
		assert_eq!(cli.connection_options(), None);
	}
}
