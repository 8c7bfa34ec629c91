//! Connection configuration.
//!
//! Resolves a kube [`Config`] from a kubeconfig, either by context name or by
//! the API server URL of one of its clusters.

use std::time::Duration;

use kube::{
	config::{KubeConfigOptions, Kubeconfig},
	Config,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ConnectionError;

/// Default timeout for API requests.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Which cluster to talk to.
///
/// Exactly one of `api_server` or `context` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
	/// API server URL; the kubeconfig context pointing at it is used.
	#[serde(default)]
	pub api_server: Option<String>,
	/// Kubeconfig context name.
	#[serde(default)]
	pub context: Option<String>,
	/// Request read timeout, [`DEFAULT_API_TIMEOUT`] when unset.
	#[serde(default)]
	pub read_timeout: Option<Duration>,
}

impl ConnectionOptions {
	pub fn for_context(context: impl Into<String>) -> Self {
		Self {
			context: Some(context.into()),
			..Self::default()
		}
	}

	pub fn for_api_server(api_server: impl Into<String>) -> Self {
		Self {
			api_server: Some(api_server.into()),
			..Self::default()
		}
	}

	/// Resolve the kube config from `$KUBECONFIG` (or `~/.kube/config`).
	pub async fn load(&self) -> Result<Config, ConnectionError> {
		let kubeconfig = Kubeconfig::read()?;
		self.load_with_kubeconfig(kubeconfig).await
	}

	/// Resolve the kube config from an explicit kubeconfig.
	#[instrument(skip_all)]
	pub async fn load_with_kubeconfig(
		&self,
		kubeconfig: Kubeconfig,
	) -> Result<Config, ConnectionError> {
		let context_name = match (&self.api_server, &self.context) {
			(Some(api_server), None) => {
				let context = find_context_for_api_server(&kubeconfig, api_server)?;
				tracing::debug!(context = %context, api_server = %api_server, "found context for apiServer");
				context
			}
			(None, Some(context)) => {
				if !kubeconfig.contexts.iter().any(|c| &c.name == context) {
					return Err(ConnectionError::ContextNotFound(context.clone()));
				}
				tracing::debug!(context = %context, "using context");
				context.clone()
			}
			_ => return Err(ConnectionError::IncompleteOptions),
		};

		let mut config = Config::from_custom_kubeconfig(
			kubeconfig,
			&KubeConfigOptions {
				context: Some(context_name),
				..Default::default()
			},
		)
		.await?;
		config.read_timeout = Some(self.read_timeout.unwrap_or(DEFAULT_API_TIMEOUT));

		Ok(config)
	}
}

/// Find a kubeconfig context that uses a cluster with the given API server URL.
fn find_context_for_api_server(
	kubeconfig: &Kubeconfig,
	api_server: &str,
) -> Result<String, ConnectionError> {
	let matching_cluster = kubeconfig
		.clusters
		.iter()
		.find(|c| {
			c.cluster
				.as_ref()
				.is_some_and(|cluster| cluster.server.as_deref() == Some(api_server))
		})
		.ok_or_else(|| ConnectionError::ClusterNotFound(api_server.to_string()))?;

	let cluster_name = &matching_cluster.name;

	let matching_context = kubeconfig
		.contexts
		.iter()
		.find(|c| {
			c.context
				.as_ref()
				.is_some_and(|ctx| ctx.cluster.as_str() == cluster_name)
		})
		.ok_or_else(|| ConnectionError::ContextNotFoundForCluster(cluster_name.clone()))?;

	Ok(matching_context.name.clone())
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use kube::config::{Cluster, Context, NamedCluster, NamedContext};

	use super::*;

	fn kubeconfig_with_orphan_cluster() -> Kubeconfig {
		Kubeconfig {
			clusters: vec![NamedCluster {
				name: "lab".to_string(),
				cluster: Some(Cluster {
					server: Some("https://lab:6443".to_string()),
					..Default::default()
				}),
			}],
			contexts: vec![NamedContext {
				name: "other".to_string(),
				context: Some(Context {
					cluster: "elsewhere".to_string(),
					..Default::default()
				}),
			}],
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_no_cluster_specified_errors() {
		let result = ConnectionOptions::default()
			.load_with_kubeconfig(Kubeconfig::default())
			.await;
		assert_matches!(result, Err(ConnectionError::IncompleteOptions));
	}

	#[tokio::test]
	async fn test_both_selectors_errors() {
		let options = ConnectionOptions {
			api_server: Some("https://lab:6443".to_string()),
			context: Some("lab".to_string()),
			..ConnectionOptions::default()
		};
		let result = options.load_with_kubeconfig(Kubeconfig::default()).await;
		assert_matches!(result, Err(ConnectionError::IncompleteOptions));
	}

	#[tokio::test]
	async fn test_context_not_found() {
		let result = ConnectionOptions::for_context("nonexistent")
			.load_with_kubeconfig(Kubeconfig::default())
			.await;
		assert_matches!(
			result,
			Err(ConnectionError::ContextNotFound(context)) if context == "nonexistent"
		);
	}

	#[tokio::test]
	async fn test_api_server_not_found() {
		let result = ConnectionOptions::for_api_server("https://unknown:6443")
			.load_with_kubeconfig(Kubeconfig::default())
			.await;
		assert_matches!(
			result,
			Err(ConnectionError::ClusterNotFound(server)) if server == "https://unknown:6443"
		);
	}

	#[tokio::test]
	async fn test_api_server_without_context() {
		let result = ConnectionOptions::for_api_server("https://lab:6443")
			.load_with_kubeconfig(kubeconfig_with_orphan_cluster())
			.await;
		assert_matches!(
			result,
			Err(ConnectionError::ContextNotFoundForCluster(cluster)) if cluster == "lab"
		);
	}

	#[test]
	fn test_options_deserialize() {
		let options: ConnectionOptions = serde_json::from_value(serde_json::json!({
			"apiServer": "https://lab:6443",
		}))
		.unwrap();
		assert_eq!(options, ConnectionOptions::for_api_server("https://lab:6443"));
	}
}
