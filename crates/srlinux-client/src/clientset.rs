//! Clientset construction.

use std::fmt;

use http::{header::USER_AGENT, HeaderValue};
use kube::{config::Kubeconfig, core::ApiResource, Client, Config};
use srlinux_types::Scheme;
use tracing::instrument;

use crate::{
	config::ConnectionOptions, coordinates::ResourceCoordinates, error::ConnectionError,
	srlinux::SrlinuxClient,
};

/// Client for the Srlinux custom resource.
///
/// Holds two independent transports:
/// - `raw`, which speaks the typed representation end to end and serves
///   list, get, create, delete and watch;
/// - `dynamic`, which handles untyped documents and serves the status
///   update and the unstructured get. The status subresource write is only
///   reachable through it.
///
/// Cloning is cheap and clones share connections.
#[derive(Clone)]
pub struct Clientset {
	raw: Client,
	dynamic: Client,
	resource: ApiResource,
}

impl fmt::Debug for Clientset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Clientset")
			.field("resource", &self.resource)
			.finish_non_exhaustive()
	}
}

impl Clientset {
	/// Build both transports from `config`.
	///
	/// The raw transport identifies itself with [`default_user_agent`]; the
	/// dynamic one uses `config` untouched. Requires the `Srlinux` kind to be
	/// registered in [`Scheme::global`].
	#[instrument(skip_all, fields(cluster_url = %config.cluster_url))]
	pub fn new_for_config(config: &Config) -> Result<Self, ConnectionError> {
		let resource = resolve_resource(Scheme::global())?;

		let user_agent =
			HeaderValue::from_str(&default_user_agent()).map_err(ConnectionError::InvalidUserAgent)?;
		let mut raw_config = config.clone();
		raw_config.headers.push((USER_AGENT, user_agent));

		let dynamic = Client::try_from(config.clone())?;
		let raw = Client::try_from(raw_config)?;

		tracing::debug!(
			api_version = %resource.api_version,
			plural = %resource.plural,
			"built srlinux clientset"
		);

		Ok(Self {
			raw,
			dynamic,
			resource,
		})
	}

	/// Connect using the kube config inferred from the environment
	/// (in-cluster service account, then `$KUBECONFIG`).
	pub async fn try_default() -> Result<Self, ConnectionError> {
		let config = Config::infer().await?;
		Self::new_for_config(&config)
	}

	/// Connect to the cluster selected by `options` from `$KUBECONFIG`.
	pub async fn connect(options: &ConnectionOptions) -> Result<Self, ConnectionError> {
		let config = options.load().await?;
		Self::new_for_config(&config)
	}

	/// Connect to the cluster selected by `options` from `kubeconfig`.
	pub async fn connect_with_kubeconfig(
		options: &ConnectionOptions,
		kubeconfig: Kubeconfig,
	) -> Result<Self, ConnectionError> {
		let config = options.load_with_kubeconfig(kubeconfig).await?;
		Self::new_for_config(&config)
	}

	/// Accessor for resources in `namespace`.
	pub fn srlinux(&self, namespace: impl Into<String>) -> SrlinuxClient {
		SrlinuxClient::new(
			self.raw.clone(),
			self.dynamic.clone(),
			self.resource.clone(),
			namespace.into(),
		)
	}

	/// Accessor for the namespace of the current kubeconfig context.
	pub fn srlinux_default(&self) -> SrlinuxClient {
		self.srlinux(self.raw.default_namespace())
	}
}

fn resolve_resource(scheme: &Scheme) -> Result<ApiResource, ConnectionError> {
	let gvk = ResourceCoordinates::gvk();
	scheme
		.resource_for(&gvk)
		.ok_or(ConnectionError::NotRegistered(gvk))
}

/// User agent of the raw transport: `srlinux-client/<version> (<os>/<arch>) kube-rs`.
pub fn default_user_agent() -> String {
	format!(
		"{}/{} ({}/{}) kube-rs",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
