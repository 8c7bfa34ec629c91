//! HTTP mock Kubernetes server using wiremock.
//!
//! Serves list, get, create, delete, status update and watch for the
//! Srlinux collection from shared in-memory state. Tests needing a specific
//! failure mount their own mocks on [`RunningHttpMockSrlinuxServer::mock_server`]
//! with a priority below the default (5) to take precedence.

use std::{
	collections::BTreeMap,
	sync::{Arc, PoisonError, RwLock},
};

use bon::Builder;
use kube::{
	config::{AuthInfo, Cluster, Context, Kubeconfig, NamedAuthInfo, NamedCluster, NamedContext},
	Config,
};
use srlinux_types::{Srlinux, GROUP_NAME, GROUP_VERSION, KIND, LIST_KIND, PLURAL};
use tracing::{debug, trace};
use wiremock::{
	matchers::{method, path_regex, query_param},
	Mock, MockServer, Request, ResponseTemplate,
};

use crate::helpers::{
	already_exists, not_found, parse_resource_path, resource_path_regex, status_failure,
	ResourcePath,
};

/// Objects keyed by (namespace, name), plus the last resource version handed out.
#[derive(Debug, Default)]
pub struct Store {
	objects: BTreeMap<(String, String), serde_json::Value>,
	resource_version: u64,
}

impl Store {
	fn next_resource_version(&mut self) -> String {
		self.resource_version += 1;
		self.resource_version.to_string()
	}

	fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a serde_json::Value> {
		self.objects
			.iter()
			.filter(move |((ns, _), _)| ns == namespace)
			.map(|(_, v)| v)
	}
}

/// Shared mutable server state.
pub type SharedResources = Arc<RwLock<Store>>;

/// A mock Kubernetes server exposed over HTTP.
#[derive(Builder)]
pub struct HttpMockSrlinuxServer {
	/// Objects present when the server starts. Objects without a namespace
	/// are placed in `default`.
	#[builder(default)]
	resources: Vec<Srlinux>,
}

/// A running HTTP mock server instance.
pub struct RunningHttpMockSrlinuxServer {
	server: MockServer,
	resources: SharedResources,
}

impl HttpMockSrlinuxServer {
	/// Start the mock server with all configured resources.
	pub async fn start(self) -> RunningHttpMockSrlinuxServer {
		let server = MockServer::start().await;
		debug!(uri = %server.uri(), "Started mock srlinux server");

		let mut store = Store::default();
		for resource in self.resources {
			let mut manifest =
				serde_json::to_value(&resource).expect("serializing Srlinux should never fail");
			let namespace = resource
				.metadata
				.namespace
				.unwrap_or_else(|| "default".to_string());
			let name = resource.metadata.name.unwrap_or_default();

			manifest["metadata"]["namespace"] = namespace.clone().into();
			manifest["metadata"]["resourceVersion"] = store.next_resource_version().into();
			trace!(namespace = %namespace, name = %name, "Registered resource");
			store.objects.insert((namespace, name), manifest);
		}

		let resources = Arc::new(RwLock::new(store));
		mount_resources(&server, &resources).await;

		RunningHttpMockSrlinuxServer { server, resources }
	}
}

impl RunningHttpMockSrlinuxServer {
	/// Get the server's URI (e.g., "http://127.0.0.1:12345").
	pub fn uri(&self) -> String {
		self.server.uri()
	}

	/// The underlying wiremock server, for mounting test specific responses.
	pub fn mock_server(&self) -> &MockServer {
		&self.server
	}

	/// Kube config pointing directly to this server, default namespace `default`.
	pub fn config(&self) -> Config {
		Config::new(
			self.uri()
				.parse()
				.expect("wiremock URIs are always valid"),
		)
	}

	/// Create a Kubeconfig pointing to this mock server.
	pub fn kubeconfig(&self) -> Kubeconfig {
		self.kubeconfig_with_context("mock-context")
	}

	/// Create a Kubeconfig pointing to this mock server with a custom context name.
	pub fn kubeconfig_with_context(&self, context_name: &str) -> Kubeconfig {
		let cluster_name = "mock-cluster";
		let user_name = "mock-user";

		Kubeconfig {
			clusters: vec![NamedCluster {
				name: cluster_name.to_string(),
				cluster: Some(Cluster {
					server: Some(self.uri()),
					insecure_skip_tls_verify: Some(true),
					..Default::default()
				}),
			}],
			contexts: vec![NamedContext {
				name: context_name.to_string(),
				context: Some(Context {
					cluster: cluster_name.to_string(),
					user: Some(user_name.to_string()),
					namespace: Some("default".to_string()),
					..Default::default()
				}),
			}],
			auth_infos: vec![NamedAuthInfo {
				name: user_name.to_string(),
				auth_info: Some(AuthInfo::default()),
			}],
			current_context: Some(context_name.to_string()),
			..Default::default()
		}
	}

	/// Stored object, as the server would return it.
	pub fn object(&self, namespace: &str, name: &str) -> Option<serde_json::Value> {
		self.resources
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.objects
			.get(&(namespace.to_string(), name.to_string()))
			.cloned()
	}

	/// Number of requests with the given HTTP method the server has seen.
	pub async fn received(&self, http_method: &str) -> usize {
		self.server
			.received_requests()
			.await
			.unwrap_or_default()
			.iter()
			.filter(|req| req.method.as_str().eq_ignore_ascii_case(http_method))
			.count()
	}
}

fn list_body(items: Vec<serde_json::Value>, resource_version: u64) -> serde_json::Value {
	serde_json::json!({
		"kind": LIST_KIND,
		"apiVersion": format!("{GROUP_NAME}/{GROUP_VERSION}"),
		"metadata": {"resourceVersion": resource_version.to_string()},
		"items": items
	})
}

async fn mount_resources(server: &MockServer, resources: &SharedResources) {
	let watch_resources = Arc::clone(resources);
	let get_resources = Arc::clone(resources);
	let post_resources = Arc::clone(resources);
	let put_resources = Arc::clone(resources);
	let delete_resources = Arc::clone(resources);
	let resource_path = resource_path_regex();

	// WATCH - one ADDED event per stored object, then the stream ends
	Mock::given(method("GET"))
		.and(path_regex(resource_path.as_str()))
		.and(query_param("watch", "true"))
		.respond_with(move |req: &Request| {
			let Some(ResourcePath {
				namespace,
				name: None,
				..
			}) = parse_resource_path(req.url.path())
			else {
				return status_failure(405, "MethodNotAllowed", "watch a collection".to_string());
			};

			let store = watch_resources.read().unwrap_or_else(PoisonError::into_inner);
			let mut body = Vec::new();
			for object in store.in_namespace(namespace) {
				let event = serde_json::json!({"type": "ADDED", "object": object});
				body.extend(serde_json::to_vec(&event).expect("serializing JSON should never fail"));
				body.push(b'\n');
			}

			ResponseTemplate::new(200).set_body_raw(body, "application/json")
		})
		.with_priority(4)
		.mount(server)
		.await;

	// GET - LIST on the collection, the object otherwise (including /status)
	Mock::given(method("GET"))
		.and(path_regex(resource_path.as_str()))
		.respond_with(move |req: &Request| {
			let Some(path) = parse_resource_path(req.url.path()) else {
				return not_found("");
			};
			let store = get_resources.read().unwrap_or_else(PoisonError::into_inner);

			match path.name {
				None => {
					let items = store.in_namespace(path.namespace).cloned().collect();
					ResponseTemplate::new(200).set_body_json(list_body(items, store.resource_version))
				}
				Some(name) => match store
					.objects
					.get(&(path.namespace.to_string(), name.to_string()))
				{
					Some(object) => ResponseTemplate::new(200).set_body_json(object.clone()),
					None => not_found(name),
				},
			}
		})
		.mount(server)
		.await;

	// POST - create, rejecting duplicates
	Mock::given(method("POST"))
		.and(path_regex(resource_path.as_str()))
		.respond_with(move |req: &Request| {
			let Some(ResourcePath {
				namespace,
				name: None,
				..
			}) = parse_resource_path(req.url.path())
			else {
				return status_failure(405, "MethodNotAllowed", "create on a collection".to_string());
			};
			let Ok(mut body) = serde_json::from_slice::<serde_json::Value>(&req.body) else {
				return status_failure(400, "BadRequest", "malformed body".to_string());
			};
			if body["kind"] != KIND {
				return status_failure(400, "BadRequest", format!("expected kind {KIND}"));
			}
			let Some(name) = body
				.pointer("/metadata/name")
				.and_then(|v| v.as_str())
				.map(ToString::to_string)
			else {
				return status_failure(422, "Invalid", "metadata.name: Required value".to_string());
			};

			let mut store = post_resources.write().unwrap_or_else(PoisonError::into_inner);
			let key = (namespace.to_string(), name.clone());
			if store.objects.contains_key(&key) {
				return already_exists(&name);
			}

			let resource_version = store.next_resource_version();
			body["metadata"]["namespace"] = namespace.into();
			body["metadata"]["uid"] = format!("mock-uid-{resource_version}").into();
			body["metadata"]["creationTimestamp"] = "2024-01-01T00:00:00Z".into();
			body["metadata"]["resourceVersion"] = resource_version.into();

			trace!(namespace = %namespace, name = %name, "Created resource");
			store.objects.insert(key, body.clone());
			ResponseTemplate::new(201).set_body_json(body)
		})
		.mount(server)
		.await;

	// PUT /status - replace the status section only
	Mock::given(method("PUT"))
		.and(path_regex(resource_path.as_str()))
		.respond_with(move |req: &Request| {
			let Some(ResourcePath {
				namespace,
				name: Some(name),
				subresource: Some("status"),
			}) = parse_resource_path(req.url.path())
			else {
				return status_failure(405, "MethodNotAllowed", "only status updates".to_string());
			};
			let Ok(body) = serde_json::from_slice::<serde_json::Value>(&req.body) else {
				return status_failure(400, "BadRequest", "malformed body".to_string());
			};
			let dry_run = req.url.query().is_some_and(|q| q.contains("dryRun"));

			let mut store = put_resources.write().unwrap_or_else(PoisonError::into_inner);
			let key = (namespace.to_string(), name.to_string());
			let Some(mut object) = store.objects.get(&key).cloned() else {
				return not_found(name);
			};

			object["status"] = body.get("status").cloned().unwrap_or_default();
			if !dry_run {
				object["metadata"]["resourceVersion"] = store.next_resource_version().into();
				store.objects.insert(key, object.clone());
			}
			ResponseTemplate::new(200).set_body_json(object)
		})
		.mount(server)
		.await;

	// DELETE - remove and report success
	Mock::given(method("DELETE"))
		.and(path_regex(resource_path.as_str()))
		.respond_with(move |req: &Request| {
			let Some(ResourcePath {
				namespace,
				name: Some(name),
				subresource: None,
			}) = parse_resource_path(req.url.path())
			else {
				return status_failure(405, "MethodNotAllowed", "delete an object".to_string());
			};

			let mut store = delete_resources.write().unwrap_or_else(PoisonError::into_inner);
			if store
				.objects
				.remove(&(namespace.to_string(), name.to_string()))
				.is_none()
			{
				return not_found(name);
			}

			ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"kind": "Status",
				"apiVersion": "v1",
				"metadata": {},
				"status": "Success",
				"details": {"name": name, "group": GROUP_NAME, "kind": PLURAL}
			}))
		})
		.mount(server)
		.await;
}
