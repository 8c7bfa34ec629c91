//! Building clientsets from kubeconfigs and the transports they produce.

mod common;

use kube::core::params::{GetParams, ListParams};
use srlinux_client::{Clientset, ConnectionOptions, Context};
use srlinux_mock::HttpMockSrlinuxServer;
use srlinux_types::{add_to_scheme, Scheme};

use common::node;

fn user_agents(req: &wiremock::Request) -> Vec<String> {
	req.headers
		.get_all("user-agent")
		.iter()
		.filter_map(|v| v.to_str().ok())
		.map(ToString::to_string)
		.collect()
}

#[tokio::test]
async fn test_connect_by_context() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1")])
		.build()
		.start()
		.await;
	add_to_scheme(Scheme::global()).unwrap();

	let clientset = Clientset::connect_with_kubeconfig(
		&ConnectionOptions::for_context("lab"),
		server.kubeconfig_with_context("lab"),
	)
	.await
	.unwrap();

	let list = clientset
		.srlinux("ns-a")
		.list(&Context::background(), &ListParams::default())
		.await
		.unwrap();
	assert_eq!(list.items.len(), 1);
	assert_eq!(clientset.srlinux_default().namespace(), "default");
}

#[tokio::test]
async fn test_connect_by_api_server() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1")])
		.build()
		.start()
		.await;
	add_to_scheme(Scheme::global()).unwrap();

	let clientset = Clientset::connect_with_kubeconfig(
		&ConnectionOptions::for_api_server(server.uri()),
		server.kubeconfig(),
	)
	.await
	.unwrap();

	let got = clientset
		.srlinux("ns-a")
		.get(&Context::background(), "r1", &GetParams::default())
		.await
		.unwrap();
	assert_eq!(got.metadata.name.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_raw_transport_sends_user_agent() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1")])
		.build()
		.start()
		.await;
	let client = common::clientset(&server).srlinux("ns-a");

	client
		.get(&Context::background(), "r1", &GetParams::default())
		.await
		.unwrap();

	let requests = server.mock_server().received_requests().await.unwrap();
	assert_eq!(requests.len(), 1);
	let agents = user_agents(&requests[0]);
	assert!(
		agents.iter().any(|ua| ua.starts_with("srlinux-client/")),
		"user agents: {agents:?}"
	);
}

#[tokio::test]
async fn test_dynamic_transport_keeps_config_headers() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1")])
		.build()
		.start()
		.await;
	let client = common::clientset(&server).srlinux("ns-a");

	client
		.unstructured(&Context::background(), "r1", &GetParams::default(), &[])
		.await
		.unwrap();

	let requests = server.mock_server().received_requests().await.unwrap();
	assert_eq!(requests.len(), 1);
	assert!(!user_agents(&requests[0])
		.iter()
		.any(|ua| ua.starts_with("srlinux-client/")));
}
