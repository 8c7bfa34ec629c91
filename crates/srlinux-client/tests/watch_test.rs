//! Watch streams against the mock API server.

mod common;

use assert_matches::assert_matches;
use futures::StreamExt;
use kube::core::{params::ListParams, WatchEvent};
use srlinux_client::{Context, Error};
use srlinux_mock::HttpMockSrlinuxServer;
use wiremock::{
	matchers::{method, path, query_param},
	Mock, ResponseTemplate,
};

use common::{clientset, collection_path, node};

fn added_name(item: Option<Result<WatchEvent<srlinux_types::Srlinux>, Error>>) -> String {
	match item {
		Some(Ok(WatchEvent::Added(obj))) => obj.metadata.name.unwrap_or_default(),
		other => panic!("expected an ADDED event, got {other:?}"),
	}
}

#[tokio::test]
async fn test_watch_yields_events_in_order_then_ends() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1"), node("ns-a", "r2"), node("ns-a", "r3")])
		.build()
		.start()
		.await;
	let client = clientset(&server).srlinux("ns-a");

	let mut events = client
		.watch(&Context::background(), &ListParams::default())
		.await
		.unwrap();

	assert_eq!(added_name(events.next().await), "r1");
	assert_eq!(added_name(events.next().await), "r2");
	assert_eq!(added_name(events.next().await), "r3");
	assert!(events.next().await.is_none());
	assert!(events.is_stopped());
}

#[tokio::test]
async fn test_watch_cancel_ends_stream() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1"), node("ns-a", "r2"), node("ns-a", "r3")])
		.build()
		.start()
		.await;
	let client = clientset(&server).srlinux("ns-a");
	let ctx = Context::background();

	let mut events = client.watch(&ctx, &ListParams::default()).await.unwrap();
	assert_eq!(added_name(events.next().await), "r1");
	assert_eq!(added_name(events.next().await), "r2");

	ctx.cancel();

	assert_matches!(events.next().await, Some(Err(Error::Cancelled)));
	assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_watch_stop() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1"), node("ns-a", "r2")])
		.build()
		.start()
		.await;
	let client = clientset(&server).srlinux("ns-a");

	let mut events = client
		.watch(&Context::background(), &ListParams::default())
		.await
		.unwrap();
	assert_eq!(added_name(events.next().await), "r1");

	events.stop();
	assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_watch_error_event_is_terminal() {
	let server = HttpMockSrlinuxServer::builder().build().start().await;
	let body = [
		serde_json::json!({"type": "ADDED", "object": node("ns-a", "r1")}),
		serde_json::json!({"type": "ERROR", "object": {
			"kind": "Status",
			"apiVersion": "v1",
			"status": "Failure",
			"message": "too old resource version: 1 (5)",
			"reason": "Expired",
			"code": 410,
		}}),
		serde_json::json!({"type": "ADDED", "object": node("ns-a", "r2")}),
	]
	.iter()
	.map(ToString::to_string)
	.collect::<Vec<_>>()
	.join("\n");
	Mock::given(method("GET"))
		.and(path(collection_path("ns-a")))
		.and(query_param("watch", "true"))
		.respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
		.with_priority(1)
		.mount(server.mock_server())
		.await;
	let client = clientset(&server).srlinux("ns-a");

	let mut events = client
		.watch(&Context::background(), &ListParams::default())
		.await
		.unwrap();

	assert_eq!(added_name(events.next().await), "r1");
	assert_matches!(events.next().await, Some(Ok(WatchEvent::Error(status))) if status.code == 410);
	assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_watch_passes_resource_version() {
	let server = HttpMockSrlinuxServer::builder().build().start().await;
	Mock::given(method("GET"))
		.and(path(collection_path("ns-a")))
		.and(query_param("watch", "true"))
		.and(query_param("resourceVersion", "17"))
		.respond_with(ResponseTemplate::new(200).set_body_raw("", "application/json"))
		.with_priority(1)
		.expect(1)
		.mount(server.mock_server())
		.await;
	let client = clientset(&server).srlinux("ns-a");
	let lp = ListParams {
		resource_version: Some("17".to_string()),
		..ListParams::default()
	};

	let mut events = client.watch(&Context::background(), &lp).await.unwrap();

	assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_watch_sends_only_caller_options() {
	let server = HttpMockSrlinuxServer::builder()
		.resources(vec![node("ns-a", "r1")])
		.build()
		.start()
		.await;
	let client = clientset(&server).srlinux("ns-a");

	let mut events = client
		.watch(&Context::background(), &ListParams::default())
		.await
		.unwrap();
	assert_eq!(added_name(events.next().await), "r1");
	assert!(events.next().await.is_none());

	let lp = ListParams {
		resource_version: Some("17".to_string()),
		timeout: Some(600),
		..ListParams::default()
	};
	let mut events = client.watch(&Context::background(), &lp).await.unwrap();
	while events.next().await.is_some() {}

	let queries: Vec<Vec<(String, String)>> = server
		.mock_server()
		.received_requests()
		.await
		.unwrap()
		.iter()
		.map(|req| {
			let mut pairs: Vec<_> = req.url.query_pairs().into_owned().collect();
			pairs.sort();
			pairs
		})
		.collect();
	let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
	assert_eq!(
		queries,
		vec![
			vec![pair("watch", "true")],
			vec![
				pair("resourceVersion", "17"),
				pair("timeoutSeconds", "600"),
				pair("watch", "true"),
			],
		]
	);
}
