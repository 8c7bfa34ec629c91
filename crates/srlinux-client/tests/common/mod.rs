//! Shared setup for the client integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use srlinux_client::Clientset;
use srlinux_mock::RunningHttpMockSrlinuxServer;
use srlinux_types::{add_to_scheme, NodeConfig, Scheme, Srlinux, SrlinuxSpec};

/// Collection path of the resource in `namespace`.
pub fn collection_path(namespace: &str) -> String {
	format!("/apis/kne.srlinux.dev/v1alpha1/namespaces/{namespace}/srlinuxes")
}

/// Clientset talking to `server`.
pub fn clientset(server: &RunningHttpMockSrlinuxServer) -> Clientset {
	add_to_scheme(Scheme::global()).expect("registering srlinux kinds");
	Clientset::new_for_config(&server.config()).expect("building clientset")
}

pub fn node(namespace: &str, name: &str) -> Srlinux {
	let mut node = Srlinux::new(
		name,
		SrlinuxSpec {
			config: Some(NodeConfig {
				image: "ghcr.io/nokia/srlinux:23.10.1".to_string(),
				env: BTreeMap::from([("SRLINUX".to_string(), "1".to_string())]),
				..NodeConfig::default()
			}),
			constraints: BTreeMap::from([("cpu".to_string(), "1".to_string())]),
		},
	);
	node.metadata.namespace = Some(namespace.to_string());
	node
}
