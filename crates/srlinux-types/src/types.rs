//! Srlinux custom resource definition.

use std::collections::BTreeMap;

use kube::{core::ObjectList, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of an SR Linux node.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
	group = "kne.srlinux.dev",
	version = "v1alpha1",
	kind = "Srlinux",
	plural = "srlinuxes",
	shortname = "srl",
	status = "SrlinuxStatus",
	namespaced,
	derive = "Default",
	derive = "PartialEq"
)]
pub struct SrlinuxSpec {
	/// Node runtime configuration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub config: Option<NodeConfig>,

	/// Resource constraints of the node pod (e.g. `cpu`, `memory`).
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub constraints: BTreeMap<String, String>,
}

/// Observed state of an SR Linux node.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct SrlinuxStatus {
	/// Image the node pod is running.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub image: String,
}

/// Container level configuration of the node.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct NodeConfig {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub command: Vec<String>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub args: Vec<String>,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub image: String,

	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub env: BTreeMap<String, String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cert: Option<CertificateCfg>,
}

/// Self-signed certificate to generate on the node.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct CertificateCfg {
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub cert_name: String,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub key_name: String,

	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub common_name: String,

	#[serde(default, skip_serializing_if = "is_zero_i32")]
	pub key_size: i32,
}

/// List of [`Srlinux`] resources as returned by a collection GET.
pub type SrlinuxList = ObjectList<Srlinux>;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero_i32(v: &i32) -> bool {
	*v == 0
}
