//! Address of the Srlinux resource.
//!
//! Both transports build their paths from here, so they always resolve to
//! the same logical resource.

use kube::core::{ApiResource, GroupVersion, GroupVersionKind, GroupVersionResource};
use srlinux_types::{GROUP_NAME, GROUP_VERSION, KIND, PLURAL};

/// API path prefix of named groups.
pub const API_PATH: &str = "/apis";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCoordinates;

impl ResourceCoordinates {
	pub fn gvr() -> GroupVersionResource {
		GroupVersionResource::gvr(GROUP_NAME, GROUP_VERSION, PLURAL)
	}

	pub fn gv() -> GroupVersion {
		GroupVersion::gv(GROUP_NAME, GROUP_VERSION)
	}

	pub fn gvk() -> GroupVersionKind {
		GroupVersionKind::gvk(GROUP_NAME, GROUP_VERSION, KIND)
	}

	/// The resource as the dynamic accessor addresses it.
	pub fn api_resource() -> ApiResource {
		ApiResource::from_gvk_with_plural(&Self::gvk(), PLURAL)
	}

	/// Collection path of the resource within `namespace`.
	pub fn url_path(namespace: &str) -> String {
		let gvr = Self::gvr();
		format!(
			"{API_PATH}/{}/{}/namespaces/{namespace}/{}",
			gvr.group, gvr.version, gvr.resource
		)
	}
}
