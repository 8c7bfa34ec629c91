//! Registry of the kinds a client knows how to address.
//!
//! Registration is an explicit call made once by the hosting application
//! during startup. Nothing registers itself on load.

use std::{
	collections::HashMap,
	sync::{LazyLock, PoisonError, RwLock},
};

use kube::core::{ApiResource, GroupVersionKind};
use thiserror::Error;
use tracing::debug;

use crate::{Srlinux, LIST_KIND};

static GLOBAL: LazyLock<Scheme> = LazyLock::new(Scheme::default);

#[derive(Debug, Error)]
pub enum SchemeError {
	#[error(
		"kind {} ({}) is already registered as resource `{existing}`, refusing to rebind it to `{requested}`",
		.gvk.kind,
		.gvk.api_version()
	)]
	Conflict {
		gvk: GroupVersionKind,
		existing: String,
		requested: String,
	},
}

/// Mapping from kinds to the API resources serving them.
#[derive(Debug, Default)]
pub struct Scheme {
	kinds: RwLock<HashMap<GroupVersionKind, ApiResource>>,
}

impl Scheme {
	/// Process-wide scheme used by clients that aren't given one.
	pub fn global() -> &'static Self {
		&GLOBAL
	}

	/// Bind `gvk` to `resource`.
	///
	/// Registering the same binding again is a no-op.
	pub fn register(&self, gvk: GroupVersionKind, resource: ApiResource) -> Result<(), SchemeError> {
		let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
		match kinds.get(&gvk) {
			Some(existing) if *existing == resource => Ok(()),
			Some(existing) => Err(SchemeError::Conflict {
				existing: existing.plural.clone(),
				requested: resource.plural,
				gvk,
			}),
			None => {
				debug!(api_version = %gvk.api_version(), kind = %gvk.kind, "registered kind");
				kinds.insert(gvk, resource);
				Ok(())
			}
		}
	}

	/// Resolve a registered kind.
	pub fn resource_for(&self, gvk: &GroupVersionKind) -> Option<ApiResource> {
		self.kinds
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(gvk)
			.cloned()
	}

	pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
		self.kinds
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(gvk)
	}
}

/// Register the `Srlinux` and `SrlinuxList` kinds into `scheme`.
///
/// Hosts call this once at startup, usually with [`Scheme::global`], and
/// should not continue when it fails.
pub fn add_to_scheme(scheme: &Scheme) -> Result<(), SchemeError> {
	let resource = ApiResource::erase::<Srlinux>(&());
	let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind);
	let list_gvk = GroupVersionKind::gvk(&resource.group, &resource.version, LIST_KIND);

	scheme.register(gvk, resource.clone())?;
	scheme.register(list_gvk, resource)
}
