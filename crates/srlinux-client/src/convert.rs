//! Untyped to typed conversion of dynamic accessor results.

use kube::core::DynamicObject;
use srlinux_types::Srlinux;

use crate::{coordinates::ResourceCoordinates, error::ConversionError};

/// Read an untyped document as a `Srlinux`.
///
/// Documents without type information are accepted as long as their shape
/// decodes; documents that declare another kind are rejected.
pub fn from_unstructured(obj: &DynamicObject) -> Result<Srlinux, ConversionError> {
	if let Some(types) = &obj.types {
		let gvk = ResourceCoordinates::gvk();
		if types.kind != gvk.kind || types.api_version != gvk.api_version() {
			return Err(ConversionError::KindMismatch {
				expected: format!("{}, Kind={}", gvk.api_version(), gvk.kind),
				found: format!("{}, Kind={}", types.api_version, types.kind),
			});
		}
	}

	serde_json::to_value(obj)
		.and_then(serde_json::from_value)
		.map_err(ConversionError::Decode)
}

/// Untyped form of a `Srlinux`, as the dynamic accessor expects it.
pub fn to_unstructured(obj: &Srlinux) -> Result<DynamicObject, serde_json::Error> {
	serde_json::to_value(obj).and_then(serde_json::from_value)
}
