//! Deep-copy contract for the resource types.
//!
//! Values of these types end up cached by the transport layer and handed to
//! several owners at once. A deep copy shares no storage with its source:
//! every owned sequence, mapping and optional nested struct is copied, so a
//! mutation of one copy is never observable through another.
//!
//! All the types own their containers outright, so `Clone` already walks the
//! whole value graph; the trait only gives that guarantee a name and the
//! copy-into form callers reuse destinations with.

use crate::{CertificateCfg, NodeConfig, Srlinux, SrlinuxList, SrlinuxSpec, SrlinuxStatus};

pub trait DeepCopy: Clone {
	/// Overwrite `out` with an independent copy of `self`.
	///
	/// Storage already owned by `out` may be reused, but nothing is shared
	/// with `self` afterwards.
	fn deep_copy_into(&self, out: &mut Self) {
		out.clone_from(self);
	}

	/// Allocate a new value holding an independent copy of `self`.
	#[must_use]
	fn deep_copy(&self) -> Self {
		self.clone()
	}
}

/// Deep copy of an optional value: absent stays absent.
pub fn deep_copy_opt<T: DeepCopy>(value: Option<&T>) -> Option<T> {
	value.map(DeepCopy::deep_copy)
}

impl DeepCopy for CertificateCfg {}
impl DeepCopy for NodeConfig {}
impl DeepCopy for SrlinuxSpec {}
impl DeepCopy for SrlinuxStatus {}
impl DeepCopy for Srlinux {}
impl DeepCopy for SrlinuxList {}
