//! Types of the `Srlinux` custom resource (`kne.srlinux.dev/v1alpha1`).
//!
//! Besides the serde/kube representation of the resource this crate carries
//! the two pieces every consumer of the types needs:
//! - [`DeepCopy`], the copy contract for values handed across cache boundaries;
//! - [`Scheme`] and [`add_to_scheme`], the explicit registration of the kinds
//!   into the registry the client resolves resources from.

pub mod deepcopy;
pub mod scheme;
mod types;

pub use deepcopy::{deep_copy_opt, DeepCopy};
pub use scheme::{add_to_scheme, Scheme, SchemeError};
pub use types::{CertificateCfg, NodeConfig, Srlinux, SrlinuxList, SrlinuxSpec, SrlinuxStatus};

/// API group of the resource.
pub const GROUP_NAME: &str = "kne.srlinux.dev";
/// API version of the resource within [`GROUP_NAME`].
pub const GROUP_VERSION: &str = "v1alpha1";
/// Kind of a single resource.
pub const KIND: &str = "Srlinux";
/// Kind reported by list responses.
pub const LIST_KIND: &str = "SrlinuxList";
/// Plural resource name used in REST paths.
pub const PLURAL: &str = "srlinuxes";
