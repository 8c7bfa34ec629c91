//! Mock Kubernetes API server for testing.
//!
//! Serves the `Srlinux` resource over HTTP from in-memory state, so real
//! clients can be pointed at it through a kube config or kubeconfig.

mod helpers;
pub mod http;

pub use http::{HttpMockSrlinuxServer, RunningHttpMockSrlinuxServer, SharedResources};
