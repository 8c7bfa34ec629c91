//! Typed client for the `Srlinux` custom resource.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use kube::core::params::ListParams;
//! use srlinux_client::{Clientset, ConnectionOptions, Context};
//! use srlinux_types::{add_to_scheme, Scheme};
//!
//! add_to_scheme(Scheme::global())?;
//! let clientset = Clientset::connect(&ConnectionOptions::for_context("kind-kne")).await?;
//!
//! let nodes = clientset
//! 	.srlinux("3node")
//! 	.list(&Context::background(), &ListParams::default())
//! 	.await?;
//! for node in nodes.items {
//! 	let image = node.status.map(|s| s.image).unwrap_or_default();
//! 	println!("{} {image}", node.metadata.name.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod clientset;
pub mod config;
pub mod context;
pub mod convert;
pub mod coordinates;
pub mod error;
pub mod srlinux;
pub mod watch;

pub use clientset::{default_user_agent, Clientset};
pub use config::ConnectionOptions;
pub use context::Context;
pub use coordinates::ResourceCoordinates;
pub use error::{ConnectionError, ConversionError, Error, UPDATE_FAILED};
pub use srlinux::SrlinuxClient;
pub use watch::WatchStream;
