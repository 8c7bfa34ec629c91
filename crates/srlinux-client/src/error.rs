//! Errors returned by the client.

use kube::core::GroupVersionKind;
use thiserror::Error;

/// Fixed cause reported when a status update went through but its response
/// could not be read back as a `Srlinux`.
pub const UPDATE_FAILED: &str = "operation update failed";

/// Errors of the per-namespace operations.
#[derive(Debug, Error)]
pub enum Error {
	/// Anything the API transport reported: connection, auth, not found,
	/// conflict, server errors. Passed through as is.
	#[error(transparent)]
	Transport(#[from] kube::Error),

	/// The status write happened, but the returned document isn't a `Srlinux`.
	#[error("failed to type assert return to srlinux: {UPDATE_FAILED}")]
	UpdateFailed(#[source] ConversionError),

	#[error("context canceled")]
	Cancelled,

	#[error("context deadline exceeded")]
	DeadlineExceeded,
}

impl Error {
	/// API status code, when the transport error carries one.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			Self::Transport(kube::Error::Api(status)) => Some(status.code),
			_ => None,
		}
	}

	pub fn is_not_found(&self) -> bool {
		self.status_code() == Some(404)
	}

	pub fn is_conflict(&self) -> bool {
		self.status_code() == Some(409)
	}

	pub fn is_update_failed(&self) -> bool {
		matches!(self, Self::UpdateFailed(_))
	}
}

/// Why an untyped document couldn't be read as a `Srlinux`.
#[derive(Debug, Error)]
pub enum ConversionError {
	#[error("expected {expected}, got {found}")]
	KindMismatch { expected: String, found: String },

	#[error("decoding document")]
	Decode(#[source] serde_json::Error),
}

/// Errors building a [`crate::Clientset`].
#[derive(Debug, Error)]
pub enum ConnectionError {
	#[error("connection options are incomplete: set exactly one of apiServer or context")]
	IncompleteOptions,

	#[error(
		"no cluster that matches the apiServer `{0}` was found. Please check your $KUBECONFIG"
	)]
	ClusterNotFound(String),

	#[error("no context using cluster `{0}` was found. Please check your $KUBECONFIG")]
	ContextNotFoundForCluster(String),

	#[error("no context named `{0}` was found. Please check your $KUBECONFIG")]
	ContextNotFound(String),

	#[error("kind {} ({}) is not registered, call srlinux_types::add_to_scheme at startup", .0.kind, .0.api_version())]
	NotRegistered(GroupVersionKind),

	#[error("invalid user agent")]
	InvalidUserAgent(#[source] http::header::InvalidHeaderValue),

	#[error(transparent)]
	Kubeconfig(#[from] kube::config::KubeconfigError),

	#[error(transparent)]
	Infer(#[from] kube::config::InferConfigError),

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_update_failed_message_wraps_sentinel() {
		let err = Error::UpdateFailed(ConversionError::KindMismatch {
			expected: "Srlinux".to_string(),
			found: "Pod".to_string(),
		});
		assert_eq!(
			err.to_string(),
			"failed to type assert return to srlinux: operation update failed"
		);
		assert!(err.is_update_failed());
		assert_eq!(err.status_code(), None);
	}

	#[test]
	fn test_update_failed_keeps_cause() {
		let err = Error::UpdateFailed(ConversionError::KindMismatch {
			expected: "Srlinux".to_string(),
			found: "Pod".to_string(),
		});
		let source = std::error::Error::source(&err).unwrap();
		assert_eq!(source.to_string(), "expected Srlinux, got Pod");
	}
}
