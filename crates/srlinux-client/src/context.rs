//! Cancellation and deadlines for client calls.

use std::{future::Future, time::Duration};

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::Error;

/// Cancellation signal and optional deadline carried into every call.
///
/// Cloning a context shares its cancellation: cancelling any clone cancels
/// them all. Use [`Context::child`] for a context that can be cancelled on
/// its own while still following its parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
	token: CancellationToken,
	deadline: Option<Instant>,
}

impl Context {
	/// A context that is never cancelled and has no deadline.
	pub fn background() -> Self {
		Self::default()
	}

	/// Child context, cancelled together with `self` or on its own.
	#[must_use]
	pub fn child(&self) -> Self {
		Self {
			token: self.token.child_token(),
			deadline: self.deadline,
		}
	}

	/// Child context expiring after `timeout`, or earlier if `self` does.
	#[must_use]
	pub fn with_timeout(&self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Child context expiring at `deadline`, or earlier if `self` does.
	#[must_use]
	pub fn with_deadline(&self, deadline: Instant) -> Self {
		let mut child = self.child();
		child.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
		child
	}

	pub fn cancel(&self) {
		self.token.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Why the context is done, if it is.
	pub fn err(&self) -> Option<Error> {
		if self.token.is_cancelled() {
			Some(Error::Cancelled)
		} else if self.deadline.is_some_and(|d| d <= Instant::now()) {
			Some(Error::DeadlineExceeded)
		} else {
			None
		}
	}

	pub(crate) fn token(&self) -> &CancellationToken {
		&self.token
	}

	/// Drive `fut` until it completes or the context is done.
	///
	/// Cancellation wins over a ready result, so a call made with an already
	/// cancelled context never reaches the transport.
	pub async fn run<T, F>(&self, fut: F) -> Result<T, Error>
	where
		F: Future<Output = Result<T, kube::Error>>,
	{
		let deadline = async {
			match self.deadline {
				Some(deadline) => sleep_until(deadline).await,
				None => std::future::pending().await,
			}
		};

		tokio::select! {
			biased;
			() = self.token.cancelled() => Err(Error::Cancelled),
			() = deadline => Err(Error::DeadlineExceeded),
			res = fut => res.map_err(Error::from),
		}
	}
}
