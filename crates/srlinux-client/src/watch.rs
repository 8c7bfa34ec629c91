//! Watch event stream.

use std::{
	future::Future,
	pin::Pin,
	task::{Context as TaskContext, Poll},
};

use futures::{stream::BoxStream, Stream, StreamExt};
use kube::core::WatchEvent;
use srlinux_types::Srlinux;
use tokio::time::{sleep_until, Sleep};
use tokio_util::sync::WaitForCancellationFutureOwned;

use crate::{context::Context, error::Error};

/// Change events of a watched collection, in the order the server sent them.
///
/// Ends after any of:
/// - the server closing the watch;
/// - a transport error or a [`WatchEvent::Error`], which is yielded first;
/// - the watch context being cancelled or passing its deadline, reported as
///   one [`Error::Cancelled`] or [`Error::DeadlineExceeded`] item.
///
/// Nothing else closes it. Call [`WatchStream::stop`] (or drop the stream) to
/// release the connection.
pub struct WatchStream {
	events: Option<BoxStream<'static, kube::Result<WatchEvent<Srlinux>>>>,
	cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
	deadline: Option<Pin<Box<Sleep>>>,
}

impl WatchStream {
	pub(crate) fn new<S>(ctx: Context, events: S) -> Self
	where
		S: Stream<Item = kube::Result<WatchEvent<Srlinux>>> + Send + 'static,
	{
		Self {
			events: Some(events.boxed()),
			cancelled: Box::pin(ctx.token().clone().cancelled_owned()),
			deadline: ctx.deadline().map(|d| Box::pin(sleep_until(d))),
		}
	}

	/// Close the underlying connection. Further polls yield nothing.
	pub fn stop(&mut self) {
		if self.events.take().is_some() {
			tracing::trace!("watch stopped");
		}
	}

	pub fn is_stopped(&self) -> bool {
		self.events.is_none()
	}

	fn finish(
		&mut self,
		item: Result<WatchEvent<Srlinux>, Error>,
	) -> Poll<Option<Result<WatchEvent<Srlinux>, Error>>> {
		self.events = None;
		Poll::Ready(Some(item))
	}
}

impl std::fmt::Debug for WatchStream {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WatchStream")
			.field("stopped", &self.is_stopped())
			.finish_non_exhaustive()
	}
}

impl Stream for WatchStream {
	type Item = Result<WatchEvent<Srlinux>, Error>;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
		let this = &mut *self;
		if this.events.is_none() {
			return Poll::Ready(None);
		}

		if this.cancelled.as_mut().poll(cx).is_ready() {
			return this.finish(Err(Error::Cancelled));
		}
		if let Some(deadline) = this.deadline.as_mut() {
			if deadline.as_mut().poll(cx).is_ready() {
				return this.finish(Err(Error::DeadlineExceeded));
			}
		}

		let Some(events) = this.events.as_mut() else {
			return Poll::Ready(None);
		};
		match events.poll_next_unpin(cx) {
			Poll::Pending => Poll::Pending,
			Poll::Ready(None) => {
				this.events = None;
				Poll::Ready(None)
			}
			Poll::Ready(Some(Ok(event @ WatchEvent::Error(_)))) => this.finish(Ok(event)),
			Poll::Ready(Some(Ok(event))) => Poll::Ready(Some(Ok(event))),
			Poll::Ready(Some(Err(err))) => this.finish(Err(Error::Transport(err))),
		}
	}
}
