//! Namespace-scoped operations on `Srlinux` resources.
//!
//! | Operation | Transport |
//! |---|---|
//! | [`list`](SrlinuxClient::list), [`get`](SrlinuxClient::get), [`create`](SrlinuxClient::create), [`delete`](SrlinuxClient::delete), [`watch`](SrlinuxClient::watch) | raw |
//! | [`update`](SrlinuxClient::update), [`unstructured`](SrlinuxClient::unstructured) | dynamic |
//!
//! The split is fixed: the status subresource write is only exposed on the
//! dynamic transport, everything else decodes typed values directly.

use kube::{
	core::{
		params::{DeleteParams, GetParams, ListParams, PostParams},
		request, ApiResource, DynamicObject, Request,
	},
	Client, Resource,
};
use srlinux_types::{Srlinux, SrlinuxList};
use tracing::instrument;

use crate::{
	context::Context,
	convert,
	coordinates::ResourceCoordinates,
	error::Error,
	watch::WatchStream,
};

/// Status subresource name.
const STATUS: &str = "status";

/// Accessor for `Srlinux` resources in one namespace.
///
/// A plain value over the two transports of its [`crate::Clientset`]; cheap
/// to create and clone.
#[derive(Clone)]
pub struct SrlinuxClient {
	raw: Client,
	dynamic: Client,
	resource: ApiResource,
	namespace: String,
}

impl std::fmt::Debug for SrlinuxClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SrlinuxClient")
			.field("namespace", &self.namespace)
			.finish_non_exhaustive()
	}
}

impl SrlinuxClient {
	pub(crate) fn new(raw: Client, dynamic: Client, resource: ApiResource, namespace: String) -> Self {
		Self {
			raw,
			dynamic,
			resource,
			namespace,
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Request builder for the raw transport.
	fn raw_request(&self) -> Request {
		Request::new(ResourceCoordinates::url_path(&self.namespace))
	}

	/// Request builder for the dynamic transport.
	fn dynamic_request(&self) -> Request {
		Request::new(DynamicObject::url_path(&self.resource, Some(&self.namespace)))
	}

	#[instrument(skip_all, fields(namespace = %self.namespace))]
	pub async fn list(&self, ctx: &Context, lp: &ListParams) -> Result<SrlinuxList, Error> {
		let req = self.raw_request().list(lp).map_err(kube::Error::BuildRequest)?;
		ctx.run(self.raw.request::<SrlinuxList>(req)).await
	}

	#[instrument(skip(self, ctx, gp), fields(namespace = %self.namespace))]
	pub async fn get(&self, ctx: &Context, name: &str, gp: &GetParams) -> Result<Srlinux, Error> {
		let req = self
			.raw_request()
			.get(name, gp)
			.map_err(kube::Error::BuildRequest)?;
		ctx.run(self.raw.request::<Srlinux>(req)).await
	}

	/// Create `srlinux`, returning the object as stored by the server.
	#[instrument(skip_all, fields(
		namespace = %self.namespace,
		name = srlinux.metadata.name.as_deref().unwrap_or_default(),
	))]
	pub async fn create(&self, ctx: &Context, srlinux: &Srlinux) -> Result<Srlinux, Error> {
		let data = serde_json::to_vec(srlinux).map_err(kube::Error::SerdeError)?;
		let req = self
			.raw_request()
			.create(&PostParams::default(), data)
			.map_err(kube::Error::BuildRequest)?;
		ctx.run(self.raw.request::<Srlinux>(req)).await
	}

	#[instrument(skip(self, ctx, dp), fields(namespace = %self.namespace))]
	pub async fn delete(&self, ctx: &Context, name: &str, dp: &DeleteParams) -> Result<(), Error> {
		let req = self
			.raw_request()
			.delete(name, dp)
			.map_err(kube::Error::BuildRequest)?;
		// The body is either the deleted object or a Status, neither is of interest
		ctx.run(self.raw.request_text(req)).await.map(drop)
	}

	/// Open a watch on the collection.
	///
	/// The query is exactly `lp` plus `watch=true`: no bookmarks, server side
	/// timeout or resource version are added. The stream lives until it is
	/// stopped or dropped, `ctx` is done, or the server ends it. See
	/// [`WatchStream`].
	#[instrument(skip_all, fields(namespace = %self.namespace))]
	pub async fn watch(&self, ctx: &Context, lp: &ListParams) -> Result<WatchStream, Error> {
		let req = self
			.raw_request()
			.list(lp)
			.and_then(with_watch)
			.map_err(kube::Error::BuildRequest)?;

		let events = ctx.run(self.raw.request_events::<Srlinux>(req)).await?;
		tracing::trace!("watch opened");
		Ok(WatchStream::new(ctx.clone(), events))
	}

	/// Get `name` as an untyped document, optionally one of its subresources.
	#[instrument(skip(self, ctx, gp), fields(namespace = %self.namespace))]
	pub async fn unstructured(
		&self,
		ctx: &Context,
		name: &str,
		gp: &GetParams,
		subresources: &[&str],
	) -> Result<DynamicObject, Error> {
		let built = if subresources.is_empty() {
			self.dynamic_request().get(name, gp)
		} else {
			let collection = DynamicObject::url_path(&self.resource, Some(&self.namespace));
			Request::new(format!("{collection}/{name}")).get(&subresources.join("/"), gp)
		};
		let req = built.map_err(kube::Error::BuildRequest)?;

		ctx.run(self.dynamic.request::<DynamicObject>(req)).await
	}

	/// Write the status subresource from `obj` and read the result back typed.
	///
	/// A failed write is returned as [`Error::Transport`]; a response that
	/// doesn't convert to a `Srlinux` as [`Error::UpdateFailed`].
	#[instrument(skip_all, fields(
		namespace = %self.namespace,
		name = obj.metadata.name.as_deref().unwrap_or_default(),
	))]
	pub async fn update(
		&self,
		ctx: &Context,
		obj: &DynamicObject,
		pp: &PostParams,
	) -> Result<Srlinux, Error> {
		let name = obj.metadata.name.as_deref().ok_or_else(|| {
			kube::Error::BuildRequest(request::Error::Validation(
				"status update requires metadata.name".to_string(),
			))
		})?;
		let data = serde_json::to_vec(obj).map_err(kube::Error::SerdeError)?;
		let req = self
			.dynamic_request()
			.replace_subresource(STATUS, name, pp, data)
			.map_err(kube::Error::BuildRequest)?;

		let updated = ctx.run(self.dynamic.request::<DynamicObject>(req)).await?;
		convert::from_unstructured(&updated).map_err(Error::UpdateFailed)
	}

	/// Typed front for [`SrlinuxClient::update`].
	pub async fn update_status(
		&self,
		ctx: &Context,
		srlinux: &Srlinux,
		pp: &PostParams,
	) -> Result<Srlinux, Error> {
		let obj = convert::to_unstructured(srlinux).map_err(kube::Error::SerdeError)?;
		self.update(ctx, &obj, pp).await
	}
}

/// Turn a list request into a watch of the same collection.
fn with_watch(mut req: http::Request<Vec<u8>>) -> Result<http::Request<Vec<u8>>, request::Error> {
	let uri = req.uri().to_string();
	let separator = match uri.rsplit_once('?') {
		Some((_, "")) => "",
		Some(_) => "&",
		None => "?",
	};
	*req.uri_mut() = format!("{uri}{separator}watch=true")
		.parse()
		.map_err(|e: http::uri::InvalidUri| request::Error::Validation(e.to_string()))?;
	Ok(req)
}
