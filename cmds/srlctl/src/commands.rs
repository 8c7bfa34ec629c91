//! Subcommand handlers.

use std::io::Write;

use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use futures::StreamExt;
use kube::core::{
	params::{DeleteParams, GetParams, ListParams, PostParams},
	WatchEvent,
};
use srlinux_client::{Context, Error, SrlinuxClient};
use srlinux_types::SrlinuxStatus;
use tracing::{debug, info};

use crate::output::write_yaml;

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// List nodes in the namespace
	List {
		/// Label selector to filter on
		#[arg(short = 'l', long)]
		selector: Option<String>,
	},

	/// Show a node
	Get { name: String },

	/// Delete a node
	Delete { name: String },

	/// Stream changes to nodes in the namespace until interrupted
	Watch {
		/// Label selector to filter on
		#[arg(short = 'l', long)]
		selector: Option<String>,

		/// Start after this resource version instead of replaying current state
		#[arg(long)]
		resource_version: Option<String>,
	},

	/// Show the status subresource of a node
	Status { name: String },

	/// Record the image a node runs in its status
	SetImage {
		name: String,
		image: String,

		/// Let the server validate the update without persisting it
		#[arg(long)]
		dry_run: bool,
	},
}

fn list_params(selector: Option<String>, resource_version: Option<String>) -> ListParams {
	ListParams {
		label_selector: selector,
		resource_version,
		..ListParams::default()
	}
}

pub async fn run<W: Write>(
	command: Commands,
	client: &SrlinuxClient,
	ctx: &Context,
	mut out: W,
) -> Result<()> {
	debug!(namespace = client.namespace(), ?command, "running command");

	match command {
		Commands::List { selector } => {
			let list = client
				.list(ctx, &list_params(selector, None))
				.await
				.context("listing nodes")?;
			write_yaml(&mut out, &list.items)
		}
		Commands::Get { name } => {
			let node = client
				.get(ctx, &name, &GetParams::default())
				.await
				.with_context(|| format!("getting node {name}"))?;
			write_yaml(&mut out, &node)
		}
		Commands::Delete { name } => {
			client
				.delete(ctx, &name, &DeleteParams::default())
				.await
				.with_context(|| format!("deleting node {name}"))?;
			info!(name = %name, "deleted node");
			writeln!(out, "srlinux.{}/{name} deleted", srlinux_types::GROUP_NAME)?;
			Ok(())
		}
		Commands::Watch {
			selector,
			resource_version,
		} => watch(client, ctx, list_params(selector, resource_version), out).await,
		Commands::Status { name } => {
			let status = client
				.unstructured(ctx, &name, &GetParams::default(), &["status"])
				.await
				.with_context(|| format!("getting status of node {name}"))?;
			write_yaml(&mut out, &status)
		}
		Commands::SetImage {
			name,
			image,
			dry_run,
		} => {
			let mut node = client
				.get(ctx, &name, &GetParams::default())
				.await
				.with_context(|| format!("getting node {name}"))?;
			node.status = Some(SrlinuxStatus { image });

			let pp = PostParams {
				dry_run,
				..PostParams::default()
			};
			let updated = client
				.update_status(ctx, &node, &pp)
				.await
				.with_context(|| format!("updating status of node {name}"))?;
			write_yaml(&mut out, &updated.status)
		}
	}
}

/// Print events until the server closes the watch or `ctx` is cancelled.
async fn watch<W: Write>(
	client: &SrlinuxClient,
	ctx: &Context,
	lp: ListParams,
	mut out: W,
) -> Result<()> {
	let mut events = client.watch(ctx, &lp).await.context("opening watch")?;

	while let Some(event) = events.next().await {
		match event {
			Ok(WatchEvent::Error(status)) => {
				bail!("watch failed: {} ({})", status.message, status.code)
			}
			Ok(event) => write_yaml(&mut out, &event)?,
			Err(Error::Cancelled) => {
				debug!("watch interrupted");
				break;
			}
			Err(err) => return Err(err).context("watching nodes"),
		}
	}

	Ok(())
}
