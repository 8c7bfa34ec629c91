//! Writing command results to stdout.

use std::io::{self, ErrorKind, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Stdout wrapper treating a closed reader as success.
///
/// `srlctl watch | head -5` should end quietly once `head` has what it
/// wants, not fail with EPIPE.
pub struct BrokenPipeGuard<W> {
	inner: W,
}

impl<W> BrokenPipeGuard<W> {
	pub fn new(inner: W) -> Self {
		Self { inner }
	}
}

impl<W: Write> Write for BrokenPipeGuard<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self.inner.write(buf) {
			Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(buf.len()),
			other => other,
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		match self.inner.flush() {
			Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
			other => other,
		}
	}
}

/// Write `value` as one YAML document.
pub fn write_yaml<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
	let yaml = serde_yaml::to_string(value).context("serializing output")?;
	out.write_all(b"---\n")?;
	out.write_all(yaml.as_bytes())?;
	out.flush()?;
	Ok(())
}
