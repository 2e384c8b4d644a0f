//! A pull-based, lazy, finite sequence of tile handles.

use crate::{StoreResult, TileHandle};

/// A lazy enumeration of a store's tiles.
///
/// Each call to `next` performs exactly the I/O needed to produce the next
/// handle. A stream is finite and is restarted by requesting a fresh one from
/// the store, not by rewinding. Per-tile failures are yielded as `Err` items;
/// the stream continues past them, so one bad tile never aborts an
/// enumeration over the others.
pub struct TileStream<'a> {
	inner: Box<dyn Iterator<Item = StoreResult<TileHandle>> + 'a>,
}

impl<'a> TileStream<'a> {
	pub fn new(iter: impl Iterator<Item = StoreResult<TileHandle>> + 'a) -> TileStream<'a> {
		TileStream { inner: Box::new(iter) }
	}

	pub fn empty() -> TileStream<'a> {
		TileStream {
			inner: Box::new(std::iter::empty()),
		}
	}

	/// Drains the stream, returning all successfully read handles and
	/// discarding per-tile failures.
	pub fn collect_ok(self) -> Vec<TileHandle> {
		self.filter_map(Result::ok).collect()
	}
}

impl Iterator for TileStream<'_> {
	type Item = StoreResult<TileHandle>;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next()
	}
}
