//! Tile store contract and storage backends.
//!
//! Every backend implements the same two capability sets, [`TileStoreReader`]
//! and [`TileStoreWriter`], addressed through the coordinate model of
//! `tilegrid_core`. Two backends ship here:
//!
//! - [`cluster`]: a packed-file backend that stores many tiles per file pair
//!   (fixed-stride binary index + append-only data log), addressed by direct
//!   offset arithmetic.
//! - [`directory`]: a TMS-style one-file-per-tile backend with the layout
//!   `<root>/<zoom>/<column>/<row>.<ext>`.
//!
//! The engine is a synchronous, call-and-return library: every operation
//! blocks the calling thread, streams are pull-based lazy iterators, and no
//! internal locking is provided. Callers must serialize writers per store.

mod addressing;
mod codec;
mod error;
mod reader;
mod tile_handle;
mod tile_stream;
mod writer;

pub mod cluster;
pub mod directory;

pub use codec::TileImageFormat;
pub use error::{StoreResult, TileStoreError};
pub use reader::TileStoreReader;
pub use tile_handle::TileHandle;
pub use tile_stream::TileStream;
pub use writer::TileStoreWriter;
