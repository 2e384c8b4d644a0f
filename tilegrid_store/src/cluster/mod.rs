//! The tile-cluster storage backend: many tiles per zoom range packed into a
//! small number of OS files.
//!
//! Tiles are partitioned into clusters by a deterministic function of
//! (column, row, zoom) and a configurable break point. Each cluster owns two
//! files under the store's root directory:
//!
//! - `<set>-<start>-<row>-<column>.index`: a fixed-stride array with one
//!   8-byte big-endian slot per tile position in the cluster. A slot holds
//!   the offset of the tile's record in the data file, or -1 for "no tile".
//! - `<set>-<start>-<row>-<column>.data`: an append-only log of tile
//!   records. Each record is a header (the magic number written twice, the
//!   tile's column and row as 8-byte integers, a 4-byte payload length)
//!   followed by the encoded image bytes.
//!
//! A record append completes (and is flushed) before its index slot is
//! written, so a crash mid-write leaves the index consistent and only loses
//! the dangling appended bytes. Truncated records, magic mismatches, and
//! index slots pointing past the data file are reported as
//! [`crate::TileStoreError::Corrupt`], never conflated with "no tile".

mod layout;
mod reader;
mod writer;

pub use reader::ClusterTileReader;
pub use writer::ClusterTileWriter;

pub(crate) use layout::{ClusterAddress, ClusterLayout};

use tilegrid_core::TileOrigin;

/// Self-verification marker written twice at the start of every data record.
pub const CLUSTER_MAGIC: u64 = 0x0077_2211_ee;

/// Index slot value meaning "no tile present".
pub(crate) const NO_TILE: i64 = -1;

/// Bytes per index slot: one signed 64-bit data-file offset.
pub(crate) const INDEX_SLOT_SIZE: u64 = 8;

/// Record header: magic (8) + magic (8) + column (8) + row (8) + length (4).
pub(crate) const RECORD_HEADER_SIZE: u64 = 36;

/// The origin convention cluster stores express tile coordinates in.
pub(crate) const CLUSTER_ORIGIN: TileOrigin = TileOrigin::LowerLeft;
