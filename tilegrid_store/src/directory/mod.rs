//! The directory storage backend: one file per tile, laid out as
//! `<root>/<zoom>/<column>/<row>.<extension>`.
//!
//! Rows count upward from the bottom of the matrix (lower-left origin), the
//! convention used by TMS-style tile trees. The layout is self-describing
//! enough to enumerate: zoom levels and columns are directories with numeric
//! names, rows are file stems, and the image format is carried in the file
//! extension.

mod reader;
mod writer;

pub use reader::DirectoryTileReader;
pub use writer::DirectoryTileWriter;

use crate::TileImageFormat;
use std::path::{Path, PathBuf};
use tilegrid_core::TileOrigin;

/// The origin convention directory stores express tile coordinates in.
pub(crate) const DIRECTORY_ORIGIN: TileOrigin = TileOrigin::LowerLeft;

pub(crate) fn tile_path(root: &Path, column: u32, row: u32, zoom_level: u8, format: TileImageFormat) -> PathBuf {
	root
		.join(zoom_level.to_string())
		.join(column.to_string())
		.join(format!("{row}.{}", format.extension()))
}
