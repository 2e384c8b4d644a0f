//! Tile schemes: the rule mapping a zoom level to its matrix dimensions.

mod zoom_times_two;

pub use zoom_times_two::ZoomTimesTwo;

use crate::types::TileMatrixDimensions;
use anyhow::Result;
use std::ops::RangeInclusive;

/// The highest zoom level any scheme may define. Tile indices are 32-bit, so
/// a doubling pyramid overflows beyond level 31.
pub const MAX_ZOOM_LEVEL: u8 = 31;

/// A rule mapping zoom levels to tile matrix dimensions.
///
/// A scheme is defined over a contiguous range of zoom levels; asking for
/// dimensions outside that range is an invalid-argument error, reported
/// synchronously.
pub trait TileScheme: Send + Sync {
	/// The matrix dimensions (column and row counts) at `zoom_level`.
	///
	/// # Errors
	/// Returns an error if `zoom_level` is outside this scheme's range.
	fn dimensions(&self, zoom_level: u8) -> Result<TileMatrixDimensions>;

	/// Lowest zoom level this scheme is defined over.
	fn minimum_zoom_level(&self) -> u8;

	/// Highest zoom level this scheme is defined over.
	fn maximum_zoom_level(&self) -> u8;

	/// All zoom levels this scheme is defined over.
	fn zoom_levels(&self) -> RangeInclusive<u8> {
		self.minimum_zoom_level()..=self.maximum_zoom_level()
	}
}
