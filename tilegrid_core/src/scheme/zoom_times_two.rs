use super::{MAX_ZOOM_LEVEL, TileScheme};
use crate::types::TileMatrixDimensions;
use anyhow::{Result, ensure};

/// The doubling tile scheme: matrix dimensions are anchored at a minimum zoom
/// level and double along both axes for every subsequent level.
///
/// All per-level dimensions are computed once at construction, which also
/// proves that no level can overflow a `u32` tile index.
#[derive(Clone, Debug)]
pub struct ZoomTimesTwo {
	minimum_zoom_level: u8,
	maximum_zoom_level: u8,
	dimensions: Vec<TileMatrixDimensions>,
}

impl ZoomTimesTwo {
	/// Creates a doubling scheme anchored at `minimum_zoom_level` with
	/// `base_width` x `base_height` tiles.
	///
	/// # Errors
	/// Returns an error if the zoom range is empty or exceeds
	/// [`MAX_ZOOM_LEVEL`], if a base dimension is zero, or if doubling up to
	/// `maximum_zoom_level` would overflow 32-bit tile indices.
	pub fn new(minimum_zoom_level: u8, maximum_zoom_level: u8, base_width: u32, base_height: u32) -> Result<ZoomTimesTwo> {
		ensure!(
			minimum_zoom_level <= maximum_zoom_level,
			"minimum zoom level ({minimum_zoom_level}) must be <= maximum ({maximum_zoom_level})"
		);
		ensure!(
			maximum_zoom_level <= MAX_ZOOM_LEVEL,
			"maximum zoom level ({maximum_zoom_level}) must be <= {MAX_ZOOM_LEVEL}"
		);
		ensure!(base_width > 0, "base width must be greater than 0");
		ensure!(base_height > 0, "base height must be greater than 0");

		let levels = u32::from(maximum_zoom_level - minimum_zoom_level);
		ensure!(
			u64::from(base_width) << levels <= u64::from(u32::MAX) && u64::from(base_height) << levels <= u64::from(u32::MAX),
			"base dimensions {base_width}x{base_height} doubled up to zoom level {maximum_zoom_level} overflow 32-bit tile indices"
		);

		let dimensions = (0..=levels)
			.map(|level| TileMatrixDimensions::new(base_width << level, base_height << level))
			.collect::<Result<Vec<_>>>()?;

		Ok(ZoomTimesTwo {
			minimum_zoom_level,
			maximum_zoom_level,
			dimensions,
		})
	}

	/// The usual web-map pyramid: one tile at zoom 0, doubling per level.
	pub fn web(maximum_zoom_level: u8) -> Result<ZoomTimesTwo> {
		ZoomTimesTwo::new(0, maximum_zoom_level, 1, 1)
	}
}

impl TileScheme for ZoomTimesTwo {
	fn dimensions(&self, zoom_level: u8) -> Result<TileMatrixDimensions> {
		ensure!(
			zoom_level >= self.minimum_zoom_level && zoom_level <= self.maximum_zoom_level,
			"zoom level ({zoom_level}) must be in the range [{}, {}]",
			self.minimum_zoom_level,
			self.maximum_zoom_level
		);
		Ok(self.dimensions[usize::from(zoom_level - self.minimum_zoom_level)])
	}

	fn minimum_zoom_level(&self) -> u8 {
		self.minimum_zoom_level
	}

	fn maximum_zoom_level(&self) -> u8 {
		self.maximum_zoom_level
	}
}
