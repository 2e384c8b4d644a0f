use crate::{StoreResult, codec};
use image::DynamicImage;
use tilegrid_core::{Blob, BoundingBox};

/// A read-only view of one stored tile, yielded while enumerating a store's
/// contents.
///
/// A handle owns its payload bytes; the image is decoded lazily on request.
#[derive(Clone, Debug)]
pub struct TileHandle {
	column: u32,
	row: u32,
	zoom_level: u8,
	bounds: BoundingBox,
	data: Blob,
}

impl TileHandle {
	pub fn new(column: u32, row: u32, zoom_level: u8, bounds: BoundingBox, data: Blob) -> TileHandle {
		TileHandle {
			column,
			row,
			zoom_level,
			bounds,
			data,
		}
	}

	pub fn column(&self) -> u32 {
		self.column
	}

	pub fn row(&self) -> u32 {
		self.row
	}

	pub fn zoom_level(&self) -> u8 {
		self.zoom_level
	}

	/// The geographic bounds of this tile, in the store's CRS units.
	pub fn bounds(&self) -> &BoundingBox {
		&self.bounds
	}

	/// The encoded image bytes as stored.
	pub fn data(&self) -> &Blob {
		&self.data
	}

	/// Decodes the tile image.
	///
	/// # Errors
	/// Returns [`crate::TileStoreError::Corrupt`] if the stored bytes fail to
	/// decode.
	pub fn image(&self) -> StoreResult<DynamicImage> {
		codec::decode(&self.data)
	}

	pub fn into_data(self) -> Blob {
		self.data
	}
}
