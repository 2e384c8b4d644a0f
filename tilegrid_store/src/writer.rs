//! The write capability set every storage backend implements.

use crate::{StoreResult, TileImageFormat, codec};
use image::DynamicImage;
use tilegrid_core::{Blob, BoundingBox, Coordinate, CoordinateReferenceSystem, CrsCoordinate, TileOrigin, scheme::TileScheme};

/// Write access to a tile store.
///
/// Callers must serialize writers per store (per zoom level at minimum): no
/// internal locking is provided, and index updates are not atomic across the
/// data append and the slot write.
///
/// A writer is a scoped resource: [`close`](TileStoreWriter::close) consumes
/// it after flushing, so use-after-release is a compile error.
pub trait TileStoreWriter {
	/// Converts a CRS coordinate to the tile address containing it, relative
	/// to this store's scheme and origin.
	fn crs_to_tile_coordinate(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Coordinate<u32>>;

	/// Converts a tile address to a CRS coordinate. `corner` selects which
	/// corner of the tile the coordinate represents.
	fn tile_to_crs_coordinate(
		&self,
		column: u32,
		row: u32,
		zoom_level: u8,
		corner: TileOrigin,
	) -> StoreResult<CrsCoordinate>;

	/// The geographic bounds of one tile, in this store's CRS units.
	fn tile_bounding_box(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<BoundingBox>;

	/// Stores already-encoded tile bytes at (column, row, zoom).
	fn add_tile_data(&mut self, column: u32, row: u32, zoom_level: u8, data: &Blob) -> StoreResult<()>;

	/// Encodes and stores a tile image at (column, row, zoom), using this
	/// writer's image format.
	fn add_tile(&mut self, column: u32, row: u32, zoom_level: u8, image: &DynamicImage) -> StoreResult<()> {
		let data = codec::encode(image, self.image_format())?;
		self.add_tile_data(column, row, zoom_level, &data)
	}

	/// Encodes and stores a tile image at the address containing a CRS
	/// coordinate.
	fn add_tile_at(&mut self, coordinate: &CrsCoordinate, zoom_level: u8, image: &DynamicImage) -> StoreResult<()> {
		let address = self.crs_to_tile_coordinate(coordinate, zoom_level)?;
		self.add_tile(address.x, address.y, zoom_level, image)
	}

	/// The encoding this writer produces for [`add_tile`](Self::add_tile).
	fn image_format(&self) -> TileImageFormat;

	/// The image encodings this writer accepts.
	fn supported_formats(&self) -> &[TileImageFormat];

	/// The coordinate reference system tile addresses are expressed in.
	fn crs(&self) -> &CoordinateReferenceSystem;

	/// The scheme mapping zoom levels to matrix dimensions.
	fn tile_scheme(&self) -> &dyn TileScheme;

	/// The origin convention this store expects tile coordinates in.
	fn tile_origin(&self) -> TileOrigin;

	/// Flushes and releases the writer. Since `close` consumes the writer,
	/// use-after-release is a compile error.
	fn close(self: Box<Self>) -> StoreResult<()>;
}
