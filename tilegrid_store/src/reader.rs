//! The read capability set every storage backend implements.

use crate::{StoreResult, TileImageFormat, TileStream, codec};
use image::DynamicImage;
use std::collections::BTreeSet;
use tilegrid_core::{Blob, BoundingBox, CoordinateReferenceSystem, CrsCoordinate, Dimensions, TileOrigin, scheme::TileScheme};

/// Read access to a tile store.
///
/// Tile lookups return `Ok(None)` when no tile exists at the requested
/// address; errors are reserved for real failures (I/O, corruption, invalid
/// addresses).
///
/// A reader is a scoped resource: [`close`](TileStoreReader::close) consumes
/// it, so no further I/O can be attempted afterwards.
pub trait TileStoreReader {
	/// A human-readable identifier for this store.
	fn name(&self) -> &str;

	/// The geographic bounds of the data in this store, in its CRS units.
	fn bounds(&self) -> StoreResult<BoundingBox>;

	/// The number of tiles stored.
	fn count_tiles(&self) -> StoreResult<u64>;

	/// The approximate size of the store in bytes.
	fn byte_size(&self) -> StoreResult<u64>;

	/// The zoom levels that contain at least one tile.
	fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>>;

	/// The encoded bytes of the tile at (column, row, zoom), or `None` if no
	/// tile was ever written there.
	fn get_tile_data(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<Option<Blob>>;

	/// The decoded tile image at (column, row, zoom).
	fn get_tile(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<Option<DynamicImage>> {
		self
			.get_tile_data(column, row, zoom_level)?
			.map(|data| codec::decode(&data))
			.transpose()
	}

	/// The encoded bytes of the tile containing a CRS coordinate.
	fn get_tile_data_at(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Option<Blob>>;

	/// The decoded tile image containing a CRS coordinate.
	fn get_tile_at(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Option<DynamicImage>> {
		self
			.get_tile_data_at(coordinate, zoom_level)?
			.map(|data| codec::decode(&data))
			.transpose()
	}

	/// Lazily enumerates every tile in the store.
	fn stream(&self) -> StoreResult<TileStream<'_>>;

	/// Lazily enumerates every tile at one zoom level.
	fn stream_zoom(&self, zoom_level: u8) -> StoreResult<TileStream<'_>>;

	/// Best guess for the image format of the stored tiles, or `None` for an
	/// empty store.
	fn image_format(&self) -> StoreResult<Option<TileImageFormat>>;

	/// Best guess for the pixel dimensions of the stored tiles, or `None`
	/// for an empty store.
	fn image_dimensions(&self) -> StoreResult<Option<Dimensions<u32>>>;

	/// The coordinate reference system tile addresses are expressed in.
	fn crs(&self) -> &CoordinateReferenceSystem;

	/// The scheme mapping zoom levels to matrix dimensions.
	fn tile_scheme(&self) -> &dyn TileScheme;

	/// The origin convention this store exposes tile coordinates in.
	fn tile_origin(&self) -> TileOrigin;

	/// Releases the reader. No further I/O is attempted afterwards; since
	/// `close` consumes the reader, use-after-release is a compile error.
	fn close(self: Box<Self>) -> StoreResult<()>;
}
