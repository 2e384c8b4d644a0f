//! Shared helpers for converting between CRS coordinates and a store's tile
//! addresses. Backends differ in how they persist tiles, not in how they
//! address them, so the conversion plumbing lives here.

use crate::{StoreResult, TileStoreError};
use tilegrid_core::{
	BoundingBox, Coordinate, CrsCoordinate, TileMatrixDimensions, TileOrigin, profile::CrsProfile, scheme::TileScheme,
};

/// The tile matrix dimensions at `zoom_level`, with out-of-range zoom levels
/// reported as invalid arguments.
pub(crate) fn matrix_dimensions(scheme: &dyn TileScheme, zoom_level: u8) -> StoreResult<TileMatrixDimensions> {
	scheme.dimensions(zoom_level).map_err(TileStoreError::invalid)
}

/// Maps a CRS coordinate to the integer tile address containing it, in the
/// store's origin convention. The store tiles the profile's whole world
/// bounds.
pub(crate) fn crs_to_tile(
	profile: &dyn CrsProfile,
	scheme: &dyn TileScheme,
	origin: TileOrigin,
	coordinate: &CrsCoordinate,
	zoom_level: u8,
) -> StoreResult<Coordinate<u32>> {
	let dimensions = matrix_dimensions(scheme, zoom_level)?;
	profile
		.crs_to_tile_coordinate(coordinate, &profile.bounds(), &dimensions, origin)
		.map_err(TileStoreError::invalid)
}

/// Maps a tile address to the CRS coordinate of the tile corner selected by
/// `corner`.
pub(crate) fn tile_to_crs(
	profile: &dyn CrsProfile,
	scheme: &dyn TileScheme,
	origin: TileOrigin,
	column: u32,
	row: u32,
	zoom_level: u8,
	corner: TileOrigin,
) -> StoreResult<CrsCoordinate> {
	let dimensions = matrix_dimensions(scheme, zoom_level)?;
	let corner_address = origin.transform(corner, Coordinate::new(column, row), &dimensions);
	profile
		.tile_to_crs_coordinate(corner_address.x, corner_address.y, &profile.bounds(), &dimensions, corner)
		.map_err(TileStoreError::invalid)
}

/// The bounding box of one tile, in the profile's CRS units.
pub(crate) fn tile_bounds(
	profile: &dyn CrsProfile,
	scheme: &dyn TileScheme,
	origin: TileOrigin,
	column: u32,
	row: u32,
	zoom_level: u8,
) -> StoreResult<BoundingBox> {
	let dimensions = matrix_dimensions(scheme, zoom_level)?;
	profile
		.tile_bounds(column, row, &profile.bounds(), &dimensions, origin)
		.map_err(TileStoreError::invalid)
}
