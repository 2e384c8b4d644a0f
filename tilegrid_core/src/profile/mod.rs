//! Coordinate-reference-system profiles.
//!
//! A [`CrsProfile`] converts between a position in its CRS units and a
//! real-valued position within a zoom level's tile grid, and back. Both
//! shipped profiles ([`SphericalMercatorProfile`], [`GlobalGeodeticProfile`])
//! are *proportional*: tile addressing is a linear scaling of the CRS
//! position into the matrix, so the shared math lives in default trait
//! methods and each profile only supplies its constants and its inverse
//! projection.

pub mod bounds;
mod global_geodetic;
mod spherical_mercator;

pub use global_geodetic::GlobalGeodeticProfile;
pub use spherical_mercator::SphericalMercatorProfile;

use crate::types::{BoundingBox, Coordinate, CoordinateReferenceSystem, CrsCoordinate, TileMatrixDimensions, TileOrigin};
use anyhow::{Result, ensure};

/// A converter between CRS positions and tile grid positions.
pub trait CrsProfile: Send + Sync {
	/// The (authority, code) identity of this profile.
	fn crs(&self) -> &CoordinateReferenceSystem;

	/// The world bounding box of the projection, in CRS units.
	fn bounds(&self) -> BoundingBox;

	/// Number of decimal digits that are significant when comparing
	/// coordinates in this CRS, used to decide whether a coordinate lies on a
	/// tile boundary.
	fn precision(&self) -> u8;

	/// Human-readable profile name.
	fn name(&self) -> &'static str;

	/// Converts a position in this profile's CRS into WGS84 geographic
	/// degrees (longitude, latitude).
	fn to_global_geodetic(&self, coordinate: &Coordinate<f64>) -> Coordinate<f64>;

	/// Maps a CRS coordinate to the integer tile address containing it, in
	/// the requested origin convention.
	///
	/// # Errors
	/// Fails if the coordinate's CRS does not match this profile, or if the
	/// coordinate lies outside `bounds` (the two edges far from the origin's
	/// corner count as outside, see [`bounds::contains`]).
	fn crs_to_tile_coordinate(
		&self,
		coordinate: &CrsCoordinate,
		bounds: &BoundingBox,
		dimensions: &TileMatrixDimensions,
		origin: TileOrigin,
	) -> Result<Coordinate<u32>> {
		ensure!(
			coordinate.crs() == self.crs(),
			"coordinate CRS ({}) does not match the profile CRS ({})",
			coordinate.crs(),
			self.crs()
		);
		ensure!(
			bounds::contains(bounds, coordinate.position(), origin, self.precision()),
			"coordinate {} is outside the bounds of this coordinate reference system",
			coordinate
		);

		let corner = bounds::corner(bounds, origin);
		let tile_width = bounds.width() / f64::from(dimensions.width());
		let tile_height = bounds.height() / f64::from(dimensions.height());

		let normalized_x = (coordinate.x() - corner.x).abs();
		let normalized_y = (coordinate.y() - corner.y).abs();

		Ok(Coordinate::new(
			snapped_floor(normalized_x / tile_width) as u32,
			snapped_floor(normalized_y / tile_height) as u32,
		))
	}

	/// Maps a tile address back to a CRS coordinate: the corner of the tile
	/// that corresponds to the given origin convention.
	///
	/// # Errors
	/// Fails if (column, row) is outside `dimensions`.
	fn tile_to_crs_coordinate(
		&self,
		column: u32,
		row: u32,
		bounds: &BoundingBox,
		dimensions: &TileMatrixDimensions,
		origin: TileOrigin,
	) -> Result<CrsCoordinate> {
		ensure!(
			dimensions.contains(column, row),
			"tile ({column}, {row}) is outside the matrix dimensions {dimensions:?}"
		);

		let lower_left = origin.transform(TileOrigin::LowerLeft, Coordinate::new(column, row), dimensions);
		let tile_width = bounds.width() / f64::from(dimensions.width());
		let tile_height = bounds.height() / f64::from(dimensions.height());

		Ok(CrsCoordinate::new(
			bounds.min_x() + f64::from(lower_left.x + origin.horizontal()) * tile_width,
			bounds.min_y() + f64::from(lower_left.y + origin.vertical()) * tile_height,
			self.crs().clone(),
		))
	}

	/// The bounding box of a single tile, in CRS units.
	///
	/// # Errors
	/// Fails if (column, row) is outside `dimensions`.
	fn tile_bounds(
		&self,
		column: u32,
		row: u32,
		bounds: &BoundingBox,
		dimensions: &TileMatrixDimensions,
		origin: TileOrigin,
	) -> Result<BoundingBox> {
		ensure!(
			dimensions.contains(column, row),
			"tile ({column}, {row}) is outside the matrix dimensions {dimensions:?}"
		);

		let lower_left = origin.transform(TileOrigin::LowerLeft, Coordinate::new(column, row), dimensions);
		let tile_width = bounds.width() / f64::from(dimensions.width());
		let tile_height = bounds.height() / f64::from(dimensions.height());

		let min_x = bounds.min_x() + f64::from(lower_left.x) * tile_width;
		let min_y = bounds.min_y() + f64::from(lower_left.y) * tile_height;
		BoundingBox::new(min_x, min_y, min_x + tile_width, min_y + tile_height)
	}
}

/// Looks up the profile for a coordinate reference system.
///
/// Returns `None` for reference systems this crate has no profile for.
pub fn from_crs(crs: &CoordinateReferenceSystem) -> Option<Box<dyn CrsProfile>> {
	match (crs.authority(), crs.code()) {
		("EPSG", 3857 | 900913) => Some(Box::new(SphericalMercatorProfile::new())),
		("EPSG", 4326) => Some(Box::new(GlobalGeodeticProfile::new())),
		_ => None,
	}
}

/// Floors a tile-space value, first snapping values that sit within floating
/// point noise of an integer. Keeps tile corner coordinates on the tile they
/// name instead of bleeding into the previous row or column.
fn snapped_floor(value: f64) -> f64 {
	let rounded = value.round();
	if (value - rounded).abs() < 1e-9 { rounded } else { value.floor() }
}
