use super::CrsProfile;
use crate::types::{BoundingBox, Coordinate, CoordinateReferenceSystem};
use std::f64::consts::PI;

/// Earth's equatorial radius in meters (WGS84 semi-major axis).
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// Spherical Mercator (EPSG:3857), also known as Web Mercator or
/// Pseudo-Mercator. World bounds are ±π·R meters in both axes.
#[derive(Debug)]
pub struct SphericalMercatorProfile {
	crs: CoordinateReferenceSystem,
}

impl SphericalMercatorProfile {
	pub fn new() -> SphericalMercatorProfile {
		SphericalMercatorProfile {
			// The authority string is statically valid.
			crs: CoordinateReferenceSystem::new("EPSG", 3857).unwrap(),
		}
	}
}

impl Default for SphericalMercatorProfile {
	fn default() -> Self {
		Self::new()
	}
}

impl CrsProfile for SphericalMercatorProfile {
	fn crs(&self) -> &CoordinateReferenceSystem {
		&self.crs
	}

	fn bounds(&self) -> BoundingBox {
		let extent = PI * EARTH_EQUATORIAL_RADIUS;
		// Symmetric and finite, so construction cannot fail.
		BoundingBox::new(-extent, -extent, extent, extent).unwrap()
	}

	fn precision(&self) -> u8 {
		// Units are meters; centimeter resolution.
		2
	}

	fn name(&self) -> &'static str {
		"Web Mercator"
	}

	fn to_global_geodetic(&self, coordinate: &Coordinate<f64>) -> Coordinate<f64> {
		// Inverse spherical Mercator, Snyder (USGS PP 1395), eq. 7-4:
		// latitude = pi/2 - 2*atan(e^(-y/R))
		Coordinate::new(
			(coordinate.x / EARTH_EQUATORIAL_RADIUS).to_degrees(),
			(PI / 2.0 - 2.0 * (-coordinate.y / EARTH_EQUATORIAL_RADIUS).exp().atan()).to_degrees(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{CrsCoordinate, TileMatrixDimensions, TileOrigin};
	use approx::assert_abs_diff_eq;

	#[test]
	fn world_bounds() {
		let profile = SphericalMercatorProfile::new();
		let bounds = profile.bounds();
		assert_abs_diff_eq!(bounds.max_x(), 20_037_508.342789244, epsilon = 1e-6);
		assert_abs_diff_eq!(bounds.min_y(), -20_037_508.342789244, epsilon = 1e-6);
	}

	#[test]
	fn inverse_projection() {
		let profile = SphericalMercatorProfile::new();

		let center = profile.to_global_geodetic(&Coordinate::new(0.0, 0.0));
		assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-9);
		assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-9);

		let east = profile.to_global_geodetic(&Coordinate::new(PI * EARTH_EQUATORIAL_RADIUS, 0.0));
		assert_abs_diff_eq!(east.x, 180.0, epsilon = 1e-9);

		// top of the Mercator square is the familiar 85.051... degrees
		let top = profile.to_global_geodetic(&Coordinate::new(0.0, PI * EARTH_EQUATORIAL_RADIUS));
		assert_abs_diff_eq!(top.y, 85.05112877980659, epsilon = 1e-9);
	}

	#[test]
	fn tile_addressing_round_trip() {
		let profile = SphericalMercatorProfile::new();
		let bounds = profile.bounds();
		let dims = TileMatrixDimensions::new(16, 16).unwrap();

		for origin in [
			TileOrigin::LowerLeft,
			TileOrigin::UpperLeft,
			TileOrigin::LowerRight,
			TileOrigin::UpperRight,
		] {
			for (column, row) in [(0, 0), (3, 7), (15, 15)] {
				let crs = profile.tile_to_crs_coordinate(column, row, &bounds, &dims, origin).unwrap();
				let tile = profile.crs_to_tile_coordinate(&crs, &bounds, &dims, origin).unwrap();
				assert_eq!(tile, Coordinate::new(column, row), "{origin:?} ({column}, {row})");
			}
		}
	}

	#[test]
	fn rejects_mismatched_crs() {
		let profile = SphericalMercatorProfile::new();
		let wgs84 = CoordinateReferenceSystem::new("EPSG", 4326).unwrap();
		let coordinate = CrsCoordinate::new(0.0, 0.0, wgs84);
		let dims = TileMatrixDimensions::new(2, 2).unwrap();
		assert!(
			profile
				.crs_to_tile_coordinate(&coordinate, &profile.bounds(), &dims, TileOrigin::LowerLeft)
				.is_err()
		);
	}

	#[test]
	fn rejects_out_of_bounds_coordinates() {
		let profile = SphericalMercatorProfile::new();
		let coordinate = CrsCoordinate::new(21_000_000.0, 0.0, profile.crs().clone());
		let dims = TileMatrixDimensions::new(2, 2).unwrap();
		assert!(
			profile
				.crs_to_tile_coordinate(&coordinate, &profile.bounds(), &dims, TileOrigin::LowerLeft)
				.is_err()
		);
	}
}
