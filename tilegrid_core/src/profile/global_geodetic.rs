use super::CrsProfile;
use crate::types::{BoundingBox, Coordinate, CoordinateReferenceSystem};

/// Global Geodetic (EPSG:4326): unprojected WGS84 degrees. World bounds are
/// ±180° longitude and ±90° latitude; tile addressing is a direct linear
/// scaling with no trigonometric inverse.
#[derive(Debug)]
pub struct GlobalGeodeticProfile {
	crs: CoordinateReferenceSystem,
}

impl GlobalGeodeticProfile {
	pub fn new() -> GlobalGeodeticProfile {
		GlobalGeodeticProfile {
			crs: CoordinateReferenceSystem::new("EPSG", 4326).unwrap(),
		}
	}
}

impl Default for GlobalGeodeticProfile {
	fn default() -> Self {
		Self::new()
	}
}

impl CrsProfile for GlobalGeodeticProfile {
	fn crs(&self) -> &CoordinateReferenceSystem {
		&self.crs
	}

	fn bounds(&self) -> BoundingBox {
		BoundingBox::new(-180.0, -90.0, 180.0, 90.0).unwrap()
	}

	fn precision(&self) -> u8 {
		// Units are degrees; ~centimeter resolution at the equator.
		7
	}

	fn name(&self) -> &'static str {
		"Global Geodetic"
	}

	fn to_global_geodetic(&self, coordinate: &Coordinate<f64>) -> Coordinate<f64> {
		*coordinate
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{CrsCoordinate, TileMatrixDimensions, TileOrigin};

	#[test]
	fn geodetic_conversion_is_identity() {
		let profile = GlobalGeodeticProfile::new();
		let coordinate = Coordinate::new(13.4, 52.5);
		assert_eq!(profile.to_global_geodetic(&coordinate), coordinate);
	}

	#[test]
	fn linear_tile_addressing() {
		let profile = GlobalGeodeticProfile::new();
		let bounds = profile.bounds();
		// two columns, one row: the classic zoom-0 geodetic layout
		let dims = TileMatrixDimensions::new(2, 1).unwrap();

		let west = CrsCoordinate::new(-90.0, 0.0, profile.crs().clone());
		let east = CrsCoordinate::new(90.0, 0.0, profile.crs().clone());

		let west_tile = profile
			.crs_to_tile_coordinate(&west, &bounds, &dims, TileOrigin::LowerLeft)
			.unwrap();
		let east_tile = profile
			.crs_to_tile_coordinate(&east, &bounds, &dims, TileOrigin::LowerLeft)
			.unwrap();
		assert_eq!(west_tile, Coordinate::new(0, 0));
		assert_eq!(east_tile, Coordinate::new(1, 0));
	}

	#[test]
	fn tile_bounds_tile_the_world() {
		let profile = GlobalGeodeticProfile::new();
		let bounds = profile.bounds();
		let dims = TileMatrixDimensions::new(4, 2).unwrap();

		let tile = profile.tile_bounds(0, 0, &bounds, &dims, TileOrigin::UpperLeft).unwrap();
		// upper-left tile (0,0) covers the north-west corner
		assert_eq!(tile, BoundingBox::new(-180.0, 0.0, -90.0, 90.0).unwrap());

		let tile = profile.tile_bounds(3, 1, &bounds, &dims, TileOrigin::UpperLeft).unwrap();
		assert_eq!(tile, BoundingBox::new(90.0, -90.0, 180.0, 0.0).unwrap());
	}

	#[test]
	fn round_trip_recovers_tile_corners() {
		let profile = GlobalGeodeticProfile::new();
		let bounds = profile.bounds();
		let dims = TileMatrixDimensions::new(8, 4).unwrap();

		for (column, row) in [(0, 0), (5, 2), (7, 3)] {
			let crs = profile
				.tile_to_crs_coordinate(column, row, &bounds, &dims, TileOrigin::UpperLeft)
				.unwrap();
			let tile = profile
				.crs_to_tile_coordinate(&crs, &bounds, &dims, TileOrigin::UpperLeft)
				.unwrap();
			assert_eq!(tile, Coordinate::new(column, row));
		}
	}
}
