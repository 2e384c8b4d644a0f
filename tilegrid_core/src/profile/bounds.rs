//! Origin-aware bounding box utilities.
//!
//! Tile containment is deliberately asymmetric: a coordinate on one of the
//! two edges *far* from the origin's corner belongs to the neighboring tile,
//! so that a point shared by two adjacent tiles is counted by exactly one of
//! them.

use crate::types::{BoundingBox, Coordinate, TileOrigin};

/// True if the coordinate lies within `bounds` or on one of the two edges
/// adjacent to the origin's corner. The two far edges are exclusive.
///
/// `precision` is the number of decimal digits used to decide whether a
/// coordinate sits exactly on an edge.
pub fn contains(bounds: &BoundingBox, coordinate: &Coordinate<f64>, origin: TileOrigin, precision: u8) -> bool {
	let on_far_edge = match origin {
		TileOrigin::LowerLeft => {
			on_edge(coordinate.y, bounds.max_y(), precision) || on_edge(coordinate.x, bounds.max_x(), precision)
		}
		TileOrigin::LowerRight => {
			on_edge(coordinate.y, bounds.max_y(), precision) || on_edge(coordinate.x, bounds.min_x(), precision)
		}
		TileOrigin::UpperLeft => {
			on_edge(coordinate.y, bounds.min_y(), precision) || on_edge(coordinate.x, bounds.max_x(), precision)
		}
		TileOrigin::UpperRight => {
			on_edge(coordinate.y, bounds.min_y(), precision) || on_edge(coordinate.x, bounds.min_x(), precision)
		}
	};

	!on_far_edge && bounds.contains(coordinate)
}

/// The corner of `bounds` that corresponds to the tile origin, e.g.
/// [`TileOrigin::LowerLeft`] yields the bottom left corner.
pub fn corner(bounds: &BoundingBox, origin: TileOrigin) -> Coordinate<f64> {
	match origin {
		TileOrigin::LowerLeft => bounds.bottom_left(),
		TileOrigin::LowerRight => bounds.bottom_right(),
		TileOrigin::UpperLeft => bounds.top_left(),
		TileOrigin::UpperRight => bounds.top_right(),
	}
}

fn on_edge(value: f64, edge: f64, precision: u8) -> bool {
	(value - edge).abs() < 0.5 * 10f64.powi(-i32::from(precision))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bbox() -> BoundingBox {
		BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap()
	}

	#[test]
	fn origin_corner_is_inside() {
		let bounds = bbox();
		for origin in [
			TileOrigin::LowerLeft,
			TileOrigin::LowerRight,
			TileOrigin::UpperLeft,
			TileOrigin::UpperRight,
		] {
			assert!(
				contains(&bounds, &corner(&bounds, origin), origin, 7),
				"{origin:?} corner must be inside"
			);
		}
	}

	#[test]
	fn far_corners_are_outside() {
		let bounds = bbox();
		// For a lower-left origin, max-x and max-y edges are exclusive.
		assert!(!contains(&bounds, &bounds.top_right(), TileOrigin::LowerLeft, 7));
		assert!(!contains(&bounds, &bounds.bottom_right(), TileOrigin::LowerLeft, 7));
		assert!(!contains(&bounds, &bounds.top_left(), TileOrigin::LowerLeft, 7));
		// For an upper-right origin, min-x and min-y edges are exclusive.
		assert!(!contains(&bounds, &bounds.bottom_left(), TileOrigin::UpperRight, 7));
		assert!(!contains(&bounds, &bounds.bottom_right(), TileOrigin::UpperRight, 7));
		assert!(!contains(&bounds, &bounds.top_left(), TileOrigin::UpperRight, 7));
	}

	#[test]
	fn near_edges_are_inclusive() {
		let bounds = bbox();
		assert!(contains(&bounds, &Coordinate::new(0.0, 5.0), TileOrigin::LowerLeft, 7));
		assert!(contains(&bounds, &Coordinate::new(5.0, 0.0), TileOrigin::LowerLeft, 7));
		assert!(contains(&bounds, &Coordinate::new(10.0, 5.0), TileOrigin::UpperRight, 7));
		assert!(contains(&bounds, &Coordinate::new(5.0, 10.0), TileOrigin::UpperRight, 7));
	}

	#[test]
	fn far_edges_are_exclusive() {
		let bounds = bbox();
		assert!(!contains(&bounds, &Coordinate::new(10.0, 5.0), TileOrigin::LowerLeft, 7));
		assert!(!contains(&bounds, &Coordinate::new(5.0, 10.0), TileOrigin::LowerLeft, 7));
		assert!(!contains(&bounds, &Coordinate::new(0.0, 5.0), TileOrigin::UpperRight, 7));
		assert!(!contains(&bounds, &Coordinate::new(5.0, 0.0), TileOrigin::UpperRight, 7));
	}

	#[test]
	fn precision_decides_edge_membership() {
		let bounds = bbox();
		// 9.99 is on the max-x edge at precision 1, but not at precision 3.
		assert!(!contains(&bounds, &Coordinate::new(9.99, 5.0), TileOrigin::LowerLeft, 1));
		assert!(contains(&bounds, &Coordinate::new(9.99, 5.0), TileOrigin::LowerLeft, 3));
	}

	#[test]
	fn outside_the_box_is_never_contained() {
		let bounds = bbox();
		assert!(!contains(&bounds, &Coordinate::new(-1.0, 5.0), TileOrigin::LowerLeft, 7));
		assert!(!contains(&bounds, &Coordinate::new(5.0, 11.0), TileOrigin::UpperRight, 7));
	}
}
