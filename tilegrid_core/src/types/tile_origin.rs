//! Tile matrix corner conventions and the transform between them.
//!
//! Different tile formats disagree about which corner of the tile matrix is
//! tile (0, 0): TMS counts rows from the bottom, most web slippy maps from
//! the top. [`TileOrigin`] captures the convention as two parity bits and
//! provides a pure integer transform between any two conventions.

use super::{Coordinate, TileMatrixDimensions};

/// Which corner of a tile matrix is row/column zero.
///
/// Each variant carries a horizontal and a vertical parity bit: the
/// horizontal bit is 1 when column zero is on the right, the vertical bit is
/// 1 when row zero is at the top.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TileOrigin {
	UpperLeft,
	LowerLeft,
	UpperRight,
	LowerRight,
}

impl TileOrigin {
	/// 0 if column zero is on the left side of the matrix, 1 if on the right.
	pub fn horizontal(self) -> u32 {
		match self {
			TileOrigin::UpperLeft | TileOrigin::LowerLeft => 0,
			TileOrigin::UpperRight | TileOrigin::LowerRight => 1,
		}
	}

	/// 0 if row zero is at the bottom of the matrix, 1 if at the top.
	pub fn vertical(self) -> u32 {
		match self {
			TileOrigin::LowerLeft | TileOrigin::LowerRight => 0,
			TileOrigin::UpperLeft | TileOrigin::UpperRight => 1,
		}
	}

	/// Transforms a tile coordinate expressed in this origin convention into
	/// the equivalent coordinate in the `to` convention.
	///
	/// For each axis independently, with `max = dimension - 1`, the
	/// coordinate is mirrored when the two parity bits differ:
	///
	/// ```text
	/// c' = c + (parity_from ^ parity_to) * (max - 2c)
	/// ```
	///
	/// Transforming to the same origin is always the identity, and applying
	/// the inverse transform (swapped origin pair) restores the input.
	///
	/// The coordinate must lie inside the matrix (each axis below its
	/// dimension); mirroring an out-of-range coordinate wraps.
	pub fn transform(
		self,
		to: TileOrigin,
		coordinate: Coordinate<u32>,
		dimensions: &TileMatrixDimensions,
	) -> Coordinate<u32> {
		Coordinate::new(
			self.transform_horizontal(to, coordinate.x, dimensions.width()),
			self.transform_vertical(to, coordinate.y, dimensions.height()),
		)
	}

	/// Transforms a column index between origin conventions. The column must
	/// be below `matrix_width`.
	pub fn transform_horizontal(self, to: TileOrigin, column: u32, matrix_width: u32) -> u32 {
		transform_axis(self.horizontal(), to.horizontal(), column, matrix_width)
	}

	/// Transforms a row index between origin conventions. The row must be
	/// below `matrix_height`.
	pub fn transform_vertical(self, to: TileOrigin, row: u32, matrix_height: u32) -> u32 {
		transform_axis(self.vertical(), to.vertical(), row, matrix_height)
	}
}

fn transform_axis(from_parity: u32, to_parity: u32, coordinate: u32, dimension: u32) -> u32 {
	let max = i64::from(dimension) - 1;
	let c = i64::from(coordinate);
	(c + i64::from(from_parity ^ to_parity) * (max - 2 * c)) as u32
}
