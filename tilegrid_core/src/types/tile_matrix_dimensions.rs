use anyhow::{Result, ensure};
use std::fmt;

/// The column/row extent of one zoom level's tile grid.
///
/// Both dimensions must be positive. `contains` is a half-open range test:
/// valid columns are `0..width` and valid rows are `0..height`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileMatrixDimensions {
	width: u32,
	height: u32,
}

impl TileMatrixDimensions {
	/// # Errors
	/// Returns an error if either dimension is zero.
	pub fn new(width: u32, height: u32) -> Result<TileMatrixDimensions> {
		ensure!(width > 0, "matrix width must be greater than 0");
		ensure!(height > 0, "matrix height must be greater than 0");
		Ok(TileMatrixDimensions { width, height })
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// True if (column, row) addresses a tile inside this matrix.
	pub fn contains(&self, column: u32, row: u32) -> bool {
		column < self.width && row < self.height
	}
}

impl fmt::Debug for TileMatrixDimensions {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_dimensions_are_rejected() {
		assert!(TileMatrixDimensions::new(0, 1).is_err());
		assert!(TileMatrixDimensions::new(1, 0).is_err());
		assert!(TileMatrixDimensions::new(1, 1).is_ok());
	}

	#[test]
	fn contains_is_half_open() {
		let dims = TileMatrixDimensions::new(4, 2).unwrap();
		assert!(dims.contains(0, 0));
		assert!(dims.contains(3, 1));
		assert!(!dims.contains(4, 0));
		assert!(!dims.contains(0, 2));
	}
}
