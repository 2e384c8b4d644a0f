//! An axis-aligned rectangle in CRS units.

use super::Coordinate;
use anyhow::{Result, ensure};
use std::fmt;

/// An axis-aligned bounding box defined by its minimum and maximum x and y
/// values.
///
/// The constructor enforces `min_x <= max_x` and `min_y <= max_y`; a
/// degenerate (zero width or height) box is allowed.
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
	min_x: f64,
	min_y: f64,
	max_x: f64,
	max_y: f64,
}

impl BoundingBox {
	/// # Errors
	/// Returns an error if a minimum exceeds its maximum or any value is not
	/// finite.
	pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<BoundingBox> {
		ensure!(
			min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite(),
			"bounding box values must be finite"
		);
		ensure!(min_x <= max_x, "min_x ({min_x}) must be <= max_x ({max_x})");
		ensure!(min_y <= max_y, "min_y ({min_y}) must be <= max_y ({max_y})");
		Ok(BoundingBox {
			min_x,
			min_y,
			max_x,
			max_y,
		})
	}

	pub fn min_x(&self) -> f64 {
		self.min_x
	}

	pub fn min_y(&self) -> f64 {
		self.min_y
	}

	pub fn max_x(&self) -> f64 {
		self.max_x
	}

	pub fn max_y(&self) -> f64 {
		self.max_y
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn bottom_left(&self) -> Coordinate<f64> {
		Coordinate::new(self.min_x, self.min_y)
	}

	pub fn bottom_right(&self) -> Coordinate<f64> {
		Coordinate::new(self.max_x, self.min_y)
	}

	pub fn top_left(&self) -> Coordinate<f64> {
		Coordinate::new(self.min_x, self.max_y)
	}

	pub fn top_right(&self) -> Coordinate<f64> {
		Coordinate::new(self.max_x, self.max_y)
	}

	/// True if the coordinate lies within the box or on any of its edges.
	///
	/// For the origin-aware test that treats the far edges as exclusive, see
	/// [`crate::profile::bounds::contains`].
	pub fn contains(&self, coordinate: &Coordinate<f64>) -> bool {
		coordinate.x >= self.min_x && coordinate.x <= self.max_x && coordinate.y >= self.min_y && coordinate.y <= self.max_y
	}

	/// Grows this box to cover `other` as well.
	pub fn extend(&mut self, other: &BoundingBox) {
		self.min_x = self.min_x.min(other.min_x);
		self.min_y = self.min_y.min(other.min_y);
		self.max_x = self.max_x.max(other.max_x);
		self.max_y = self.max_y.max(other.max_y);
	}
}

impl fmt::Debug for BoundingBox {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"BoundingBox[{}, {}, {}, {}]",
			self.min_x, self.min_y, self.max_x, self.max_y
		)
	}
}
