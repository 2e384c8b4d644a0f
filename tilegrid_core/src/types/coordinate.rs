//! Immutable 2D coordinates, with and without an attached coordinate
//! reference system.

use super::CoordinateReferenceSystem;
use std::fmt;

/// An immutable (x, y) pair over any numeric type.
///
/// Equality and hashing are structural, so the type works both as a tile
/// address (`Coordinate<u32>`) and as a position in CRS units
/// (`Coordinate<f64>`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate<T> {
	pub x: T,
	pub y: T,
}

impl<T> Coordinate<T> {
	pub const fn new(x: T, y: T) -> Coordinate<T> {
		Coordinate { x, y }
	}
}

impl<T: fmt::Debug> fmt::Debug for Coordinate<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "({:?}, {:?})", self.x, self.y)
	}
}

impl<T: fmt::Display> fmt::Display for Coordinate<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "({}, {})", self.x, self.y)
	}
}

/// A position in the units of a specific coordinate reference system.
///
/// A [`CrsCoordinate`] is what callers hand to a tile store when addressing
/// tiles geographically; the attached CRS lets the store reject coordinates
/// expressed in the wrong reference system instead of silently mis-tiling
/// them.
#[derive(Clone, PartialEq, Debug)]
pub struct CrsCoordinate {
	position: Coordinate<f64>,
	crs: CoordinateReferenceSystem,
}

impl CrsCoordinate {
	pub fn new(x: f64, y: f64, crs: CoordinateReferenceSystem) -> CrsCoordinate {
		CrsCoordinate {
			position: Coordinate::new(x, y),
			crs,
		}
	}

	pub fn x(&self) -> f64 {
		self.position.x
	}

	pub fn y(&self) -> f64 {
		self.position.y
	}

	/// The bare position, without the CRS tag.
	pub fn position(&self) -> &Coordinate<f64> {
		&self.position
	}

	pub fn crs(&self) -> &CoordinateReferenceSystem {
		&self.crs
	}
}

impl fmt::Display for CrsCoordinate {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} [{}]", self.position, self.crs)
	}
}
