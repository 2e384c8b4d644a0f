use std::fmt;

/// A width/height pair, used both for pixel sizes of tile images and for the
/// CRS-unit extent of a single tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions<T> {
	pub width: T,
	pub height: T,
}

impl<T> Dimensions<T> {
	pub const fn new(width: T, height: T) -> Dimensions<T> {
		Dimensions { width, height }
	}
}

impl<T: fmt::Debug> fmt::Debug for Dimensions<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{:?}x{:?}", self.width, self.height)
	}
}
