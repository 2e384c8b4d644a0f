//! A thin wrapper around `Vec<u8>` for encoded tile payloads.
//!
//! Tile stores shuttle opaque encoded image bytes around; wrapping them in
//! [`Blob`] keeps function signatures honest about what is raw payload and
//! gives `Debug` output that does not dump megabytes of pixels.

use std::fmt::Debug;

/// A simple wrapper around `Vec<u8>` for encoded tile data.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the underlying bytes as a slice.
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the `Blob`, returning the underlying `Vec<u8>`.
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the length in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(vec: Vec<u8>) -> Blob {
		Blob(vec)
	}
}

impl From<&[u8]> for Blob {
	fn from(slice: &[u8]) -> Blob {
		Blob(slice.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(slice: &[u8; N]) -> Blob {
		Blob(slice.to_vec())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Blob({} bytes)", self.0.len())
	}
}
