use anyhow::{Result, ensure};
use std::fmt;

/// An authority + code pair identifying a coordinate reference system,
/// e.g. `EPSG:3857`.
///
/// The authority is case-normalized at construction, so `"epsg"` and
/// `"EPSG"` compare equal and hash identically.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CoordinateReferenceSystem {
	authority: String,
	code: i32,
}

impl CoordinateReferenceSystem {
	/// # Errors
	/// Returns an error if `authority` is empty.
	pub fn new(authority: &str, code: i32) -> Result<CoordinateReferenceSystem> {
		ensure!(!authority.trim().is_empty(), "authority may not be empty");
		Ok(CoordinateReferenceSystem {
			authority: authority.trim().to_uppercase(),
			code,
		})
	}

	pub fn authority(&self) -> &str {
		&self.authority
	}

	pub fn code(&self) -> i32 {
		self.code
	}
}

impl fmt::Display for CoordinateReferenceSystem {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}:{}", self.authority, self.code)
	}
}
