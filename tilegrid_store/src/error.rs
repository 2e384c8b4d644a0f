//! Typed store errors.
//!
//! "Tile absent" is not an error: lookups return `Ok(None)` for addresses
//! that were never written. Everything else falls into one of the kinds
//! below, with the underlying cause preserved.

use std::path::Path;
use thiserror::Error;

pub type StoreResult<T> = Result<T, TileStoreError>;

/// The error kinds a tile store can report.
#[derive(Debug, Error)]
pub enum TileStoreError {
	/// A required argument was absent or out of range (zoom level outside the
	/// scheme, malformed matrix dimensions, mismatched CRS). Raised
	/// synchronously, never deferred.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// An underlying file or stream failure, wrapped with the path or
	/// operation it occurred on.
	#[error("tile store I/O failure: {context}")]
	Io {
		context: String,
		#[source]
		source: std::io::Error,
	},

	/// Stored bytes that cannot be what they claim to be: an index slot
	/// pointing past the data file, a magic-number mismatch, a truncated
	/// record, or image bytes that fail to decode. Distinct from "tile
	/// absent".
	#[error("corrupt tile data: {0}")]
	Corrupt(String),

	/// An image encode or decode failure.
	#[error("image coding failure: {context}")]
	Image {
		context: String,
		#[source]
		source: image::ImageError,
	},
}

impl TileStoreError {
	pub fn invalid(message: impl ToString) -> TileStoreError {
		TileStoreError::InvalidArgument(message.to_string())
	}

	pub fn corrupt(message: impl ToString) -> TileStoreError {
		TileStoreError::Corrupt(message.to_string())
	}

	pub fn io(context: impl Into<String>, source: std::io::Error) -> TileStoreError {
		TileStoreError::Io {
			context: context.into(),
			source,
		}
	}

	/// An I/O failure while operating on `path`.
	pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> TileStoreError {
		TileStoreError::Io {
			context: format!("{action} {}", path.display()),
			source,
		}
	}

	pub fn image(context: impl Into<String>, source: image::ImageError) -> TileStoreError {
		TileStoreError::Image {
			context: context.into(),
			source,
		}
	}

	pub fn is_corrupt(&self) -> bool {
		matches!(self, TileStoreError::Corrupt(_))
	}

	pub fn is_invalid_argument(&self) -> bool {
		matches!(self, TileStoreError::InvalidArgument(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_are_distinguishable() {
		assert!(TileStoreError::corrupt("magic mismatch").is_corrupt());
		assert!(!TileStoreError::invalid("zoom").is_corrupt());
		assert!(TileStoreError::invalid("zoom").is_invalid_argument());
	}

	#[test]
	fn io_errors_preserve_their_cause() {
		let cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
		let error = TileStoreError::io_at("opening", Path::new("/tmp/cluster.index"), cause);
		assert!(error.to_string().contains("/tmp/cluster.index"));
		assert!(std::error::Error::source(&error).is_some());
	}
}
