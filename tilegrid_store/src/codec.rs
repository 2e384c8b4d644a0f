//! A thin image codec over the `image` crate: the bridge between a store's
//! raw encoded bytes and decoded rasters.

use crate::{StoreResult, TileStoreError};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use tilegrid_core::Blob;

/// The image encodings tile stores understand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TileImageFormat {
	Png,
	Jpeg,
}

impl TileImageFormat {
	/// The canonical file extension, without the dot.
	pub fn extension(self) -> &'static str {
		match self {
			TileImageFormat::Png => "png",
			TileImageFormat::Jpeg => "jpg",
		}
	}

	/// Parses a file extension (case-insensitive, no dot).
	pub fn from_extension(extension: &str) -> Option<TileImageFormat> {
		match extension.to_ascii_lowercase().as_str() {
			"png" => Some(TileImageFormat::Png),
			"jpg" | "jpeg" => Some(TileImageFormat::Jpeg),
			_ => None,
		}
	}

	/// Sniffs the format from encoded bytes.
	pub fn from_blob(blob: &Blob) -> Option<TileImageFormat> {
		match image::guess_format(blob.as_slice()) {
			Ok(ImageFormat::Png) => Some(TileImageFormat::Png),
			Ok(ImageFormat::Jpeg) => Some(TileImageFormat::Jpeg),
			_ => None,
		}
	}

	fn as_image_format(self) -> ImageFormat {
		match self {
			TileImageFormat::Png => ImageFormat::Png,
			TileImageFormat::Jpeg => ImageFormat::Jpeg,
		}
	}
}

/// Decodes encoded tile bytes into a raster.
///
/// Undecodable bytes are reported as [`TileStoreError::Corrupt`]: stored tile
/// data that no longer parses is a store integrity problem, not a codec
/// detail.
pub fn decode(blob: &Blob) -> StoreResult<DynamicImage> {
	ImageReader::new(Cursor::new(blob.as_slice()))
		.with_guessed_format()
		.map_err(|e| TileStoreError::io("sniffing image format", e))?
		.decode()
		.map_err(|e| TileStoreError::corrupt(format!("tile image bytes failed to decode: {e}")))
}

/// Encodes a raster with the given format.
pub fn encode(image: &DynamicImage, format: TileImageFormat) -> StoreResult<Blob> {
	let mut bytes = Cursor::new(Vec::new());
	match format {
		// JPEG has no alpha channel
		TileImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8())
			.write_to(&mut bytes, format.as_image_format())
			.map_err(|e| TileStoreError::image("encoding tile as JPEG", e))?,
		TileImageFormat::Png => image
			.write_to(&mut bytes, format.as_image_format())
			.map_err(|e| TileStoreError::image("encoding tile as PNG", e))?,
	}
	Ok(Blob::from(bytes.into_inner()))
}

/// Reads the pixel dimensions of encoded tile bytes without a full decode.
pub fn measure(blob: &Blob) -> StoreResult<(u32, u32)> {
	ImageReader::new(Cursor::new(blob.as_slice()))
		.with_guessed_format()
		.map_err(|e| TileStoreError::io("sniffing image format", e))?
		.into_dimensions()
		.map_err(|e| TileStoreError::corrupt(format!("tile image bytes failed to parse: {e}")))
}
