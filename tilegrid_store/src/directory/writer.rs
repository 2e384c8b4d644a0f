use super::{DIRECTORY_ORIGIN, tile_path};
use crate::{StoreResult, TileImageFormat, TileStoreError, TileStoreWriter, addressing};
use log::debug;
use std::path::{Path, PathBuf};
use tilegrid_core::{
	Blob, BoundingBox, Coordinate, CoordinateReferenceSystem, CrsCoordinate, TileOrigin,
	profile::{self, CrsProfile},
	scheme::{MAX_ZOOM_LEVEL, TileScheme, ZoomTimesTwo},
};

const SUPPORTED_FORMATS: &[TileImageFormat] = &[TileImageFormat::Png, TileImageFormat::Jpeg];

/// Writes tiles into a one-file-per-tile directory tree, creating zoom and
/// column directories on demand.
///
/// Writing the same tile address twice replaces the file. The extension is
/// chosen by sniffing the payload bytes, falling back to the writer's
/// configured format, so a pre-encoded PNG dropped into a JPEG store keeps
/// its real extension.
pub struct DirectoryTileWriter {
	root: PathBuf,
	profile: Box<dyn CrsProfile>,
	scheme: ZoomTimesTwo,
	image_format: TileImageFormat,
}

impl DirectoryTileWriter {
	/// Opens (or starts) the tile tree rooted at `root`, creating the root
	/// directory if needed.
	///
	/// # Errors
	/// Fails if the root cannot be created or no profile is registered for
	/// `crs`.
	pub fn open(
		root: &Path,
		crs: &CoordinateReferenceSystem,
		image_format: TileImageFormat,
	) -> StoreResult<DirectoryTileWriter> {
		std::fs::create_dir_all(root).map_err(|e| TileStoreError::io_at("creating tile tree root", root, e))?;
		let profile =
			profile::from_crs(crs).ok_or_else(|| TileStoreError::invalid(format!("no profile registered for {crs}")))?;
		let scheme = ZoomTimesTwo::web(MAX_ZOOM_LEVEL).map_err(TileStoreError::invalid)?;

		debug!("opened tile tree for writing at {}", root.display());
		Ok(DirectoryTileWriter {
			root: root.to_path_buf(),
			profile,
			scheme,
			image_format,
		})
	}
}

impl TileStoreWriter for DirectoryTileWriter {
	fn crs_to_tile_coordinate(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Coordinate<u32>> {
		addressing::crs_to_tile(self.profile.as_ref(), &self.scheme, DIRECTORY_ORIGIN, coordinate, zoom_level)
	}

	fn tile_to_crs_coordinate(
		&self,
		column: u32,
		row: u32,
		zoom_level: u8,
		corner: TileOrigin,
	) -> StoreResult<CrsCoordinate> {
		addressing::tile_to_crs(
			self.profile.as_ref(),
			&self.scheme,
			DIRECTORY_ORIGIN,
			column,
			row,
			zoom_level,
			corner,
		)
	}

	fn tile_bounding_box(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<BoundingBox> {
		addressing::tile_bounds(self.profile.as_ref(), &self.scheme, DIRECTORY_ORIGIN, column, row, zoom_level)
	}

	fn add_tile_data(&mut self, column: u32, row: u32, zoom_level: u8, data: &Blob) -> StoreResult<()> {
		let dimensions = addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		if !dimensions.contains(column, row) {
			return Err(TileStoreError::invalid(format!(
				"tile ({column}, {row}) is outside the {dimensions:?} matrix at zoom level {zoom_level}"
			)));
		}

		let format = TileImageFormat::from_blob(data).unwrap_or(self.image_format);
		let path = tile_path(&self.root, column, row, zoom_level, format);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).map_err(|e| TileStoreError::io_at("creating tile directory", parent, e))?;
		}
		std::fs::write(&path, data.as_slice()).map_err(|e| TileStoreError::io_at("writing tile file", &path, e))
	}

	fn image_format(&self) -> TileImageFormat {
		self.image_format
	}

	fn supported_formats(&self) -> &[TileImageFormat] {
		SUPPORTED_FORMATS
	}

	fn crs(&self) -> &CoordinateReferenceSystem {
		self.profile.crs()
	}

	fn tile_scheme(&self) -> &dyn TileScheme {
		&self.scheme
	}

	fn tile_origin(&self) -> TileOrigin {
		DIRECTORY_ORIGIN
	}

	fn close(self: Box<Self>) -> StoreResult<()> {
		// every write lands on disk before returning, so nothing is pending
		Ok(())
	}
}
