use super::{DIRECTORY_ORIGIN, tile_path};
use crate::{StoreResult, TileHandle, TileImageFormat, TileStoreError, TileStoreReader, TileStream, addressing, codec};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tilegrid_core::{
	Blob, BoundingBox, CoordinateReferenceSystem, CrsCoordinate, Dimensions, TileOrigin,
	profile::{self, CrsProfile},
	scheme::{MAX_ZOOM_LEVEL, TileScheme, ZoomTimesTwo},
};

/// One discovered tile file.
struct TileEntry {
	column: u32,
	row: u32,
	zoom_level: u8,
	path: PathBuf,
}

/// Reads tiles from a one-file-per-tile directory tree.
pub struct DirectoryTileReader {
	name: String,
	root: PathBuf,
	profile: Box<dyn CrsProfile>,
	scheme: ZoomTimesTwo,
}

impl DirectoryTileReader {
	/// Opens the tile tree rooted at `root`.
	///
	/// # Errors
	/// Fails if `root` is not a directory or no profile is registered for
	/// `crs`.
	pub fn open(root: &Path, crs: &CoordinateReferenceSystem) -> StoreResult<DirectoryTileReader> {
		if !root.is_dir() {
			return Err(TileStoreError::invalid(format!(
				"tile tree root {} is not a directory",
				root.display()
			)));
		}
		let profile =
			profile::from_crs(crs).ok_or_else(|| TileStoreError::invalid(format!("no profile registered for {crs}")))?;
		let scheme = ZoomTimesTwo::web(MAX_ZOOM_LEVEL).map_err(TileStoreError::invalid)?;
		let name = root
			.file_name()
			.and_then(|name| name.to_str())
			.unwrap_or("tile tree")
			.to_string();

		debug!("opened tile tree at {}", root.display());
		Ok(DirectoryTileReader {
			name,
			root: root.to_path_buf(),
			profile,
			scheme,
		})
	}

	/// Lists the numerically-named entries directly under `directory`, as
	/// (number, path) pairs in ascending order. Anything non-numeric is
	/// skipped.
	fn numeric_entries(directory: &Path) -> StoreResult<Vec<(u32, PathBuf)>> {
		let entries =
			std::fs::read_dir(directory).map_err(|e| TileStoreError::io_at("listing tile tree", directory, e))?;
		let mut found = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|e| TileStoreError::io_at("listing tile tree", directory, e))?;
			let path = entry.path();
			let stem = path.file_stem().and_then(|stem| stem.to_str());
			if let Some(number) = stem.and_then(|stem| stem.parse::<u32>().ok()) {
				found.push((number, path));
			}
		}
		Ok(found.into_iter().sorted_by_key(|(number, _)| *number).collect())
	}

	/// Walks the whole tree (or one zoom level of it), collecting every tile
	/// file with a recognized image extension.
	fn list_tiles(&self, zoom_filter: Option<u8>) -> StoreResult<Vec<TileEntry>> {
		let mut tiles = Vec::new();
		for (zoom_level, zoom_path) in Self::numeric_entries(&self.root)? {
			// a stray file like `5.png` at the root also has a numeric stem
			if !zoom_path.is_dir() {
				continue;
			}
			let Ok(zoom_level) = u8::try_from(zoom_level) else {
				continue;
			};
			if zoom_level > MAX_ZOOM_LEVEL || zoom_filter.is_some_and(|filter| filter != zoom_level) {
				continue;
			}
			for (column, column_path) in Self::numeric_entries(&zoom_path)? {
				if !column_path.is_dir() {
					continue;
				}
				for (row, path) in Self::numeric_entries(&column_path)? {
					let extension = path.extension().and_then(|extension| extension.to_str());
					if extension.and_then(TileImageFormat::from_extension).is_some() {
						tiles.push(TileEntry {
							column,
							row,
							zoom_level,
							path,
						});
					}
				}
			}
		}
		Ok(tiles)
	}

	fn read_handle(&self, entry: &TileEntry) -> StoreResult<TileHandle> {
		let data = std::fs::read(&entry.path).map_err(|e| TileStoreError::io_at("reading tile file", &entry.path, e))?;
		let bounds = addressing::tile_bounds(
			self.profile.as_ref(),
			&self.scheme,
			DIRECTORY_ORIGIN,
			entry.column,
			entry.row,
			entry.zoom_level,
		)?;
		Ok(TileHandle::new(
			entry.column,
			entry.row,
			entry.zoom_level,
			bounds,
			Blob::from(data),
		))
	}

	/// Walks the tree eagerly for addresses, reading payloads lazily as the
	/// stream is advanced.
	fn stream_filtered(&self, zoom_filter: Option<u8>) -> StoreResult<TileStream<'_>> {
		if let Some(zoom_level) = zoom_filter {
			addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		}
		let tiles = self.list_tiles(zoom_filter)?;
		Ok(TileStream::new(
			tiles.into_iter().map(move |entry| self.read_handle(&entry)),
		))
	}

	fn first_tile(&self) -> StoreResult<Option<TileEntry>> {
		Ok(self.list_tiles(None)?.into_iter().next())
	}
}

impl TileStoreReader for DirectoryTileReader {
	fn name(&self) -> &str {
		&self.name
	}

	/// Directory stores always tile the full world extent of their profile.
	fn bounds(&self) -> StoreResult<BoundingBox> {
		Ok(self.profile.bounds())
	}

	fn count_tiles(&self) -> StoreResult<u64> {
		Ok(self.list_tiles(None)?.len() as u64)
	}

	fn byte_size(&self) -> StoreResult<u64> {
		let mut total = 0u64;
		for entry in self.list_tiles(None)? {
			total += std::fs::metadata(&entry.path)
				.map_err(|e| TileStoreError::io_at("inspecting tile file", &entry.path, e))?
				.len();
		}
		Ok(total)
	}

	fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>> {
		Ok(self.list_tiles(None)?.iter().map(|entry| entry.zoom_level).collect())
	}

	fn get_tile_data(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<Option<Blob>> {
		let dimensions = addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		if !dimensions.contains(column, row) {
			return Err(TileStoreError::invalid(format!(
				"tile ({column}, {row}) is outside the {dimensions:?} matrix at zoom level {zoom_level}"
			)));
		}

		for format in [TileImageFormat::Png, TileImageFormat::Jpeg] {
			let path = tile_path(&self.root, column, row, zoom_level, format);
			match std::fs::read(&path) {
				Ok(data) => return Ok(Some(Blob::from(data))),
				Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
				Err(e) => return Err(TileStoreError::io_at("reading tile file", &path, e)),
			}
		}
		Ok(None)
	}

	fn get_tile_data_at(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Option<Blob>> {
		let address = addressing::crs_to_tile(
			self.profile.as_ref(),
			&self.scheme,
			DIRECTORY_ORIGIN,
			coordinate,
			zoom_level,
		)?;
		self.get_tile_data(address.x, address.y, zoom_level)
	}

	fn stream(&self) -> StoreResult<TileStream<'_>> {
		self.stream_filtered(None)
	}

	fn stream_zoom(&self, zoom_level: u8) -> StoreResult<TileStream<'_>> {
		self.stream_filtered(Some(zoom_level))
	}

	fn image_format(&self) -> StoreResult<Option<TileImageFormat>> {
		Ok(self.first_tile()?.and_then(|entry| {
			entry
				.path
				.extension()
				.and_then(|extension| extension.to_str())
				.and_then(TileImageFormat::from_extension)
		}))
	}

	fn image_dimensions(&self) -> StoreResult<Option<Dimensions<u32>>> {
		match self.first_tile()? {
			None => Ok(None),
			Some(entry) => {
				let data = self.read_handle(&entry)?.into_data();
				let (width, height) = codec::measure(&data)?;
				Ok(Some(Dimensions::new(width, height)))
			}
		}
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
		// no handles are held between calls, so there is nothing to release
		Ok(())
	}
}
