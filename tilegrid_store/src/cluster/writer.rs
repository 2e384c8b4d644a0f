use super::{CLUSTER_MAGIC, CLUSTER_ORIGIN, ClusterAddress, ClusterLayout, INDEX_SLOT_SIZE};
use crate::{StoreResult, TileImageFormat, TileStoreError, TileStoreWriter, addressing};
use byteorder::{BigEndian, WriteBytesExt};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use tilegrid_core::{
	Blob, BoundingBox, Coordinate, CoordinateReferenceSystem, CrsCoordinate, TileOrigin,
	profile::{self, CrsProfile},
	scheme::{TileScheme, ZoomTimesTwo},
};

const SUPPORTED_FORMATS: &[TileImageFormat] = &[TileImageFormat::Png, TileImageFormat::Jpeg];

/// Writes tiles into a cluster store rooted at one directory, creating the
/// cluster file pairs on demand.
///
/// Writing the same tile address twice appends a fresh record and repoints
/// the index slot at it; the superseded record stays in the data file as dead
/// bytes. A record append is flushed before its index slot is written, so an
/// interrupted write can leak dangling appended bytes but never leaves the
/// index pointing at an incomplete record.
pub struct ClusterTileWriter {
	layout: ClusterLayout,
	profile: Box<dyn CrsProfile>,
	scheme: ZoomTimesTwo,
	image_format: TileImageFormat,
}

impl ClusterTileWriter {
	/// Opens (or starts) the cluster store for tile set `set_name` under
	/// `root`, creating the root directory if needed.
	///
	/// # Errors
	/// Fails if the root cannot be created, if the layout parameters are out
	/// of range, or if no profile is registered for `crs`.
	pub fn open(
		root: &std::path::Path,
		set_name: &str,
		levels: u8,
		break_point: u8,
		crs: &CoordinateReferenceSystem,
		image_format: TileImageFormat,
	) -> StoreResult<ClusterTileWriter> {
		std::fs::create_dir_all(root).map_err(|e| TileStoreError::io_at("creating cluster store root", root, e))?;
		let layout = ClusterLayout::new(root, set_name, levels, break_point)?;
		let profile =
			profile::from_crs(crs).ok_or_else(|| TileStoreError::invalid(format!("no profile registered for {crs}")))?;
		let scheme = ZoomTimesTwo::new(1, levels, 2, 2).map_err(TileStoreError::invalid)?;

		debug!("opened cluster store {:?} for writing at {}", set_name, root.display());
		Ok(ClusterTileWriter {
			layout,
			profile,
			scheme,
			image_format,
		})
	}

	/// Opens the cluster's index file, creating it at full size with every
	/// slot marked "no tile" (all bytes 0xff) if it does not exist yet.
	fn open_index(&self, address: &ClusterAddress) -> StoreResult<File> {
		let path = self.layout.index_path(address);
		match OpenOptions::new().write(true).open(&path) {
			Ok(file) => return Ok(file),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => return Err(TileStoreError::io_at("opening index file", &path, e)),
		}

		let mut file = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&path)
			.map_err(|e| TileStoreError::io_at("creating index file", &path, e))?;

		let mut remaining = address.slot_count() * INDEX_SLOT_SIZE;
		let chunk = vec![0xffu8; 64 * 1024];
		while remaining > 0 {
			let step = remaining.min(chunk.len() as u64) as usize;
			file
				.write_all(&chunk[..step])
				.map_err(|e| TileStoreError::io_at("initializing index file", &path, e))?;
			remaining -= step as u64;
		}
		file
			.flush()
			.map_err(|e| TileStoreError::io_at("initializing index file", &path, e))?;
		debug!("created index file {}", path.display());
		Ok(file)
	}

	/// Appends a tile record to the cluster's data file and returns the
	/// offset it starts at. The record is flushed before returning.
	fn append_record(&self, address: &ClusterAddress, column: u32, row: u32, data: &Blob) -> StoreResult<u64> {
		let path = self.layout.data_path(address);
		let mut file = OpenOptions::new()
			.append(true)
			.create(true)
			.open(&path)
			.map_err(|e| TileStoreError::io_at("opening data file", &path, e))?;
		let offset = file
			.seek(SeekFrom::End(0))
			.map_err(|e| TileStoreError::io_at("seeking data file", &path, e))?;

		let io = |e| TileStoreError::io_at("appending record to", &path, e);
		file.write_u64::<BigEndian>(CLUSTER_MAGIC).map_err(io)?;
		file.write_u64::<BigEndian>(CLUSTER_MAGIC).map_err(io)?;
		file.write_u64::<BigEndian>(u64::from(column)).map_err(io)?;
		file.write_u64::<BigEndian>(u64::from(row)).map_err(io)?;
		file.write_u32::<BigEndian>(data.len() as u32).map_err(io)?;
		file.write_all(data.as_slice()).map_err(io)?;
		file.flush().map_err(io)?;

		Ok(offset)
	}
}

impl TileStoreWriter for ClusterTileWriter {
	fn crs_to_tile_coordinate(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Coordinate<u32>> {
		addressing::crs_to_tile(self.profile.as_ref(), &self.scheme, CLUSTER_ORIGIN, coordinate, zoom_level)
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
			CLUSTER_ORIGIN,
			column,
			row,
			zoom_level,
			corner,
		)
	}

	fn tile_bounding_box(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<BoundingBox> {
		addressing::tile_bounds(self.profile.as_ref(), &self.scheme, CLUSTER_ORIGIN, column, row, zoom_level)
	}

	fn add_tile_data(&mut self, column: u32, row: u32, zoom_level: u8, data: &Blob) -> StoreResult<()> {
		let dimensions = addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		if !dimensions.contains(column, row) {
			return Err(TileStoreError::invalid(format!(
				"tile ({column}, {row}) is outside the {dimensions:?} matrix at zoom level {zoom_level}"
			)));
		}
		if u32::try_from(data.len()).is_err() {
			return Err(TileStoreError::invalid(format!(
				"tile payload of {} bytes exceeds the 32-bit record length",
				data.len()
			)));
		}

		let address = self.layout.cluster_address(column, row, zoom_level)?;

		// append and flush the record first; the slot write makes it visible
		let record_offset = self.append_record(&address, column, row, data)?;

		let index_path = self.layout.index_path(&address);
		let mut index = self.open_index(&address)?;
		index
			.seek(SeekFrom::Start(self.layout.index_offset(&address, column, row, zoom_level)))
			.map_err(|e| TileStoreError::io_at("seeking index file", &index_path, e))?;
		index
			.write_i64::<BigEndian>(record_offset as i64)
			.map_err(|e| TileStoreError::io_at("writing index slot to", &index_path, e))?;
		index
			.flush()
			.map_err(|e| TileStoreError::io_at("writing index slot to", &index_path, e))?;
		Ok(())
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
		CLUSTER_ORIGIN
	}

	fn close(self: Box<Self>) -> StoreResult<()> {
		// every write flushes before returning, so nothing is pending here
		Ok(())
	}
}
