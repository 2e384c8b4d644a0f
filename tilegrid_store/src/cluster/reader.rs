use super::{CLUSTER_MAGIC, CLUSTER_ORIGIN, ClusterAddress, ClusterLayout, INDEX_SLOT_SIZE, NO_TILE, RECORD_HEADER_SIZE};
use crate::{StoreResult, TileHandle, TileImageFormat, TileStoreError, TileStoreReader, TileStream, addressing};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use itertools::Itertools;
use log::debug;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tilegrid_core::{
	Blob, BoundingBox, CoordinateReferenceSystem, CrsCoordinate, Dimensions, TileOrigin,
	profile::{self, CrsProfile},
	scheme::{TileScheme, ZoomTimesTwo},
};

/// Reads tiles from a cluster store rooted at one directory.
///
/// Files are opened per operation and released before the call returns, so a
/// reader holds no file handles between calls and many readers can share a
/// store concurrently.
pub struct ClusterTileReader {
	layout: ClusterLayout,
	profile: Box<dyn CrsProfile>,
	scheme: ZoomTimesTwo,
}

impl ClusterTileReader {
	/// Opens the cluster store for tile set `set_name` under `root`.
	///
	/// The layout parameters (`levels`, `break_point`) and the CRS are not
	/// recorded in the store itself and must match the values it was written
	/// with.
	///
	/// # Errors
	/// Fails if `root` is not a directory, if the layout parameters are out
	/// of range, or if no profile is registered for `crs`.
	pub fn open(
		root: &Path,
		set_name: &str,
		levels: u8,
		break_point: u8,
		crs: &CoordinateReferenceSystem,
	) -> StoreResult<ClusterTileReader> {
		if !root.is_dir() {
			return Err(TileStoreError::invalid(format!(
				"cluster store root {} is not a directory",
				root.display()
			)));
		}
		let layout = ClusterLayout::new(root, set_name, levels, break_point)?;
		let profile =
			profile::from_crs(crs).ok_or_else(|| TileStoreError::invalid(format!("no profile registered for {crs}")))?;
		// cluster stores start at zoom 1, where the doubling pyramid is 2x2
		let scheme = ZoomTimesTwo::new(1, levels, 2, 2).map_err(TileStoreError::invalid)?;

		debug!("opened cluster store {:?} at {}", set_name, root.display());
		Ok(ClusterTileReader { layout, profile, scheme })
	}

	/// All cluster addresses present on disk for this tile set, in file name
	/// order.
	fn cluster_addresses(&self) -> StoreResult<Vec<ClusterAddress>> {
		let entries = std::fs::read_dir(self.layout.root())
			.map_err(|e| TileStoreError::io_at("listing cluster store root", self.layout.root(), e))?;

		let mut names = Vec::new();
		for entry in entries {
			let entry = entry.map_err(|e| TileStoreError::io_at("listing cluster store root", self.layout.root(), e))?;
			if let Some(name) = entry.file_name().to_str() {
				names.push(name.to_string());
			}
		}

		Ok(
			names
				.into_iter()
				.sorted()
				.filter_map(|name| self.layout.parse_index_file_name(&name))
				.collect(),
		)
	}

	/// Reads every index slot of one cluster.
	fn read_index(&self, address: &ClusterAddress) -> StoreResult<Vec<i64>> {
		let path = self.layout.index_path(address);
		let bytes = std::fs::read(&path).map_err(|e| TileStoreError::io_at("reading index file", &path, e))?;
		let expected = address.slot_count() * INDEX_SLOT_SIZE;
		if bytes.len() as u64 != expected {
			return Err(TileStoreError::corrupt(format!(
				"index file {} is {} bytes, expected {expected}",
				path.display(),
				bytes.len()
			)));
		}
		Ok(
			bytes
				.chunks_exact(INDEX_SLOT_SIZE as usize)
				.map(BigEndian::read_i64)
				.collect(),
		)
	}

	/// Reads the record at `offset` of one cluster's data file and verifies
	/// its self-description against the expected tile address.
	fn read_record(&self, address: &ClusterAddress, offset: i64, column: u32, row: u32) -> StoreResult<Blob> {
		let path = self.layout.data_path(address);
		let mut file = File::open(&path).map_err(|e| TileStoreError::io_at("opening data file", &path, e))?;
		let file_size = file
			.metadata()
			.map_err(|e| TileStoreError::io_at("inspecting data file", &path, e))?
			.len();

		let offset = u64::try_from(offset)
			.map_err(|_| corrupt_at(&path, format!("negative record offset {offset} for tile ({column}, {row})")))?;
		if offset + RECORD_HEADER_SIZE > file_size {
			return Err(corrupt_at(
				&path,
				format!("record offset {offset} leaves no room for a record header (file is {file_size} bytes)"),
			));
		}

		file
			.seek(SeekFrom::Start(offset))
			.map_err(|e| TileStoreError::io_at("seeking data file", &path, e))?;

		for _ in 0..2 {
			let magic = file
				.read_u64::<BigEndian>()
				.map_err(|e| TileStoreError::io_at("reading record header from", &path, e))?;
			if magic != CLUSTER_MAGIC {
				return Err(corrupt_at(
					&path,
					format!("bad magic number {magic:#x} at offset {offset}, expected {CLUSTER_MAGIC:#x}"),
				));
			}
		}

		let stored_column = file
			.read_u64::<BigEndian>()
			.map_err(|e| TileStoreError::io_at("reading record header from", &path, e))?;
		let stored_row = file
			.read_u64::<BigEndian>()
			.map_err(|e| TileStoreError::io_at("reading record header from", &path, e))?;
		if stored_column != u64::from(column) || stored_row != u64::from(row) {
			return Err(corrupt_at(
				&path,
				format!("record at offset {offset} describes tile ({stored_column}, {stored_row}), expected ({column}, {row})"),
			));
		}

		let length = file
			.read_u32::<BigEndian>()
			.map_err(|e| TileStoreError::io_at("reading record header from", &path, e))?;
		if offset + RECORD_HEADER_SIZE + u64::from(length) > file_size {
			return Err(corrupt_at(
				&path,
				format!("record at offset {offset} claims {length} payload bytes past the end of the file"),
			));
		}

		let mut payload = vec![0u8; length as usize];
		file
			.read_exact(&mut payload)
			.map_err(|e| TileStoreError::io_at("reading record payload from", &path, e))?;
		Ok(Blob::from(payload))
	}

	fn read_handle(&self, address: &ClusterAddress, offset: i64, column: u32, row: u32, zoom_level: u8) -> StoreResult<TileHandle> {
		let data = self.read_record(address, offset, column, row)?;
		let bounds = addressing::tile_bounds(
			self.profile.as_ref(),
			&self.scheme,
			CLUSTER_ORIGIN,
			column,
			row,
			zoom_level,
		)?;
		Ok(TileHandle::new(column, row, zoom_level, bounds, data))
	}

	fn stream_filtered(&self, zoom_filter: Option<u8>) -> StoreResult<TileStream<'_>> {
		if let Some(zoom_level) = zoom_filter {
			addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		}
		let addresses = self.cluster_addresses()?;
		Ok(TileStream::new(ClusterStream {
			reader: self,
			addresses: addresses.into_iter(),
			current: None,
			zoom_filter,
		}))
	}

	fn first_payload(&self) -> StoreResult<Option<Blob>> {
		match self.stream_filtered(None)?.next() {
			None => Ok(None),
			Some(item) => item.map(|handle| Some(handle.into_data())),
		}
	}
}

fn corrupt_at(path: &Path, message: String) -> TileStoreError {
	TileStoreError::corrupt(format!("{}: {message}", path.display()))
}

impl TileStoreReader for ClusterTileReader {
	fn name(&self) -> &str {
		self.layout.set_name()
	}

	/// Cluster stores always tile the full world extent of their profile.
	fn bounds(&self) -> StoreResult<BoundingBox> {
		Ok(self.profile.bounds())
	}

	fn count_tiles(&self) -> StoreResult<u64> {
		let mut count = 0u64;
		for address in self.cluster_addresses()? {
			count += self
				.read_index(&address)?
				.iter()
				.filter(|&&slot| slot != NO_TILE)
				.count() as u64;
		}
		Ok(count)
	}

	fn byte_size(&self) -> StoreResult<u64> {
		let mut total = 0u64;
		for address in self.cluster_addresses()? {
			for path in [self.layout.index_path(&address), self.layout.data_path(&address)] {
				match std::fs::metadata(&path) {
					Ok(metadata) => total += metadata.len(),
					Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
					Err(e) => return Err(TileStoreError::io_at("inspecting", &path, e)),
				}
			}
		}
		Ok(total)
	}

	fn zoom_levels(&self) -> StoreResult<BTreeSet<u8>> {
		let mut levels = BTreeSet::new();
		for address in self.cluster_addresses()? {
			for (slot, &offset) in self.read_index(&address)?.iter().enumerate() {
				if offset == NO_TILE {
					continue;
				}
				if let Some((_, _, zoom_level)) = self.layout.tile_at_slot(&address, slot as u64) {
					levels.insert(zoom_level);
				}
			}
		}
		Ok(levels)
	}

	fn get_tile_data(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<Option<Blob>> {
		let dimensions = addressing::matrix_dimensions(&self.scheme, zoom_level)?;
		if !dimensions.contains(column, row) {
			return Err(TileStoreError::invalid(format!(
				"tile ({column}, {row}) is outside the {dimensions:?} matrix at zoom level {zoom_level}"
			)));
		}

		let address = self.layout.cluster_address(column, row, zoom_level)?;
		let index_path = self.layout.index_path(&address);
		let mut index = match File::open(&index_path) {
			Ok(file) => file,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(TileStoreError::io_at("opening index file", &index_path, e)),
		};

		let slot_offset = self.layout.index_offset(&address, column, row, zoom_level);
		let index_size = index
			.metadata()
			.map_err(|e| TileStoreError::io_at("inspecting index file", &index_path, e))?
			.len();
		if slot_offset + INDEX_SLOT_SIZE > index_size {
			return Err(corrupt_at(
				&index_path,
				format!("index file is {index_size} bytes, too short for the slot at offset {slot_offset}"),
			));
		}

		index
			.seek(SeekFrom::Start(slot_offset))
			.map_err(|e| TileStoreError::io_at("seeking index file", &index_path, e))?;
		let record_offset = index
			.read_i64::<BigEndian>()
			.map_err(|e| TileStoreError::io_at("reading index slot from", &index_path, e))?;

		if record_offset == NO_TILE {
			return Ok(None);
		}
		self.read_record(&address, record_offset, column, row).map(Some)
	}

	fn get_tile_data_at(&self, coordinate: &CrsCoordinate, zoom_level: u8) -> StoreResult<Option<Blob>> {
		let address = addressing::crs_to_tile(self.profile.as_ref(), &self.scheme, CLUSTER_ORIGIN, coordinate, zoom_level)?;
		self.get_tile_data(address.x, address.y, zoom_level)
	}

	fn stream(&self) -> StoreResult<TileStream<'_>> {
		self.stream_filtered(None)
	}

	fn stream_zoom(&self, zoom_level: u8) -> StoreResult<TileStream<'_>> {
		self.stream_filtered(Some(zoom_level))
	}

	fn image_format(&self) -> StoreResult<Option<TileImageFormat>> {
		Ok(self.first_payload()?.and_then(|data| TileImageFormat::from_blob(&data)))
	}

	fn image_dimensions(&self) -> StoreResult<Option<Dimensions<u32>>> {
		match self.first_payload()? {
			None => Ok(None),
			Some(data) => {
				let (width, height) = crate::codec::measure(&data)?;
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
		CLUSTER_ORIGIN
	}

	fn close(self: Box<Self>) -> StoreResult<()> {
		// no handles are held between calls, so there is nothing to release
		Ok(())
	}
}

/// Walks every occupied index slot of every cluster, loading one cluster
/// index at a time and reading payloads on demand.
struct ClusterStream<'a> {
	reader: &'a ClusterTileReader,
	addresses: std::vec::IntoIter<ClusterAddress>,
	current: Option<(ClusterAddress, Vec<i64>, u64)>,
	zoom_filter: Option<u8>,
}

impl Iterator for ClusterStream<'_> {
	type Item = StoreResult<TileHandle>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some((address, slots, next_slot)) = self.current.as_mut() {
				while *next_slot < slots.len() as u64 {
					let slot = *next_slot;
					*next_slot += 1;

					let offset = slots[slot as usize];
					if offset == NO_TILE {
						continue;
					}
					let Some((column, row, zoom_level)) = self.reader.layout.tile_at_slot(address, slot) else {
						continue;
					};
					if self.zoom_filter.is_some_and(|filter| filter != zoom_level) {
						continue;
					}

					let address = *address;
					return Some(self.reader.read_handle(&address, offset, column, row, zoom_level));
				}
				self.current = None;
			}

			let address = self.addresses.next()?;
			match self.reader.read_index(&address) {
				Ok(slots) => self.current = Some((address, slots, 0)),
				// report the unreadable cluster once, then move on
				Err(error) => return Some(Err(error)),
			}
		}
	}
}
