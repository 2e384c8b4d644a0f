//! Cluster geometry: which file pair a tile lives in, and where in the index
//! its slot sits. Everything here is pure arithmetic; no I/O.

use super::INDEX_SLOT_SIZE;
use crate::{StoreResult, TileStoreError};
use std::path::{Path, PathBuf};

/// The deterministic identifier of one cluster file pair.
///
/// A cluster is anchored at `start_level` and covers all zoom levels up to
/// `end_level`; its row/column are the tile row/column at the anchor level.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct ClusterAddress {
	pub column: u32,
	pub row: u32,
	pub start_level: u8,
	pub end_level: u8,
}

impl ClusterAddress {
	/// Zoom levels spanned by this cluster.
	pub fn level_count(&self) -> u8 {
		self.end_level - self.start_level + 1
	}

	/// Number of index slots in this cluster: `(4^n - 1) / 3` for `n` spanned
	/// levels (a quad-tree with one root tile per anchor position).
	pub fn slot_count(&self) -> u64 {
		((1u64 << (2 * u64::from(self.level_count()))) - 1) / 3
	}
}

/// Maps tile addresses to cluster file pairs and index slots for one store.
#[derive(Clone, Debug)]
pub(crate) struct ClusterLayout {
	root: PathBuf,
	set_name: String,
	levels: u8,
	break_point: u8,
}

impl ClusterLayout {
	pub fn new(root: &Path, set_name: &str, levels: u8, break_point: u8) -> StoreResult<ClusterLayout> {
		if set_name.is_empty() || set_name.contains(['/', '\\', '-']) {
			return Err(TileStoreError::invalid(format!(
				"set name {set_name:?} may not be empty or contain '-', '/' or '\\'"
			)));
		}
		if levels == 0 || levels > tilegrid_core::scheme::MAX_ZOOM_LEVEL {
			return Err(TileStoreError::invalid(format!(
				"levels ({levels}) must be in the range [1, {}]",
				tilegrid_core::scheme::MAX_ZOOM_LEVEL
			)));
		}
		if break_point == 0 || break_point >= levels {
			return Err(TileStoreError::invalid(format!(
				"break point ({break_point}) must be in the range [1, levels ({levels}))"
			)));
		}
		Ok(ClusterLayout {
			root: root.to_path_buf(),
			set_name: set_name.to_string(),
			levels,
			break_point,
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn set_name(&self) -> &str {
		&self.set_name
	}

	pub fn levels(&self) -> u8 {
		self.levels
	}

	/// The cluster holding the tile at (column, row, zoom).
	///
	/// Zoom levels below the break point go to clusters anchored at level 1,
	/// the rest to clusters anchored at the break point.
	pub fn cluster_address(&self, column: u32, row: u32, zoom_level: u8) -> StoreResult<ClusterAddress> {
		if zoom_level == 0 || zoom_level > self.levels {
			return Err(TileStoreError::invalid(format!(
				"zoom level ({zoom_level}) must be in the range [1, {}]",
				self.levels
			)));
		}

		let (start_level, end_level) = self.anchor_range(zoom_level < self.break_point);
		let shift = zoom_level - start_level;

		Ok(ClusterAddress {
			column: column >> shift,
			row: row >> shift,
			start_level,
			end_level,
		})
	}

	/// The byte offset of the tile's slot within the cluster's index file.
	///
	/// Local levels are laid out consecutively, each occupying a full
	/// `4^level` quad-tree row-major block: level `L` starts at slot
	/// `(4^L - 1) / 3`, then `local_row * 2^L + local_column` indexes into
	/// it.
	pub fn index_offset(&self, address: &ClusterAddress, column: u32, row: u32, zoom_level: u8) -> u64 {
		let local_level = u64::from(zoom_level - address.start_level);
		let local_column = u64::from(column) - (u64::from(address.column) << local_level);
		let local_row = u64::from(row) - (u64::from(address.row) << local_level);

		let level_base = ((1u64 << (2 * local_level)) - 1) / 3;
		let slot = level_base + local_row * (1u64 << local_level) + local_column;

		slot * INDEX_SLOT_SIZE
	}

	/// Inverts [`index_offset`](Self::index_offset): the global tile address
	/// stored at `slot` of a cluster. Returns `None` for slots beyond the
	/// cluster's capacity.
	pub fn tile_at_slot(&self, address: &ClusterAddress, slot: u64) -> Option<(u32, u32, u8)> {
		if slot >= address.slot_count() {
			return None;
		}

		let mut local_level = 0u64;
		while ((1u64 << (2 * (local_level + 1))) - 1) / 3 <= slot {
			local_level += 1;
		}

		let level_base = ((1u64 << (2 * local_level)) - 1) / 3;
		let within = slot - level_base;
		let local_row = within >> local_level;
		let local_column = within & ((1u64 << local_level) - 1);

		let zoom_level = address.start_level + local_level as u8;
		let column = (u64::from(address.column) << local_level) + local_column;
		let row = (u64::from(address.row) << local_level) + local_row;

		Some((column as u32, row as u32, zoom_level))
	}

	pub fn index_path(&self, address: &ClusterAddress) -> PathBuf {
		self.root.join(self.file_name(address, "index"))
	}

	pub fn data_path(&self, address: &ClusterAddress) -> PathBuf {
		self.root.join(self.file_name(address, "data"))
	}

	fn file_name(&self, address: &ClusterAddress, extension: &str) -> String {
		format!(
			"{}-{}-{}-{}.{extension}",
			self.set_name, address.start_level, address.row, address.column
		)
	}

	/// Parses an index file name back into a cluster address. Returns `None`
	/// for files that do not belong to this tile set.
	pub fn parse_index_file_name(&self, file_name: &str) -> Option<ClusterAddress> {
		let rest = file_name.strip_prefix(&self.set_name)?.strip_prefix('-')?;
		let rest = rest.strip_suffix(".index")?;

		let mut parts = rest.split('-');
		let start_level: u8 = parts.next()?.parse().ok()?;
		let row: u32 = parts.next()?.parse().ok()?;
		let column: u32 = parts.next()?.parse().ok()?;
		if parts.next().is_some() {
			return None;
		}

		// Only the two anchor levels this layout produces are valid.
		let (top_start, _) = self.anchor_range(true);
		let (bottom_start, _) = self.anchor_range(false);
		let end_level = if start_level == top_start && self.break_point > 1 {
			self.anchor_range(true).1
		} else if start_level == bottom_start {
			self.anchor_range(false).1
		} else {
			return None;
		};

		Some(ClusterAddress {
			column,
			row,
			start_level,
			end_level,
		})
	}

	fn anchor_range(&self, above_break: bool) -> (u8, u8) {
		if above_break {
			(1, self.break_point - 1)
		} else {
			(self.break_point, self.levels)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn layout() -> ClusterLayout {
		ClusterLayout::new(Path::new("/tiles"), "osm", 8, 5).unwrap()
	}

	#[test]
	fn construction_validation() {
		let root = Path::new("/tiles");
		assert!(ClusterLayout::new(root, "", 8, 5).is_err(), "empty set name");
		assert!(ClusterLayout::new(root, "a-b", 8, 5).is_err(), "dash in set name");
		assert!(ClusterLayout::new(root, "osm", 0, 0).is_err(), "zero levels");
		assert!(ClusterLayout::new(root, "osm", 8, 8).is_err(), "break point >= levels");
		assert!(ClusterLayout::new(root, "osm", 8, 0).is_err(), "zero break point");
		assert!(ClusterLayout::new(root, "osm", 32, 5).is_err(), "levels beyond maximum");
	}

	#[rstest]
	// zooms below the break point share clusters anchored at level 1
	#[case(4, 2, 6, ClusterAddress { column: 0, row: 0, start_level: 1, end_level: 4 })]
	#[case(4, 9, 14, ClusterAddress { column: 1, row: 1, start_level: 1, end_level: 4 })]
	#[case(1, 1, 0, ClusterAddress { column: 1, row: 0, start_level: 1, end_level: 4 })]
	// zooms at or above the break point go to clusters anchored there
	#[case(5, 2, 6, ClusterAddress { column: 2, row: 6, start_level: 5, end_level: 8 })]
	#[case(8, 100, 200, ClusterAddress { column: 12, row: 25, start_level: 5, end_level: 8 })]
	fn cluster_partitioning(#[case] zoom: u8, #[case] column: u32, #[case] row: u32, #[case] expected: ClusterAddress) {
		assert_eq!(layout().cluster_address(column, row, zoom).unwrap(), expected);
	}

	#[test]
	fn zoom_level_range_is_enforced() {
		let layout = layout();
		assert!(layout.cluster_address(0, 0, 0).unwrap_err().is_invalid_argument());
		assert!(layout.cluster_address(0, 0, 9).unwrap_err().is_invalid_argument());
	}

	#[test]
	fn slot_count_is_a_quad_tree() {
		// 4 spanned levels: 1 + 4 + 16 + 64 = 85 slots
		let address = ClusterAddress {
			column: 0,
			row: 0,
			start_level: 5,
			end_level: 8,
		};
		assert_eq!(address.slot_count(), 85);
		assert_eq!(address.level_count(), 4);
	}

	#[test]
	fn index_offsets_are_dense_and_unique() {
		let layout = layout();
		let address = ClusterAddress {
			column: 0,
			row: 0,
			start_level: 5,
			end_level: 8,
		};

		let mut seen = std::collections::HashSet::new();
		for zoom in 5..=8u8 {
			let local = 1u32 << (zoom - 5);
			for row in 0..local {
				for column in 0..local {
					let offset = layout.index_offset(&address, column, row, zoom);
					assert_eq!(offset % INDEX_SLOT_SIZE, 0);
					assert!(offset / INDEX_SLOT_SIZE < address.slot_count());
					assert!(seen.insert(offset), "offset collision at ({column}, {row}, {zoom})");
				}
			}
		}
		assert_eq!(seen.len() as u64, address.slot_count());
	}

	#[test]
	fn tile_at_slot_inverts_index_offset() {
		let layout = layout();
		for (column, row, zoom) in [(0, 0, 1), (2, 6, 4), (2, 6, 5), (37, 99, 8)] {
			let address = layout.cluster_address(column, row, zoom).unwrap();
			let slot = layout.index_offset(&address, column, row, zoom) / INDEX_SLOT_SIZE;
			assert_eq!(layout.tile_at_slot(&address, slot), Some((column, row, zoom)));
		}

		let address = layout.cluster_address(0, 0, 5).unwrap();
		assert_eq!(layout.tile_at_slot(&address, address.slot_count()), None);
	}

	#[test]
	fn file_names_round_trip() {
		let layout = layout();
		let address = layout.cluster_address(100, 200, 8).unwrap();
		let index_path = layout.index_path(&address);
		assert_eq!(index_path, Path::new("/tiles/osm-5-25-12.index"));
		assert_eq!(layout.data_path(&address), Path::new("/tiles/osm-5-25-12.data"));

		let file_name = index_path.file_name().unwrap().to_str().unwrap();
		assert_eq!(layout.parse_index_file_name(file_name), Some(address));
	}

	#[test]
	fn foreign_file_names_are_ignored() {
		let layout = layout();
		assert_eq!(layout.parse_index_file_name("other-5-0-0.index"), None);
		assert_eq!(layout.parse_index_file_name("osm-5-0-0.data"), None);
		assert_eq!(layout.parse_index_file_name("osm-3-0-0.index"), None, "not an anchor level");
		assert_eq!(layout.parse_index_file_name("osm-5-0.index"), None);
		assert_eq!(layout.parse_index_file_name("osm-5-x-0.index"), None);
	}
}
