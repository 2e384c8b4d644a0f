//! End-to-end tests for the cluster backend, running against real files in a
//! temporary directory.

use approx::assert_relative_eq;
use std::io::{Seek, SeekFrom, Write};
use tempfile::TempDir;
use tilegrid_core::{Blob, CoordinateReferenceSystem, CrsCoordinate, TileOrigin};
use tilegrid_store::cluster::{ClusterTileReader, ClusterTileWriter};
use tilegrid_store::{TileImageFormat, TileStoreReader, TileStoreWriter};

const LEVELS: u8 = 8;
const BREAK_POINT: u8 = 5;

fn mercator() -> CoordinateReferenceSystem {
	CoordinateReferenceSystem::new("EPSG", 3857).unwrap()
}

fn open_writer(root: &TempDir) -> ClusterTileWriter {
	ClusterTileWriter::open(root.path(), "osm", LEVELS, BREAK_POINT, &mercator(), TileImageFormat::Png).unwrap()
}

fn open_reader(root: &TempDir) -> ClusterTileReader {
	ClusterTileReader::open(root.path(), "osm", LEVELS, BREAK_POINT, &mercator()).unwrap()
}

fn payload(seed: u8) -> Blob {
	Blob::from((0..32).map(|i| seed.wrapping_add(i)).collect::<Vec<u8>>())
}

/// The single `.data` file under `root`.
fn data_file(root: &TempDir) -> std::path::PathBuf {
	let mut found: Vec<_> = std::fs::read_dir(root.path())
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.filter(|path| path.extension().is_some_and(|extension| extension == "data"))
		.collect();
	assert_eq!(found.len(), 1, "expected exactly one data file");
	found.pop().unwrap()
}

#[test]
fn written_bytes_read_back_identically() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(7)).unwrap();

	let reader = open_reader(&root);
	let read = reader.get_tile_data(2, 6, 4).unwrap().unwrap();
	assert_eq!(read.as_slice(), payload(7).as_slice());
}

#[test]
fn absent_tiles_are_none_not_errors() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(7)).unwrap();

	let reader = open_reader(&root);
	// empty slot in an existing cluster
	assert!(reader.get_tile_data(3, 6, 4).unwrap().is_none());
	// cluster whose files were never created
	assert!(reader.get_tile_data(0, 0, 6).unwrap().is_none());
}

#[test]
fn out_of_range_addresses_are_rejected() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(0, 0, 1, &payload(1)).unwrap();
	let reader = open_reader(&root);

	assert!(reader.get_tile_data(0, 0, 0).unwrap_err().is_invalid_argument());
	assert!(
		reader
			.get_tile_data(0, 0, LEVELS + 1)
			.unwrap_err()
			.is_invalid_argument()
	);
	// zoom 4 is a 16x16 matrix
	assert!(reader.get_tile_data(16, 0, 4).unwrap_err().is_invalid_argument());
	assert!(writer.add_tile_data(0, 16, 4, &payload(1)).unwrap_err().is_invalid_argument());
}

#[test]
fn rewriting_a_tile_supersedes_the_old_record() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(1)).unwrap();
	writer.add_tile_data(2, 6, 4, &payload(9)).unwrap();

	let reader = open_reader(&root);
	let read = reader.get_tile_data(2, 6, 4).unwrap().unwrap();
	assert_eq!(read.as_slice(), payload(9).as_slice());
	// the superseded record stays in the data file but is no longer counted
	assert_eq!(reader.count_tiles().unwrap(), 1);
}

#[test]
fn counts_zoom_levels_and_streaming_cover_both_cluster_groups() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	// below the break point (anchored at level 1) and at/above it
	writer.add_tile_data(0, 0, 1, &payload(1)).unwrap();
	writer.add_tile_data(2, 6, 4, &payload(2)).unwrap();
	writer.add_tile_data(2, 6, 5, &payload(3)).unwrap();
	writer.add_tile_data(100, 200, 8, &payload(4)).unwrap();

	let reader = open_reader(&root);
	assert_eq!(reader.count_tiles().unwrap(), 4);
	assert_eq!(
		reader.zoom_levels().unwrap().into_iter().collect::<Vec<_>>(),
		vec![1, 4, 5, 8]
	);
	assert!(reader.byte_size().unwrap() > 0);

	let tiles = reader.stream().unwrap().collect_ok();
	assert_eq!(tiles.len(), 4);
	let mut addresses: Vec<_> = tiles
		.iter()
		.map(|tile| (tile.zoom_level(), tile.column(), tile.row()))
		.collect();
	addresses.sort_unstable();
	assert_eq!(addresses, vec![(1, 0, 0), (4, 2, 6), (5, 2, 6), (8, 100, 200)]);

	let zoom_five: Vec<_> = reader.stream_zoom(5).unwrap().collect_ok();
	assert_eq!(zoom_five.len(), 1);
	assert_eq!(zoom_five[0].data().as_slice(), payload(3).as_slice());
}

#[test]
fn truncated_records_are_reported_as_corrupt() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(7)).unwrap();

	let path = data_file(&root);
	let length = std::fs::metadata(&path).unwrap().len();
	let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
	file.set_len(length - 5).unwrap();

	let reader = open_reader(&root);
	let error = reader.get_tile_data(2, 6, 4).unwrap_err();
	assert!(error.is_corrupt(), "{error}");
}

#[test]
fn magic_mismatches_are_reported_as_corrupt() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(7)).unwrap();

	let mut file = std::fs::OpenOptions::new().write(true).open(data_file(&root)).unwrap();
	file.seek(SeekFrom::Start(0)).unwrap();
	file.write_all(&[0xde, 0xad]).unwrap();
	drop(file);

	let reader = open_reader(&root);
	assert!(reader.get_tile_data(2, 6, 4).unwrap_err().is_corrupt());
}

#[test]
fn streams_continue_past_corrupt_tiles() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);
	writer.add_tile_data(2, 6, 4, &payload(1)).unwrap();
	writer.add_tile_data(0, 0, 6, &payload(2)).unwrap();

	// truncate the zoom-4 cluster's data file mid-payload
	let victim = std::fs::read_dir(root.path())
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.find(|path| path.file_name().is_some_and(|name| name == "osm-1-0-0.data"))
		.unwrap();
	let length = std::fs::metadata(&victim).unwrap().len();
	std::fs::OpenOptions::new()
		.write(true)
		.open(&victim)
		.unwrap()
		.set_len(length - 5)
		.unwrap();

	let reader = open_reader(&root);
	let items: Vec<_> = reader.stream().unwrap().collect();
	assert_eq!(items.len(), 2);
	assert_eq!(items.iter().filter(|item| item.is_ok()).count(), 1);
	assert_eq!(items.iter().filter(|item| item.is_err()).count(), 1);
}

#[test]
fn coordinate_lookup_matches_direct_addressing() {
	let root = TempDir::new().unwrap();
	let mut writer = open_writer(&root);

	// center of the world in web mercator, zoom 3: with a lower-left origin
	// the origin-side edges are inclusive, so (0, 0) lands on tile (4, 4)
	let center = CrsCoordinate::new(0.0, 0.0, mercator());
	let address = writer.crs_to_tile_coordinate(&center, 3).unwrap();
	assert_eq!((address.x, address.y), (4, 4));

	writer.add_tile_data(address.x, address.y, 3, &payload(5)).unwrap();
	let reader = open_reader(&root);
	let read = reader.get_tile_data_at(&center, 3).unwrap().unwrap();
	assert_eq!(read.as_slice(), payload(5).as_slice());
}

#[test]
fn tile_bounds_follow_the_lower_left_origin() {
	let root = TempDir::new().unwrap();
	let writer = open_writer(&root);

	let world = 20_037_508.342_789_244_f64;
	// zoom 1 is a 2x2 matrix; tile (0, 0) is the south-west quadrant
	let bounds = writer.tile_bounding_box(0, 0, 1).unwrap();
	assert_relative_eq!(bounds.min_x(), -world, epsilon = 1e-6);
	assert_relative_eq!(bounds.min_y(), -world, epsilon = 1e-6);
	assert_relative_eq!(bounds.max_x(), 0.0, epsilon = 1e-6);
	assert_relative_eq!(bounds.max_y(), 0.0, epsilon = 1e-6);

	// the same tile named from the upper-left corner convention
	let corner = writer.tile_to_crs_coordinate(0, 0, 1, TileOrigin::UpperLeft).unwrap();
	assert_relative_eq!(corner.x(), -world, epsilon = 1e-6);
	assert_relative_eq!(corner.y(), 0.0, epsilon = 1e-6);
}

#[test]
fn readers_and_writers_release_cleanly() {
	let root = TempDir::new().unwrap();
	let writer: Box<dyn TileStoreWriter> = Box::new(open_writer(&root));
	writer.close().unwrap();
	let reader: Box<dyn TileStoreReader> = Box::new(open_reader(&root));
	reader.close().unwrap();
}
