//! Coordinate primitives, tile origin conventions, tile schemes, and
//! coordinate-reference-system profiles for raster tile pyramids.
//!
//! This crate is the pure, I/O-free half of the tile engine: everything needed
//! to map a geographic point to an integer (column, row, zoom) tile address
//! under a chosen origin convention, and back. Storage backends live in
//! `tilegrid_store`.

pub mod profile;
pub mod scheme;
pub mod types;

pub use types::*;
