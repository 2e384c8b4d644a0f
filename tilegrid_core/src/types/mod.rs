//! Value types shared by every part of the tile engine: coordinates, bounding
//! boxes, tile matrix geometry, origin conventions, and raw byte blobs.

mod blob;
mod bounding_box;
mod coordinate;
mod crs;
mod dimensions;
mod tile_matrix_dimensions;
mod tile_origin;

pub use blob::Blob;
pub use bounding_box::BoundingBox;
pub use coordinate::{Coordinate, CrsCoordinate};
pub use crs::CoordinateReferenceSystem;
pub use dimensions::Dimensions;
pub use tile_matrix_dimensions::TileMatrixDimensions;
pub use tile_origin::TileOrigin;
