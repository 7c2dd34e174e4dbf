//! **tilenav-core**: coordinate types shared by the tilenav crates.
//!
//! - [`Coord`]: a tile position packed into a `u32` key
//! - [`WorldPoint`]: the unpacked `(x, y, plane)` form
//! - [`WorldArea`]: a rectangle of tiles used as a search target

pub mod area;
pub mod coord;

pub use area::{AreaIter, WorldArea, compressed_points};
pub use coord::{Coord, MAX_PLANE, MAX_X, MAX_Y, WorldPoint, compress, decompress};
