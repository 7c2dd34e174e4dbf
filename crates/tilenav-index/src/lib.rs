//! **tilenav-index**: immutable spatial index maps and their binary codecs.
//!
//! - [`ObjectMap`]: object ids by tile, CSR layout, binary-search lookup
//! - [`TileTypeMap`]: a 4-bit attribute per tile stored as four [`SparseBitSet`]s
//! - [`varint`]: the base-128 integer encoding both resources use
//!
//! Both maps are read-only after load and can be shared between threads.

pub mod error;
pub mod object_map;
pub mod sparse;
pub mod tile_type;
pub mod varint;

pub use error::{IndexError, IndexResult};
pub use object_map::{ObjectMap, ObjectMapBuilder};
pub use sparse::SparseBitSet;
pub use tile_type::TileTypeMap;
