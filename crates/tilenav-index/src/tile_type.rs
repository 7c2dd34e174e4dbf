//! A 4-bit attribute per tile, stored as four sparse bitsets.
//!
//! Bit `i` of a tile's type is set iff bitset `i` contains the tile's packed
//! coordinate. Tiles never mentioned have type `0`.
//!
//! # Resource format
//!
//! ```text
//! i32 (big-endian)  version        must be 1
//! repeated 4 times (bitset 0 first):
//!     bitset        see the sparse module encoding
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use tilenav_core::Coord;

use crate::error::{IndexError, IndexResult};
use crate::sparse::SparseBitSet;

/// Format version understood by [`TileTypeMap::load`].
pub const TILE_TYPE_VERSION: i32 = 1;
/// Number of attribute bits per tile.
pub const TILE_TYPE_BITS: usize = 4;

const RESOURCE: &str = "tile type map";
const READ_BUFFER: usize = 128 * 1024;

/// Map from tile coordinate to a 4-bit attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileTypeMap {
    bits: [SparseBitSet; TILE_TYPE_BITS],
}

impl TileTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The attribute nibble of `coord`; `0` if nothing is stored.
    #[inline]
    pub fn tile_type(&self, coord: Coord) -> u8 {
        let mut ty = 0u8;
        for (i, set) in self.bits.iter().enumerate() {
            if set.contains(coord.raw()) {
                ty |= 1 << i;
            }
        }
        ty
    }

    /// Overwrite the attribute of `coord`. Bits above the low four are
    /// ignored.
    pub fn set_tile_type(&mut self, coord: Coord, ty: u8) {
        for (i, set) in self.bits.iter_mut().enumerate() {
            if ty & (1 << i) != 0 {
                set.insert(coord.raw());
            } else {
                set.remove(coord.raw());
            }
        }
    }

    /// Whether any tile has a non-zero attribute.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(SparseBitSet::is_empty)
    }

    /// Direct access to bitset `i` (`0..4`).
    pub fn bitset(&self, i: usize) -> Option<&SparseBitSet> {
        self.bits.get(i)
    }

    /// Decode a tile type map from `reader`.
    pub fn load<R: Read>(reader: R) -> IndexResult<Self> {
        let started = Instant::now();
        let mut r = BufReader::with_capacity(READ_BUFFER, reader);

        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        let version = i32::from_be_bytes(tag);
        if version != TILE_TYPE_VERSION {
            return Err(IndexError::UnsupportedVersion {
                resource: RESOURCE,
                found: version,
                expected: TILE_TYPE_VERSION,
            });
        }

        let mut map = Self::new();
        for set in map.bits.iter_mut() {
            *set = SparseBitSet::read_from(&mut r, RESOURCE)?;
        }

        log::info!(
            "loaded tile type map: {} words in {:?}",
            map.bits.iter().map(SparseBitSet::word_count).sum::<usize>(),
            started.elapsed()
        );
        Ok(map)
    }

    /// Open and decode the tile type map stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> IndexResult<Self> {
        Self::load(File::open(path)?)
    }

    /// Encode in the resource format.
    pub fn write<W: Write>(&self, writer: W) -> IndexResult<()> {
        let mut w = BufWriter::new(writer);
        w.write_all(&TILE_TYPE_VERSION.to_be_bytes())?;
        for set in &self.bits {
            set.write_to(&mut w)?;
        }
        w.flush()?;
        Ok(())
    }
}
