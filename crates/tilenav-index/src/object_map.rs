//! Object ids by tile coordinate.
//!
//! # Data layout
//!
//! Three parallel arrays, CSR style:
//!
//! ```text
//! coords[i]                      sorted packed coordinate of entry i
//! ids[ offsets[i] .. offsets[i+1] ]   object ids stored at coords[i]
//! ```
//!
//! Lookup is a binary search over `coords`.
//!
//! # Resource format
//!
//! ```text
//! i32 (big-endian)  version            must be 2
//! varint            entry count        <= 10_000_000
//! repeated entry count times:
//!     varint        coordinate delta   from the previous entry (first: from 0)
//!     varint        object count       <= 1_000
//!     varint * n    object ids
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use tilenav_core::Coord;

use crate::error::{IndexError, IndexResult};
use crate::varint;

/// Format version understood by [`ObjectMap::load`].
pub const OBJECT_MAP_VERSION: i32 = 2;
/// Upper bound on the entry count of a well-formed resource.
pub const MAX_ENTRIES: u32 = 10_000_000;
/// Upper bound on the object count of a single entry.
pub const MAX_OBJECTS_PER_TILE: u32 = 1_000;

const RESOURCE: &str = "object map";
const READ_BUFFER: usize = 128 * 1024;

/// Immutable map from tile coordinate to the ids of the objects on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectMap {
    coords: Vec<Coord>,
    offsets: Vec<u32>,
    ids: Vec<u32>,
    version: i32,
}

impl ObjectMap {
    /// Decode an object map from `reader`.
    pub fn load<R: Read>(reader: R) -> IndexResult<Self> {
        let started = Instant::now();
        let mut r = BufReader::with_capacity(READ_BUFFER, reader);

        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        let version = i32::from_be_bytes(tag);
        if version != OBJECT_MAP_VERSION {
            return Err(IndexError::UnsupportedVersion {
                resource: RESOURCE,
                found: version,
                expected: OBJECT_MAP_VERSION,
            });
        }

        let entry_count = varint::read_u32(&mut r)?;
        if entry_count > MAX_ENTRIES {
            return Err(IndexError::corrupt(
                RESOURCE,
                format!("invalid entry count {entry_count}"),
            ));
        }

        let n = entry_count as usize;
        let mut coords = Vec::with_capacity(n);
        let mut offsets = Vec::with_capacity(n);
        let mut ids = Vec::with_capacity(n.saturating_mul(3));

        let mut current: u64 = 0;
        for i in 0..n {
            current = current.saturating_add(varint::read_u64(&mut r)?);
            let packed = u32::try_from(current).map_err(|_| {
                IndexError::corrupt(RESOURCE, format!("coordinate overflow at entry {i}"))
            })?;

            let object_count = varint::read_u32(&mut r)?;
            if object_count > MAX_OBJECTS_PER_TILE {
                return Err(IndexError::corrupt(
                    RESOURCE,
                    format!("invalid object count at entry {i}: {object_count}"),
                ));
            }

            coords.push(Coord(packed));
            offsets.push(ids.len() as u32);
            for _ in 0..object_count {
                ids.push(varint::read_u32(&mut r)?);
            }
        }

        log::info!(
            "loaded object map: {} coordinates, {} objects in {:?}",
            coords.len(),
            ids.len(),
            started.elapsed()
        );

        Ok(Self {
            coords,
            offsets,
            ids,
            version,
        })
    }

    /// Open and decode the object map stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> IndexResult<Self> {
        Self::load(File::open(path)?)
    }

    /// Ids of all objects on `coord`, in stored order. Empty if none.
    pub fn objects(&self, coord: Coord) -> &[u32] {
        match self.coords.binary_search(&coord) {
            Ok(i) => {
                let start = self.offsets[i] as usize;
                let end = self
                    .offsets
                    .get(i + 1)
                    .map_or(self.ids.len(), |&o| o as usize);
                &self.ids[start..end]
            }
            Err(_) => &[],
        }
    }

    /// Convenience wrapper over [`objects`](Self::objects) for unpacked
    /// components.
    pub fn objects_at(&self, x: i32, y: i32, plane: i32) -> &[u32] {
        self.objects(Coord::new(x, y, plane))
    }

    /// Whether `coord` has an entry (possibly with zero objects).
    pub fn has_objects(&self, coord: Coord) -> bool {
        self.coords.binary_search(&coord).is_ok()
    }

    /// Whether any object on `coord` has id `id`.
    pub fn contains_object(&self, coord: Coord, id: u32) -> bool {
        self.objects(coord).contains(&id)
    }

    /// Number of coordinate entries.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Total number of stored object ids.
    pub fn object_count(&self) -> usize {
        self.ids.len()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Encode in the resource format.
    pub fn write<W: Write>(&self, writer: W) -> IndexResult<()> {
        let mut w = BufWriter::new(writer);
        w.write_all(&self.version.to_be_bytes())?;
        varint::write_u32(&mut w, self.coords.len() as u32)?;

        let mut previous: u32 = 0;
        for (i, &coord) in self.coords.iter().enumerate() {
            varint::write_u64(&mut w, (coord.raw() - previous) as u64)?;
            previous = coord.raw();

            let start = self.offsets[i] as usize;
            let end = self
                .offsets
                .get(i + 1)
                .map_or(self.ids.len(), |&o| o as usize);
            varint::write_u32(&mut w, (end - start) as u32)?;
            for &id in &self.ids[start..end] {
                varint::write_u32(&mut w, id)?;
            }
        }
        w.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ObjectMapBuilder
// ---------------------------------------------------------------------------

/// Collects `(coordinate, id)` pairs in any order and produces a sorted
/// [`ObjectMap`].
#[derive(Debug, Default)]
pub struct ObjectMapBuilder {
    entries: BTreeMap<Coord, Vec<u32>>,
}

impl ObjectMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the objects on `coord`.
    pub fn add(&mut self, coord: Coord, id: u32) -> &mut Self {
        self.entries.entry(coord).or_default().push(id);
        self
    }

    /// Append several ids to the objects on `coord`, keeping their order.
    pub fn add_all(&mut self, coord: Coord, ids: &[u32]) -> &mut Self {
        self.entries.entry(coord).or_default().extend_from_slice(ids);
        self
    }

    /// Finish the map. Entries with more than [`MAX_OBJECTS_PER_TILE`] ids
    /// are rejected so that every built map can be reloaded.
    pub fn build(self) -> IndexResult<ObjectMap> {
        if self.entries.len() > MAX_ENTRIES as usize {
            return Err(IndexError::corrupt(
                RESOURCE,
                format!("too many entries: {}", self.entries.len()),
            ));
        }
        let mut map = ObjectMap {
            coords: Vec::with_capacity(self.entries.len()),
            offsets: Vec::with_capacity(self.entries.len()),
            ids: Vec::new(),
            version: OBJECT_MAP_VERSION,
        };
        for (coord, ids) in self.entries {
            if ids.len() > MAX_OBJECTS_PER_TILE as usize {
                return Err(IndexError::corrupt(
                    RESOURCE,
                    format!("{} objects on {coord}", ids.len()),
                ));
            }
            map.coords.push(coord);
            map.offsets.push(map.ids.len() as u32);
            map.ids.extend(ids);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ObjectMap {
        let mut b = ObjectMapBuilder::new();
        b.add(Coord::new(3200, 3200, 0), 1530)
            .add(Coord::new(3200, 3200, 0), 7)
            .add_all(Coord::new(10, 20, 1), &[1, 2, 3])
            .add(Coord::new(0, 0, 0), 42);
        b.build().unwrap()
    }

    fn encoded(map: &ObjectMap) -> Vec<u8> {
        let mut out = Vec::new();
        map.write(&mut out).unwrap();
        out
    }

    #[test]
    fn absent_coordinate_is_empty() {
        let map = sample();
        assert!(map.objects(Coord::new(1, 1, 0)).is_empty());
        assert!(!map.has_objects(Coord::new(1, 1, 0)));
    }

    #[test]
    fn present_coordinate_returns_ids_in_stored_order() {
        let map = sample();
        assert_eq!(map.objects(Coord::new(3200, 3200, 0)), &[1530, 7]);
        assert_eq!(map.objects_at(10, 20, 1), &[1, 2, 3]);
        assert_eq!(map.objects(Coord::new(0, 0, 0)), &[42]);
        assert!(map.contains_object(Coord::new(10, 20, 1), 2));
        assert_eq!(map.len(), 3);
        assert_eq!(map.object_count(), 6);
    }

    #[test]
    fn load_decodes_written_resource() {
        let map = sample();
        let bytes = encoded(&map);
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        let back = ObjectMap::load(bytes.as_slice()).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.version(), OBJECT_MAP_VERSION);
    }

    #[test]
    fn hand_encoded_entries_are_delta_decoded() {
        // version 2, 2 entries: coord 5 -> [9], coord 5+128 -> [1, 300]
        let bytes = [
            0, 0, 0, 2, // version
            0x02, // entry count
            0x05, 0x01, 0x09, // delta 5, 1 object, id 9
            0x80, 0x01, 0x02, 0x01, 0xAC, 0x02, // delta 128, 2 objects, ids 1, 300
        ];
        let map = ObjectMap::load(bytes.as_slice()).unwrap();
        assert_eq!(map.objects(Coord(5)), &[9]);
        assert_eq!(map.objects(Coord(133)), &[1, 300]);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let bytes = [0, 0, 0, 1, 0];
        let err = ObjectMap::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::UnsupportedVersion {
                found: 1,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn oversized_counts_are_corrupt() {
        let mut bytes = vec![0, 0, 0, 2];
        varint::write_u32(&mut bytes, MAX_ENTRIES + 1).unwrap();
        let err = ObjectMap::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));

        let mut bytes = vec![0, 0, 0, 2, 0x01, 0x00];
        varint::write_u32(&mut bytes, MAX_OBJECTS_PER_TILE + 1).unwrap();
        let err = ObjectMap::load(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));
    }

    #[test]
    fn truncated_resource_is_io_error() {
        let map = sample();
        let bytes = encoded(&map);
        let err = ObjectMap::load(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }

    #[test]
    fn builder_rejects_crowded_tile() {
        let mut b = ObjectMapBuilder::new();
        let ids: Vec<u32> = (0..=MAX_OBJECTS_PER_TILE).collect();
        b.add_all(Coord::new(1, 1, 0), &ids);
        assert!(b.build().is_err());
    }
}
