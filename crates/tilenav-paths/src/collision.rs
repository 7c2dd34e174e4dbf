//! Directional collision surfaces.
//!
//! A surface answers two questions about the world: can a tile be stood on,
//! and is the edge between two adjacent tiles open. Only the north and east
//! edges of a tile are primitive; south and west are the north and east edges
//! of the neighbor below and to the left, and the four diagonals are composed
//! from the cardinal edges around them.
//!
//! ```text
//!  NW ── N ── NE       A diagonal move from c to NE is blocked if any of
//!   │    │    │        the four cardinal edges of the 2x2 block it crosses
//!   W ── c ── E        is blocked:
//!   │    │    │          c→N, c→E, N→NE, E→NE
//!  SW ── S ── SE
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use tilenav_core::{Coord, MAX_Y, WorldArea, WorldPoint};
use tilenav_index::{IndexError, IndexResult, SparseBitSet, TileTypeMap};

use crate::direction::{DirMask, Direction};
use crate::distance::euclidean_sq;

// ---------------------------------------------------------------------------
// CollisionFlags
// ---------------------------------------------------------------------------

/// Raw per-tile collision bits as found in scene collision data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionFlags(pub u32);

impl CollisionFlags {
    pub const NORTH_WEST: u32 = 0x1;
    pub const NORTH: u32 = 0x2;
    pub const NORTH_EAST: u32 = 0x4;
    pub const EAST: u32 = 0x8;
    pub const SOUTH_EAST: u32 = 0x10;
    pub const SOUTH: u32 = 0x20;
    pub const SOUTH_WEST: u32 = 0x40;
    pub const WEST: u32 = 0x80;
    pub const OBJECT: u32 = 0x100;
    pub const FULL: u32 = 0x20000;
    pub const FLOOR_DECORATION: u32 = 0x40000;
    pub const FLOOR: u32 = 0x200000;

    /// Any of these makes the whole tile impassable.
    pub const FULL_BLOCKING: u32 = Self::FULL | Self::OBJECT | Self::FLOOR | Self::FLOOR_DECORATION;

    pub const OPEN: CollisionFlags = CollisionFlags(0);
    pub const BLOCKED: CollisionFlags = CollisionFlags(Self::FULL);

    #[inline]
    pub const fn contains(self, bits: u32) -> bool {
        self.0 & bits != 0
    }

    #[inline]
    pub const fn full_blocking(self) -> bool {
        self.contains(Self::FULL_BLOCKING)
    }

    #[inline]
    pub const fn blocks_north(self) -> bool {
        self.full_blocking() || self.contains(Self::NORTH | Self::NORTH_EAST | Self::NORTH_WEST)
    }

    #[inline]
    pub const fn blocks_east(self) -> bool {
        self.full_blocking() || self.contains(Self::EAST | Self::NORTH_EAST | Self::SOUTH_EAST)
    }

    #[inline]
    pub const fn blocks_south(self) -> bool {
        self.full_blocking() || self.contains(Self::SOUTH | Self::SOUTH_EAST | Self::SOUTH_WEST)
    }

    #[inline]
    pub const fn blocks_west(self) -> bool {
        self.full_blocking() || self.contains(Self::WEST | Self::NORTH_WEST | Self::SOUTH_WEST)
    }
}

// ---------------------------------------------------------------------------
// CollisionSurface
// ---------------------------------------------------------------------------

/// Read-only directional blocking over the world.
///
/// Implementors provide the north and east edges of each tile, evaluated from
/// both sides, plus walkability. Everything else is derived.
pub trait CollisionSurface {
    /// Whether `c` can be stood on.
    fn walkable(&self, c: Coord) -> bool;

    /// Whether the edge between `c` and its north neighbor is closed.
    fn blocked_north(&self, c: Coord) -> bool;

    /// Whether the edge between `c` and its east neighbor is closed.
    fn blocked_east(&self, c: Coord) -> bool;

    /// Whether a search must never enter `c`, regardless of edges.
    #[inline]
    fn excluded(&self, _c: Coord) -> bool {
        false
    }

    #[inline]
    fn blocked_south(&self, c: Coord) -> bool {
        self.blocked_north(c.shift(0, -1))
    }

    #[inline]
    fn blocked_west(&self, c: Coord) -> bool {
        self.blocked_east(c.shift(-1, 0))
    }

    fn blocked_north_east(&self, c: Coord) -> bool {
        self.blocked_north(c)
            || self.blocked_east(c)
            || self.blocked_east(c.shift(0, 1))
            || self.blocked_north(c.shift(1, 0))
    }

    fn blocked_north_west(&self, c: Coord) -> bool {
        self.blocked_north(c)
            || self.blocked_west(c)
            || self.blocked_west(c.shift(0, 1))
            || self.blocked_north(c.shift(-1, 0))
    }

    fn blocked_south_east(&self, c: Coord) -> bool {
        self.blocked_south(c)
            || self.blocked_east(c)
            || self.blocked_east(c.shift(0, -1))
            || self.blocked_south(c.shift(1, 0))
    }

    fn blocked_south_west(&self, c: Coord) -> bool {
        self.blocked_south(c)
            || self.blocked_west(c)
            || self.blocked_west(c.shift(0, -1))
            || self.blocked_south(c.shift(-1, 0))
    }

    /// Whether a single step from `c` towards `d` is blocked.
    fn blocked(&self, c: Coord, d: Direction) -> bool {
        match d {
            Direction::North => self.blocked_north(c),
            Direction::East => self.blocked_east(c),
            Direction::South => self.blocked_south(c),
            Direction::West => self.blocked_west(c),
            Direction::NorthEast => self.blocked_north_east(c),
            Direction::NorthWest => self.blocked_north_west(c),
            Direction::SouthEast => self.blocked_south_east(c),
            Direction::SouthWest => self.blocked_south_west(c),
        }
    }

    /// Every open direction out of `c`. Empty if no cardinal is open, in
    /// which case diagonals are not evaluated.
    fn all_directions(&self, c: Coord) -> DirMask {
        let mut mask = DirMask::NONE;
        for d in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ] {
            if !self.blocked(c, d) {
                mask.insert(d);
            }
        }
        if !mask.any_cardinal() {
            return DirMask::NONE;
        }
        for d in [
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ] {
            if !self.blocked(c, d) {
                mask.insert(d);
            }
        }
        mask
    }

    /// The walkable tile closest to `start` (squared Euclidean distance)
    /// within `max_radius` rings, or `start` itself if it is walkable.
    ///
    /// Rings are scanned outward; each ring is scanned with `dx` outer and
    /// `dy` inner, ascending, and the first tile at the best distance wins.
    /// The scan stops as soon as a ring cannot contain anything closer.
    ///
    /// `max_radius` is clamped to the height of the world.
    fn nearest_walkable(&self, start: Coord, max_radius: i32) -> Option<Coord> {
        if self.walkable(start) {
            return Some(start);
        }
        let origin = start.point();
        let mut best: Option<Coord> = None;
        let mut best_dist = i64::MAX;
        for r in 1..=max_radius.min(MAX_Y) {
            if i64::from(r) * i64::from(r) > best_dist {
                break;
            }
            for dx in -r..=r {
                for dy in -r..=r {
                    if dx.abs() != r && dy.abs() != r {
                        continue;
                    }
                    let c = start.shift(dx, dy);
                    if !self.walkable(c) {
                        continue;
                    }
                    let d = euclidean_sq(origin, origin.shift(dx, dy));
                    if d < best_dist {
                        best_dist = d;
                        best = Some(c);
                    }
                }
            }
        }
        best
    }
}

impl<S: CollisionSurface + ?Sized> CollisionSurface for &S {
    #[inline]
    fn walkable(&self, c: Coord) -> bool {
        (**self).walkable(c)
    }
    #[inline]
    fn blocked_north(&self, c: Coord) -> bool {
        (**self).blocked_north(c)
    }
    #[inline]
    fn blocked_east(&self, c: Coord) -> bool {
        (**self).blocked_east(c)
    }
    #[inline]
    fn excluded(&self, c: Coord) -> bool {
        (**self).excluded(c)
    }
    #[inline]
    fn blocked_south(&self, c: Coord) -> bool {
        (**self).blocked_south(c)
    }
    #[inline]
    fn blocked_west(&self, c: Coord) -> bool {
        (**self).blocked_west(c)
    }
    fn blocked_north_east(&self, c: Coord) -> bool {
        (**self).blocked_north_east(c)
    }
    fn blocked_north_west(&self, c: Coord) -> bool {
        (**self).blocked_north_west(c)
    }
    fn blocked_south_east(&self, c: Coord) -> bool {
        (**self).blocked_south_east(c)
    }
    fn blocked_south_west(&self, c: Coord) -> bool {
        (**self).blocked_south_west(c)
    }
    fn blocked(&self, c: Coord, d: Direction) -> bool {
        (**self).blocked(c, d)
    }
    fn all_directions(&self, c: Coord) -> DirMask {
        (**self).all_directions(c)
    }
    fn nearest_walkable(&self, start: Coord, max_radius: i32) -> Option<Coord> {
        (**self).nearest_walkable(start, max_radius)
    }
}

// ---------------------------------------------------------------------------
// SceneCollision
// ---------------------------------------------------------------------------

/// A snapshot of raw scene flags keyed by coordinate. Tiles outside the
/// snapshot count as fully blocked.
#[derive(Clone, Debug, Default)]
pub struct SceneCollision {
    flags: FxHashMap<Coord, CollisionFlags>,
}

impl SceneCollision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a scene grid indexed `grid[x][y]`, whose `[0][0]` entry
    /// sits at `base`.
    pub fn from_grid(base: WorldPoint, grid: &[Vec<u32>]) -> Self {
        let mut scene = Self::new();
        for (x, column) in grid.iter().enumerate() {
            for (y, &bits) in column.iter().enumerate() {
                let p = base.shift(x as i32, y as i32);
                scene.insert(p.pack(), CollisionFlags(bits));
            }
        }
        scene
    }

    /// Set the raw flags of one tile, replacing any previous value.
    pub fn insert(&mut self, c: Coord, flags: CollisionFlags) {
        self.flags.insert(c, flags);
    }

    /// Mark every tile of `area` open.
    pub fn open_area(&mut self, area: WorldArea) {
        for c in area.coords() {
            self.flags.insert(c, CollisionFlags::OPEN);
        }
    }

    #[inline]
    pub fn flags(&self, c: Coord) -> CollisionFlags {
        self.flags
            .get(&c)
            .copied()
            .unwrap_or(CollisionFlags::BLOCKED)
    }

    /// Number of tiles in the snapshot.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl CollisionSurface for SceneCollision {
    #[inline]
    fn walkable(&self, c: Coord) -> bool {
        !self.flags(c).full_blocking()
    }

    #[inline]
    fn blocked_north(&self, c: Coord) -> bool {
        self.flags(c).blocks_north() || self.flags(c.shift(0, 1)).blocks_south()
    }

    #[inline]
    fn blocked_east(&self, c: Coord) -> bool {
        self.flags(c).blocks_east() || self.flags(c.shift(1, 0)).blocks_west()
    }
}

// ---------------------------------------------------------------------------
// CollisionMap
// ---------------------------------------------------------------------------

/// Format version understood by [`CollisionMap::load`].
pub const COLLISION_MAP_VERSION: i32 = 1;
const COLLISION_RESOURCE: &str = "collision map";

/// A compact world-wide surface storing one "north open" and one "east
/// open" bit per coordinate. Anything not stored is closed.
///
/// Resource format: big-endian `i32` version (1), then the north-open and
/// east-open bitsets in the sparse bitset encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionMap {
    north_open: SparseBitSet,
    east_open: SparseBitSet,
}

impl CollisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the edges of every tile in `area` from another surface.
    pub fn from_surface<S: CollisionSurface + ?Sized>(surface: &S, area: WorldArea) -> Self {
        let mut map = Self::new();
        for c in area.coords() {
            map.set_north_open(c, !surface.blocked_north(c));
            map.set_east_open(c, !surface.blocked_east(c));
        }
        map
    }

    pub fn set_north_open(&mut self, c: Coord, open: bool) {
        if open {
            self.north_open.insert(c.raw());
        } else {
            self.north_open.remove(c.raw());
        }
    }

    pub fn set_east_open(&mut self, c: Coord, open: bool) {
        if open {
            self.east_open.insert(c.raw());
        } else {
            self.east_open.remove(c.raw());
        }
    }

    /// Open every edge inside `area`, including the edges between `area`
    /// and its neighbors to the north and east.
    pub fn open_area(&mut self, area: WorldArea) {
        for c in area.coords() {
            self.set_north_open(c, true);
            self.set_east_open(c, true);
        }
    }

    pub fn load<R: Read>(reader: R) -> IndexResult<Self> {
        let mut r = BufReader::new(reader);
        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        let version = i32::from_be_bytes(tag);
        if version != COLLISION_MAP_VERSION {
            return Err(IndexError::UnsupportedVersion {
                resource: COLLISION_RESOURCE,
                found: version,
                expected: COLLISION_MAP_VERSION,
            });
        }
        let north_open = SparseBitSet::read_from(&mut r, COLLISION_RESOURCE)?;
        let east_open = SparseBitSet::read_from(&mut r, COLLISION_RESOURCE)?;
        log::info!(
            "loaded collision map: {} north edges, {} east edges",
            north_open.len(),
            east_open.len()
        );
        Ok(Self {
            north_open,
            east_open,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> IndexResult<Self> {
        Self::load(File::open(path)?)
    }

    pub fn write<W: Write>(&self, writer: W) -> IndexResult<()> {
        let mut w = BufWriter::new(writer);
        w.write_all(&COLLISION_MAP_VERSION.to_be_bytes())?;
        self.north_open.write_to(&mut w)?;
        self.east_open.write_to(&mut w)?;
        w.flush()?;
        Ok(())
    }
}

impl CollisionSurface for CollisionMap {
    /// A tile is walkable if at least one of its cardinal edges is open.
    #[inline]
    fn walkable(&self, c: Coord) -> bool {
        !self.blocked_north(c)
            || !self.blocked_east(c)
            || !self.blocked_south(c)
            || !self.blocked_west(c)
    }

    #[inline]
    fn blocked_north(&self, c: Coord) -> bool {
        !self.north_open.contains(c.raw())
    }

    #[inline]
    fn blocked_east(&self, c: Coord) -> bool {
        !self.east_open.contains(c.raw())
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Whether a scene object with this name is a door or gate that the search
/// may walk through.
pub fn is_passable_door(name: &str) -> bool {
    let name = name.to_lowercase();
    (name.contains("door") || name.contains("gate")) && !name.contains("trapdoor")
}

/// Hand-curated corrections applied on top of collision data.
#[derive(Clone, Debug, Default)]
pub struct TileOverrides {
    blacklist: FxHashSet<Coord>,
    doors: FxHashSet<Coord>,
}

impl TileOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles that are always blocked.
    pub fn with_blacklist(blacklist: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            blacklist: blacklist.into_iter().collect(),
            doors: FxHashSet::default(),
        }
    }

    /// Always block `c`, even if it is also a door.
    pub fn blacklist(&mut self, c: Coord) {
        self.blacklist.insert(c);
    }

    /// Open every edge touching `c`.
    pub fn add_door(&mut self, c: Coord) {
        self.doors.insert(c);
    }

    /// Register a scene object; doors and gates become passable. Returns
    /// whether the object was treated as a door.
    pub fn add_scene_object(&mut self, c: Coord, name: &str) -> bool {
        let door = is_passable_door(name);
        if door {
            self.doors.insert(c);
        }
        door
    }

    #[inline]
    pub fn is_blacklisted(&self, c: Coord) -> bool {
        self.blacklist.contains(&c)
    }

    #[inline]
    pub fn is_door(&self, c: Coord) -> bool {
        self.doors.contains(&c)
    }

    /// Number of blacklisted tiles.
    pub fn blacklist_len(&self) -> usize {
        self.blacklist.len()
    }

    /// Number of door tiles.
    pub fn door_len(&self) -> usize {
        self.doors.len()
    }
}

/// A surface with [`TileOverrides`] applied.
///
/// Edges touching a door tile are always open. Blacklisted tiles are not
/// walkable, block every edge touching them and are excluded from search,
/// even when they are also doors.
#[derive(Clone, Debug)]
pub struct WithOverrides<'a, S> {
    inner: S,
    overrides: &'a TileOverrides,
}

impl<'a, S: CollisionSurface> WithOverrides<'a, S> {
    pub fn new(inner: S, overrides: &'a TileOverrides) -> Self {
        Self { inner, overrides }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[inline]
    fn edge(&self, a: Coord, b: Coord, inner: impl FnOnce() -> bool) -> bool {
        if self.overrides.is_blacklisted(a) || self.overrides.is_blacklisted(b) {
            return true;
        }
        if self.overrides.is_door(a) || self.overrides.is_door(b) {
            return false;
        }
        inner()
    }
}

impl<S: CollisionSurface> CollisionSurface for WithOverrides<'_, S> {
    fn walkable(&self, c: Coord) -> bool {
        if self.overrides.is_blacklisted(c) {
            return false;
        }
        self.overrides.is_door(c) || self.inner.walkable(c)
    }

    fn blocked_north(&self, c: Coord) -> bool {
        self.edge(c, c.shift(0, 1), || self.inner.blocked_north(c))
    }

    fn blocked_east(&self, c: Coord) -> bool {
        self.edge(c, c.shift(1, 0), || self.inner.blocked_east(c))
    }

    fn excluded(&self, c: Coord) -> bool {
        self.overrides.is_blacklisted(c) || self.inner.excluded(c)
    }
}

// ---------------------------------------------------------------------------
// InstanceSplit
// ---------------------------------------------------------------------------

/// Instanced regions live east of this x; everything at or west of it is
/// the static world.
pub const INSTANCE_SPLIT_X: i32 = 6000;

/// A surface that answers for the static world from a global surface and for
/// instanced regions from a live snapshot.
///
/// Each query is routed on the x of the tile it is asked about, so the east
/// edge of the last global column comes from the global surface and the
/// west edge of the first instanced column resolves to that same edge.
#[derive(Clone, Debug)]
pub struct InstanceSplit<G, L> {
    global: G,
    local: L,
    split_x: i32,
}

impl<G: CollisionSurface, L: CollisionSurface> InstanceSplit<G, L> {
    /// Split at [`INSTANCE_SPLIT_X`].
    pub fn new(global: G, local: L) -> Self {
        Self::with_split(global, local, INSTANCE_SPLIT_X)
    }

    /// Tiles with `x > split_x` go to `local`.
    pub fn with_split(global: G, local: L, split_x: i32) -> Self {
        Self {
            global,
            local,
            split_x,
        }
    }

    #[inline]
    pub fn is_instanced(&self, c: Coord) -> bool {
        c.x() > self.split_x
    }

    #[inline]
    fn route(&self, c: Coord) -> &dyn CollisionSurface {
        if self.is_instanced(c) {
            &self.local
        } else {
            &self.global
        }
    }
}

impl<G: CollisionSurface, L: CollisionSurface> CollisionSurface for InstanceSplit<G, L> {
    fn walkable(&self, c: Coord) -> bool {
        self.route(c).walkable(c)
    }

    fn blocked_north(&self, c: Coord) -> bool {
        self.route(c).blocked_north(c)
    }

    fn blocked_east(&self, c: Coord) -> bool {
        self.route(c).blocked_east(c)
    }

    fn excluded(&self, c: Coord) -> bool {
        self.route(c).excluded(c)
    }
}

// ---------------------------------------------------------------------------
// HazardAware
// ---------------------------------------------------------------------------

/// A surface that refuses to stand on or enter tiles whose tile type is in a
/// hazard set. Edges are left to the inner surface, so a search starting on
/// a hazard can still leave it.
#[derive(Clone, Debug)]
pub struct HazardAware<'a, S> {
    inner: S,
    types: &'a TileTypeMap,
    hazards: u16,
}

impl<'a, S: CollisionSurface> HazardAware<'a, S> {
    /// `hazards` lists the tile type values (`0..16`) to avoid.
    pub fn new(inner: S, types: &'a TileTypeMap, hazards: &[u8]) -> Self {
        let hazards = hazards
            .iter()
            .filter(|&&t| t < 16)
            .fold(0u16, |m, &t| m | (1 << t));
        Self {
            inner,
            types,
            hazards,
        }
    }

    #[inline]
    pub fn is_hazard(&self, c: Coord) -> bool {
        self.hazards & (1 << self.types.tile_type(c)) != 0
    }
}

impl<S: CollisionSurface> CollisionSurface for HazardAware<'_, S> {
    fn walkable(&self, c: Coord) -> bool {
        !self.is_hazard(c) && self.inner.walkable(c)
    }

    #[inline]
    fn blocked_north(&self, c: Coord) -> bool {
        self.inner.blocked_north(c)
    }

    #[inline]
    fn blocked_east(&self, c: Coord) -> bool {
        self.inner.blocked_east(c)
    }

    fn excluded(&self, c: Coord) -> bool {
        self.is_hazard(c) || self.inner.excluded(c)
    }
}
