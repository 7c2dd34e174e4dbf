//! Tile coordinates: the packed [`Coord`] key and the unpacked [`WorldPoint`].
//!
//! A `Coord` fits a whole `(x, y, plane)` triple into one `u32` so that every
//! search-internal container can be a flat integer-keyed map:
//!
//! ```text
//!  31   28 27                          13 12                0
//! +-------+------------------------------+------------------+
//! | plane |              y               |        x         |
//! +-------+------------------------------+------------------+
//!   4 bit             15 bit                    13 bit
//! ```
//!
//! Components outside their range are masked, not rejected: `x = -1` packs
//! to `x = 8191`, `x = 8192` packs to `x = 0`. Walking off an edge of the
//! world therefore wraps around to the opposite edge.

use std::fmt;

const X_BITS: u32 = 13;
const Y_BITS: u32 = 15;
const PLANE_BITS: u32 = 4;

const X_MASK: u32 = (1 << X_BITS) - 1;
const Y_MASK: u32 = (1 << Y_BITS) - 1;
const PLANE_MASK: u32 = (1 << PLANE_BITS) - 1;

const Y_SHIFT: u32 = X_BITS;
const PLANE_SHIFT: u32 = X_BITS + Y_BITS;

/// Largest encodable x.
pub const MAX_X: i32 = X_MASK as i32;
/// Largest encodable y.
pub const MAX_Y: i32 = Y_MASK as i32;
/// Largest encodable plane.
pub const MAX_PLANE: i32 = PLANE_MASK as i32;

/// Pack `(x, y, plane)` into a [`Coord`], truncating each component to its
/// bit width.
#[inline]
pub const fn compress(x: i32, y: i32, plane: i32) -> Coord {
    Coord(
        (x as u32 & X_MASK)
            | ((y as u32 & Y_MASK) << Y_SHIFT)
            | ((plane as u32 & PLANE_MASK) << PLANE_SHIFT),
    )
}

/// Unpack a [`Coord`] into `(x, y, plane)`.
#[inline]
pub const fn decompress(c: Coord) -> (i32, i32, i32) {
    (c.x(), c.y(), c.plane())
}

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A packed tile coordinate.
///
/// Ordering is the raw integer ordering, which sorts by plane, then y, then x.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord(pub u32);

impl Coord {
    /// Pack a tile position. See [`compress`].
    #[inline]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        compress(x, y, plane)
    }

    /// The raw packed value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn x(self) -> i32 {
        (self.0 & X_MASK) as i32
    }

    #[inline]
    pub const fn y(self) -> i32 {
        ((self.0 >> Y_SHIFT) & Y_MASK) as i32
    }

    #[inline]
    pub const fn plane(self) -> i32 {
        ((self.0 >> PLANE_SHIFT) & PLANE_MASK) as i32
    }

    /// Return the coordinate shifted by `(dx, dy)` on the same plane.
    ///
    /// Follows the masking policy of [`compress`], so stepping past the
    /// world edge wraps.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        compress(self.x() + dx, self.y() + dy, self.plane())
    }

    /// Unpack into a [`WorldPoint`].
    #[inline]
    pub const fn point(self) -> WorldPoint {
        WorldPoint::new(self.x(), self.y(), self.plane())
    }
}

impl From<WorldPoint> for Coord {
    fn from(p: WorldPoint) -> Self {
        p.pack()
    }
}

impl From<Coord> for u32 {
    fn from(c: Coord) -> Self {
        c.0
    }
}

impl From<u32> for Coord {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.plane())
    }
}

// ---------------------------------------------------------------------------
// WorldPoint
// ---------------------------------------------------------------------------

/// An unpacked tile position. X grows east, Y grows north.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Return a point shifted by (dx, dy) on the same plane.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            plane: self.plane,
        }
    }

    /// Pack into a [`Coord`].
    #[inline]
    pub const fn pack(self) -> Coord {
        compress(self.x, self.y, self.plane)
    }

    /// Whether every component is inside the encodable domain, i.e. packing
    /// is lossless.
    #[inline]
    pub const fn in_domain(self) -> bool {
        self.x >= 0
            && self.x <= MAX_X
            && self.y >= 0
            && self.y <= MAX_Y
            && self.plane >= 0
            && self.plane <= MAX_PLANE
    }
}

impl From<Coord> for WorldPoint {
    fn from(c: Coord) -> Self {
        c.point()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn world_point_round_trip() {
        let p = WorldPoint::new(3222, 3218, 0);
        let json = serde_json::to_string(&p).unwrap();
        let back: WorldPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
