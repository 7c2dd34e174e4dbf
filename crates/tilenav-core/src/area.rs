//! Rectangular target regions on a single plane.

use std::fmt;

use crate::coord::{Coord, WorldPoint};

// ---------------------------------------------------------------------------
// WorldArea
// ---------------------------------------------------------------------------

/// A `width × height` rectangle of tiles on one plane, anchored at its
/// south-west corner `(x, y)`.
///
/// A width or height of zero (or less) makes the area empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub plane: i32,
}

impl WorldArea {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32, plane: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            plane,
        }
    }

    /// Build the smallest area spanning two corners (inclusive) on `a`'s plane.
    pub fn from_corners(a: WorldPoint, b: WorldPoint) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Self {
            x: x0,
            y: y0,
            width: a.x.max(b.x) - x0 + 1,
            height: a.y.max(b.y) - y0 + 1,
            plane: a.plane,
        }
    }

    /// A one-tile area around `p`, extended by `radius` in every direction.
    pub fn around(p: WorldPoint, radius: i32) -> Self {
        let r = radius.max(0);
        Self::new(p.x - r, p.y - r, 2 * r + 1, 2 * r + 1, p.plane)
    }

    /// Total number of tiles.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `p` lies inside the area (same plane required).
    #[inline]
    pub fn contains(self, p: WorldPoint) -> bool {
        p.plane == self.plane
            && p.x >= self.x
            && p.x < self.x + self.width
            && p.y >= self.y
            && p.y < self.y + self.height
    }

    /// Whether the packed coordinate lies inside the area.
    #[inline]
    pub fn contains_coord(self, c: Coord) -> bool {
        self.contains(c.point())
    }

    /// The centre tile (rounded towards the south-west corner).
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(
            self.x + (self.width - 1).max(0) / 2,
            self.y + (self.height - 1).max(0) / 2,
            self.plane,
        )
    }

    /// Row-major iterator over every tile in the area.
    #[inline]
    pub fn iter(self) -> AreaIter {
        AreaIter {
            area: self,
            dx: 0,
            dy: 0,
        }
    }

    /// Packed coordinates of every tile in the area, row-major.
    pub fn coords(self) -> impl Iterator<Item = Coord> {
        self.iter().map(WorldPoint::pack)
    }
}

impl IntoIterator for WorldArea {
    type Item = WorldPoint;
    type IntoIter = AreaIter;
    #[inline]
    fn into_iter(self) -> AreaIter {
        self.iter()
    }
}

impl fmt::Display for WorldArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {})+{}x{} @{}]",
            self.x, self.y, self.width, self.height, self.plane
        )
    }
}

/// Pack every tile of every area into a flat list, in area order.
pub fn compressed_points(areas: &[WorldArea]) -> Vec<Coord> {
    let mut out = Vec::with_capacity(areas.iter().map(|a| a.len()).sum());
    for a in areas {
        out.extend(a.coords());
    }
    out
}

// ---------------------------------------------------------------------------
// AreaIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the tiles of a [`WorldArea`].
#[derive(Clone, Debug)]
pub struct AreaIter {
    area: WorldArea,
    dx: i32,
    dy: i32,
}

impl Iterator for AreaIter {
    type Item = WorldPoint;

    #[inline]
    fn next(&mut self) -> Option<WorldPoint> {
        if self.area.is_empty() || self.dy >= self.area.height {
            return None;
        }
        let p = WorldPoint::new(self.area.x + self.dx, self.area.y + self.dy, self.area.plane);
        self.dx += 1;
        if self.dx >= self.area.width {
            self.dx = 0;
            self.dy += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.area.is_empty() || self.dy >= self.area.height {
            return (0, Some(0));
        }
        let w = self.area.width as usize;
        let remaining_in_row = (self.area.width - self.dx) as usize;
        let remaining_rows = (self.area.height - self.dy - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for AreaIter {}
