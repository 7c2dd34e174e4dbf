//! The eight movement directions and the per-tile open-direction mask.

use tilenav_core::Coord;

/// One of the eight compass directions. Y grows north.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// All directions in mask bit order.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// The order in which a search expands neighbors: cardinals first
    /// (W, E, S, N), then diagonals (SW, SE, NW, NE).
    pub const EXPANSION_ORDER: [Direction; 8] = [
        Direction::West,
        Direction::East,
        Direction::South,
        Direction::North,
        Direction::SouthWest,
        Direction::SouthEast,
        Direction::NorthWest,
        Direction::NorthEast,
    ];

    /// `(dx, dy)` step for this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (-1, 1),
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
        }
    }

    /// Bit of this direction inside a [`DirMask`].
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The neighbor of `c` in this direction (wraps at the world edge).
    #[inline]
    pub const fn step(self, c: Coord) -> Coord {
        let (dx, dy) = self.delta();
        c.shift(dx, dy)
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent on
    /// the same plane.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        if from.plane() != to.plane() {
            return None;
        }
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        Direction::ALL.into_iter().find(|d| d.delta() == (dx, dy))
    }
}

// ---------------------------------------------------------------------------
// DirMask
// ---------------------------------------------------------------------------

/// Eight-bit set of open directions, bit order NW, N, NE, W, E, SW, S, SE.
/// A set bit means movement in that direction is allowed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirMask(pub u8);

impl DirMask {
    pub const NONE: DirMask = DirMask(0);
    pub const ALL: DirMask = DirMask(0xFF);

    const CARDINALS: u8 = (1 << Direction::North as u8)
        | (1 << Direction::West as u8)
        | (1 << Direction::East as u8)
        | (1 << Direction::South as u8);

    #[inline]
    pub const fn contains(self, d: Direction) -> bool {
        self.0 & d.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, d: Direction) {
        self.0 |= d.bit();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether at least one cardinal direction is open.
    #[inline]
    pub const fn any_cardinal(self) -> bool {
        self.0 & Self::CARDINALS != 0
    }

    /// Open directions in expansion order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::EXPANSION_ORDER
            .into_iter()
            .filter(move |&d| self.contains(d))
    }
}

// ---------------------------------------------------------------------------
// Neighbors
// ---------------------------------------------------------------------------

/// Reusable buffer for neighbor enumeration.
#[derive(Debug)]
pub struct Neighbors {
    buf: Vec<Coord>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Neighbors of `c` through every open direction of `mask`, in
    /// expansion order.
    pub fn open(&mut self, c: Coord, mask: DirMask) -> &[Coord] {
        self.buf.clear();
        self.buf.extend(mask.iter().map(|d| d.step(c)));
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_mask_order() {
        assert_eq!(Direction::NorthWest.bit(), 0x01);
        assert_eq!(Direction::North.bit(), 0x02);
        assert_eq!(Direction::NorthEast.bit(), 0x04);
        assert_eq!(Direction::West.bit(), 0x08);
        assert_eq!(Direction::East.bit(), 0x10);
        assert_eq!(Direction::SouthWest.bit(), 0x20);
        assert_eq!(Direction::South.bit(), 0x40);
        assert_eq!(Direction::SouthEast.bit(), 0x80);
    }

    #[test]
    fn between_finds_adjacent_steps_only() {
        let c = Coord::new(10, 10, 0);
        assert_eq!(
            Direction::between(c, Coord::new(11, 11, 0)),
            Some(Direction::NorthEast)
        );
        assert_eq!(
            Direction::between(c, Coord::new(10, 9, 0)),
            Some(Direction::South)
        );
        assert_eq!(Direction::between(c, Coord::new(12, 10, 0)), None);
        assert_eq!(Direction::between(c, Coord::new(10, 11, 1)), None);
        assert_eq!(Direction::between(c, c), None);
    }

    #[test]
    fn neighbors_come_out_in_expansion_order() {
        let mut nb = Neighbors::new();
        let c = Coord::new(5, 5, 0);
        let all = nb.open(c, DirMask::ALL).to_vec();
        assert_eq!(
            all,
            vec![
                Coord::new(4, 5, 0),
                Coord::new(6, 5, 0),
                Coord::new(5, 4, 0),
                Coord::new(5, 6, 0),
                Coord::new(4, 4, 0),
                Coord::new(6, 4, 0),
                Coord::new(4, 6, 0),
                Coord::new(6, 6, 0),
            ]
        );

        let mut m = DirMask::NONE;
        m.insert(Direction::North);
        m.insert(Direction::SouthEast);
        assert_eq!(nb.open(c, m), &[Coord::new(5, 6, 0), Coord::new(6, 4, 0)]);
        assert!(m.any_cardinal());
    }
}
