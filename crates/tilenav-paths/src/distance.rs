use tilenav_core::{Coord, WorldPoint};

/// Tile cost assigned to one plane of vertical separation by [`heuristic`].
pub const PLANE_COST: i32 = 100;

/// Manhattan (L1) distance in the xy plane.
#[inline]
pub fn manhattan(a: WorldPoint, b: WorldPoint) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance in the xy plane.
#[inline]
pub fn chebyshev(a: WorldPoint, b: WorldPoint) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Squared Euclidean distance in the xy plane.
#[inline]
pub fn euclidean_sq(a: WorldPoint, b: WorldPoint) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

/// A* estimate between packed coordinates: Manhattan distance plus
/// [`PLANE_COST`] per plane of separation.
#[inline]
pub fn heuristic(a: Coord, b: Coord) -> i32 {
    manhattan(a.point(), b.point()) + (a.plane() - b.plane()).abs() * PLANE_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics() {
        let a = WorldPoint::new(0, 0, 0);
        let b = WorldPoint::new(3, -4, 0);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(chebyshev(a, b), 4);
        assert_eq!(euclidean_sq(a, b), 25);
    }

    #[test]
    fn heuristic_charges_plane_changes() {
        let a = Coord::new(10, 10, 0);
        assert_eq!(heuristic(a, Coord::new(12, 9, 0)), 3);
        assert_eq!(heuristic(a, Coord::new(10, 10, 2)), 200);
    }
}
