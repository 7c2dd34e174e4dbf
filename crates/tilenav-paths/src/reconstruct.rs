//! Turning a parent map into a walkable list of steps.

use std::fmt;

use tilenav_core::{Coord, WorldPoint};

use crate::parents::ParentMap;
use crate::requirements::PlayerState;
use crate::transport::{Transport, TransportGraph};

/// One tile of a path, with the transport taken to arrive on it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub position: Coord,
    pub transport: Option<Transport>,
}

impl Step {
    pub fn walk(position: Coord) -> Self {
        Self {
            position,
            transport: None,
        }
    }

    #[inline]
    pub fn point(&self) -> WorldPoint {
        self.position.point()
    }

    #[inline]
    pub fn is_transport(&self) -> bool {
        self.transport.is_some()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.transport {
            Some(t) => write!(f, "{} via transport {}", self.position, t.id),
            None => write!(f, "{}", self.position),
        }
    }
}

/// Walk `parents` back from `goal` and annotate every step that a transport
/// usable by `player` leads to from the previous step.
///
/// Returns an empty list if `goal` was never reached.
pub fn reconstruct(
    parents: &ParentMap,
    goal: Coord,
    transports: &TransportGraph,
    player: &dyn PlayerState,
) -> Vec<Step> {
    let coords = parents.path_to(goal);
    let mut steps: Vec<Step> = Vec::with_capacity(coords.len());
    let mut previous: Option<Coord> = None;
    for c in coords {
        let transport = previous.and_then(|p| {
            transports
                .eligible_from(p, player)
                .find(|t| t.destination == c)
                .cloned()
        });
        steps.push(Step {
            position: c,
            transport,
        });
        previous = Some(c);
    }
    steps
}

/// Number of transports used along a path.
pub fn transport_count(steps: &[Step]) -> usize {
    steps.iter().filter(|s| s.is_transport()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{PlayerSnapshot, Requirement, Requirements};

    fn chain(coords: &[Coord]) -> ParentMap {
        let mut p = ParentMap::new();
        p.insert_root(coords[0]);
        for w in coords.windows(2) {
            p.insert(w[1], w[0]);
        }
        p
    }

    #[test]
    fn plain_adjacency_carries_no_transport() {
        let coords: Vec<Coord> = (0..5).map(|x| Coord::new(x, 0, 0)).collect();
        let steps = reconstruct(
            &chain(&coords),
            coords[4],
            &TransportGraph::new(),
            &PlayerSnapshot::new(),
        );
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].position, coords[0]);
        assert_eq!(steps[4].position, coords[4]);
        assert_eq!(transport_count(&steps), 0);
    }

    #[test]
    fn transport_is_attached_to_arrival_step() {
        let a = Coord::new(10, 10, 0);
        let b = Coord::new(11, 10, 0);
        let up = Coord::new(11, 10, 1);
        let mut g = TransportGraph::new();
        g.insert(Transport::new(7, b, up).with_action("Climb-up", Some(16683)));

        let steps = reconstruct(&chain(&[a, b, up]), up, &g, &PlayerSnapshot::new());
        assert_eq!(steps.len(), 3);
        assert!(steps[1].transport.is_none());
        assert_eq!(steps[2].transport.as_ref().map(|t| t.id), Some(7));
        assert_eq!(steps[2].to_string(), "(11, 10, 1) via transport 7");
    }

    #[test]
    fn ineligible_transport_is_not_attached() {
        let a = Coord::new(0, 0, 0);
        let b = Coord::new(1, 0, 0);
        let mut g = TransportGraph::new();
        g.insert(
            Transport::new(1, a, b)
                .with_requirements(Requirements(vec![Requirement::World { members: true }])),
        );
        let steps = reconstruct(&chain(&[a, b]), b, &g, &PlayerSnapshot::new());
        assert!(steps[1].transport.is_none());
    }

    #[test]
    fn unreached_goal_is_empty() {
        let p = chain(&[Coord::new(0, 0, 0)]);
        let steps = reconstruct(
            &p,
            Coord::new(5, 5, 0),
            &TransportGraph::new(),
            &PlayerSnapshot::new(),
        );
        assert!(steps.is_empty());
    }
}
