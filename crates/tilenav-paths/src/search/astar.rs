//! Best-first search on `g + h`.
//!
//! Every walking step costs 1, diagonal or not; a transport costs its delay
//! plus one. The estimate is [`Goal::estimate`]: Manhattan distance with a
//! flat penalty per plane change, minimised over area tiles. It is not
//! admissible for diagonal moves, so paths are short but not always
//! shortest.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use tilenav_core::Coord;

use super::{AbortReason, Goal, Search, SearchContext, SearchOutcome};
use crate::collision::CollisionSurface;
use crate::direction::Neighbors;
use crate::parents::ParentMap;

#[derive(Copy, Clone, Debug)]
struct Node {
    g: u64,
    parent: Option<Coord>,
    closed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeRef {
    coord: Coord,
    g: u64,
    f: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lowest f first. Ties go to the
        // deeper node, then to the lower coordinate.
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn estimate(goal: &Goal, c: Coord) -> u64 {
    u64::try_from(goal.estimate(c)).unwrap_or(0)
}

pub fn search<S: CollisionSurface + ?Sized>(
    ctx: &SearchContext<'_, S>,
    starts: &[Coord],
    goal: &Goal,
) -> Search {
    let mut nodes: FxHashMap<Coord, Node> = FxHashMap::default();
    let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
    let mut expansions = 0u64;

    for &s in starts {
        if nodes.contains_key(&s) {
            continue;
        }
        nodes.insert(
            s,
            Node {
                g: 0,
                parent: None,
                closed: false,
            },
        );
        open.push(NodeRef {
            coord: s,
            g: 0,
            f: estimate(goal, s),
        });
    }

    let mut nbuf = Neighbors::new();
    let push = |nodes: &mut FxHashMap<Coord, Node>,
                open: &mut BinaryHeap<NodeRef>,
                from: Coord,
                to: Coord,
                g: u64| {
        if ctx.surface.excluded(to) {
            return;
        }
        if let Some(n) = nodes.get(&to) {
            if n.closed || g >= n.g {
                return;
            }
        }
        nodes.insert(
            to,
            Node {
                g,
                parent: Some(from),
                closed: false,
            },
        );
        open.push(NodeRef {
            coord: to,
            g,
            f: g + estimate(goal, to),
        });
    };

    let outcome = 'search: loop {
        if nodes.len() > ctx.config.max_visited {
            log::warn!("search gave up after reaching {} coordinates", nodes.len());
            break 'search SearchOutcome::Aborted(AbortReason::VisitedCap);
        }
        let Some(current) = open.pop() else {
            break 'search SearchOutcome::Exhausted;
        };
        let ci = current.coord;

        // Skip stale entries.
        match nodes.get_mut(&ci) {
            Some(n) if !n.closed && n.g == current.g => n.closed = true,
            _ => continue,
        }
        expansions += 1;

        if goal.reached(ci) {
            break 'search SearchOutcome::Found(ci);
        }

        let mask = ctx.surface.all_directions(ci);
        for &np in nbuf.open(ci, mask) {
            push(&mut nodes, &mut open, ci, np, current.g + 1);
        }
        for t in ctx.transports.eligible_from(ci, ctx.player) {
            let cost = u64::from(t.delay) + 1;
            push(&mut nodes, &mut open, ci, t.destination, current.g + cost);
        }
    };

    let visited = nodes.len();
    let parents = match outcome {
        SearchOutcome::Found(end) => chain_to(&nodes, end),
        _ => ParentMap::new(),
    };
    Search {
        outcome,
        parents,
        visited,
        expansions,
    }
}

/// Parent map holding only the chain from a root to `goal`.
fn chain_to(nodes: &FxHashMap<Coord, Node>, goal: Coord) -> ParentMap {
    let mut coords = Vec::new();
    let mut current = Some(goal);
    while let Some(c) = current {
        coords.push(c);
        current = nodes.get(&c).and_then(|n| n.parent);
        if coords.len() > nodes.len() {
            break;
        }
    }
    coords.reverse();

    let mut parents = ParentMap::with_capacity(coords.len());
    if let Some(&root) = coords.first() {
        parents.insert_root(root);
    }
    for w in coords.windows(2) {
        parents.insert(w[1], w[0]);
    }
    parents
}
