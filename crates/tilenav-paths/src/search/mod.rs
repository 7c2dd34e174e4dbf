//! Search strategies over a [`CollisionSurface`] plus a [`TransportGraph`].
//!
//! | Strategy | Frontier | Transport cost |
//! |---|---|---|
//! | [`hybrid_bfs`] | [`DelayedReleaseQueue`](crate::queue::DelayedReleaseQueue) | `delay` expansion cycles |
//! | [`astar`] | binary heap on `g + h` | `delay + 1` |
//!
//! Both produce a [`Search`]: an outcome plus the parent map needed to
//! rebuild the path.

pub mod astar;
pub mod hybrid_bfs;

use std::fmt;

use rustc_hash::FxHashSet;
use tilenav_core::{Coord, WorldArea, compressed_points};

use crate::collision::CollisionSurface;
use crate::config::{Algorithm, SearchConfig};
use crate::distance::heuristic;
use crate::parents::ParentMap;
use crate::requirements::PlayerState;
use crate::transport::TransportGraph;

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

/// What a search is looking for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Goal {
    Point(Coord),
    /// Any tile of any area; the first one reached wins.
    Areas(FxHashSet<Coord>),
}

impl Goal {
    /// Every tile of `areas` as one goal set.
    pub fn areas(areas: &[WorldArea]) -> Self {
        Goal::Areas(compressed_points(areas).into_iter().collect())
    }

    #[inline]
    pub fn reached(&self, c: Coord) -> bool {
        match self {
            Goal::Point(t) => *t == c,
            Goal::Areas(set) => set.contains(&c),
        }
    }

    /// Whether no tile can satisfy the goal.
    pub fn is_empty(&self) -> bool {
        match self {
            Goal::Point(_) => false,
            Goal::Areas(set) => set.is_empty(),
        }
    }

    /// Lowest [`heuristic`] from `c` to any goal tile.
    pub fn estimate(&self, c: Coord) -> i32 {
        match self {
            Goal::Point(t) => heuristic(c, *t),
            Goal::Areas(set) => set
                .iter()
                .map(|&t| heuristic(c, t))
                .min()
                .unwrap_or(i32::MAX),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Why a search gave up before exhausting its frontier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    VisitedCap,
    QueueFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal tile that was reached.
    Found(Coord),
    /// The point target cannot be stood on; nothing was expanded.
    TargetBlocked,
    /// Every reachable tile was expanded without meeting the goal.
    Exhausted,
    Aborted(AbortReason),
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(c) => write!(f, "found {c}"),
            SearchOutcome::TargetBlocked => write!(f, "target blocked"),
            SearchOutcome::Exhausted => write!(f, "exhausted"),
            SearchOutcome::Aborted(AbortReason::VisitedCap) => write!(f, "aborted: visited cap"),
            SearchOutcome::Aborted(AbortReason::QueueFull) => write!(f, "aborted: queue full"),
        }
    }
}

/// Result of one search.
#[derive(Debug)]
pub struct Search {
    pub outcome: SearchOutcome,
    /// Parent links; for A* only those along the found path.
    pub parents: ParentMap,
    /// Coordinates reached.
    pub visited: usize,
    /// Coordinates expanded.
    pub expansions: u64,
}

impl Search {
    fn without_expansion(outcome: SearchOutcome) -> Self {
        Self {
            outcome,
            parents: ParentMap::new(),
            visited: 0,
            expansions: 0,
        }
    }

    /// The goal tile reached, if the search succeeded.
    pub fn goal(&self) -> Option<Coord> {
        match self.outcome {
            SearchOutcome::Found(c) => Some(c),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchContext
// ---------------------------------------------------------------------------

/// Everything a search reads. Shared, immutable, and owned by the caller.
pub struct SearchContext<'a, S: ?Sized> {
    pub surface: &'a S,
    pub transports: &'a TransportGraph,
    pub player: &'a dyn PlayerState,
    pub config: &'a SearchConfig,
}

impl<'a, S: CollisionSurface + ?Sized> SearchContext<'a, S> {
    pub fn new(
        surface: &'a S,
        transports: &'a TransportGraph,
        player: &'a dyn PlayerState,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            surface,
            transports,
            player,
            config,
        }
    }
}

/// Run the configured strategy from `starts` towards `goal`.
///
/// A point goal that is not walkable fails immediately with
/// [`SearchOutcome::TargetBlocked`].
pub fn run<S: CollisionSurface + ?Sized>(
    ctx: &SearchContext<'_, S>,
    starts: &[Coord],
    goal: &Goal,
) -> Search {
    if let Goal::Point(t) = goal {
        if !ctx.surface.walkable(*t) {
            log::info!("could not generate path to blocked tile {t}");
            return Search::without_expansion(SearchOutcome::TargetBlocked);
        }
    }
    if goal.is_empty() || starts.is_empty() {
        return Search::without_expansion(SearchOutcome::Exhausted);
    }

    let search = match ctx.config.algorithm {
        Algorithm::HybridBfs => hybrid_bfs::search(ctx, starts, goal),
        Algorithm::AStar => astar::search(ctx, starts, goal),
    };
    log::debug!(
        "{:?}: {} after {} expansions, {} visited",
        ctx.config.algorithm,
        search.outcome,
        search.expansions,
        search.visited
    );
    search
}
