//! Breadth-first search that interleaves one-step moves with delayed
//! transport edges.
//!
//! Walking neighbors go to the immediate lane of a
//! [`DelayedReleaseQueue`]; transport destinations go to its delayed lane and
//! surface once the queue has been dequeued `delay` more times. Every
//! coordinate gets exactly one parent, the first one to reach it.

use tilenav_core::Coord;

use super::{AbortReason, Goal, Search, SearchContext, SearchOutcome};
use crate::collision::CollisionSurface;
use crate::direction::Neighbors;
use crate::error::PathResult;
use crate::parents::ParentMap;
use crate::queue::DelayedReleaseQueue;

pub fn search<S: CollisionSurface + ?Sized>(
    ctx: &SearchContext<'_, S>,
    starts: &[Coord],
    goal: &Goal,
) -> Search {
    let mut parents = ParentMap::new();
    let mut queue = DelayedReleaseQueue::new(ctx.config.queue_capacity);

    let outcome = match expand_all(ctx, starts, goal, &mut parents, &mut queue) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{e}; consider raising the queue capacity");
            SearchOutcome::Aborted(AbortReason::QueueFull)
        }
    };

    Search {
        outcome,
        visited: parents.len(),
        parents,
        expansions: queue.expansions(),
    }
}

fn expand_all<S: CollisionSurface + ?Sized>(
    ctx: &SearchContext<'_, S>,
    starts: &[Coord],
    goal: &Goal,
    parents: &mut ParentMap,
    queue: &mut DelayedReleaseQueue<Coord>,
) -> PathResult<SearchOutcome> {
    for &s in starts {
        if parents.insert_root(s) {
            queue.enqueue(s)?;
        }
    }

    let mut nbuf = Neighbors::new();
    while !queue.is_empty() {
        if parents.len() > ctx.config.max_visited {
            log::warn!(
                "search gave up after reaching {} coordinates",
                parents.len()
            );
            return Ok(SearchOutcome::Aborted(AbortReason::VisitedCap));
        }
        let Some(current) = queue.dequeue()? else {
            break;
        };
        if goal.reached(current) {
            return Ok(SearchOutcome::Found(current));
        }

        let mask = ctx.surface.all_directions(current);
        for &n in nbuf.open(current, mask) {
            if !ctx.surface.excluded(n) && parents.insert(n, current) {
                queue.enqueue(n)?;
            }
        }

        for t in ctx.transports.eligible_from(current, ctx.player) {
            let dest = t.destination;
            if !ctx.surface.excluded(dest) && parents.insert(dest, current) {
                queue.enqueue_delayed(dest, t.delay);
            }
        }
    }
    Ok(SearchOutcome::Exhausted)
}
