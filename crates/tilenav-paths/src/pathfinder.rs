//! The path-finding facade: seed, search, reconstruct.

use tilenav_core::{Coord, WorldArea};

use crate::collision::CollisionSurface;
use crate::config::SearchConfig;
use crate::reconstruct::{Step, reconstruct};
use crate::requirements::PlayerState;
use crate::search::{self, Goal, Search, SearchContext};
use crate::teleport::Teleport;
use crate::transport::TransportGraph;

/// Finds paths for one player over borrowed world data.
///
/// The surface, transports and teleports are shared snapshots; a pathfinder
/// holds no per-search state besides the teleport used by the last path.
///
/// The player is held as `&dyn PlayerState`, which is not `Sync`, so a
/// pathfinder stays on the thread that built it. To search in parallel,
/// share the snapshots and build one pathfinder per thread.
pub struct Pathfinder<'a, S: ?Sized> {
    surface: &'a S,
    transports: &'a TransportGraph,
    player: &'a dyn PlayerState,
    teleports: &'a [Teleport],
    config: SearchConfig,
    teleport: Option<Teleport>,
}

impl<'a, S: CollisionSurface + ?Sized> Pathfinder<'a, S> {
    /// A pathfinder with no teleports and the default [`SearchConfig`].
    pub fn new(
        surface: &'a S,
        transports: &'a TransportGraph,
        player: &'a dyn PlayerState,
    ) -> Self {
        Self {
            surface,
            transports,
            player,
            teleports: &[],
            config: SearchConfig::default(),
            teleport: None,
        }
    }

    /// Teleports that may seed the search as extra roots.
    pub fn with_teleports(mut self, teleports: &'a [Teleport]) -> Self {
        self.teleports = teleports;
        self
    }

    /// Replace the search configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Path from `from` to `target`, inclusive of both ends.
    ///
    /// A blocked target is first moved to the nearest walkable tile within
    /// the configured snap radius. Returns an empty list if no path exists.
    pub fn find(&mut self, from: Coord, target: Coord) -> Vec<Step> {
        let target = match self.config.snap_radius {
            Some(r) => self.surface.nearest_walkable(target, r).unwrap_or(target),
            None => target,
        };
        self.find_goal(from, &Goal::Point(target))
    }

    /// Path from `from` to whichever tile of `areas` is reached first.
    pub fn find_areas(&mut self, from: Coord, areas: &[WorldArea]) -> Vec<Step> {
        self.find_goal(from, &Goal::areas(areas))
    }

    /// The teleport the last path starts with, if any.
    pub fn teleport(&self) -> Option<&Teleport> {
        self.teleport.as_ref()
    }

    /// Run a search without reconstructing, for diagnostics.
    pub fn search(&self, from: Coord, goal: &Goal) -> Search {
        let (roots, _) = self.roots(from);
        let ctx = SearchContext::new(self.surface, self.transports, self.player, &self.config);
        search::run(&ctx, &roots, goal)
    }

    fn find_goal(&mut self, from: Coord, goal: &Goal) -> Vec<Step> {
        self.teleport = None;

        let (roots, seeded) = self.roots(from);
        let ctx = SearchContext::new(self.surface, self.transports, self.player, &self.config);
        let result = search::run(&ctx, &roots, goal);
        let Some(end) = result.goal() else {
            log::info!("no path from {from}: {}", result.outcome);
            return Vec::new();
        };

        let steps = reconstruct(&result.parents, end, self.transports, self.player);
        if let Some(first) = steps.first().filter(|s| s.position != from) {
            self.teleport = seeded
                .into_iter()
                .find(|t| t.destination == first.position)
                .cloned();
        }
        log::info!("path length: {}", steps.len());
        steps
    }

    /// Search roots: the player's tile, then every teleport worth taking.
    fn roots(&self, from: Coord) -> (Vec<Coord>, Vec<&'a Teleport>) {
        let seeded: Vec<&'a Teleport> = self
            .teleports
            .iter()
            .filter(|t| t.worth_seeding(from, self.player))
            .collect();
        let mut roots = Vec::with_capacity(seeded.len() + 1);
        roots.push(from);
        roots.extend(seeded.iter().map(|t| t.destination));
        (roots, seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionFlags, SceneCollision};
    use crate::requirements::PlayerSnapshot;

    #[test]
    fn blocked_target_snaps_to_nearest_walkable() {
        let mut s = SceneCollision::new();
        s.open_area(WorldArea::new(0, 0, 5, 1, 0));
        s.insert(Coord::new(6, 0, 0), CollisionFlags::BLOCKED);
        let g = TransportGraph::new();
        let p = PlayerSnapshot::new();

        let mut pf = Pathfinder::new(&s, &g, &p);
        let steps = pf.find(Coord::new(0, 0, 0), Coord::new(6, 0, 0));
        assert_eq!(steps.last().map(|s| s.position), Some(Coord::new(4, 0, 0)));

        let no_snap = SearchConfig::default().with_snap_radius(None);
        let mut pf = Pathfinder::new(&s, &g, &p).with_config(no_snap);
        assert!(pf.find(Coord::new(0, 0, 0), Coord::new(6, 0, 0)).is_empty());
    }

    #[test]
    fn start_on_goal_is_single_step() {
        let mut s = SceneCollision::new();
        s.open_area(WorldArea::new(0, 0, 2, 2, 0));
        let g = TransportGraph::new();
        let p = PlayerSnapshot::new();
        let mut pf = Pathfinder::new(&s, &g, &p);
        let steps = pf.find(Coord::new(1, 1, 0), Coord::new(1, 1, 0));
        assert_eq!(steps, vec![Step::walk(Coord::new(1, 1, 0))]);
        assert!(pf.teleport().is_none());
    }

    #[test]
    fn roots_skip_nearby_teleports() {
        let s = SceneCollision::new();
        let g = TransportGraph::new();
        let p = PlayerSnapshot::new();
        let teleports = [
            Teleport::new("near", Coord::new(10, 10, 0)),
            Teleport::new("far", Coord::new(500, 500, 0)),
        ];
        let pf = Pathfinder::new(&s, &g, &p).with_teleports(&teleports);
        let (roots, seeded) = pf.roots(Coord::new(0, 0, 0));
        assert_eq!(roots, vec![Coord::new(0, 0, 0), Coord::new(500, 500, 0)]);
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].name, "far");
    }
}
