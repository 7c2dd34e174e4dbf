use serde::{Deserialize, Serialize};

/// Default bound on the number of coordinates a search may reach.
pub const DEFAULT_MAX_VISITED: usize = 10_000_000;
/// Default size of the immediate queue lane.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1 << 22;
/// Default radius used to move a blocked point target onto walkable ground.
pub const DEFAULT_SNAP_RADIUS: i32 = 5;

/// Which search strategy to run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Breadth-first search with delayed transport edges.
    #[default]
    HybridBfs,
    /// Best-first search guided by Manhattan distance.
    AStar,
}

/// Tuning knobs for a search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Searches that reach more coordinates than this give up.
    pub max_visited: usize,
    /// Capacity of the immediate queue lane, rounded up to a power of two.
    pub queue_capacity: usize,
    /// Point targets are moved to the nearest walkable tile within this
    /// radius. `None` disables snapping.
    pub snap_radius: Option<i32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_visited: DEFAULT_MAX_VISITED,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            snap_radius: Some(DEFAULT_SNAP_RADIUS),
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_visited(mut self, max_visited: usize) -> Self {
        self.max_visited = max_visited;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_snap_radius(mut self, snap_radius: Option<i32>) -> Self {
        self.snap_radius = snap_radius;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.algorithm, Algorithm::HybridBfs);
        assert_eq!(c.max_visited, 10_000_000);
        assert_eq!(c.queue_capacity, 4_194_304);
        assert_eq!(c.snap_radius, Some(5));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: SearchConfig =
            serde_json::from_str(r#"{"algorithm": "a_star", "snap_radius": null}"#).unwrap();
        assert_eq!(c.algorithm, Algorithm::AStar);
        assert_eq!(c.snap_radius, None);
        assert_eq!(c.max_visited, DEFAULT_MAX_VISITED);
    }
}
