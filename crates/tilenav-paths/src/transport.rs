//! Non-adjacent edges: doors, ladders, boats and other links that take
//! extra expansion cycles to traverse.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tilenav_core::{Coord, WorldPoint};

use crate::error::PathResult;
use crate::requirements::{PlayerState, Requirements};

/// A directed link from `source` to `destination`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transport {
    pub id: u32,
    pub source: Coord,
    pub destination: Coord,
    /// Expansion cycles the search waits before the destination is expanded.
    pub delay: u32,
    /// Menu action used to take the transport, e.g. `"Climb-up"`.
    pub action: String,
    /// Scene object to interact with, if any.
    pub object_id: Option<u32>,
    pub requirements: Requirements,
}

impl Transport {
    /// A transport with delay 1, no object and no requirements.
    pub fn new(id: u32, source: Coord, destination: Coord) -> Self {
        Self {
            id,
            source,
            destination,
            delay: 1,
            action: String::new(),
            object_id: None,
            requirements: Requirements::none(),
        }
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_action(mut self, action: impl Into<String>, object_id: Option<u32>) -> Self {
        self.action = action.into();
        self.object_id = object_id;
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    #[inline]
    pub fn eligible(&self, player: &dyn PlayerState) -> bool {
        self.requirements.fulfilled(player)
    }
}

/// On-disk form of a [`Transport`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransportRecord {
    #[serde(default)]
    id: u32,
    source: WorldPoint,
    destination: WorldPoint,
    #[serde(default = "default_duration")]
    duration: u32,
    #[serde(default)]
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Requirements::is_empty")]
    requirements: Requirements,
}

fn default_duration() -> u32 {
    1
}

impl From<TransportRecord> for Transport {
    fn from(r: TransportRecord) -> Self {
        Self {
            id: r.id,
            source: r.source.pack(),
            destination: r.destination.pack(),
            delay: r.duration,
            action: r.action,
            object_id: r.object_id,
            requirements: r.requirements,
        }
    }
}

impl From<&Transport> for TransportRecord {
    fn from(t: &Transport) -> Self {
        Self {
            id: t.id,
            source: t.source.point(),
            destination: t.destination.point(),
            duration: t.delay,
            action: t.action.clone(),
            object_id: t.object_id,
            requirements: t.requirements.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// TransportGraph
// ---------------------------------------------------------------------------

/// Transports grouped by source coordinate. Read-only during a search.
#[derive(Clone, Debug, Default)]
pub struct TransportGraph {
    edges: FxHashMap<Coord, Vec<Transport>>,
    len: usize,
}

impl TransportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, t: Transport) {
        self.edges.entry(t.source).or_default().push(t);
        self.len += 1;
    }

    /// Parse a JSON array of transport records.
    pub fn from_json_str(json: &str) -> PathResult<Self> {
        let records: Vec<TransportRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Read a JSON array of transport records.
    pub fn load_json<R: Read>(reader: R) -> PathResult<Self> {
        let records: Vec<TransportRecord> = serde_json::from_reader(BufReader::new(reader))?;
        Ok(Self::from_records(records))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PathResult<Self> {
        Self::load_json(File::open(path)?)
    }

    fn from_records(records: Vec<TransportRecord>) -> Self {
        let graph: Self = records.into_iter().map(Transport::from).collect();
        log::info!(
            "loaded {} transports from {} sources",
            graph.len(),
            graph.edges.len()
        );
        graph
    }

    /// Serialize back to the JSON record format, ordered by source.
    pub fn to_json_string(&self) -> PathResult<String> {
        let mut sources: Vec<&Coord> = self.edges.keys().collect();
        sources.sort_unstable();
        let records: Vec<TransportRecord> = sources
            .into_iter()
            .flat_map(|s| self.edges_from(*s))
            .map(TransportRecord::from)
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Every transport leaving `c`, eligible or not.
    #[inline]
    pub fn edges_from(&self, c: Coord) -> &[Transport] {
        self.edges.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transports leaving `c` that `player` may use.
    pub fn eligible_from<'a>(
        &'a self,
        c: Coord,
        player: &'a dyn PlayerState,
    ) -> impl Iterator<Item = &'a Transport> + 'a {
        self.edges_from(c).iter().filter(move |t| t.eligible(player))
    }

    /// The first transport linking `source` to `destination`.
    pub fn find(&self, source: Coord, destination: Coord) -> Option<&Transport> {
        self.edges_from(source)
            .iter()
            .find(|t| t.destination == destination)
    }

    /// Number of transports.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A copy of this graph with extra transports that only exist for one
    /// search, such as a currently spawned boat.
    pub fn merge_temporary(&self, temporary: impl IntoIterator<Item = Transport>) -> Self {
        let mut graph = self.clone();
        for t in temporary {
            graph.insert(t);
        }
        graph
    }
}

impl FromIterator<Transport> for TransportGraph {
    fn from_iter<I: IntoIterator<Item = Transport>>(iter: I) -> Self {
        let mut graph = Self::new();
        for t in iter {
            graph.insert(t);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;
    use crate::requirements::{PlayerSnapshot, Requirement};

    const LADDERS: &str = r#"[
        {
            "id": 1,
            "source": {"x": 3105, "y": 9576, "plane": 0},
            "destination": {"x": 3105, "y": 3162, "plane": 0},
            "action": "Climb-up",
            "object_id": 17385
        },
        {
            "id": 2,
            "source": {"x": 3105, "y": 9576, "plane": 0},
            "destination": {"x": 3110, "y": 9576, "plane": 1},
            "duration": 4,
            "requirements": [{"type": "skill", "skill": "agility", "level": 30}]
        }
    ]"#;

    #[test]
    fn json_records_are_grouped_by_source() {
        let g = TransportGraph::from_json_str(LADDERS).unwrap();
        assert_eq!(g.len(), 2);
        let src = Coord::new(3105, 9576, 0);
        let edges = g.edges_from(src);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].delay, 1);
        assert_eq!(edges[0].action, "Climb-up");
        assert_eq!(edges[0].object_id, Some(17385));
        assert_eq!(edges[1].delay, 4);
        assert!(g.edges_from(Coord::new(0, 0, 0)).is_empty());
    }

    #[test]
    fn eligibility_filters_by_requirements() {
        let g = TransportGraph::from_json_str(LADDERS).unwrap();
        let src = Coord::new(3105, 9576, 0);
        let novice = PlayerSnapshot::new();
        let ids: Vec<u32> = g.eligible_from(src, &novice).map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);

        let agile = PlayerSnapshot::new().with_skill("agility", 31);
        assert_eq!(g.eligible_from(src, &agile).count(), 2);
    }

    #[test]
    fn find_by_endpoints() {
        let g = TransportGraph::from_json_str(LADDERS).unwrap();
        let t = g
            .find(Coord::new(3105, 9576, 0), Coord::new(3110, 9576, 1))
            .unwrap();
        assert_eq!(t.id, 2);
        assert!(
            g.find(Coord::new(3105, 3162, 0), Coord::new(3105, 9576, 0))
                .is_none()
        );
    }

    #[test]
    fn merge_temporary_leaves_base_graph_untouched() {
        let g = TransportGraph::from_json_str(LADDERS).unwrap();
        let boat = Transport::new(99, Coord::new(10, 10, 0), Coord::new(50, 50, 0)).with_delay(7);
        let merged = g.merge_temporary([boat]);
        assert_eq!(merged.len(), 3);
        assert_eq!(g.len(), 2);
        assert_eq!(merged.edges_from(Coord::new(10, 10, 0))[0].delay, 7);
    }

    #[test]
    fn json_output_reloads() {
        let mut g = TransportGraph::new();
        g.insert(
            Transport::new(5, Coord::new(1, 2, 0), Coord::new(3, 4, 1))
                .with_action("Enter", Some(42))
                .with_requirements(Requirements(vec![Requirement::World { members: true }])),
        );
        let json = g.to_json_string().unwrap();
        let back = TransportGraph::from_json_str(&json).unwrap();
        assert_eq!(back.edges_from(Coord::new(1, 2, 0)), g.edges_from(Coord::new(1, 2, 0)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = TransportGraph::from_json_str("[{\"id\": 1}]").unwrap_err();
        assert!(matches!(err, PathError::TransportJson(_)));
    }
}
