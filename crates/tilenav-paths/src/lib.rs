//! Path finding over a tile world with directional collision and transport
//! edges.
//!
//! - **Hybrid BFS** with delayed transport edges ([`search::hybrid_bfs`])
//! - **A\*** with a plane-aware Manhattan estimate ([`search::astar`])
//! - Collision surfaces over scene snapshots or a compact global map
//!   ([`SceneCollision`], [`CollisionMap`]), with door and blacklist
//!   overrides, hazard avoidance and instance routing layered on top
//!
//! Most callers only need [`Pathfinder`]:
//!
//! ```
//! use tilenav_core::{Coord, WorldArea};
//! use tilenav_paths::{Pathfinder, PlayerSnapshot, SceneCollision, TransportGraph};
//!
//! let mut scene = SceneCollision::new();
//! scene.open_area(WorldArea::new(0, 0, 5, 1, 0));
//! let transports = TransportGraph::new();
//! let player = PlayerSnapshot::new();
//!
//! let mut pf = Pathfinder::new(&scene, &transports, &player);
//! let path = pf.find(Coord::new(0, 0, 0), Coord::new(4, 0, 0));
//! assert_eq!(path.len(), 5);
//! ```
//!
//! # Trait seams
//!
//! | Trait | Supplied by |
//! |---|---|
//! | [`CollisionSurface`] | collision data source |
//! | [`PlayerState`] | game client, or [`PlayerSnapshot`] |

pub mod collision;
pub mod config;
pub mod direction;
pub mod distance;
pub mod error;
pub mod parents;
pub mod pathfinder;
pub mod queue;
pub mod reconstruct;
pub mod requirements;
pub mod search;
pub mod teleport;
pub mod transport;

pub use collision::{
    CollisionFlags, CollisionMap, CollisionSurface, HazardAware, INSTANCE_SPLIT_X, InstanceSplit,
    SceneCollision, TileOverrides, WithOverrides, is_passable_door,
};
pub use config::{Algorithm, SearchConfig};
pub use direction::{DirMask, Direction, Neighbors};
pub use error::{PathError, PathResult};
pub use parents::ParentMap;
pub use pathfinder::Pathfinder;
pub use queue::DelayedReleaseQueue;
pub use reconstruct::{Step, reconstruct, transport_count};
pub use requirements::{
    Comparison, PlayerSnapshot, PlayerState, QuestState, Requirement, Requirements, VarKind,
};
pub use search::{AbortReason, Goal, Search, SearchContext, SearchOutcome};
pub use teleport::{Teleport, teleports_from_json};
pub use transport::{Transport, TransportGraph};
