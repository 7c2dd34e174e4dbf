//! Teleports: extra search roots the player can jump to from anywhere.

use serde::{Deserialize, Serialize};
use tilenav_core::{Coord, WorldPoint};

use crate::distance::chebyshev;
use crate::error::PathResult;
use crate::requirements::{PlayerState, Requirements};

/// Teleports landing within this many tiles (Chebyshev) of the player are
/// not worth seeding.
pub const MIN_TELEPORT_DISTANCE: i32 = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub name: String,
    #[serde(with = "point")]
    pub destination: Coord,
    #[serde(default, skip_serializing_if = "Requirements::is_empty")]
    pub requirements: Requirements,
}

impl Teleport {
    /// A teleport anyone can use.
    pub fn new(name: impl Into<String>, destination: Coord) -> Self {
        Self {
            name: name.into(),
            destination,
            requirements: Requirements::none(),
        }
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    #[inline]
    pub fn eligible(&self, player: &dyn PlayerState) -> bool {
        self.requirements.fulfilled(player)
    }

    /// Whether the search should use this teleport as an extra root for a
    /// player standing on `position`.
    pub fn worth_seeding(&self, position: Coord, player: &dyn PlayerState) -> bool {
        let far = self.destination.plane() != position.plane()
            || chebyshev(self.destination.point(), position.point()) > MIN_TELEPORT_DISTANCE;
        far && self.eligible(player)
    }
}

/// Parse a JSON array of teleports.
pub fn teleports_from_json(json: &str) -> PathResult<Vec<Teleport>> {
    Ok(serde_json::from_str(json)?)
}

/// Destinations are stored as `{x, y, plane}` objects.
mod point {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tilenav_core::{Coord, WorldPoint};

    pub fn serialize<S: Serializer>(c: &Coord, s: S) -> Result<S::Ok, S::Error> {
        c.point().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Coord, D::Error> {
        WorldPoint::deserialize(d).map(WorldPoint::pack)
    }
}

impl From<(&str, WorldPoint)> for Teleport {
    fn from((name, p): (&str, WorldPoint)) -> Self {
        Teleport::new(name, p.pack())
    }
}
