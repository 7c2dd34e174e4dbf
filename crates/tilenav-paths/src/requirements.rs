//! Eligibility of transports and teleports for a given player.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// What a search needs to know about the player.
///
/// Implemented by the caller against live game state; [`PlayerSnapshot`]
/// is an in-memory implementation.
pub trait PlayerState {
    /// Quantity of item `id` held (inventory plus equipment), or only in
    /// equipment if `equipped_only`.
    fn item_count(&self, id: u32, equipped_only: bool) -> u32;
    fn skill_level(&self, skill: &str) -> u32;
    fn quest_state(&self, quest: &str) -> QuestState;
    fn var(&self, kind: VarKind, index: u32) -> i32;
    fn members_world(&self) -> bool;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestState {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// Which game variable table an index refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    Varbit,
    Varp,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Comparison {
    #[inline]
    pub fn test(self, actual: i32, expected: i32) -> bool {
        match self {
            Comparison::Equal => actual == expected,
            Comparison::NotEqual => actual != expected,
            Comparison::Greater => actual > expected,
            Comparison::GreaterOrEqual => actual >= expected,
            Comparison::Less => actual < expected,
            Comparison::LessOrEqual => actual <= expected,
        }
    }
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

/// A single condition on the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    Item {
        id: u32,
        #[serde(default = "one")]
        amount: u32,
        #[serde(default)]
        equipped: bool,
    },
    Skill {
        skill: String,
        level: u32,
    },
    /// The quest must be at least at `state`.
    Quest {
        quest: String,
        #[serde(default = "finished")]
        state: QuestState,
    },
    Var {
        kind: VarKind,
        index: u32,
        value: i32,
        #[serde(default)]
        comparison: Comparison,
    },
    World {
        members: bool,
    },
}

fn one() -> u32 {
    1
}

fn finished() -> QuestState {
    QuestState::Finished
}

impl Requirement {
    pub fn fulfilled(&self, player: &dyn PlayerState) -> bool {
        match self {
            Requirement::Item {
                id,
                amount,
                equipped,
            } => player.item_count(*id, *equipped) >= *amount,
            Requirement::Skill { skill, level } => player.skill_level(skill) >= *level,
            Requirement::Quest { quest, state } => player.quest_state(quest) >= *state,
            Requirement::Var {
                kind,
                index,
                value,
                comparison,
            } => comparison.test(player.var(*kind, *index), *value),
            Requirement::World { members } => !*members || player.members_world(),
        }
    }
}

/// A conjunction of [`Requirement`]s. Empty requirements always pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirements(pub Vec<Requirement>);

impl Requirements {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn push(&mut self, r: Requirement) -> &mut Self {
        self.0.push(r);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fulfilled(&self, player: &dyn PlayerState) -> bool {
        self.0.iter().all(|r| r.fulfilled(player))
    }
}

impl FromIterator<Requirement> for Requirements {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// PlayerSnapshot
// ---------------------------------------------------------------------------

/// A plain-data [`PlayerState`]. Anything not recorded is zero, not started
/// or false.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSnapshot {
    pub inventory: FxHashMap<u32, u32>,
    pub equipment: FxHashMap<u32, u32>,
    pub skills: FxHashMap<String, u32>,
    pub quests: FxHashMap<String, QuestState>,
    pub varbits: FxHashMap<u32, i32>,
    pub varps: FxHashMap<u32, i32>,
    pub members: bool,
}

impl PlayerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, id: u32, amount: u32) -> Self {
        *self.inventory.entry(id).or_insert(0) += amount;
        self
    }

    pub fn with_equipped(mut self, id: u32) -> Self {
        *self.equipment.entry(id).or_insert(0) += 1;
        self
    }

    pub fn with_skill(mut self, skill: &str, level: u32) -> Self {
        self.skills.insert(skill.to_owned(), level);
        self
    }

    pub fn with_quest(mut self, quest: &str, state: QuestState) -> Self {
        self.quests.insert(quest.to_owned(), state);
        self
    }

    pub fn with_var(mut self, kind: VarKind, index: u32, value: i32) -> Self {
        match kind {
            VarKind::Varbit => self.varbits.insert(index, value),
            VarKind::Varp => self.varps.insert(index, value),
        };
        self
    }

    pub fn with_members(mut self, members: bool) -> Self {
        self.members = members;
        self
    }
}

impl PlayerState for PlayerSnapshot {
    fn item_count(&self, id: u32, equipped_only: bool) -> u32 {
        let worn = self.equipment.get(&id).copied().unwrap_or(0);
        if equipped_only {
            return worn;
        }
        worn + self.inventory.get(&id).copied().unwrap_or(0)
    }

    fn skill_level(&self, skill: &str) -> u32 {
        self.skills.get(skill).copied().unwrap_or(0)
    }

    fn quest_state(&self, quest: &str) -> QuestState {
        self.quests.get(quest).copied().unwrap_or_default()
    }

    fn var(&self, kind: VarKind, index: u32) -> i32 {
        let table = match kind {
            VarKind::Varbit => &self.varbits,
            VarKind::Varp => &self.varps,
        };
        table.get(&index).copied().unwrap_or(0)
    }

    fn members_world(&self) -> bool {
        self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirements_pass() {
        assert!(Requirements::none().fulfilled(&PlayerSnapshot::new()));
    }

    #[test]
    fn item_requirements_count_equipment() {
        let staff = Requirement::Item {
            id: 772,
            amount: 1,
            equipped: true,
        };
        let coins = Requirement::Item {
            id: 995,
            amount: 8000,
            equipped: false,
        };
        let p = PlayerSnapshot::new().with_item(772, 1).with_item(995, 10_000);
        assert!(!staff.fulfilled(&p));
        assert!(coins.fulfilled(&p));
        let p = p.with_equipped(772);
        assert!(staff.fulfilled(&p));
    }

    #[test]
    fn skill_quest_world() {
        let p = PlayerSnapshot::new()
            .with_skill("agility", 50)
            .with_quest("Fairytale II", QuestState::InProgress);
        let reqs: Requirements = [
            Requirement::Skill {
                skill: "agility".into(),
                level: 40,
            },
            Requirement::Quest {
                quest: "Fairytale II".into(),
                state: QuestState::InProgress,
            },
        ]
        .into_iter()
        .collect();
        assert!(reqs.fulfilled(&p));

        let finished = Requirement::Quest {
            quest: "Fairytale II".into(),
            state: QuestState::Finished,
        };
        assert!(!finished.fulfilled(&p));

        let members = Requirement::World { members: true };
        assert!(!members.fulfilled(&p));
        assert!(members.fulfilled(&p.clone().with_members(true)));
        assert!(Requirement::World { members: false }.fulfilled(&p));
    }

    #[test]
    fn var_comparisons() {
        let p = PlayerSnapshot::new().with_var(VarKind::Varbit, 4560, 3);
        let req = |comparison, value| Requirement::Var {
            kind: VarKind::Varbit,
            index: 4560,
            value,
            comparison,
        };
        assert!(req(Comparison::Equal, 3).fulfilled(&p));
        assert!(req(Comparison::NotEqual, 4).fulfilled(&p));
        assert!(req(Comparison::Greater, 2).fulfilled(&p));
        assert!(req(Comparison::GreaterOrEqual, 3).fulfilled(&p));
        assert!(req(Comparison::Less, 4).fulfilled(&p));
        assert!(!req(Comparison::LessOrEqual, 2).fulfilled(&p));
        // varp with the same index is a different variable
        assert_eq!(p.var(VarKind::Varp, 4560), 0);
    }

    #[test]
    fn requirements_deserialize_from_tagged_json() {
        let json = r#"[
            {"type": "item", "id": 995, "amount": 30},
            {"type": "skill", "skill": "magic", "level": 25},
            {"type": "quest", "quest": "Dragon Slayer I"},
            {"type": "var", "kind": "varp", "index": 281, "value": 1000, "comparison": ">="},
            {"type": "world", "members": true}
        ]"#;
        let reqs: Requirements = serde_json::from_str(json).unwrap();
        assert_eq!(reqs.0.len(), 5);
        assert_eq!(
            reqs.0[0],
            Requirement::Item {
                id: 995,
                amount: 30,
                equipped: false
            }
        );
        assert_eq!(
            reqs.0[2],
            Requirement::Quest {
                quest: "Dragon Slayer I".into(),
                state: QuestState::Finished
            }
        );
        assert!(matches!(
            reqs.0[3],
            Requirement::Var {
                comparison: Comparison::GreaterOrEqual,
                ..
            }
        ));
    }
}
