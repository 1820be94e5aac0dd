//! The character entity that owns progression state.

use serde::{Deserialize, Serialize};

use crate::state::ProgressionState;
use crate::types::{Attributes, CharacterId, SkillKey};

/// A character whose proficiencies progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Stable identity.
    pub id: CharacterId,
    /// Character level (treated as at least `1`).
    pub level: u32,
    /// Attribute scores.
    pub attributes: Attributes,
    /// Proficiency values and usage bookkeeping.
    pub progression: ProgressionState,
}

impl Character {
    /// A fresh character with a random id.
    #[must_use]
    pub fn new(level: u32, attributes: Attributes) -> Self {
        Self::with_id(CharacterId::new(), level, attributes)
    }

    /// A fresh character with a known id.
    #[must_use]
    pub fn with_id(id: CharacterId, level: u32, attributes: Attributes) -> Self {
        Self {
            id,
            level,
            attributes,
            progression: ProgressionState::new(),
        }
    }

    /// Level used by level curves and cap rules.
    #[must_use]
    pub fn effective_level(&self) -> u32 {
        self.level.max(1)
    }

    /// Current value of a skill.
    #[must_use]
    pub fn proficiency(&self, key: &SkillKey) -> f64 {
        self.progression.value(key)
    }

    /// Static description, without progression state.
    #[must_use]
    pub fn profile(&self) -> CharacterProfile {
        CharacterProfile {
            id: self.id,
            level: self.level,
            attributes: self.attributes,
        }
    }
}

/// Serializable description used to seed characters from data files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Stable identity.
    pub id: CharacterId,
    /// Character level.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Attribute scores.
    #[serde(default)]
    pub attributes: Attributes,
}

fn default_level() -> u32 {
    1
}

impl From<CharacterProfile> for Character {
    fn from(profile: CharacterProfile) -> Self {
        Self::with_id(profile.id, profile.level, profile.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_counts_as_one() {
        let c = Character::new(0, Attributes::default());
        assert_eq!(c.effective_level(), 1);
    }

    #[test]
    fn profile_round_trips_into_character() {
        let c = Character::new(7, Attributes::uniform(12.0));
        let rebuilt = Character::from(c.profile());
        assert_eq!(rebuilt.id, c.id);
        assert_eq!(rebuilt.level, 7);
        assert_eq!(rebuilt.progression, ProgressionState::new());
    }
}
