//! Character registry, partitioned by character id.
//!
//! Each character lives in its own `DashMap` entry. A character's state is
//! only ever mutated through that entry, so resolving different characters
//! in parallel never aliases progression state.

use dashmap::DashMap;
use tracing::debug;

use skillgain_core::types::{CharacterId, SkillKey};
use skillgain_core::{Character, ProgressionError, Result};

/// Every character whose proficiencies are being tracked.
#[derive(Debug, Default)]
pub struct CharacterRegistry {
    characters: DashMap<CharacterId, Character>,
}

impl CharacterRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character, returning whatever was stored under its id.
    pub fn insert(&self, character: Character) -> Option<Character> {
        debug!(character = %character.id, level = character.level, "character registered");
        self.characters.insert(character.id, character)
    }

    /// Drop a character and hand back its state.
    pub fn remove(&self, id: CharacterId) -> Option<Character> {
        self.characters.remove(&id).map(|(_, character)| character)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: CharacterId) -> bool {
        self.characters.contains_key(&id)
    }

    /// Number of registered characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Registered ids, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<CharacterId> {
        self.characters.iter().map(|entry| *entry.key()).collect()
    }

    /// A copy of one character's current state.
    pub fn snapshot(&self, id: CharacterId) -> Result<Character> {
        self.characters
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    /// Current value of one skill.
    pub fn proficiency(&self, id: CharacterId, key: &SkillKey) -> Result<f64> {
        self.characters
            .get(&id)
            .map(|entry| entry.proficiency(key))
            .ok_or(ProgressionError::UnknownCharacter(id))
    }

    /// Run `f` with exclusive access to one character.
    ///
    /// The entry stays locked for the duration of `f`; do not touch the
    /// registry from inside it.
    pub fn with_mut<R>(&self, id: CharacterId, f: impl FnOnce(&mut Character) -> R) -> Result<R> {
        let mut entry = self
            .characters
            .get_mut(&id)
            .ok_or(ProgressionError::UnknownCharacter(id))?;
        Ok(f(entry.value_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgain_core::types::{Attributes, OutdoorSkill};

    #[test]
    fn insert_then_mutate_through_entry() {
        let registry = CharacterRegistry::new();
        let c = Character::new(5, Attributes::default());
        let id = c.id;
        assert!(registry.insert(c).is_none());
        assert_eq!(registry.len(), 1);

        let key = SkillKey::Outdoor(OutdoorSkill::Climbing);
        registry
            .with_mut(id, |c| c.progression.set_value(key.clone(), 2.5))
            .expect("registered");
        let value = registry.proficiency(id, &key).expect("registered");
        assert!((value - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_character_is_an_error() {
        let registry = CharacterRegistry::new();
        let stranger = CharacterId::new();
        let err = registry.with_mut(stranger, |_| ()).expect_err("not registered");
        assert!(matches!(err, ProgressionError::UnknownCharacter(id) if id == stranger));
        assert!(registry.snapshot(stranger).is_err());
    }

    #[test]
    fn remove_hands_back_state() {
        let registry = CharacterRegistry::new();
        let c = Character::new(3, Attributes::default());
        let id = c.id;
        registry.insert(c);
        let removed = registry.remove(id).expect("was registered");
        assert_eq!(removed.level, 3);
        assert!(registry.is_empty());
        assert!(!registry.contains(id));
    }
}
