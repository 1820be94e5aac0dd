//! Read-only skill catalog: thresholds and attribute mappings.
//!
//! Built once at load time and handed to strategies by reference. Tests
//! substitute their own fixture catalogs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProgressionError, Result};
use crate::types::{Attribute, GatheringSkill, SkillFamily, WeaponKind};

/// Two attributes averaged into a gathering fitness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair(pub Attribute, pub Attribute);

impl AttributePair {
    /// Both attributes as a slice-friendly array.
    #[must_use]
    pub fn as_array(self) -> [Attribute; 2] {
        [self.0, self.1]
    }
}

/// Thresholds and attribute tables shared by the strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCatalog {
    /// Milestones used by families without their own list.
    pub milestones: Vec<f64>,
    /// Per-family threshold overrides.
    pub thresholds: HashMap<SkillFamily, Vec<f64>>,
    /// Key attribute of each weapon.
    pub weapon_attributes: HashMap<WeaponKind, Attribute>,
    /// Attribute pair of each gathering skill.
    pub gathering_attributes: HashMap<GatheringSkill, AttributePair>,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl SkillCatalog {
    /// Catalog with no thresholds and no attribute mappings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            milestones: Vec::new(),
            thresholds: HashMap::new(),
            weapon_attributes: HashMap::new(),
            gathering_attributes: HashMap::new(),
        }
    }

    /// The built-in catalog.
    #[must_use]
    pub fn standard() -> Self {
        use Attribute::{Agi, Con, Dex, Int, Str, Vit, Wis};

        let milestones = (1..=10).map(|m| f64::from(m) * 10.0).collect();
        let thresholds = HashMap::from([(SkillFamily::Summoning, vec![1.0, 50.0, 100.0])]);

        let weapon_attributes = HashMap::from([
            (WeaponKind::Sword, Str),
            (WeaponKind::Greatsword, Str),
            (WeaponKind::Polearm, Str),
            (WeaponKind::Axe, Str),
            (WeaponKind::Greataxe, Str),
            (WeaponKind::Staff, Str),
            (WeaponKind::Martial, Str),
            (WeaponKind::Bow, Dex),
            (WeaponKind::Crossbow, Dex),
            (WeaponKind::Dagger, Dex),
            (WeaponKind::Wand, Int),
            (WeaponKind::Shield, Con),
        ]);

        let gathering_attributes = HashMap::from([
            (GatheringSkill::Logging, AttributePair(Str, Vit)),
            (GatheringSkill::Mining, AttributePair(Str, Con)),
            (GatheringSkill::Foraging, AttributePair(Dex, Int)),
            (GatheringSkill::Farming, AttributePair(Vit, Int)),
            (GatheringSkill::Gardening, AttributePair(Dex, Wis)),
            (GatheringSkill::Herbalism, AttributePair(Wis, Int)),
            (GatheringSkill::Viticulture, AttributePair(Wis, Con)),
            (GatheringSkill::PearlDiving, AttributePair(Con, Agi)),
        ]);

        Self {
            milestones,
            thresholds,
            weapon_attributes,
            gathering_attributes,
        }
    }

    /// Load a catalog from TOML. Missing tables fall back to the standard catalog.
    ///
    /// # Errors
    /// Returns `ProgressionError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ProgressionError::Config(e.to_string()))
    }

    /// Thresholds used for the choke factor of a family.
    #[must_use]
    pub fn thresholds(&self, family: SkillFamily) -> &[f64] {
        self.thresholds
            .get(&family)
            .map_or(self.milestones.as_slice(), Vec::as_slice)
    }

    /// Key attribute of a weapon (strength when unmapped).
    #[must_use]
    pub fn key_attribute(&self, weapon: WeaponKind) -> Attribute {
        self.weapon_attributes
            .get(&weapon)
            .copied()
            .unwrap_or(Attribute::Str)
    }

    /// Attribute pair of a gathering skill, if it has one.
    #[must_use]
    pub fn gathering_pair(&self, skill: GatheringSkill) -> Option<AttributePair> {
        self.gathering_attributes.get(&skill).copied()
    }

    /// Replace the thresholds of a family.
    #[must_use]
    pub fn with_thresholds(mut self, family: SkillFamily, thresholds: Vec<f64>) -> Self {
        self.thresholds.insert(family, thresholds);
        self
    }

    /// Replace the key attribute of a weapon.
    #[must_use]
    pub fn with_weapon_attribute(mut self, weapon: WeaponKind, attribute: Attribute) -> Self {
        self.weapon_attributes.insert(weapon, attribute);
        self
    }
}
