//! Outdoor traversal: swimming, sailing, riding and climbing.
//!
//! Trained by time rather than by discrete successes:
//!
//!   raw = rate × minutes × difficulty × ((cap − P) / cap)^k
//!
//! No chance gate; the gain lands deterministically.

use crate::character::Character;
use crate::config::OutdoorTuning;
use crate::engine::{CapRule, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet};
use crate::heuristics::cap_gap_factor;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{OutdoorSkill, SkillKey};

/// A stretch of time spent on a traversal skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutdoorAction {
    /// Skill exercised.
    pub skill: OutdoorSkill,
    /// Minutes spent.
    pub minutes: f64,
    /// Terrain or weather multiplier (`1.0` when absent).
    pub difficulty: Option<f64>,
}

/// Outdoor family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Outdoor<'a> {
    tuning: &'a OutdoorTuning,
    cap_rule: &'a CapRule,
}

impl<'a> Outdoor<'a> {
    /// Borrow the tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a OutdoorTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }
}

impl ProgressionStrategy for Outdoor<'_> {
    type Action = OutdoorAction;

    fn skill(&self, action: &OutdoorAction) -> SkillKey {
        SkillKey::Outdoor(action.skill)
    }

    fn cap(&self, character: &Character, _action: &OutdoorAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, _action: &OutdoorAction) -> Option<UsageTarget> {
        None
    }

    fn assess(&self, view: &ProgressView<'_>, action: &OutdoorAction) -> Assessment {
        let factors = FactorSet::new()
            .with(FactorKind::Duration, action.minutes)
            .with(FactorKind::Difficulty, action.difficulty.unwrap_or(1.0))
            .with(
                FactorKind::CapGap,
                cap_gap_factor(view.value, view.cap, self.tuning.cap_softener_k),
            );
        Assessment::Qualified(GainRequest::new(self.tuning.rates.rate(action.skill), factors))
    }
}
