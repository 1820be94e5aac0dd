//! Animal handling, tracked per animal kind.
//!
//! Handling the same animal over and over decays without a floor. The
//! streak counts from one: the first handling after a switch is stored as
//! `1`, and the stored count is what the next handling of that animal reads.

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::config::{AnimalHandlingTuning, HandlingWeights};
use crate::engine::{CapRule, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet, distance_factor};
use crate::heuristics::repeat_factor;
use crate::state::{StreakRule, UsageScope};
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::SkillKey;

/// Situation an animal was handled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingContext {
    /// Feeding, grooming, everyday riding.
    #[default]
    Routine,
    /// Deliberate training.
    Training,
    /// Calming a panicked or hostile animal.
    Emergency,
}

impl HandlingContext {
    fn weight(self, weights: &HandlingWeights) -> f64 {
        match self {
            Self::Routine => weights.routine,
            Self::Training => weights.training,
            Self::Emergency => weights.emergency,
        }
    }
}

/// One handling of an animal.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleAction {
    /// Animal kind, e.g. `horse`.
    pub animal: String,
    /// Situation.
    pub context: HandlingContext,
    /// Level of the animal.
    pub difficulty: Option<u32>,
    /// Whether the animal responded.
    pub success: bool,
}

/// Animal handling strategy.
#[derive(Debug, Clone, Copy)]
pub struct AnimalHandling<'a> {
    tuning: &'a AnimalHandlingTuning,
    cap_rule: &'a CapRule,
}

impl<'a> AnimalHandling<'a> {
    /// Borrow the tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a AnimalHandlingTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }
}

impl ProgressionStrategy for AnimalHandling<'_> {
    type Action = HandleAction;

    fn skill(&self, action: &HandleAction) -> SkillKey {
        SkillKey::AnimalHandling(action.animal.clone())
    }

    fn cap(&self, character: &Character, _action: &HandleAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, action: &HandleAction) -> Option<UsageTarget> {
        Some(UsageTarget {
            scope: UsageScope::AnimalHandling,
            id: action.animal.clone(),
            rule: StreakRule::CountFromOne,
            history: self.tuning.history,
        })
    }

    fn assess(&self, view: &ProgressView<'_>, action: &HandleAction) -> Assessment {
        let t = self.tuning;
        let mut factors = FactorSet::new();
        factors.push(FactorKind::Context, action.context.weight(&t.context_weight));
        if let Some(difficulty) = action.difficulty {
            factors.push(
                FactorKind::Level,
                distance_factor(view.level, difficulty, t.difficulty_divisor),
            );
        }
        factors.push(FactorKind::Repeat, repeat_factor(view.streak, t.min_repeat_factor));

        Assessment::Qualified(
            GainRequest::new(t.base_gain, factors)
                .succeeded(action.success)
                .gated(t.gate),
        )
    }
}
