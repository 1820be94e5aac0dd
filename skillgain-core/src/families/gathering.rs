//! Resource gathering, hunting and fishing included.
//!
//! Gains scale with the mean of the skill's attribute pair, peak when the
//! node matches the gatherer's level and decay when the same node is worked
//! over and over.

use crate::catalog::SkillCatalog;
use crate::character::Character;
use crate::config::GatheringTuning;
use crate::engine::{CapRule, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet, distance_factor};
use crate::heuristics::repeat_factor;
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{GatheringSkill, SkillKey};

/// One gathering attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct GatherAction {
    /// Skill used.
    pub skill: GatheringSkill,
    /// Node, spot or quarry id; enables repeat tracking.
    pub node: Option<String>,
    /// Level of the node or game.
    pub difficulty: Option<u32>,
    /// Whether anything was gathered.
    pub success: bool,
}

/// Gathering family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Gathering<'a> {
    tuning: &'a GatheringTuning,
    cap_rule: &'a CapRule,
    catalog: &'a SkillCatalog,
}

impl<'a> Gathering<'a> {
    /// Borrow the tuning, cap rule and catalog.
    #[must_use]
    pub fn new(tuning: &'a GatheringTuning, cap_rule: &'a CapRule, catalog: &'a SkillCatalog) -> Self {
        Self {
            tuning,
            cap_rule,
            catalog,
        }
    }
}

impl ProgressionStrategy for Gathering<'_> {
    type Action = GatherAction;

    fn skill(&self, action: &GatherAction) -> SkillKey {
        SkillKey::Gathering(action.skill)
    }

    fn cap(&self, character: &Character, _action: &GatherAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, action: &GatherAction) -> Option<UsageTarget> {
        action.node.as_ref().map(|node| {
            UsageTarget::consecutive(
                UsageScope::Gathering(action.skill),
                node.clone(),
                self.tuning.history,
            )
        })
    }

    fn assess(&self, view: &ProgressView<'_>, action: &GatherAction) -> Assessment {
        let t = self.tuning;
        let mut factors = FactorSet::new();
        if let Some(pair) = self.catalog.gathering_pair(action.skill) {
            let score = view.attributes.mean(&pair.as_array());
            factors.push(FactorKind::Attribute, t.attribute.factor(score));
        }
        if let Some(difficulty) = action.difficulty {
            factors.push(
                FactorKind::Level,
                distance_factor(view.level, difficulty, t.difficulty_divisor),
            );
        }
        if action.node.is_some() {
            factors.push(FactorKind::Repeat, repeat_factor(view.streak, t.min_repeat_factor));
        }

        Assessment::Qualified(
            GainRequest::new(t.base_gain, factors)
                .succeeded(action.success)
                .gated(t.gate)
                .on_fail(t.on_fail),
        )
    }
}
