//! Recipe-driven crafting.
//!
//! Recipes teach most while they are still a stretch and fade once mastered:
//!
//!   diff     = P − unlock
//!   F_unlock = 1 + (−diff) / unlock_window        if diff < 0
//!            = 1 / (1 + diff / post_unlock_choke_k) otherwise
//!
//! Only a successful craft gains and no chance gate applies. Repeating the
//! same recipe back to back decays through `F_repeat`; switching recipe
//! restarts the streak at zero while keeping the old recipe's entry.

use crate::character::Character;
use crate::config::CraftingTuning;
use crate::engine::{CapRule, GainOutcome, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet};
use crate::heuristics::repeat_factor;
use crate::random::RandomSource;
use crate::state::{ProgressionState, UsageScope};
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget, progress};
use crate::types::{CraftKey, SkillKey};

/// One craft attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftAction {
    /// Craft being practiced.
    pub craft: CraftKey,
    /// Recipe id.
    pub recipe: String,
    /// Proficiency at which the recipe unlocks.
    pub recipe_unlock: f64,
    /// Whether the item came out.
    pub success: bool,
    /// Explicit cap; derived from the character level when absent.
    pub cap: Option<f64>,
}

/// Crafting family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Crafting<'a> {
    tuning: &'a CraftingTuning,
    cap_rule: &'a CapRule,
}

impl<'a> Crafting<'a> {
    /// Borrow the tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a CraftingTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }

    /// Unlock-distance factor for a value against a recipe.
    #[must_use]
    pub fn unlock_factor(&self, value: f64, recipe_unlock: f64) -> f64 {
        let diff = value - recipe_unlock;
        if diff < 0.0 {
            1.0 + (-diff) / self.tuning.unlock_window
        } else {
            1.0 / (1.0 + diff / self.tuning.post_unlock_choke_k)
        }
    }

    /// A generic training session pitched just above the current value.
    ///
    /// The session's recipe unlocks `training_unlock_offset` above the
    /// current value (never past the cap), so it always teaches something
    /// until the cap is reached.
    pub fn train(
        &self,
        character: &mut Character,
        craft: CraftKey,
        success: bool,
        rng: &mut dyn RandomSource,
    ) -> GainOutcome {
        let cap = proficiency_cap(character.effective_level(), self.cap_rule);
        let current = character.proficiency(&SkillKey::Craft(craft));
        let action = CraftAction {
            craft,
            recipe: self.tuning.training_recipe.clone(),
            recipe_unlock: (current + self.tuning.training_unlock_offset).min(cap),
            success,
            cap: Some(cap),
        };
        progress(self, character, &action, rng)
    }
}

/// Forget recipe repetition for one craft, or for every craft when `craft` is `None`.
pub fn reset_tracking(state: &mut ProgressionState, craft: Option<CraftKey>) {
    match craft {
        Some(craft) => state.reset_usage(UsageScope::Craft(craft)),
        None => state.reset_usage_where(|scope| matches!(scope, UsageScope::Craft(_))),
    }
}

impl ProgressionStrategy for Crafting<'_> {
    type Action = CraftAction;

    fn skill(&self, action: &CraftAction) -> SkillKey {
        SkillKey::Craft(action.craft)
    }

    fn cap(&self, character: &Character, action: &CraftAction) -> f64 {
        action
            .cap
            .unwrap_or_else(|| proficiency_cap(character.effective_level(), self.cap_rule))
    }

    fn usage(&self, action: &CraftAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            UsageScope::Craft(action.craft),
            action.recipe.clone(),
            self.tuning.history,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &CraftAction) -> Assessment {
        let factors = FactorSet::new()
            .with(FactorKind::Unlock, self.unlock_factor(view.value, action.recipe_unlock))
            .with(
                FactorKind::Repeat,
                repeat_factor(view.streak, self.tuning.min_repeat_factor),
            );
        Assessment::Qualified(
            GainRequest::new(self.tuning.base_gain, factors).succeeded(action.success),
        )
    }
}
