//! Weapon proficiency, dual wielding included.
//!
//! A hit trains the weapon type in hand. The level curve and the
//! key-attribute comparison are both clamped linear bands, so a mismatched
//! fight slows progress without ever stopping it:
//!
//!   F_level = clamp(1 + 0.1 × (enemy − actor), 0.25, 1.75)
//!   F_attr  = clamp(1 + 0.01 × (enemy_attr − actor_attr), 0.7, 1.3)
//!
//! Dual wielding is its own proficiency. It needs a one-handed weapon in
//! each hand and trains faster when both are the same type.

use crate::catalog::SkillCatalog;
use crate::character::Character;
use crate::config::WeaponTuning;
use crate::engine::{CapRule, Disqualification, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet, level_delta};
use crate::heuristics::repeat_factor;
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{ActivityContext, Attribute, SkillKey, WeaponKind};

/// Technique id used when the caller does not name one.
const PLAIN_ATTACK: &str = "attack";

/// One attack with a single weapon.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponAction {
    /// Weapon type used.
    pub weapon: WeaponKind,
    /// Technique or combo id; drives repeat decay.
    pub technique: Option<String>,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// Opponent level, if there was one.
    pub enemy_level: Option<u32>,
    /// Opponent score in the weapon's key attribute.
    pub enemy_attribute: Option<f64>,
    /// Whether the attack landed.
    pub success: bool,
}

/// Weapon family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Weapons<'a> {
    tuning: &'a WeaponTuning,
    cap_rule: &'a CapRule,
    catalog: &'a SkillCatalog,
}

impl<'a> Weapons<'a> {
    /// Borrow the tuning, cap rule and catalog.
    #[must_use]
    pub fn new(tuning: &'a WeaponTuning, cap_rule: &'a CapRule, catalog: &'a SkillCatalog) -> Self {
        Self {
            tuning,
            cap_rule,
            catalog,
        }
    }
}

impl ProgressionStrategy for Weapons<'_> {
    type Action = WeaponAction;

    fn skill(&self, action: &WeaponAction) -> SkillKey {
        SkillKey::Weapon(action.weapon)
    }

    fn cap(&self, character: &Character, _action: &WeaponAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, action: &WeaponAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            UsageScope::Weapon(action.weapon),
            action.technique.as_deref().unwrap_or(PLAIN_ATTACK),
            self.tuning.history,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &WeaponAction) -> Assessment {
        let attribute = self.catalog.key_attribute(action.weapon);
        let combat = Combat {
            context: action.context,
            enemy_level: action.enemy_level,
            enemy_attribute: action.enemy_attribute,
            success: action.success,
        };
        combat.assess(self.tuning, view, attribute, self.tuning.base_gain)
    }
}

// ---------------------------------------------------------------------------
// Dual Wield
// ---------------------------------------------------------------------------

/// A weapon held in one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WieldedWeapon {
    /// Weapon type.
    pub kind: WeaponKind,
    /// Whether it needs both hands.
    pub two_handed: bool,
}

impl WieldedWeapon {
    /// A one-handed weapon.
    #[must_use]
    pub fn one_handed(kind: WeaponKind) -> Self {
        Self {
            kind,
            two_handed: false,
        }
    }
}

/// One attack while holding a weapon in each hand.
#[derive(Debug, Clone, PartialEq)]
pub struct DualWieldAction {
    /// Main-hand weapon.
    pub main: WieldedWeapon,
    /// Off-hand weapon.
    pub off: WieldedWeapon,
    /// Technique or combo id.
    pub technique: Option<String>,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// Opponent level, if there was one.
    pub enemy_level: Option<u32>,
    /// Opponent score in the dual-wield attribute.
    pub enemy_attribute: Option<f64>,
    /// Whether the attack landed.
    pub success: bool,
}

/// Dual-wield strategy.
#[derive(Debug, Clone, Copy)]
pub struct DualWield<'a> {
    tuning: &'a WeaponTuning,
    cap_rule: &'a CapRule,
}

impl<'a> DualWield<'a> {
    /// Borrow the weapon tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a WeaponTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }
}

impl ProgressionStrategy for DualWield<'_> {
    type Action = DualWieldAction;

    fn skill(&self, _action: &DualWieldAction) -> SkillKey {
        SkillKey::DualWield
    }

    fn cap(&self, character: &Character, _action: &DualWieldAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, action: &DualWieldAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            UsageScope::DualWield,
            action.technique.as_deref().unwrap_or(PLAIN_ATTACK),
            self.tuning.history,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &DualWieldAction) -> Assessment {
        if action.main.two_handed || action.off.two_handed {
            return Assessment::Disqualified(Disqualification::NotOneHanded);
        }
        let mut base = self.tuning.base_gain;
        if action.main.kind == action.off.kind {
            base *= self.tuning.dual_wield_same_type;
        }
        let combat = Combat {
            context: action.context,
            enemy_level: action.enemy_level,
            enemy_attribute: action.enemy_attribute,
            success: action.success,
        };
        combat.assess(self.tuning, view, self.tuning.dual_wield_attribute, base)
    }
}

// ---------------------------------------------------------------------------
// Shared combat scoring
// ---------------------------------------------------------------------------

struct Combat {
    context: ActivityContext,
    enemy_level: Option<u32>,
    enemy_attribute: Option<f64>,
    success: bool,
}

impl Combat {
    fn assess(
        &self,
        tuning: &WeaponTuning,
        view: &ProgressView<'_>,
        attribute: Attribute,
        base_gain: f64,
    ) -> Assessment {
        let context = tuning.context_weight.weight(self.context);
        if context <= 0.0 {
            return Assessment::Disqualified(Disqualification::NoContextWeight);
        }

        let mut factors = FactorSet::new();
        factors.push(FactorKind::Context, context);
        if let Some(enemy_level) = self.enemy_level {
            #[allow(clippy::cast_precision_loss)]
            let d = level_delta(view.level, enemy_level) as f64;
            factors.push(FactorKind::Level, tuning.level.factor(d));
        }
        if let Some(enemy_attribute) = self.enemy_attribute {
            let diff = enemy_attribute - view.attributes.get(attribute);
            factors.push(FactorKind::Attribute, tuning.attribute.factor(diff));
        }
        factors.push(
            FactorKind::Repeat,
            repeat_factor(view.streak, tuning.min_repeat_factor),
        );

        Assessment::Qualified(
            GainRequest::new(base_gain, factors)
                .succeeded(self.success)
                .gated(tuning.gate)
                .on_fail(tuning.on_fail),
        )
    }
}
