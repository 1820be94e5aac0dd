//! Armor wear: light, medium and heavy.
//!
//! Taking a hit trains the armor class being worn, but only when it is
//! actually worn: a chest piece of that class plus a strict majority of the
//! armor slots. A single hit never grants more than `max_gain`.

use crate::character::Character;
use crate::config::ArmorTuning;
use crate::engine::{CapRule, Disqualification, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet};
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{ArmorKind, Attribute, SkillKey};

const FITNESS: [Attribute; 3] = [Attribute::Str, Attribute::Dex, Attribute::Agi];

/// A hit taken while wearing armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorAction {
    /// Armor class trained.
    pub armor: ArmorKind,
    /// Level of whoever landed the hit.
    pub attacker_level: u32,
    /// Slots filled with pieces of this class.
    pub pieces_worn: u32,
    /// Armor slots on the body.
    pub total_slots: u32,
    /// Whether the chest piece is of this class.
    pub chest_worn: bool,
}

/// Armor family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Armor<'a> {
    tuning: &'a ArmorTuning,
    cap_rule: &'a CapRule,
}

impl<'a> Armor<'a> {
    /// Borrow the tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a ArmorTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }

    /// Whether `action` describes the armor class as actually worn.
    #[must_use]
    pub fn is_worn(&self, action: &ArmorAction) -> bool {
        if self.tuning.require_chest && !action.chest_worn {
            return false;
        }
        if action.total_slots == 0 {
            return false;
        }
        f64::from(action.pieces_worn) / f64::from(action.total_slots) > self.tuning.min_coverage
    }
}

impl ProgressionStrategy for Armor<'_> {
    type Action = ArmorAction;

    fn skill(&self, action: &ArmorAction) -> SkillKey {
        SkillKey::Armor(action.armor)
    }

    fn cap(&self, character: &Character, _action: &ArmorAction) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, _action: &ArmorAction) -> Option<UsageTarget> {
        None
    }

    fn assess(&self, view: &ProgressView<'_>, action: &ArmorAction) -> Assessment {
        if !self.is_worn(action) {
            return Assessment::Disqualified(Disqualification::ArmorNotWorn);
        }
        let t = self.tuning;
        let factors = FactorSet::new()
            .with(FactorKind::Level, t.level.factor(view.level, action.attacker_level))
            .with(
                FactorKind::Attribute,
                t.attribute.factor(view.attributes.mean(&FITNESS)),
            );
        Assessment::Qualified(
            GainRequest::new(t.base_gain, factors)
                .capped_at(t.max_gain)
                .gated(t.gate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Verdict;
    use crate::random::{FixedRoll, ScriptedRolls};
    use crate::strategy::progress;
    use crate::types::Attributes;

    fn hit(attacker_level: u32) -> ArmorAction {
        ArmorAction {
            armor: ArmorKind::Heavy,
            attacker_level,
            pieces_worn: 5,
            total_slots: 6,
            chest_worn: true,
        }
    }

    #[test]
    fn half_coverage_is_not_enough() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::default());
        let mut rolls = ScriptedRolls::new([], 0.0);

        let mut action = hit(10);
        action.pieces_worn = 3;
        let out = progress(&armor, &mut c, &action, &mut rolls);
        assert_eq!(out.verdict, Verdict::Disqualified(Disqualification::ArmorNotWorn));

        action.pieces_worn = 6;
        action.chest_worn = false;
        let out = progress(&armor, &mut c, &action, &mut rolls);
        assert_eq!(out.verdict, Verdict::Disqualified(Disqualification::ArmorNotWorn));
        assert_eq!(rolls.draws(), 0);
    }

    #[test]
    fn weaker_attackers_teach_nothing() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::default());

        let out = progress(&armor, &mut c, &hit(9), &mut FixedRoll(0.0));
        assert_eq!(out.verdict, Verdict::NoDelta);
    }

    #[test]
    fn slotless_body_is_not_wearing_anything() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut action = hit(10);
        action.pieces_worn = 0;
        action.total_slots = 0;
        assert!(!armor.is_worn(&action));

        action.pieces_worn = 4;
        action.total_slots = 6;
        assert!(armor.is_worn(&action));
    }

    #[test]
    fn equal_attacker_teaches_the_floor_share() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::uniform(0.0));

        let out = progress(&armor, &mut c, &hit(10), &mut FixedRoll(0.0));
        assert_eq!(out.verdict, Verdict::Applied);
        assert!((out.delta - 0.04 * 0.2 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn small_hits_are_rarely_credited() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::default());

        let out = progress(&armor, &mut c, &hit(10), &mut FixedRoll(0.5));
        assert_eq!(out.verdict, Verdict::GateRejected);
        assert_eq!(out.probability, Some(tuning.gate.p_small_min));
    }

    #[test]
    fn fit_wearer_against_strong_attacker() {
        let tuning = ArmorTuning::default();
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::uniform(60.0));

        let out = progress(&armor, &mut c, &hit(20), &mut FixedRoll(0.99));
        assert_eq!(out.verdict, Verdict::Applied);
        assert!((out.delta - 0.052).abs() < 1e-9);
        assert!((out.value - 0.05).abs() < 1e-9);
    }

    #[test]
    fn single_hit_is_bounded() {
        let tuning = ArmorTuning {
            base_gain: 5.0,
            ..ArmorTuning::default()
        };
        let rule = CapRule::default();
        let armor = Armor::new(&tuning, &rule);
        let mut c = Character::new(10, Attributes::uniform(60.0));

        let out = progress(&armor, &mut c, &hit(20), &mut FixedRoll(0.0));
        assert!((out.value - tuning.max_gain).abs() < 1e-9);
    }
}
