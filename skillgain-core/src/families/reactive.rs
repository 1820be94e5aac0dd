//! Reactive defences: evasion, parry and block.
//!
//! Only real danger teaches these. Outside combat or a spar, with training
//! weapons, or against a weaker opponent the action is refused outright. A
//! failed reaction occasionally teaches a little: with a small chance it is
//! re-scored as a partial success and sent through the gate.

use crate::catalog::SkillCatalog;
use crate::character::Character;
use crate::config::ReactiveTuning;
use crate::engine::{Disqualification, FailPolicy, GainRequest};
use crate::factors::{FactorKind, FactorSet};
use crate::heuristics::{cap_gap_factor, repeat_factor, threshold_choke, variety_factor};
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{Outcome, ReactiveKind, SkillFamily, SkillKey};

/// One incoming attack and how it was answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveAction {
    /// Which defence was attempted.
    pub kind: ReactiveKind,
    /// How it went.
    pub outcome: Outcome,
    /// Attacker level.
    pub enemy_level: u32,
    /// Whether this happened in real combat.
    pub in_combat: bool,
    /// Whether this happened in a spar.
    pub is_spar: bool,
    /// Whether real (non-training) weapons were used.
    pub real_weapons: bool,
    /// Cap of the defence skill.
    pub cap: f64,
}

/// Reactive family strategy.
#[derive(Debug, Clone, Copy)]
pub struct Reactive<'a> {
    tuning: &'a ReactiveTuning,
    catalog: &'a SkillCatalog,
}

impl<'a> Reactive<'a> {
    /// Borrow the tuning and catalog.
    #[must_use]
    pub fn new(tuning: &'a ReactiveTuning, catalog: &'a SkillCatalog) -> Self {
        Self { tuning, catalog }
    }

    fn hard_gate(&self, view: &ProgressView<'_>, action: &ReactiveAction) -> Option<Disqualification> {
        let t = self.tuning;
        if t.require_combat_or_spar && !(action.in_combat || action.is_spar) {
            Some(Disqualification::NotInCombat)
        } else if t.require_real_weapons && !action.real_weapons {
            Some(Disqualification::TrainingWeapons)
        } else if t.require_stronger_opponent && action.enemy_level < view.level {
            Some(Disqualification::WeakerOpponent)
        } else {
            None
        }
    }
}

impl ProgressionStrategy for Reactive<'_> {
    type Action = ReactiveAction;

    fn skill(&self, action: &ReactiveAction) -> SkillKey {
        SkillKey::Reactive(action.kind)
    }

    fn cap(&self, _character: &Character, action: &ReactiveAction) -> f64 {
        action.cap
    }

    fn usage(&self, action: &ReactiveAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            UsageScope::Reactive,
            action.kind.as_str(),
            self.tuning.variety.window,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &ReactiveAction) -> Assessment {
        if let Some(reason) = self.hard_gate(view, action) {
            return Assessment::Disqualified(reason);
        }

        let t = self.tuning;
        let mut factors = FactorSet::new();
        factors
            .push(FactorKind::Event, t.event_weight.weight(action.kind))
            .push(FactorKind::Level, t.level.factor(view.level, action.enemy_level))
            .push(FactorKind::Repeat, repeat_factor(view.streak, t.min_repeat_factor))
            .push(
                FactorKind::Variety,
                variety_factor(
                    view.recent,
                    t.variety.window,
                    t.variety.target_distinct,
                    t.variety.bonus_max,
                ),
            )
            .push(
                FactorKind::Choke,
                threshold_choke(
                    view.value,
                    self.catalog.thresholds(SkillFamily::Reactive),
                    t.choke.window,
                    t.choke.choke,
                ),
            )
            .push(FactorKind::CapGap, cap_gap_factor(view.value, view.cap, t.cap_softener_k));

        let request = if action.outcome == Outcome::Fail {
            GainRequest::new(t.base_gain, factors)
                .succeeded(false)
                .on_fail(FailPolicy::PartialThenGate {
                    chance: t.partial_on_fail_chance,
                    factor: t.outcome_weight.partial,
                })
        } else {
            factors.push(FactorKind::Outcome, t.outcome_weight.weight(action.outcome));
            GainRequest::new(t.base_gain, factors)
        };
        Assessment::Qualified(request.gated(t.gate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Verdict;
    use crate::random::{FixedRoll, ScriptedRolls};
    use crate::strategy::progress;
    use crate::types::Attributes;

    fn parry(enemy_level: u32, outcome: Outcome) -> ReactiveAction {
        ReactiveAction {
            kind: ReactiveKind::Parry,
            outcome,
            enemy_level,
            in_combat: true,
            is_spar: false,
            real_weapons: true,
            cap: 30.0,
        }
    }

    #[test]
    fn weaker_enemy_is_refused_without_draws() {
        let tuning = ReactiveTuning::default();
        let catalog = SkillCatalog::standard();
        let strategy = Reactive::new(&tuning, &catalog);
        let mut c = Character::new(10, Attributes::default());
        let mut rolls = ScriptedRolls::new([], 0.0);

        let out = progress(&strategy, &mut c, &parry(9, Outcome::Success), &mut rolls);
        assert_eq!(
            out.verdict,
            Verdict::Disqualified(Disqualification::WeakerOpponent)
        );
        assert_eq!(rolls.draws(), 0);
        assert!(out.value.abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_combat_and_training_weapons_are_refused() {
        let tuning = ReactiveTuning::default();
        let catalog = SkillCatalog::standard();
        let strategy = Reactive::new(&tuning, &catalog);
        let mut c = Character::new(10, Attributes::default());

        let mut idle = parry(12, Outcome::Success);
        idle.in_combat = false;
        let out = progress(&strategy, &mut c, &idle, &mut FixedRoll(0.0));
        assert_eq!(out.verdict, Verdict::Disqualified(Disqualification::NotInCombat));

        let mut blunt = parry(12, Outcome::Success);
        blunt.real_weapons = false;
        let out = progress(&strategy, &mut c, &blunt, &mut FixedRoll(0.0));
        assert_eq!(
            out.verdict,
            Verdict::Disqualified(Disqualification::TrainingWeapons)
        );
    }

    #[test]
    fn stronger_enemy_teaches() {
        let tuning = ReactiveTuning::default();
        let catalog = SkillCatalog::empty();
        let strategy = Reactive::new(&tuning, &catalog);
        let mut c = Character::new(10, Attributes::default());

        let out = progress(&strategy, &mut c, &parry(14, Outcome::Success), &mut FixedRoll(0.0));
        assert_eq!(out.verdict, Verdict::Applied);
        assert!(out.value > 0.0);
        assert!(out.value < tuning.base_gain + 0.01);
    }

    #[test]
    fn failure_salvage_needs_lucky_roll() {
        let tuning = ReactiveTuning::default();
        let catalog = SkillCatalog::empty();
        let strategy = Reactive::new(&tuning, &catalog);
        let mut c = Character::new(10, Attributes::default());

        let mut unlucky = ScriptedRolls::new([0.5], 0.0);
        let out = progress(&strategy, &mut c, &parry(14, Outcome::Fail), &mut unlucky);
        assert_eq!(out.verdict, Verdict::Failed);
        assert_eq!(unlucky.draws(), 1);

        let mut lucky = ScriptedRolls::new([0.01, 0.0], 0.0);
        let out = progress(&strategy, &mut c, &parry(14, Outcome::Fail), &mut lucky);
        assert_eq!(lucky.draws(), 2);
        assert_eq!(out.verdict, Verdict::PartialOnFail);
        assert_eq!(out.probability, Some(tuning.gate.p_small_min));
    }

    #[test]
    fn failures_do_not_advance_streaks() {
        let tuning = ReactiveTuning::default();
        let catalog = SkillCatalog::empty();
        let strategy = Reactive::new(&tuning, &catalog);
        let mut c = Character::new(10, Attributes::default());

        progress(&strategy, &mut c, &parry(14, Outcome::Fail), &mut FixedRoll(0.9));
        assert!(c.progression.tracker(UsageScope::Reactive).is_none());

        progress(&strategy, &mut c, &parry(14, Outcome::Success), &mut FixedRoll(0.9));
        let tracker = c
            .progression
            .tracker(UsageScope::Reactive)
            .expect("success recorded");
        assert_eq!(tracker.last_used(), Some("parry"));
    }
}
