//! Summoning magic.
//!
//! Three kinds of event train the summoning school, each with its own base
//! rate and usage scope:
//!
//! - **cast**: bringing a summon into the world; scored by outcome and
//!   variety across summons.
//! - **ability**: a summon's ability landing. Abilities without effect are
//!   refused. Effectful ones are credited by realised effectiveness
//!   (`max(floor, (pct/100)^k)`), spread over targets and potency (damage,
//!   healing, control), all capped at `impact_max`.
//! - **maintenance**: keeping a summon alive. Scored by upkeep time with
//!   diminishing returns, pressure from engaged enemies and the allies it
//!   benefits. No outcome, no variety.
//!
//! All three share the level curve, repeat decay, threshold choke, cap-gap
//! softener and chance gate.

use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::character::Character;
use crate::config::SummoningTuning;
use crate::engine::{Disqualification, GainRequest};
use crate::factors::{FactorKind, FactorSet};
use crate::heuristics::{cap_gap_factor, repeat_factor, threshold_choke, variety_factor};
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{ActivityContext, MagicSchool, Outcome, SkillFamily, SkillKey};

const SPREAD_PER_TARGET: f64 = 0.5;
const CONTROL_CREDIT: f64 = 0.5;

/// What happened with a summon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SummonEvent {
    /// A summon was called.
    Cast {
        /// Summon id.
        summon: String,
        /// How the cast went.
        outcome: Outcome,
    },
    /// A summoned ability was used.
    Ability {
        /// Ability id.
        ability: String,
        /// How it went.
        outcome: Outcome,
        /// Whether it did anything at all.
        effective: bool,
        /// Realised effectiveness in percent, when measured.
        effectiveness_pct: Option<f64>,
        /// Targets affected.
        targets_affected: u32,
        /// Whether a control effect landed.
        control_landed: bool,
        /// Damage dealt, in percent of the target's health.
        damage_pct_hp: f64,
        /// Healing done, in percent of the target's health.
        heal_pct_hp: f64,
    },
    /// A summon was kept alive for a while.
    Maintenance {
        /// Summon id.
        summon: String,
        /// Seconds of upkeep.
        sustained_sec: f64,
        /// Enemies the summon engaged.
        enemies_engaged: u32,
        /// Allies that benefitted.
        allies_benefitting: u32,
    },
}

impl SummonEvent {
    /// A successful cast of `summon`.
    #[must_use]
    pub fn cast(summon: impl Into<String>) -> Self {
        Self::Cast {
            summon: summon.into(),
            outcome: Outcome::Success,
        }
    }

    /// A successful, fully effective, single-target ability.
    #[must_use]
    pub fn ability(ability: impl Into<String>) -> Self {
        Self::Ability {
            ability: ability.into(),
            outcome: Outcome::Success,
            effective: true,
            effectiveness_pct: None,
            targets_affected: 1,
            control_landed: false,
            damage_pct_hp: 0.0,
            heal_pct_hp: 0.0,
        }
    }

    fn scope(&self) -> UsageScope {
        match self {
            Self::Cast { .. } => UsageScope::SummonCast,
            Self::Ability { .. } => UsageScope::SummonAbility,
            Self::Maintenance { .. } => UsageScope::SummonMaintenance,
        }
    }

    fn target(&self) -> &str {
        match self {
            Self::Cast { summon, .. } | Self::Maintenance { summon, .. } => summon,
            Self::Ability { ability, .. } => ability,
        }
    }
}

/// One summoning event with its circumstances.
#[derive(Debug, Clone, PartialEq)]
pub struct SummonAction {
    /// The event.
    pub event: SummonEvent,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// Level of the opposition.
    pub enemy_level: u32,
    /// Cap of the summoning school.
    pub cap: f64,
}

/// Summoning strategy.
#[derive(Debug, Clone, Copy)]
pub struct Summoning<'a> {
    tuning: &'a SummoningTuning,
    catalog: &'a SkillCatalog,
}

impl<'a> Summoning<'a> {
    /// Borrow the tuning and catalog.
    #[must_use]
    pub fn new(tuning: &'a SummoningTuning, catalog: &'a SkillCatalog) -> Self {
        Self { tuning, catalog }
    }

    /// Credit for an effectful ability, `1.0` when unmeasured.
    #[must_use]
    pub fn effectiveness_weight(&self, effectiveness_pct: Option<f64>) -> f64 {
        effectiveness_pct.map_or(1.0, |pct| {
            let fraction = pct.clamp(0.0, 100.0) / 100.0;
            fraction
                .powf(self.tuning.effectiveness_k)
                .max(self.tuning.effectiveness_floor)
        })
    }

    /// Seconds of upkeep turned into a time factor; nothing sustained is worth nothing.
    #[must_use]
    pub fn upkeep_factor(&self, sustained_sec: f64) -> f64 {
        if sustained_sec <= 0.0 {
            return 0.0;
        }
        (sustained_sec / self.tuning.maintenance_sec_norm).powf(self.tuning.maintenance_exp)
    }

    fn ability_impact(&self, event: &SummonEvent) -> f64 {
        let SummonEvent::Ability {
            effectiveness_pct,
            targets_affected,
            control_landed,
            damage_pct_hp,
            heal_pct_hp,
            ..
        } = event
        else {
            return 1.0;
        };
        let spread = 1.0 + SPREAD_PER_TARGET * f64::from((*targets_affected).max(1) - 1);
        let control = if *control_landed { CONTROL_CREDIT } else { 0.0 };
        let potency = 1.0
            + (damage_pct_hp / 100.0).clamp(0.0, 1.0)
            + (heal_pct_hp / 100.0).clamp(0.0, 1.0)
            + control;
        (self.effectiveness_weight(*effectiveness_pct) * spread * potency).min(self.tuning.impact_max)
    }
}

impl ProgressionStrategy for Summoning<'_> {
    type Action = SummonAction;

    fn skill(&self, _action: &SummonAction) -> SkillKey {
        SkillKey::School(MagicSchool::Summoning)
    }

    fn cap(&self, _character: &Character, action: &SummonAction) -> f64 {
        action.cap
    }

    fn usage(&self, action: &SummonAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            action.event.scope(),
            action.event.target(),
            self.tuning.variety.window,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &SummonAction) -> Assessment {
        let t = self.tuning;
        let context = t.context_weight.weight(action.context);
        if context <= 0.0 {
            return Assessment::Disqualified(Disqualification::NoContextWeight);
        }
        if let SummonEvent::Ability { effective: false, .. } = action.event {
            return Assessment::Disqualified(Disqualification::NoEffect);
        }

        let mut factors = FactorSet::new();
        factors
            .push(FactorKind::Context, context)
            .push(FactorKind::Level, t.level.factor(view.level, action.enemy_level));

        let (base, outcome) = match &action.event {
            SummonEvent::Cast { outcome, .. } => (t.cast_gain, Some(*outcome)),
            SummonEvent::Ability { outcome, .. } => {
                factors.push(FactorKind::Effectiveness, self.ability_impact(&action.event));
                (t.effect_gain, Some(*outcome))
            }
            SummonEvent::Maintenance {
                sustained_sec,
                enemies_engaged,
                allies_benefitting,
                ..
            } => {
                factors
                    .push(FactorKind::Uptime, self.upkeep_factor(*sustained_sec))
                    .push(
                        FactorKind::Pressure,
                        t.maintenance_pressure.factor(f64::from(*enemies_engaged)),
                    )
                    .push(FactorKind::Crowd, t.maintenance_benefit.crowd(*allies_benefitting));
                (t.maintenance_gain, None)
            }
        };

        factors.push(FactorKind::Repeat, repeat_factor(view.streak, t.min_repeat_factor));
        if outcome.is_some() {
            factors.push(
                FactorKind::Variety,
                variety_factor(
                    view.recent,
                    t.variety.window,
                    t.variety.target_distinct,
                    t.variety.bonus_max,
                ),
            );
        }
        factors
            .push(
                FactorKind::Choke,
                threshold_choke(
                    view.value,
                    self.catalog.thresholds(SkillFamily::Summoning),
                    t.choke.window,
                    t.choke.choke,
                ),
            )
            .push(FactorKind::CapGap, cap_gap_factor(view.value, view.cap, t.cap_softener_k));

        let success = outcome.is_none_or(Outcome::succeeded);
        if let Some(outcome) = outcome.filter(|o| o.succeeded()) {
            factors.push(FactorKind::Outcome, t.outcome_weight.weight(outcome));
        }

        Assessment::Qualified(
            GainRequest::new(base, factors)
                .succeeded(success)
                .gated(t.gate),
        )
    }
}
