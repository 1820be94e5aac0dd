//! Performance disciplines: dance, song and instrument.
//!
//! One strategy serves all three; the discipline picks the tuning table.
//! Beyond the shared heuristics a performance is scored by who it reached
//! (crowd), who was pressing in (pressure), how long it was held (uptime),
//! and for song the venue and ensemble. The closing event of a sustained
//! piece earns a small stop bonus on top of the raw delta, before the cap
//! clamp.
//!
//! Worked dance example: with `P = 24.17`, `cap = 54` and every factor
//! multiplying out to `raw = 0.04`, the gate ramp between `0.018` and
//! `0.055` (floor `0.12`) gives `p ≈ 0.643`. A roll of `0.5` applies the
//! gain and the value becomes `24.21`.

use crate::catalog::SkillCatalog;
use crate::character::Character;
use crate::config::{PerformanceTuning, ProgressionConfig};
use crate::engine::{Disqualification, GainRequest};
use crate::factors::{FactorKind, FactorSet};
use crate::heuristics::{cap_gap_factor, repeat_factor, threshold_choke, variety_factor};
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget};
use crate::types::{ActivityContext, Outcome, PerformanceKind, SkillFamily, SkillKey};

/// One performance event.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceAction {
    /// Piece, move or song id (drives repetition and variety).
    pub piece: String,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// How it went.
    pub outcome: Outcome,
    /// Average level of the audience or opposition.
    pub audience_level: u32,
    /// Seconds the piece was held.
    pub sustained_sec: f64,
    /// Whether this event closes a sustained piece.
    pub closing: bool,
    /// Allies reached (targets affected, for instruments).
    pub allies: u32,
    /// Enemies pressuring the performer.
    pub enemies: u32,
    /// Venue acoustics in `[0, 1]`.
    pub acoustic_quality: Option<f64>,
    /// Harmony with other performers in `[0, 1]`.
    pub ensemble_synergy: Option<f64>,
    /// Cap of the discipline.
    pub cap: f64,
}

impl PerformanceAction {
    /// A successful, solo, practice event with no crowd.
    #[must_use]
    pub fn practice(piece: impl Into<String>, audience_level: u32, cap: f64) -> Self {
        Self {
            piece: piece.into(),
            context: ActivityContext::Practice,
            outcome: Outcome::Success,
            audience_level,
            sustained_sec: 0.0,
            closing: false,
            allies: 0,
            enemies: 0,
            acoustic_quality: None,
            ensemble_synergy: None,
            cap,
        }
    }
}

/// Performance family strategy for one discipline.
#[derive(Debug, Clone, Copy)]
pub struct Performance<'a> {
    kind: PerformanceKind,
    tuning: &'a PerformanceTuning,
    catalog: &'a SkillCatalog,
}

impl<'a> Performance<'a> {
    /// Strategy for `kind` with explicit tuning.
    #[must_use]
    pub fn new(kind: PerformanceKind, tuning: &'a PerformanceTuning, catalog: &'a SkillCatalog) -> Self {
        Self {
            kind,
            tuning,
            catalog,
        }
    }

    /// Strategy for `kind` using the matching table of `config`.
    #[must_use]
    pub fn from_config(
        kind: PerformanceKind,
        config: &'a ProgressionConfig,
        catalog: &'a SkillCatalog,
    ) -> Self {
        Self::new(kind, config.performance(kind), catalog)
    }

    /// Discipline served by this strategy.
    #[must_use]
    pub fn kind(&self) -> PerformanceKind {
        self.kind
    }
}

impl ProgressionStrategy for Performance<'_> {
    type Action = PerformanceAction;

    fn skill(&self, _action: &PerformanceAction) -> SkillKey {
        SkillKey::Performance(self.kind)
    }

    fn cap(&self, _character: &Character, action: &PerformanceAction) -> f64 {
        action.cap
    }

    fn usage(&self, action: &PerformanceAction) -> Option<UsageTarget> {
        Some(UsageTarget::consecutive(
            UsageScope::Performance(self.kind),
            action.piece.clone(),
            self.tuning.variety.window,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &PerformanceAction) -> Assessment {
        let t = self.tuning;
        let context = t.context_weight.weight(action.context);
        if context <= 0.0 {
            return Assessment::Disqualified(Disqualification::NoContextWeight);
        }

        let mut factors = FactorSet::new();
        factors
            .push(FactorKind::Context, context)
            .push(FactorKind::Level, t.level.factor(view.level, action.audience_level));
        if let Some(uptime) = &t.uptime {
            factors.push(FactorKind::Uptime, uptime.factor(action.sustained_sec));
        }
        factors.push(FactorKind::Crowd, t.crowd.crowd(action.allies));
        if let Some(pressure) = &t.pressure {
            factors.push(FactorKind::Pressure, pressure.factor(f64::from(action.enemies)));
        }
        if let Some(acoustic) = &t.acoustic {
            factors.push(FactorKind::Acoustic, acoustic.quality(action.acoustic_quality));
        }
        if let Some(ensemble) = &t.ensemble {
            factors.push(FactorKind::Ensemble, ensemble.quality(action.ensemble_synergy));
        }
        factors
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
                    self.catalog.thresholds(SkillFamily::Performance),
                    t.choke.window,
                    t.choke.choke,
                ),
            )
            .push(FactorKind::CapGap, cap_gap_factor(view.value, view.cap, t.cap_softener_k));

        let success = action.outcome.succeeded();
        if success {
            factors.push(FactorKind::Outcome, t.outcome_weight.weight(action.outcome));
        }
        if action.closing && t.stop_bonus > 0.0 {
            factors.push(FactorKind::StopBonus, 1.0 + t.stop_bonus);
        }

        Assessment::Qualified(
            GainRequest::new(t.base_gain, factors)
                .succeeded(success)
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

    fn dance_setup() -> (ProgressionConfig, SkillCatalog) {
        (ProgressionConfig::default(), SkillCatalog::empty())
    }

    #[test]
    fn zero_context_weight_is_refused() {
        let mut config = ProgressionConfig::default();
        config.dance.context_weight.practice = 0.0;
        let catalog = SkillCatalog::empty();
        let dance = Performance::from_config(PerformanceKind::Dance, &config, &catalog);
        let mut c = Character::new(5, Attributes::default());

        let out = progress(&dance, &mut c, &PerformanceAction::practice("waltz", 5, 10.0), &mut FixedRoll(0.0));
        assert_eq!(out.verdict, Verdict::Disqualified(Disqualification::NoContextWeight));
    }

    #[test]
    fn failed_performance_draws_nothing() {
        let (config, catalog) = dance_setup();
        let dance = Performance::from_config(PerformanceKind::Dance, &config, &catalog);
        let mut c = Character::new(5, Attributes::default());
        let mut action = PerformanceAction::practice("waltz", 5, 10.0);
        action.outcome = Outcome::Fail;
        let mut rolls = ScriptedRolls::new([], 0.0);

        let out = progress(&dance, &mut c, &action, &mut rolls);
        assert_eq!(out.verdict, Verdict::Failed);
        assert_eq!(rolls.draws(), 0);
    }

    #[test]
    fn stop_bonus_raises_delta() {
        let (config, catalog) = dance_setup();
        let dance = Performance::from_config(PerformanceKind::Dance, &config, &catalog);
        let mut plain = PerformanceAction::practice("waltz", 8, 50.0);
        plain.context = ActivityContext::Battle;
        let mut closing = plain.clone();
        closing.closing = true;

        let mut a = Character::new(5, Attributes::default());
        let mut b = Character::new(5, Attributes::default());
        let out_plain = progress(&dance, &mut a, &plain, &mut FixedRoll(0.0));
        let out_closing = progress(&dance, &mut b, &closing, &mut FixedRoll(0.0));
        assert!((out_closing.delta / out_plain.delta - 1.12).abs() < 1e-9);
    }

    #[test]
    fn crowd_and_pressure_help_dance() {
        let (config, catalog) = dance_setup();
        let dance = Performance::from_config(PerformanceKind::Dance, &config, &catalog);
        let mut quiet = PerformanceAction::practice("reel", 8, 50.0);
        quiet.context = ActivityContext::Battle;
        let mut busy = quiet.clone();
        busy.allies = 4;
        busy.enemies = 2;

        let mut a = Character::new(5, Attributes::default());
        let mut b = Character::new(5, Attributes::default());
        let out_quiet = progress(&dance, &mut a, &quiet, &mut FixedRoll(0.0));
        let out_busy = progress(&dance, &mut b, &busy, &mut FixedRoll(0.0));
        assert!(out_busy.delta > out_quiet.delta);
    }

    #[test]
    fn song_uses_acoustics_instrument_ignores_uptime() {
        let config = ProgressionConfig::default();
        let catalog = SkillCatalog::empty();
        let song = Performance::from_config(PerformanceKind::Song, &config, &catalog);
        let instrument = Performance::from_config(PerformanceKind::Instrument, &config, &catalog);

        let mut dry = PerformanceAction::practice("ballad", 8, 50.0);
        dry.context = ActivityContext::Battle;
        let mut hall = dry.clone();
        hall.acoustic_quality = Some(1.0);

        let mut a = Character::new(5, Attributes::default());
        let mut b = Character::new(5, Attributes::default());
        let out_dry = progress(&song, &mut a, &dry, &mut FixedRoll(0.0));
        let out_hall = progress(&song, &mut b, &hall, &mut FixedRoll(0.0));
        assert!((out_hall.delta / out_dry.delta - 1.10).abs() < 1e-9);

        let mut long = dry.clone();
        long.sustained_sec = 40.0;
        let mut c = Character::new(5, Attributes::default());
        let mut d = Character::new(5, Attributes::default());
        let short = progress(&instrument, &mut c, &dry, &mut FixedRoll(0.0));
        let held = progress(&instrument, &mut d, &long, &mut FixedRoll(0.0));
        assert!((short.delta - held.delta).abs() < 1e-12);
        assert_eq!(instrument.kind(), PerformanceKind::Instrument);
    }

    #[test]
    fn performances_share_nothing_across_disciplines() {
        let config = ProgressionConfig::default();
        let catalog = SkillCatalog::empty();
        let dance = Performance::from_config(PerformanceKind::Dance, &config, &catalog);
        let song = Performance::from_config(PerformanceKind::Song, &config, &catalog);
        let mut c = Character::new(5, Attributes::default());
        let action = PerformanceAction::practice("anthem", 8, 50.0);

        progress(&dance, &mut c, &action, &mut FixedRoll(0.0));
        progress(&song, &mut c, &action, &mut FixedRoll(0.0));
        let dance_tracker = c
            .progression
            .tracker(UsageScope::Performance(PerformanceKind::Dance))
            .expect("dance tracked");
        assert_eq!(dance_tracker.recent().len(), 1);
        assert!(c.proficiency(&SkillKey::Performance(PerformanceKind::Song)) > 0.0);
    }
}
