//! Named multiplicative factors and the small curves that produce them.
//!
//! Every family reduces an action to a [`FactorSet`]: a list of named,
//! non-negative multipliers. The engine only ever sees their product, but
//! keeping the names lets tracing and tests point at the factor that zeroed
//! a gain.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Factor Set
// ---------------------------------------------------------------------------

/// Which aspect of an action a factor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    /// Practice / spar / battle weighting.
    Context,
    /// Kind of reactive event.
    Event,
    /// Opponent or task difficulty relative to the actor.
    Level,
    /// Attribute fitness.
    Attribute,
    /// Diminishing returns for repeating the same target.
    Repeat,
    /// Reward for mixing targets.
    Variety,
    /// Slowdown just past a threshold.
    Choke,
    /// Shrinks as the value approaches the cap.
    CapGap,
    /// Recipe or content unlock distance.
    Unlock,
    /// Success / partial / fail weighting.
    Outcome,
    /// Allies reached by the action.
    Crowd,
    /// Enemies pressuring the actor.
    Pressure,
    /// Time the action was sustained.
    Uptime,
    /// Venue acoustics.
    Acoustic,
    /// Harmony with other performers.
    Ensemble,
    /// Bonus on the closing event of a performance.
    StopBonus,
    /// Minutes spent on a traversal skill.
    Duration,
    /// Terrain or task difficulty multiplier.
    Difficulty,
    /// How well a summoned ability landed, spread and potency included.
    Effectiveness,
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ordered collection of named multiplicative factors.
///
/// Values are sanitized on insert: NaN and negative values become `0.0`, so
/// the product is always finite-or-infinite and never negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorSet {
    entries: Vec<(FactorKind, f64)>,
}

impl FactorSet {
    /// Empty set (product `1.0`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a factor.
    pub fn push(&mut self, kind: FactorKind, value: f64) -> &mut Self {
        let value = if value.is_nan() || value < 0.0 { 0.0 } else { value };
        self.entries.push((kind, value));
        self
    }

    /// Builder-style [`FactorSet::push`].
    #[must_use]
    pub fn with(mut self, kind: FactorKind, value: f64) -> Self {
        self.push(kind, value);
        self
    }

    /// Product of every factor.
    #[must_use]
    pub fn product(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).product()
    }

    /// First value recorded for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: FactorKind) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, v)| *v)
    }

    /// The first factor that is exactly zero, if any.
    #[must_use]
    pub fn zeroed_by(&self) -> Option<FactorKind> {
        self.entries.iter().find(|(_, v)| *v <= 0.0).map(|(k, _)| *k)
    }

    /// Iterate over `(kind, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorKind, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of recorded factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no factor has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Weight Tables
// ---------------------------------------------------------------------------

/// Weight per [`crate::types::ActivityContext`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextWeights {
    /// Solo practice.
    pub practice: f64,
    /// Sparring.
    pub spar: f64,
    /// Real combat or live show.
    pub battle: f64,
}

impl ContextWeights {
    /// Weight for a context.
    #[must_use]
    pub fn weight(&self, context: crate::types::ActivityContext) -> f64 {
        use crate::types::ActivityContext;
        match context {
            ActivityContext::Practice => self.practice,
            ActivityContext::Spar => self.spar,
            ActivityContext::Battle => self.battle,
        }
    }
}

/// Weight per [`crate::types::Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeWeights {
    /// Clean success.
    pub success: f64,
    /// Partial success.
    pub partial: f64,
    /// Failure.
    pub fail: f64,
}

impl OutcomeWeights {
    /// Weight for an outcome.
    #[must_use]
    pub fn weight(&self, outcome: crate::types::Outcome) -> f64 {
        use crate::types::Outcome;
        match outcome {
            Outcome::Success => self.success,
            Outcome::Partial => self.partial,
            Outcome::Fail => self.fail,
        }
    }
}

// ---------------------------------------------------------------------------
// Level Curves
// ---------------------------------------------------------------------------

/// Stepped level curve used by reactive, performance, armor and summoning families.
///
/// With `d = other - actor`:
///   - `d < -trivial_margin` → `trivial`
///   - `d <= 0`              → `floor_equal`
///   - `d > 0`               → `min(cap, floor_equal + slope * d)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteppedLevel {
    /// Factor against an equal (or slightly weaker) opponent.
    pub floor_equal: f64,
    /// Increase per level the opponent is above the actor.
    pub slope: f64,
    /// Upper bound of the factor.
    pub cap: f64,
    /// Factor against trivial opposition.
    pub trivial: f64,
    /// How many levels below the actor still count as "equal".
    pub trivial_margin: u32,
}

impl SteppedLevel {
    /// Evaluate the curve.
    #[must_use]
    pub fn factor(&self, actor_level: u32, other_level: u32) -> f64 {
        let d = level_delta(actor_level, other_level);
        if d < -i64::from(self.trivial_margin) {
            self.trivial
        } else if d <= 0 {
            self.floor_equal
        } else {
            #[allow(clippy::cast_precision_loss)]
            let up = self.floor_equal + self.slope * d as f64;
            up.min(self.cap)
        }
    }
}

/// Linear curve clamped to a band: `clamp(1 + slope * d, min, max)`.
///
/// Used for weapon level deltas and for attribute comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampedLinear {
    /// Change per unit of difference.
    pub slope: f64,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ClampedLinear {
    /// Evaluate at a signed difference.
    #[must_use]
    pub fn factor(&self, diff: f64) -> f64 {
        (1.0 + self.slope * diff).max(self.min).min(self.max)
    }
}

/// Attribute fitness band: `clamp(base + slope * score, base, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeBand {
    /// Factor at a score of zero (also the lower bound).
    pub base: f64,
    /// Increase per attribute point.
    pub slope: f64,
    /// Upper bound.
    pub max: f64,
}

impl AttributeBand {
    /// Evaluate for an (averaged) attribute score.
    #[must_use]
    pub fn factor(&self, score: f64) -> f64 {
        (self.base + self.slope * score).min(self.max).max(self.base)
    }
}

/// Signed `other - actor` level difference.
#[must_use]
pub fn level_delta(actor_level: u32, other_level: u32) -> i64 {
    i64::from(other_level) - i64::from(actor_level)
}

/// Distance curve `1 / (1 + |d| / divisor)`: peaks when the task matches the actor.
#[must_use]
pub fn distance_factor(actor_level: u32, task_level: u32, divisor: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let d = level_delta(actor_level, task_level).unsigned_abs() as f64;
    if divisor <= 0.0 {
        return 1.0;
    }
    1.0 / (1.0 + d / divisor)
}

// ---------------------------------------------------------------------------
// Situational Bonuses
// ---------------------------------------------------------------------------

/// Saturating linear bonus `min(max, 1 + k * amount)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusCurve {
    /// Bonus per unit.
    pub k: f64,
    /// Saturation point.
    pub max: f64,
}

impl BonusCurve {
    /// Evaluate for a non-negative amount (negative amounts count as zero).
    #[must_use]
    pub fn factor(&self, amount: f64) -> f64 {
        (1.0 + self.k * amount.max(0.0)).min(self.max)
    }

    /// Crowd form: the first ally is the performer's baseline.
    #[must_use]
    pub fn crowd(&self, allies: u32) -> f64 {
        self.factor(f64::from(allies.saturating_sub(1)))
    }

    /// Quality form: the input is clamped into `[0, 1]`, absent means neutral.
    #[must_use]
    pub fn quality(&self, quality: Option<f64>) -> f64 {
        quality.map_or(1.0, |q| self.factor(q.clamp(0.0, 1.0)))
    }
}

/// Sustained-time curve `(seconds / norm)^k`, `1.0` when nothing was sustained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UptimeCurve {
    /// Seconds that count as one full unit.
    pub sec_norm: f64,
    /// Exponent; below one gives diminishing returns.
    pub k: f64,
}

impl UptimeCurve {
    /// Evaluate for the seconds sustained.
    #[must_use]
    pub fn factor(&self, seconds: f64) -> f64 {
        if seconds <= 0.0 || self.sec_norm <= 0.0 {
            return 1.0;
        }
        (seconds / self.sec_norm).powf(self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_set_sanitizes_and_multiplies() {
        let set = FactorSet::new()
            .with(FactorKind::Context, 0.5)
            .with(FactorKind::Level, 2.0)
            .with(FactorKind::Repeat, f64::NAN);
        assert_eq!(set.len(), 3);
        assert_eq!(set.zeroed_by(), Some(FactorKind::Repeat));
        assert!(set.product().abs() < f64::EPSILON);

        let set = FactorSet::new().with(FactorKind::Crowd, -3.0);
        assert_eq!(set.get(FactorKind::Crowd), Some(0.0));
        assert!((FactorSet::new().product() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stepped_level_regions() {
        let dance = SteppedLevel {
            floor_equal: 0.30,
            slope: 0.11,
            cap: 1.0,
            trivial: 0.05,
            trivial_margin: 1,
        };
        assert!((dance.factor(10, 8) - 0.05).abs() < 1e-12);
        assert!((dance.factor(10, 9) - 0.30).abs() < 1e-12);
        assert!((dance.factor(10, 10) - 0.30).abs() < 1e-12);
        assert!((dance.factor(10, 12) - 0.52).abs() < 1e-12);
        assert!((dance.factor(10, 30) - 1.0).abs() < 1e-12);

        let reactive = SteppedLevel {
            floor_equal: 0.15,
            slope: 0.17,
            cap: 1.0,
            trivial: 0.0,
            trivial_margin: 0,
        };
        assert!(reactive.factor(5, 4).abs() < 1e-12);
        assert!((reactive.factor(5, 5) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn clamped_linear_stays_in_band() {
        let curve = ClampedLinear {
            slope: 0.1,
            min: 0.25,
            max: 1.75,
        };
        assert!((curve.factor(0.0) - 1.0).abs() < 1e-12);
        assert!((curve.factor(-20.0) - 0.25).abs() < 1e-12);
        assert!((curve.factor(20.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn distance_peaks_at_match() {
        assert!((distance_factor(5, 5, 1.0) - 1.0).abs() < 1e-12);
        assert!((distance_factor(5, 7, 1.0) - 1.0 / 3.0).abs() < 1e-12);
        assert!((distance_factor(5, 7, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bonus_curves_saturate() {
        let crowd = BonusCurve { k: 0.08, max: 1.30 };
        assert!((crowd.crowd(0) - 1.0).abs() < 1e-12);
        assert!((crowd.crowd(1) - 1.0).abs() < 1e-12);
        assert!((crowd.crowd(3) - 1.16).abs() < 1e-12);
        assert!((crowd.crowd(50) - 1.30).abs() < 1e-12);

        let acoustic = BonusCurve { k: 0.10, max: 1.15 };
        assert!((acoustic.quality(None) - 1.0).abs() < 1e-12);
        assert!((acoustic.quality(Some(7.0)) - 1.10).abs() < 1e-12);
    }

    #[test]
    fn uptime_is_neutral_without_time() {
        let uptime = UptimeCurve { sec_norm: 4.0, k: 0.6 };
        assert!((uptime.factor(0.0) - 1.0).abs() < 1e-12);
        assert!((uptime.factor(4.0) - 1.0).abs() < 1e-12);
        assert!(uptime.factor(16.0) > 1.0);
        assert!(uptime.factor(1.0) < 1.0);
    }
}
