//! Core Gain Engine: the single stochastic path every family feeds into.
//!
//! Given a current value `P`, a cap and a [`GainRequest`]:
//!
//!   raw   = base_gain × Π factors × novelty
//!   delta = min(raw, ceiling, cap − P)
//!
//! then a **chance gate** decides whether `delta` is applied at all:
//!
//!   p(delta) = 1                                       if delta ≥ tau_high
//!            = p_small_min                             if delta ≤ tau_low
//!            = p_small_min + (1 − p_small_min) × t     otherwise,
//!              t = (delta − tau_low) / (tau_high − tau_low)
//!
//! A first-time use may override `p` with a fixed novelty probability.
//! Results are rounded to two decimals. The engine never decreases a value
//! and never pushes it past the cap.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::factors::FactorSet;
use crate::random::RandomSource;

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Cap
// ---------------------------------------------------------------------------

/// Linear cap rule: `round(base + bonus + per_level × level)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapRule {
    /// Flat base cap.
    pub base: f64,
    /// Additional flat bonus (racial, gear).
    pub bonus: f64,
    /// Cap growth per character level.
    pub per_level: f64,
}

impl Default for CapRule {
    fn default() -> Self {
        Self {
            base: 1.0,
            bonus: 0.0,
            per_level: 1.0,
        }
    }
}

/// Proficiency cap for a character level under `rule`.
#[must_use]
pub fn proficiency_cap(level: u32, rule: &CapRule) -> f64 {
    (rule.base + rule.bonus + rule.per_level * f64::from(level)).round()
}

// ---------------------------------------------------------------------------
// Chance Gate
// ---------------------------------------------------------------------------

/// Probability ramp that makes tiny deltas rare and large ones certain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceGate {
    /// At or below this delta the probability is `p_small_min`.
    pub tau_low: f64,
    /// At or above this delta the probability is `1.0`.
    pub tau_high: f64,
    /// Probability floor for small deltas.
    pub p_small_min: f64,
}

impl ChanceGate {
    /// Gate that always applies a positive delta.
    pub const CERTAIN: Self = Self {
        tau_low: 0.0,
        tau_high: 0.0,
        p_small_min: 1.0,
    };

    /// Probability of applying `delta`.
    #[must_use]
    pub fn probability(&self, delta: f64) -> f64 {
        if delta >= self.tau_high {
            1.0
        } else if delta <= self.tau_low {
            self.p_small_min
        } else {
            let t = (delta - self.tau_low) / (self.tau_high - self.tau_low);
            self.p_small_min + (1.0 - self.p_small_min) * t
        }
    }
}

impl Default for ChanceGate {
    fn default() -> Self {
        Self {
            tau_low: 0.0,
            tau_high: 1.0,
            p_small_min: 0.0,
        }
    }
}

/// First-use treatment: a multiplier on `raw` and a fixed gate probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Novelty {
    /// Multiplier applied to `raw` on first use.
    pub multiplier: f64,
    /// Gate probability used instead of the ramp on first use.
    pub probability: f64,
}

impl Default for Novelty {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            probability: 0.95,
        }
    }
}

/// What happens when the underlying action failed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FailPolicy {
    /// Failures never gain.
    #[default]
    NoGain,
    /// With probability `chance`, apply `delta × factor` without further gating.
    Partial {
        /// Probability of salvaging some progress.
        chance: f64,
        /// Fraction of `delta` kept.
        factor: f64,
    },
    /// With probability `chance`, scale `delta` by `factor` and run it
    /// through the normal chance gate.
    PartialThenGate {
        /// Probability of salvaging some progress.
        chance: f64,
        /// Fraction of `delta` kept.
        factor: f64,
    },
}

// ---------------------------------------------------------------------------
// Request / Outcome
// ---------------------------------------------------------------------------

/// Everything the engine needs besides the current value and cap.
#[derive(Debug, Clone, PartialEq)]
pub struct GainRequest {
    /// Family base rate (`g0`).
    pub base_gain: f64,
    /// Named multiplicative factors.
    pub factors: FactorSet,
    /// Whether the underlying action succeeded.
    pub success: bool,
    /// Probability ramp.
    pub gate: ChanceGate,
    /// Behaviour on failure.
    pub on_fail: FailPolicy,
    /// Set on the first use of a target.
    pub novelty: Option<Novelty>,
    /// Hard upper bound on a single delta.
    pub ceiling: Option<f64>,
}

impl GainRequest {
    /// A successful, certain request with the given base and factors.
    #[must_use]
    pub fn new(base_gain: f64, factors: FactorSet) -> Self {
        Self {
            base_gain,
            factors,
            success: true,
            gate: ChanceGate::CERTAIN,
            on_fail: FailPolicy::NoGain,
            novelty: None,
            ceiling: None,
        }
    }

    /// Set the success flag.
    #[must_use]
    pub fn succeeded(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Set the chance gate.
    #[must_use]
    pub fn gated(mut self, gate: ChanceGate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn on_fail(mut self, policy: FailPolicy) -> Self {
        self.on_fail = policy;
        self
    }

    /// Mark as a first use.
    #[must_use]
    pub fn novel(mut self, novelty: Option<Novelty>) -> Self {
        self.novelty = novelty;
        self
    }

    /// Bound the delta of a single call.
    #[must_use]
    pub fn capped_at(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Uncapped candidate delta: `base_gain × Π factors × novelty multiplier`.
    #[must_use]
    pub fn raw(&self) -> f64 {
        let multiplier = self.novelty.map_or(1.0, |n| n.multiplier);
        let raw = self.base_gain * self.factors.product() * multiplier;
        if raw.is_nan() { 0.0 } else { raw }
    }
}

/// Why an action was refused before any math ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disqualification {
    /// Reactive gains need combat or a spar.
    NotInCombat,
    /// Reactive gains need real (non-training) weapons.
    TrainingWeapons,
    /// The opponent was weaker than the actor.
    WeakerOpponent,
    /// The activity context carries no weight.
    NoContextWeight,
    /// Not enough armor worn (or no chest piece).
    ArmorNotWorn,
    /// Dual wielding needs a one-handed weapon in each hand.
    NotOneHanded,
    /// A summoned ability had no effect.
    NoEffect,
}

/// How a gain call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Delta passed the gate and was applied.
    Applied,
    /// A failed action salvaged part of its delta.
    PartialOnFail,
    /// The gate roll missed.
    GateRejected,
    /// No headroom under the cap.
    AtCap,
    /// All factors multiplied out to nothing.
    NoDelta,
    /// The action failed and nothing was salvaged.
    Failed,
    /// Refused by a family hard gate.
    Disqualified(Disqualification),
}

/// Result of a single gain call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainOutcome {
    /// Value before the call.
    pub previous: f64,
    /// Value after the call.
    pub value: f64,
    /// Candidate delta after clamping (before any partial scaling).
    pub delta: f64,
    /// Gate probability, when the gate was consulted.
    pub probability: Option<f64>,
    /// How the call ended.
    pub verdict: Verdict,
}

impl GainOutcome {
    /// An outcome that leaves `value` untouched. The reported value is
    /// rounded to two decimals like every other outcome.
    #[must_use]
    pub fn unchanged(value: f64, verdict: Verdict) -> Self {
        Self {
            previous: value,
            value: round2(value),
            delta: 0.0,
            probability: None,
            verdict,
        }
    }

    /// Whether the value moved.
    #[must_use]
    pub fn applied(&self) -> bool {
        matches!(self.verdict, Verdict::Applied | Verdict::PartialOnFail)
    }

    /// `value − previous`, rounded.
    #[must_use]
    pub fn gained(&self) -> f64 {
        round2(self.value - self.previous)
    }
}

// ---------------------------------------------------------------------------
// Gain
// ---------------------------------------------------------------------------

/// Run one gain attempt.
///
/// Draws at most one value from `rng` for the failure salvage roll and at
/// most one for the chance gate. Calls that cannot gain (no cap, no delta)
/// draw nothing.
pub fn gain(
    current: f64,
    cap: f64,
    request: &GainRequest,
    rng: &mut dyn RandomSource,
) -> GainOutcome {
    let headroom = cap - current;
    if cap <= 0.0 || headroom <= 0.0 {
        return GainOutcome::unchanged(current, Verdict::AtCap);
    }

    let mut delta = request.raw();
    if let Some(ceiling) = request.ceiling {
        delta = delta.min(ceiling);
    }
    delta = delta.min(headroom);
    if delta <= 0.0 {
        return GainOutcome::unchanged(current, Verdict::NoDelta);
    }

    let settle = |applied: f64, probability: Option<f64>, verdict: Verdict| GainOutcome {
        previous: current,
        value: round2((current + applied).min(cap)),
        delta,
        probability,
        verdict,
    };

    let mut scaled = delta;
    let mut salvaged = false;
    if !request.success {
        match request.on_fail {
            FailPolicy::NoGain => {
                return GainOutcome {
                    delta,
                    ..GainOutcome::unchanged(current, Verdict::Failed)
                };
            }
            FailPolicy::Partial { chance, factor } => {
                return if rng.next_unit() < chance {
                    settle(delta * factor, None, Verdict::PartialOnFail)
                } else {
                    GainOutcome {
                        delta,
                        ..GainOutcome::unchanged(current, Verdict::Failed)
                    }
                };
            }
            FailPolicy::PartialThenGate { chance, factor } => {
                if rng.next_unit() >= chance {
                    return GainOutcome {
                        delta,
                        ..GainOutcome::unchanged(current, Verdict::Failed)
                    };
                }
                scaled = delta * factor;
                salvaged = true;
            }
        }
    }

    let probability = request
        .novelty
        .map_or_else(|| request.gate.probability(scaled), |n| n.probability);
    let roll = rng.next_unit();
    trace!(delta = scaled, probability, roll, "chance gate");

    if roll < probability {
        let verdict = if salvaged {
            Verdict::PartialOnFail
        } else {
            Verdict::Applied
        };
        settle(scaled, Some(probability), verdict)
    } else {
        settle(0.0, Some(probability), Verdict::GateRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{FactorKind, FactorSet};
    use crate::random::{FixedRoll, ScriptedRolls};

    fn dance_gate() -> ChanceGate {
        ChanceGate {
            tau_low: 0.018,
            tau_high: 0.055,
            p_small_min: 0.12,
        }
    }

    #[test]
    fn worked_dance_example() {
        let request = GainRequest::new(0.04, FactorSet::new()).gated(dance_gate());
        let outcome = gain(24.17, 54.0, &request, &mut FixedRoll(0.5));

        let p = outcome.probability.unwrap_or_default();
        assert!((p - 0.6432).abs() < 0.001, "p = {p}");
        assert_eq!(outcome.verdict, Verdict::Applied);
        assert!((outcome.value - 24.21).abs() < 1e-9);
    }

    #[test]
    fn same_example_rejected_by_high_roll() {
        let request = GainRequest::new(0.04, FactorSet::new()).gated(dance_gate());
        let outcome = gain(24.17, 54.0, &request, &mut FixedRoll(0.9));
        assert_eq!(outcome.verdict, Verdict::GateRejected);
        assert!((outcome.value - 24.17).abs() < 1e-9);
    }

    #[test]
    fn gate_ramp_endpoints() {
        let gate = dance_gate();
        assert!((gate.probability(0.0) - 0.12).abs() < 1e-12);
        assert!((gate.probability(0.018) - 0.12).abs() < 1e-12);
        assert!((gate.probability(0.055) - 1.0).abs() < 1e-12);
        assert!((gate.probability(0.5) - 1.0).abs() < 1e-12);
        assert!((ChanceGate::CERTAIN.probability(1e-9) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn delta_is_clamped_to_headroom() {
        let request = GainRequest::new(5.0, FactorSet::new());
        let outcome = gain(9.5, 10.0, &request, &mut FixedRoll(0.0));
        assert!((outcome.value - 10.0).abs() < 1e-9);
        assert!((outcome.delta - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_cap_or_no_delta_draws_nothing() {
        let mut rolls = ScriptedRolls::new([], 0.0);
        let request = GainRequest::new(1.0, FactorSet::new());
        assert_eq!(gain(0.0, 0.0, &request, &mut rolls).verdict, Verdict::AtCap);
        assert_eq!(gain(5.0, 5.0, &request, &mut rolls).verdict, Verdict::AtCap);

        let zeroed = GainRequest::new(1.0, FactorSet::new().with(FactorKind::Level, 0.0));
        assert_eq!(gain(1.0, 5.0, &zeroed, &mut rolls).verdict, Verdict::NoDelta);
        assert_eq!(rolls.draws(), 0);
    }

    #[test]
    fn untouched_values_are_reported_to_two_decimals() {
        let request = GainRequest::new(1.0, FactorSet::new());
        let at_cap = gain(10.004_9, 10.0, &request, &mut FixedRoll(0.0));
        assert_eq!(at_cap.verdict, Verdict::AtCap);
        assert!((at_cap.value - 10.0).abs() < 1e-12);

        let zeroed = GainRequest::new(1.0, FactorSet::new().with(FactorKind::Level, 0.0));
        let idle = gain(3.141_59, 10.0, &zeroed, &mut FixedRoll(0.0));
        assert_eq!(idle.verdict, Verdict::NoDelta);
        assert!((idle.value - 3.14).abs() < 1e-12);

        let failed = gain(3.141_59, 10.0, &request.clone().succeeded(false), &mut FixedRoll(0.0));
        assert_eq!(failed.verdict, Verdict::Failed);
        assert!((failed.value - 3.14).abs() < 1e-12);

        let tiny = GainRequest::new(0.001, FactorSet::new()).gated(dance_gate());
        let rejected = gain(3.141_59, 10.0, &tiny, &mut FixedRoll(0.99));
        assert_eq!(rejected.verdict, Verdict::GateRejected);
        assert!((rejected.value - 3.14).abs() < 1e-12);
        assert!(!rejected.applied());
    }

    #[test]
    fn fail_without_salvage_keeps_value() {
        let request = GainRequest::new(1.0, FactorSet::new()).succeeded(false);
        let outcome = gain(3.0, 10.0, &request, &mut FixedRoll(0.0));
        assert_eq!(outcome.verdict, Verdict::Failed);
        assert!((outcome.value - 3.0).abs() < 1e-9);
    }

    #[test]
    fn partial_on_fail_scales_delta() {
        let request = GainRequest::new(1.0, FactorSet::new())
            .succeeded(false)
            .on_fail(FailPolicy::Partial {
                chance: 0.5,
                factor: 0.25,
            });
        let hit = gain(3.0, 10.0, &request, &mut FixedRoll(0.1));
        assert_eq!(hit.verdict, Verdict::PartialOnFail);
        assert!((hit.value - 3.25).abs() < 1e-9);

        let miss = gain(3.0, 10.0, &request, &mut FixedRoll(0.9));
        assert_eq!(miss.verdict, Verdict::Failed);
    }

    #[test]
    fn partial_then_gate_uses_two_draws() {
        let request = GainRequest::new(0.04, FactorSet::new())
            .succeeded(false)
            .gated(dance_gate())
            .on_fail(FailPolicy::PartialThenGate {
                chance: 0.05,
                factor: 0.5,
            });
        let mut rolls = ScriptedRolls::new([0.01, 0.0], 0.99);
        let outcome = gain(2.0, 10.0, &request, &mut rolls);
        assert_eq!(rolls.draws(), 2);
        assert_eq!(outcome.verdict, Verdict::PartialOnFail);
        assert!((outcome.value - 2.02).abs() < 1e-9);
    }

    #[test]
    fn novelty_overrides_gate_probability() {
        let request = GainRequest::new(0.001, FactorSet::new())
            .gated(dance_gate())
            .novel(Some(Novelty {
                multiplier: 10.0,
                probability: 0.95,
            }));
        let outcome = gain(0.0, 10.0, &request, &mut FixedRoll(0.9));
        assert_eq!(outcome.probability, Some(0.95));
        assert!((outcome.value - 0.01).abs() < 1e-9);
    }

    #[test]
    fn ceiling_bounds_single_delta() {
        let request = GainRequest::new(3.0, FactorSet::new()).capped_at(0.5);
        let outcome = gain(1.0, 10.0, &request, &mut FixedRoll(0.0));
        assert!((outcome.value - 1.5).abs() < 1e-9);
    }

    #[test]
    fn cap_from_level() {
        assert!((proficiency_cap(1, &CapRule::default()) - 2.0).abs() < 1e-12);
        let rule = CapRule {
            base: 4.0,
            bonus: 0.4,
            per_level: 1.0,
        };
        assert!((proficiency_cap(50, &rule) - 54.0).abs() < 1e-12);
    }
}
