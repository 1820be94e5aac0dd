//! Property-Based Tests for the gain engine and heuristics
//!
//! Uses `proptest` to check the invariants every family relies on: values
//! stay under the cap and never fall, reported values keep two decimals,
//! a value at the cap is frozen, fixed randomness gives fixed results, the
//! gate ramp is monotone and the anti-grind curves stay inside their bounds.

use proptest::prelude::*;

use skillgain_core::engine::{self, ChanceGate, GainRequest, Novelty, round2};
use skillgain_core::factors::{FactorKind, FactorSet};
use skillgain_core::heuristics::{cap_gap_factor, repeat_factor, threshold_choke, variety_factor};
use skillgain_core::random::FixedRoll;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_gate() -> impl Strategy<Value = ChanceGate> {
    (0.0..0.5f64, 0.0..0.5f64, 0.0..=1.0f64).prop_map(|(low, span, p_small_min)| ChanceGate {
        tau_low: low,
        tau_high: low + span,
        p_small_min,
    })
}

fn arb_request() -> impl Strategy<Value = GainRequest> {
    (
        0.0..5.0f64,
        prop::collection::vec(0.0..3.0f64, 0..6),
        any::<bool>(),
        arb_gate(),
        prop::option::of(0.0..2.0f64),
        any::<bool>(),
    )
        .prop_map(|(base, factors, success, gate, ceiling, novel)| {
            let mut set = FactorSet::new();
            for value in factors {
                set.push(FactorKind::Context, value);
            }
            let mut request = GainRequest::new(base, set)
                .succeeded(success)
                .gated(gate)
                .novel(novel.then(Novelty::default));
            if let Some(ceiling) = ceiling {
                request = request.capped_at(ceiling);
            }
            request
        })
}

/// Stored values always carry two decimals; caps are whole numbers.
fn arb_position() -> impl Strategy<Value = (f64, f64)> {
    (1u32..200, 0u32..=100).prop_map(|(cap, pct)| {
        let cap = f64::from(cap);
        (round2(cap * f64::from(pct) / 100.0), cap)
    })
}

// ---------------------------------------------------------------------------
// Property: the cap is never exceeded and values never fall
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn value_stays_between_previous_and_cap(
        (current, cap) in arb_position(),
        request in arb_request(),
        roll in 0.0..1.0f64,
    ) {
        let outcome = engine::gain(current, cap, &request, &mut FixedRoll(roll));
        prop_assert!(outcome.value <= cap + 1e-9);
        prop_assert!(outcome.value >= current - 1e-9);
        prop_assert!(outcome.delta >= 0.0);
    }
}

// ---------------------------------------------------------------------------
// Property: reported values carry two decimals on every path
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn reported_value_is_always_two_decimals(
        current in 0.0..250.0f64,
        cap in 0.0..200.0f64,
        request in arb_request(),
        roll in 0.0..1.0f64,
    ) {
        let outcome = engine::gain(current, cap, &request, &mut FixedRoll(roll));
        prop_assert_eq!((outcome.value * 100.0).round() / 100.0, outcome.value);
        prop_assert!((outcome.value - current).abs() <= 0.005 + 1e-9 || outcome.applied());
    }
}

// ---------------------------------------------------------------------------
// Property: a value at the cap is frozen
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn at_cap_is_idempotent(cap in 1u32..200, request in arb_request(), roll in 0.0..1.0f64) {
        let cap = f64::from(cap);
        let outcome = engine::gain(cap, cap, &request, &mut FixedRoll(roll));
        prop_assert!((outcome.value - cap).abs() < f64::EPSILON);
        prop_assert_eq!(outcome.verdict, engine::Verdict::AtCap);
    }
}

// ---------------------------------------------------------------------------
// Property: fixed randomness gives fixed results
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fixed_roll_is_deterministic(
        (current, cap) in arb_position(),
        request in arb_request(),
        roll in 0.0..1.0f64,
    ) {
        let a = engine::gain(current, cap, &request, &mut FixedRoll(roll));
        let b = engine::gain(current, cap, &request, &mut FixedRoll(roll));
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Property: the gate ramp is monotone with exact endpoints
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn gate_ramp_is_monotone(gate in arb_gate(), a in 0.0..1.0f64, b in 0.0..1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(gate.probability(lo) <= gate.probability(hi) + 1e-12);
        prop_assert!((gate.probability(gate.tau_high) - 1.0).abs() < 1e-12);
        if gate.tau_low < gate.tau_high {
            prop_assert!((gate.probability(gate.tau_low) - gate.p_small_min).abs() < 1e-12);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: anti-grind curves stay in bounds
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn repeat_factor_is_floored_and_non_increasing(n in 0u32..10_000, floor in 0.0..1.0f64) {
        let here = repeat_factor(n, floor);
        let next = repeat_factor(n + 1, floor);
        prop_assert!(here >= floor);
        prop_assert!(next <= here + 1e-12);
        prop_assert!(here <= 1.0);
    }

    #[test]
    fn variety_bonus_is_bounded(
        ids in prop::collection::vec("[a-e]", 0..30),
        window in 1usize..20,
        target in 1usize..6,
        bonus in 0.0..1.0f64,
    ) {
        let factor = variety_factor(&ids, window, target, bonus);
        prop_assert!(factor >= 1.0);
        prop_assert!(factor <= 1.0 + bonus + 1e-12);
        let last = ids.last().cloned().into_iter().collect::<Vec<_>>();
        prop_assert!((variety_factor(&last, window, target, bonus) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shaping_factors_are_fractions(value in 0.0..100.0f64, cap in 1.0..100.0f64, k in 0.0..2.0f64) {
        let value = value.min(cap);
        let gap = cap_gap_factor(value, cap, k);
        prop_assert!((0.0..=1.0).contains(&gap));
        let choke = threshold_choke(value, &[10.0, 50.0], 5.0, 0.3);
        prop_assert!((choke - 1.0).abs() < f64::EPSILON || (choke - 0.3).abs() < f64::EPSILON);
    }
}
