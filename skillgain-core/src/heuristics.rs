//! Anti-grind heuristics shared across families.
//!
//! Repetition decay:
//!   F_repeat(N) = max(floor, 1 / (1 + ln(1 + N)))
//!
//! Variety bonus over the last `window` targets with `D` distinct ids:
//!   F_variety = 1 + bonus_max × min(1, D / target_distinct)    (window ≥ 2 entries)
//!
//! Threshold choke: a fixed multiplier while `t ≤ P ≤ t + window` for any
//! threshold `t`.
//!
//! Cap-gap softener:
//!   F_capgap = ((cap − P) / cap)^k

use std::collections::HashSet;

/// Diminishing returns for the `streak`-th consecutive use of the same target.
///
/// Non-increasing in `streak` and never below `floor`. A floor of `0.0`
/// leaves the curve unfloored.
#[must_use]
pub fn repeat_factor(streak: u32, floor: f64) -> f64 {
    let decay = 1.0 / (1.0 + (1.0 + f64::from(streak)).ln());
    decay.max(floor)
}

/// Reward for mixing targets in the recent history.
///
/// Only the last `window` entries count. Empty and single-entry windows
/// are neutral; a longer window of one repeated id still earns the
/// one-target share of the bonus. The result never exceeds `1 + bonus_max`.
#[must_use]
pub fn variety_factor<S: AsRef<str>>(
    recent: &[S],
    window: usize,
    target_distinct: usize,
    bonus_max: f64,
) -> f64 {
    let start = recent.len().saturating_sub(window);
    let windowed = &recent[start..];
    if windowed.len() < 2 {
        return 1.0;
    }
    let distinct: HashSet<&str> = windowed.iter().map(AsRef::as_ref).collect();
    #[allow(clippy::cast_precision_loss)]
    let coverage = (distinct.len() as f64 / target_distinct.max(1) as f64).min(1.0);
    1.0 + bonus_max.max(0.0) * coverage
}

/// Slowdown just past a milestone.
///
/// Returns `choke` if `value` lies in `[t, t + window]` for any threshold
/// `t`, otherwise `1.0`.
#[must_use]
pub fn threshold_choke(value: f64, thresholds: &[f64], window: f64, choke: f64) -> f64 {
    let inside = thresholds
        .iter()
        .any(|t| value >= *t && value <= *t + window);
    if inside { choke } else { 1.0 }
}

/// Softener that shrinks gains as the value approaches the cap.
///
/// `0.0` for a non-positive cap or a value at/above the cap.
#[must_use]
pub fn cap_gap_factor(value: f64, cap: f64, k: f64) -> f64 {
    if cap <= 0.0 {
        return 0.0;
    }
    ((cap - value).max(0.0) / cap).powf(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_starts_neutral_and_floors() {
        assert!((repeat_factor(0, 0.45) - 1.0).abs() < 1e-12);
        let once = repeat_factor(1, 0.0);
        assert!((once - 1.0 / (1.0 + 2f64.ln())).abs() < 1e-12);
        assert!((repeat_factor(10_000, 0.45) - 0.45).abs() < 1e-12);
        assert!(repeat_factor(10_000, 0.0) < 0.11);
    }

    #[test]
    fn variety_neutral_for_short_windows() {
        let empty: [&str; 0] = [];
        assert!((variety_factor(&empty, 10, 4, 0.25) - 1.0).abs() < 1e-12);
        assert!((variety_factor(&["waltz"], 10, 4, 0.25) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_single_target_earns_one_share() {
        assert!((variety_factor(&["a", "a", "a"], 10, 4, 0.25) - 1.0625).abs() < 1e-12);
        assert!((variety_factor(&["waltz", "waltz"], 10, 4, 0.25) - 1.0625).abs() < 1e-12);
    }

    #[test]
    fn variety_grows_to_bonus() {
        let two = variety_factor(&["a", "b"], 10, 4, 0.25);
        assert!((two - 1.125).abs() < 1e-12);
        let many = variety_factor(&["a", "b", "c", "d", "e", "f"], 10, 4, 0.25);
        assert!((many - 1.25).abs() < 1e-12);
    }

    #[test]
    fn variety_only_looks_at_window() {
        let recent = ["a", "b", "c", "d", "x", "x", "x"];
        assert!((variety_factor(&recent, 3, 4, 0.25) - 1.0625).abs() < 1e-12);
        assert!((variety_factor(&recent, 1, 4, 0.25) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn choke_applies_inside_window() {
        let thresholds = [10.0, 20.0];
        assert!((threshold_choke(9.99, &thresholds, 8.0, 0.35) - 1.0).abs() < 1e-12);
        assert!((threshold_choke(10.0, &thresholds, 8.0, 0.35) - 0.35).abs() < 1e-12);
        assert!((threshold_choke(18.0, &thresholds, 8.0, 0.35) - 0.35).abs() < 1e-12);
        assert!((threshold_choke(18.5, &thresholds, 8.0, 0.35) - 1.0).abs() < 1e-12);
        assert!((threshold_choke(50.0, &[], 8.0, 0.35) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cap_gap_shrinks_to_zero() {
        assert!((cap_gap_factor(0.0, 50.0, 0.9) - 1.0).abs() < 1e-12);
        assert!(cap_gap_factor(50.0, 50.0, 0.9).abs() < 1e-12);
        assert!(cap_gap_factor(3.0, 0.0, 0.9).abs() < 1e-12);
        assert!(cap_gap_factor(40.0, 50.0, 0.9) < cap_gap_factor(10.0, 50.0, 0.9));
    }
}
