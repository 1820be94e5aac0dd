//! Per-character progression state.
//!
//! Each character owns one [`ProgressionState`]: the current value of every
//! proficiency it has touched plus the repeat / variety bookkeeping for each
//! usage scope. Entries are created lazily on first use.

use std::collections::{HashMap, HashSet};

use crate::types::{
    CraftKey, Element, GatheringSkill, MagicSchool, PerformanceKind, SkillKey, WeaponKind,
};

/// Bookkeeping domain within which "same target again" is judged.
///
/// Reactive events share one scope so evading after parrying breaks the
/// streak; crafts keep one scope per craft so alternating recipes inside
/// blacksmithing is tracked separately from alchemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageScope {
    /// All reactive kinds together.
    Reactive,
    /// Pieces within one performance discipline.
    Performance(PerformanceKind),
    /// Recipes within one craft.
    Craft(CraftKey),
    /// Nodes within one gathering skill.
    Gathering(GatheringSkill),
    /// Techniques within one weapon type.
    Weapon(WeaponKind),
    /// Techniques while dual wielding.
    DualWield,
    /// Animal kinds.
    AnimalHandling,
    /// Spells within one element.
    Element(Element),
    /// Spells within one school.
    School(MagicSchool),
    /// Summon ids cast.
    SummonCast,
    /// Summoned abilities used.
    SummonAbility,
    /// Summons kept alive.
    SummonMaintenance,
}

/// How the streak for a target is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakRule {
    /// `0` on the first use after switching, then `1, 2, …` while repeating.
    Consecutive,
    /// `1` on the first use after switching, then `2, 3, …` while repeating.
    CountFromOne,
}

/// Repeat and variety bookkeeping for one [`UsageScope`].
///
/// The recent history is capped by the `history` passed to
/// [`record_success`](Self::record_success) and only the current target
/// keeps a streak entry. The set of seen targets is never trimmed, since
/// novelty depends on it; it grows with the number of distinct ids used in
/// the scope. Clear it with [`ProgressionState::reset_usage`] or
/// [`ProgressionState::reset_usage_where`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageTracker {
    last_used: Option<String>,
    streaks: HashMap<String, u32>,
    recent: Vec<String>,
    seen: HashSet<String>,
}

impl UsageTracker {
    /// Last successfully used target.
    #[must_use]
    pub fn last_used(&self) -> Option<&str> {
        self.last_used.as_deref()
    }

    /// Stored streak for `target` (zero when unknown).
    #[must_use]
    pub fn stored_streak(&self, target: &str) -> u32 {
        self.streaks.get(target).copied().unwrap_or(0)
    }

    /// Streak the next successful use of `target` would have.
    #[must_use]
    pub fn next_streak(&self, target: &str, rule: StreakRule) -> u32 {
        if self.last_used.as_deref() == Some(target) {
            return self.stored_streak(target).saturating_add(1);
        }
        match rule {
            StreakRule::Consecutive => 0,
            StreakRule::CountFromOne => 1,
        }
    }

    /// Streak used for factor computation. For [`StreakRule::CountFromOne`]
    /// this is the stored count, so a first use reads as zero.
    #[must_use]
    pub fn streak_for(&self, target: &str, rule: StreakRule) -> u32 {
        match rule {
            StreakRule::Consecutive => self.next_streak(target, rule),
            StreakRule::CountFromOne => {
                if self.last_used.as_deref() == Some(target) {
                    self.stored_streak(target)
                } else {
                    0
                }
            }
        }
    }

    /// Recent successful targets, oldest first.
    #[must_use]
    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    /// Whether `target` has ever been used successfully.
    #[must_use]
    pub fn has_seen(&self, target: &str) -> bool {
        self.seen.contains(target)
    }

    /// Record a successful use of `target`.
    ///
    /// Streaks of other targets are dropped (they read as zero), and the
    /// recent history keeps at most `history` entries.
    pub fn record_success(&mut self, target: &str, rule: StreakRule, history: usize) {
        let streak = self.next_streak(target, rule);
        self.streaks.retain(|id, _| id == target);
        self.streaks.insert(target.to_owned(), streak);
        self.last_used = Some(target.to_owned());
        self.seen.insert(target.to_owned());

        self.recent.push(target.to_owned());
        if self.recent.len() > history {
            let excess = self.recent.len() - history;
            self.recent.drain(..excess);
        }
    }
}

// ---------------------------------------------------------------------------
// Progression State
// ---------------------------------------------------------------------------

/// Every proficiency value and usage tracker a character owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionState {
    values: HashMap<SkillKey, f64>,
    usage: HashMap<UsageScope, UsageTracker>,
}

impl ProgressionState {
    /// Empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a skill (zero when never touched).
    #[must_use]
    pub fn value(&self, key: &SkillKey) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Whether the skill has an entry.
    #[must_use]
    pub fn contains(&self, key: &SkillKey) -> bool {
        self.values.contains_key(key)
    }

    /// Ensure the skill has an entry and return its value.
    pub fn touch(&mut self, key: &SkillKey) -> f64 {
        *self.values.entry(key.clone()).or_insert(0.0)
    }

    /// Overwrite a skill value.
    pub fn set_value(&mut self, key: SkillKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Iterate over every `(skill, value)` pair.
    pub fn values(&self) -> impl Iterator<Item = (&SkillKey, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// Tracker for a scope, if any use was recorded.
    #[must_use]
    pub fn tracker(&self, scope: UsageScope) -> Option<&UsageTracker> {
        self.usage.get(&scope)
    }

    /// Tracker for a scope, created on demand.
    pub fn tracker_mut(&mut self, scope: UsageScope) -> &mut UsageTracker {
        self.usage.entry(scope).or_default()
    }

    /// Drop the bookkeeping of a single scope.
    pub fn reset_usage(&mut self, scope: UsageScope) {
        self.usage.remove(&scope);
    }

    /// Drop the bookkeeping of every scope matching `predicate`.
    pub fn reset_usage_where(&mut self, mut predicate: impl FnMut(&UsageScope) -> bool) {
        self.usage.retain(|scope, _| !predicate(scope));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_streak_resets_on_switch() {
        let mut t = UsageTracker::default();
        assert_eq!(t.next_streak("a", StreakRule::Consecutive), 0);
        t.record_success("a", StreakRule::Consecutive, 8);
        assert_eq!(t.next_streak("a", StreakRule::Consecutive), 1);
        t.record_success("a", StreakRule::Consecutive, 8);
        assert_eq!(t.stored_streak("a"), 1);

        t.record_success("b", StreakRule::Consecutive, 8);
        assert_eq!(t.stored_streak("a"), 0);
        assert_eq!(t.stored_streak("b"), 0);
        assert!(!t.streaks.contains_key("a"));
        assert_eq!(t.last_used(), Some("b"));
    }

    #[test]
    fn count_from_one_reads_stored_count() {
        let mut t = UsageTracker::default();
        assert_eq!(t.streak_for("horse", StreakRule::CountFromOne), 0);
        t.record_success("horse", StreakRule::CountFromOne, 4);
        assert_eq!(t.stored_streak("horse"), 1);
        assert_eq!(t.streak_for("horse", StreakRule::CountFromOne), 1);
        t.record_success("horse", StreakRule::CountFromOne, 4);
        assert_eq!(t.stored_streak("horse"), 2);
        assert_eq!(t.streak_for("hawk", StreakRule::CountFromOne), 0);
    }

    #[test]
    fn recent_history_is_bounded() {
        let mut t = UsageTracker::default();
        for id in ["a", "b", "c", "d", "e"] {
            t.record_success(id, StreakRule::Consecutive, 3);
        }
        assert_eq!(t.recent(), ["c", "d", "e"]);
        assert!(t.has_seen("a"));
    }

    #[test]
    fn long_runs_keep_one_streak_entry() {
        let mut t = UsageTracker::default();
        for i in 0..500 {
            t.record_success(&format!("recipe-{}", i % 50), StreakRule::Consecutive, 8);
        }
        assert_eq!(t.streaks.len(), 1);
        assert_eq!(t.recent().len(), 8);
        assert_eq!(t.seen.len(), 50);

        let mut state = ProgressionState::new();
        *state.tracker_mut(UsageScope::SummonAbility) = t;
        state.reset_usage(UsageScope::SummonAbility);
        assert!(state.tracker(UsageScope::SummonAbility).is_none());
        assert!(!state.tracker_mut(UsageScope::SummonAbility).has_seen("recipe-0"));
    }

    #[test]
    fn state_is_lazy_and_resettable() {
        let mut state = ProgressionState::new();
        let key = SkillKey::Craft(CraftKey::Alchemy);
        assert!(!state.contains(&key));
        assert!(state.touch(&key).abs() < f64::EPSILON);
        assert!(state.contains(&key));

        state
            .tracker_mut(UsageScope::Craft(CraftKey::Alchemy))
            .record_success("potion", StreakRule::Consecutive, 4);
        state
            .tracker_mut(UsageScope::Craft(CraftKey::Masonry))
            .record_success("wall", StreakRule::Consecutive, 4);
        state.reset_usage_where(|s| matches!(s, UsageScope::Craft(_)));
        assert!(state.tracker(UsageScope::Craft(CraftKey::Alchemy)).is_none());
        assert!(state.tracker(UsageScope::Craft(CraftKey::Masonry)).is_none());
    }
}
