//! The progression strategy seam.
//!
//! A family is a small value type implementing [`ProgressionStrategy`]: it
//! names the skill an action trains, the usage scope that tracks repetition,
//! the cap, and turns the action into a [`GainRequest`]. The shared
//! [`progress`] driver does the rest: lazily creates state, reads the current
//! value, runs the engine, writes the result back, and updates usage
//! bookkeeping when the action succeeded.

use tracing::{debug, debug_span};

use crate::character::Character;
use crate::engine::{self, Disqualification, GainOutcome, GainRequest, Verdict};
use crate::metrics::spans;
use crate::random::RandomSource;
use crate::state::{StreakRule, UsageScope, UsageTracker};
use crate::types::{Attributes, SkillKey};

/// Where an action's repetition is tracked and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageTarget {
    /// Bookkeeping scope.
    pub scope: UsageScope,
    /// Target id within the scope (recipe, piece, node, …).
    pub id: String,
    /// Streak counting rule.
    pub rule: StreakRule,
    /// Recent targets to keep.
    pub history: usize,
}

impl UsageTarget {
    /// Consecutive-streak target.
    #[must_use]
    pub fn consecutive(scope: UsageScope, id: impl Into<String>, history: usize) -> Self {
        Self {
            scope,
            id: id.into(),
            rule: StreakRule::Consecutive,
            history,
        }
    }
}

/// Read-only snapshot handed to [`ProgressionStrategy::assess`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressView<'a> {
    /// Current value.
    pub value: f64,
    /// Cap for this action.
    pub cap: f64,
    /// Repeat streak of the usage target (zero when untracked).
    pub streak: u32,
    /// Recent successful targets in the scope, oldest first.
    pub recent: &'a [String],
    /// Whether the usage target has never succeeded before.
    pub first_use: bool,
    /// Actor level (at least `1`).
    pub level: u32,
    /// Actor attributes.
    pub attributes: &'a Attributes,
}

/// A family's verdict on an action before any randomness.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// The action may train the skill.
    Qualified(GainRequest),
    /// A hard gate refused the action.
    Disqualified(Disqualification),
}

/// One progression family.
pub trait ProgressionStrategy {
    /// Action description this family consumes.
    type Action;

    /// Skill trained by the action.
    fn skill(&self, action: &Self::Action) -> SkillKey;

    /// Cap applied to this action.
    fn cap(&self, character: &Character, action: &Self::Action) -> f64;

    /// Where repetition is tracked, if anywhere.
    fn usage(&self, action: &Self::Action) -> Option<UsageTarget>;

    /// Turn the action into a gain request, or refuse it.
    fn assess(&self, view: &ProgressView<'_>, action: &Self::Action) -> Assessment;
}

/// Run one action through a strategy and the engine, updating `character`.
pub fn progress<S>(
    strategy: &S,
    character: &mut Character,
    action: &S::Action,
    rng: &mut dyn RandomSource,
) -> GainOutcome
where
    S: ProgressionStrategy + ?Sized,
{
    let key = strategy.skill(action);
    let _span = debug_span!(spans::GAIN, skill = %key).entered();

    let cap = strategy.cap(character, action);
    let usage = strategy.usage(action);
    let level = character.effective_level();
    let current = character.progression.touch(&key);

    let assessment = {
        let tracker = usage
            .as_ref()
            .and_then(|u| character.progression.tracker(u.scope));
        let view = ProgressView {
            value: current,
            cap,
            streak: match (tracker, usage.as_ref()) {
                (Some(t), Some(u)) => t.streak_for(&u.id, u.rule),
                _ => 0,
            },
            recent: tracker.map(UsageTracker::recent).unwrap_or_default(),
            first_use: match (tracker, usage.as_ref()) {
                (Some(t), Some(u)) => !t.has_seen(&u.id),
                _ => true,
            },
            level,
            attributes: &character.attributes,
        };
        strategy.assess(&view, action)
    };

    let request = match assessment {
        Assessment::Qualified(request) => request,
        Assessment::Disqualified(reason) => {
            debug!(skill = %key, ?reason, "action disqualified");
            return GainOutcome::unchanged(current, Verdict::Disqualified(reason));
        }
    };

    let outcome = engine::gain(current, cap, &request, rng);
    if outcome.applied() {
        character.progression.set_value(key.clone(), outcome.value);
    }
    if request.success {
        if let Some(u) = usage {
            character
                .progression
                .tracker_mut(u.scope)
                .record_success(&u.id, u.rule, u.history);
        }
    }

    debug!(
        skill = %key,
        previous = outcome.previous,
        value = outcome.value,
        verdict = ?outcome.verdict,
        "proficiency resolved"
    );
    outcome
}
