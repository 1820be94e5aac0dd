//! Elemental magic: eight elements and five schools.
//!
//! A cast trains two proficiencies at once: its element (unless the spell
//! is a hybrid) and its school. Each discipline tracks spells separately,
//! so the first cast of a spell is novel to both and passes the chance gate
//! with a fixed, high probability.

use crate::character::Character;
use crate::config::ElementalTuning;
use crate::engine::{CapRule, Disqualification, GainOutcome, GainRequest, proficiency_cap};
use crate::factors::{FactorKind, FactorSet, level_delta};
use crate::heuristics::repeat_factor;
use crate::random::RandomSource;
use crate::state::UsageScope;
use crate::strategy::{Assessment, ProgressView, ProgressionStrategy, UsageTarget, progress};
use crate::types::{ActivityContext, Element, MagicSchool, SkillKey};

/// Elemental makeup of a spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellElement {
    /// A single pure element.
    Pure(Element),
    /// A blend (e.g. `steam`); trains no element.
    Hybrid(String),
}

/// One spell cast.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCast {
    /// Spell id.
    pub spell: String,
    /// Element of the spell.
    pub element: SpellElement,
    /// School of the spell, if it belongs to one.
    pub school: Option<MagicSchool>,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// Opponent level, if there was one.
    pub enemy_level: Option<u32>,
    /// Whether the spell went off.
    pub success: bool,
}

/// A proficiency trained by casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// A pure element.
    Element(Element),
    /// A school of magic.
    School(MagicSchool),
}

/// A cast seen from one discipline.
#[derive(Debug, Clone, PartialEq)]
pub struct DisciplineUse {
    /// Discipline trained.
    pub discipline: Discipline,
    /// Spell id.
    pub spell: String,
    /// Practice, spar or battle.
    pub context: ActivityContext,
    /// Opponent level, if there was one.
    pub enemy_level: Option<u32>,
    /// Whether the spell went off.
    pub success: bool,
}

/// Outcomes of one cast per discipline; `None` when not trained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellGains {
    /// Element outcome.
    pub element: Option<GainOutcome>,
    /// School outcome.
    pub school: Option<GainOutcome>,
}

/// Elemental magic strategy.
#[derive(Debug, Clone, Copy)]
pub struct Elemental<'a> {
    tuning: &'a ElementalTuning,
    cap_rule: &'a CapRule,
}

impl<'a> Elemental<'a> {
    /// Borrow the tuning and cap rule.
    #[must_use]
    pub fn new(tuning: &'a ElementalTuning, cap_rule: &'a CapRule) -> Self {
        Self { tuning, cap_rule }
    }

    /// Train the element, then the school, of one cast.
    pub fn cast_spell(
        &self,
        character: &mut Character,
        cast: &SpellCast,
        rng: &mut dyn RandomSource,
    ) -> SpellGains {
        let mut train = |discipline| {
            let action = DisciplineUse {
                discipline,
                spell: cast.spell.clone(),
                context: cast.context,
                enemy_level: cast.enemy_level,
                success: cast.success,
            };
            progress(self, character, &action, rng)
        };

        let element = match &cast.element {
            SpellElement::Pure(element) => Some(train(Discipline::Element(*element))),
            SpellElement::Hybrid(_) => None,
        };
        let school = cast.school.map(|school| train(Discipline::School(school)));
        SpellGains { element, school }
    }
}

impl ProgressionStrategy for Elemental<'_> {
    type Action = DisciplineUse;

    fn skill(&self, action: &DisciplineUse) -> SkillKey {
        match action.discipline {
            Discipline::Element(element) => SkillKey::Element(element),
            Discipline::School(school) => SkillKey::School(school),
        }
    }

    fn cap(&self, character: &Character, _action: &DisciplineUse) -> f64 {
        proficiency_cap(character.effective_level(), self.cap_rule)
    }

    fn usage(&self, action: &DisciplineUse) -> Option<UsageTarget> {
        let scope = match action.discipline {
            Discipline::Element(element) => UsageScope::Element(element),
            Discipline::School(school) => UsageScope::School(school),
        };
        Some(UsageTarget::consecutive(
            scope,
            action.spell.clone(),
            self.tuning.history,
        ))
    }

    fn assess(&self, view: &ProgressView<'_>, action: &DisciplineUse) -> Assessment {
        let t = self.tuning;
        let context = t.context_weight.weight(action.context);
        if context <= 0.0 {
            return Assessment::Disqualified(Disqualification::NoContextWeight);
        }

        let mut factors = FactorSet::new();
        factors.push(FactorKind::Context, context);
        if let Some(enemy_level) = action.enemy_level {
            #[allow(clippy::cast_precision_loss)]
            let d = level_delta(view.level, enemy_level) as f64;
            factors.push(FactorKind::Level, t.level.factor(d));
        }
        factors.push(FactorKind::Repeat, repeat_factor(view.streak, t.min_repeat_factor));

        Assessment::Qualified(
            GainRequest::new(t.base_gain, factors)
                .succeeded(action.success)
                .gated(t.gate)
                .novel(view.first_use.then_some(t.novelty)),
        )
    }
}
