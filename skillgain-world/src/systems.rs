//! Progression systems: route action events to family strategies.
//!
//! [`ProgressionSystem`] owns the tuning and the catalog, builds the right
//! family strategy for each [`ActionEvent`] and records every outcome in its
//! counters. A tick's events are resolved in parallel across characters and
//! in order within a character.
//!
//! ## Resolution order
//!
//! | Stage              | Parallelism      | Randomness                        |
//! |--------------------|------------------|-----------------------------------|
//! | Group by actor     | Sequential       | None                              |
//! | Resolve a group    | One rayon task   | `ChaCha8Rng` from seed and actor  |
//! | Events in a group  | Sequential       | Shared by the group               |

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, debug_span, info_span};

use skillgain_core::families::{
    AnimalHandling, Armor, Crafting, DualWield, Elemental, Gathering, Outdoor, Performance,
    Reactive, SpellElement, Summoning, Weapons,
};
use skillgain_core::metrics::{ProgressionCounters, spans};
use skillgain_core::random::RandomSource;
use skillgain_core::strategy::{ProgressionStrategy, progress};
use skillgain_core::types::{CharacterId, SkillFamily, SkillKey};
use skillgain_core::{
    Character, GainOutcome, ProgressionConfig, ProgressionError, Result, SkillCatalog,
};

use crate::events::ActionEvent;
use crate::registry::CharacterRegistry;

// ---------------------------------------------------------------------------
// Resolution results
// ---------------------------------------------------------------------------

/// Outcome for one skill touched by an event.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillGain {
    /// Skill that was trained.
    pub skill: SkillKey,
    /// What the gain engine decided.
    pub outcome: GainOutcome,
}

/// Everything one event did to its actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGain {
    /// Character who acted.
    pub actor: CharacterId,
    /// Family that resolved the event.
    pub family: SkillFamily,
    /// One entry per skill trained; empty when the event trains nothing.
    pub gains: Vec<SkillGain>,
}

impl ResolvedGain {
    /// Total proficiency gained across all skills.
    #[must_use]
    pub fn total_gained(&self) -> f64 {
        self.gains.iter().map(|g| g.outcome.gained()).sum()
    }

    /// Outcome for `skill`, if the event trained it.
    #[must_use]
    pub fn outcome_for(&self, skill: &SkillKey) -> Option<&GainOutcome> {
        self.gains
            .iter()
            .find(|g| &g.skill == skill)
            .map(|g| &g.outcome)
    }
}

fn run<S>(
    strategy: &S,
    character: &mut Character,
    action: &S::Action,
    rng: &mut dyn RandomSource,
) -> Vec<SkillGain>
where
    S: ProgressionStrategy,
{
    let skill = strategy.skill(action);
    let outcome = progress(strategy, character, action, rng);
    vec![SkillGain { skill, outcome }]
}

// ---------------------------------------------------------------------------
// Progression system
// ---------------------------------------------------------------------------

/// Tuning, catalog and counters shared by every resolution.
#[derive(Debug)]
pub struct ProgressionSystem {
    config: ProgressionConfig,
    catalog: SkillCatalog,
    counters: ProgressionCounters,
}

impl ProgressionSystem {
    /// Build a system from validated tuning and a catalog.
    #[must_use]
    pub fn new(config: ProgressionConfig, catalog: SkillCatalog) -> Self {
        Self {
            config,
            catalog,
            counters: ProgressionCounters::new(),
        }
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// Counters for every outcome resolved so far.
    #[must_use]
    pub fn counters(&self) -> &ProgressionCounters {
        &self.counters
    }

    /// Resolve one event against its actor.
    ///
    /// `character` must be the event's actor.
    pub fn resolve_event(
        &self,
        character: &mut Character,
        event: &ActionEvent,
        rng: &mut dyn RandomSource,
    ) -> ResolvedGain {
        let family = event.family();
        let _span = debug_span!(spans::RESOLVE_EVENT, character = %character.id, ?family).entered();
        debug_assert_eq!(event.actor(), character.id);

        let config = &self.config;
        let catalog = &self.catalog;
        let gains = match event {
            ActionEvent::Reactive { action, .. } => {
                run(&Reactive::new(&config.reactive, catalog), character, action, rng)
            }
            ActionEvent::Performance { kind, action, .. } => run(
                &Performance::from_config(*kind, config, catalog),
                character,
                action,
                rng,
            ),
            ActionEvent::Craft { action, .. } => {
                run(&Crafting::new(&config.crafting, &config.cap), character, action, rng)
            }
            ActionEvent::CraftTraining { craft, success, .. } => {
                let outcome = Crafting::new(&config.crafting, &config.cap)
                    .train(character, *craft, *success, rng);
                vec![SkillGain {
                    skill: SkillKey::Craft(*craft),
                    outcome,
                }]
            }
            ActionEvent::Gather { action, .. } => run(
                &Gathering::new(&config.gathering, &config.cap, catalog),
                character,
                action,
                rng,
            ),
            ActionEvent::Outdoor { action, .. } => {
                run(&Outdoor::new(&config.outdoor, &config.cap), character, action, rng)
            }
            ActionEvent::Weapon { action, .. } => run(
                &Weapons::new(&config.weapon, &config.cap, catalog),
                character,
                action,
                rng,
            ),
            ActionEvent::DualWield { action, .. } => {
                run(&DualWield::new(&config.weapon, &config.cap), character, action, rng)
            }
            ActionEvent::Armor { action, .. } => {
                run(&Armor::new(&config.armor, &config.cap), character, action, rng)
            }
            ActionEvent::Handle { action, .. } => run(
                &AnimalHandling::new(&config.animal_handling, &config.cap),
                character,
                action,
                rng,
            ),
            ActionEvent::Spell { cast, .. } => {
                let spell = Elemental::new(&config.elemental, &config.cap)
                    .cast_spell(character, cast, rng);
                let mut gains = Vec::with_capacity(2);
                if let (SpellElement::Pure(element), Some(outcome)) = (&cast.element, spell.element)
                {
                    gains.push(SkillGain {
                        skill: SkillKey::Element(*element),
                        outcome,
                    });
                }
                if let (Some(school), Some(outcome)) = (cast.school, spell.school) {
                    gains.push(SkillGain {
                        skill: SkillKey::School(school),
                        outcome,
                    });
                }
                gains
            }
            ActionEvent::Summon { action, .. } => {
                run(&Summoning::new(&config.summoning, catalog), character, action, rng)
            }
        };

        for gain in &gains {
            self.counters.record(&gain.outcome);
        }
        ResolvedGain {
            actor: character.id,
            family,
            gains,
        }
    }

    /// Resolve a whole tick of events.
    ///
    /// Events are grouped by actor. Each group runs on its own `ChaCha8Rng`
    /// seeded from `tick_seed` and the actor id, so a character's results do
    /// not depend on who else acted this tick. Groups run in parallel; events
    /// within a group run in the order given. Results come back grouped by
    /// actor id, in event order within each actor.
    ///
    /// Every actor must be registered when the tick starts; otherwise this
    /// fails with [`ProgressionError::UnknownCharacter`] and nothing is
    /// resolved. The check is not a lock. If another thread removes an actor
    /// while the tick is running, that actor's group fails with the same
    /// error, but groups that already ran keep their changes and counters.
    /// Callers that add or remove characters should do so between ticks.
    pub fn resolve_tick(
        &self,
        registry: &CharacterRegistry,
        events: &[ActionEvent],
        tick_seed: u64,
    ) -> Result<Vec<ResolvedGain>> {
        let _span = info_span!(spans::RESOLVE_TICK, events = events.len()).entered();

        let mut groups: BTreeMap<CharacterId, Vec<&ActionEvent>> = BTreeMap::new();
        for event in events {
            groups.entry(event.actor()).or_default().push(event);
        }
        if let Some(missing) = groups.keys().find(|id| !registry.contains(**id)) {
            return Err(ProgressionError::UnknownCharacter(*missing));
        }

        let groups: Vec<_> = groups.into_iter().collect();
        let resolved = groups
            .par_iter()
            .map(|(id, group)| {
                let mut rng = ChaCha8Rng::seed_from_u64(tick_seed ^ id.fold_u64());
                registry.with_mut(*id, |character| {
                    group
                        .iter()
                        .map(|event| self.resolve_event(character, event, &mut rng))
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            characters = groups.len(),
            events = events.len(),
            "tick resolved"
        );
        Ok(resolved.into_iter().flatten().collect())
    }
}
