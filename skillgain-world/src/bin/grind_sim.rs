//! Headless Grind Simulator
//!
//! Registers one character per progression family, has each of them repeat
//! that family's action for a number of ticks, and prints where every skill
//! ended up. Useful for eyeballing tuning changes.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use skillgain_core::engine::proficiency_cap;
use skillgain_core::families::{
    ArmorAction, CraftAction, DualWieldAction, GatherAction, HandleAction, HandlingContext,
    OutdoorAction, PerformanceAction, ReactiveAction, SpellCast, SpellElement, SummonAction,
    SummonEvent, WeaponAction, WieldedWeapon,
};
use skillgain_core::metrics::CounterSnapshot;
use skillgain_core::types::{
    ActivityContext, ArmorKind, Attributes, CharacterId, CraftKey, Element, GatheringSkill,
    MagicSchool, Outcome, OutdoorSkill, PerformanceKind, ReactiveKind, WeaponKind,
};
use skillgain_core::{Character, ProgressionConfig, SkillCatalog};
use skillgain_world::logging;
use skillgain_world::{ActionEvent, CharacterRegistry, ProgressionSystem};

/// Headless grind simulator - repeat one action per family and report values
#[derive(Parser, Debug)]
#[command(name = "grind-sim")]
#[command(about = "Simulate repeated skill use and print the resulting proficiencies")]
struct Args {
    /// TOML tuning file; shipped defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of actions each grinder performs
    #[arg(long, default_value_t = 500)]
    actions: u32,

    /// Character level of every grinder
    #[arg(long, default_value_t = 30)]
    level: u32,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// One grinder's final standing.
#[derive(Serialize)]
struct SkillReport {
    grinder: &'static str,
    skill: String,
    value: f64,
}

/// JSON output structure
#[derive(Serialize)]
struct Report {
    seed: u64,
    actions: u32,
    level: u32,
    cap: f64,
    skills: Vec<SkillReport>,
    counters: CounterSnapshot,
}

type Grind = fn(CharacterId, u32, u32, f64) -> ActionEvent;

const GRINDERS: &[(&str, Grind)] = &[
    ("reactive", |actor, i, level, cap| ActionEvent::Reactive {
        actor,
        action: ReactiveAction {
            kind: ReactiveKind::Evasion,
            outcome: if i % 4 == 0 { Outcome::Partial } else { Outcome::Success },
            enemy_level: level + 2,
            in_combat: true,
            is_spar: false,
            real_weapons: true,
            cap,
        },
    }),
    ("dance", |actor, i, level, cap| ActionEvent::Performance {
        actor,
        kind: PerformanceKind::Dance,
        action: PerformanceAction {
            context: ActivityContext::Battle,
            sustained_sec: 30.0,
            closing: i % 10 == 9,
            allies: 2,
            ..PerformanceAction::practice(["reel", "jig", "waltz"][(i % 3) as usize], level, cap)
        },
    }),
    ("crafting", |actor, i, _, _| ActionEvent::CraftTraining {
        actor,
        craft: CraftKey::Blacksmithing,
        success: i % 5 != 0,
    }),
    ("recipes", |actor, i, _, _| ActionEvent::Craft {
        actor,
        action: CraftAction {
            craft: CraftKey::Alchemy,
            recipe: format!("tonic-{}", i % 3),
            recipe_unlock: 10.0,
            success: true,
            cap: None,
        },
    }),
    ("gathering", |actor, i, level, _| ActionEvent::Gather {
        actor,
        action: GatherAction {
            skill: GatheringSkill::Mining,
            node: Some(format!("vein-{}", i % 4)),
            difficulty: Some(level),
            success: true,
        },
    }),
    ("outdoor", |actor, _, _, _| ActionEvent::Outdoor {
        actor,
        action: OutdoorAction {
            skill: OutdoorSkill::Swimming,
            minutes: 5.0,
            difficulty: None,
        },
    }),
    ("weapon", |actor, i, level, _| ActionEvent::Weapon {
        actor,
        action: WeaponAction {
            weapon: WeaponKind::Sword,
            technique: (i % 2 == 0).then(|| "riposte".to_string()),
            context: ActivityContext::Battle,
            enemy_level: Some(level),
            enemy_attribute: None,
            success: i % 6 != 0,
        },
    }),
    ("dual_wield", |actor, _, level, _| ActionEvent::DualWield {
        actor,
        action: DualWieldAction {
            main: WieldedWeapon::one_handed(WeaponKind::Sword),
            off: WieldedWeapon::one_handed(WeaponKind::Dagger),
            technique: None,
            context: ActivityContext::Battle,
            enemy_level: Some(level),
            enemy_attribute: None,
            success: true,
        },
    }),
    ("armor", |actor, _, level, _| ActionEvent::Armor {
        actor,
        action: ArmorAction {
            armor: ArmorKind::Medium,
            attacker_level: level + 5,
            pieces_worn: 5,
            total_slots: 6,
            chest_worn: true,
        },
    }),
    ("animal_handling", |actor, i, level, _| ActionEvent::Handle {
        actor,
        action: HandleAction {
            animal: if i % 3 == 0 { "mule" } else { "horse" }.to_string(),
            context: HandlingContext::Training,
            difficulty: Some(level),
            success: true,
        },
    }),
    ("elemental", |actor, i, level, _| ActionEvent::Spell {
        actor,
        cast: SpellCast {
            spell: ["fireball", "flame-lash"][(i % 2) as usize].to_string(),
            element: SpellElement::Pure(Element::Fire),
            school: Some(MagicSchool::Destructive),
            context: ActivityContext::Battle,
            enemy_level: Some(level),
            success: true,
        },
    }),
    ("summoning", |actor, i, level, cap| ActionEvent::Summon {
        actor,
        action: SummonAction {
            event: if i % 2 == 0 {
                SummonEvent::cast("wolf")
            } else {
                SummonEvent::ability("howl")
            },
            context: ActivityContext::Battle,
            enemy_level: level,
            cap,
        },
    }),
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ProgressionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ProgressionConfig::default(),
    };
    config.validate().context("validating tuning")?;
    logging::init(&config.general)?;

    let cap = proficiency_cap(args.level.max(1), &config.cap);
    let system = ProgressionSystem::new(config, SkillCatalog::standard());
    let registry = CharacterRegistry::new();
    let grinders: Vec<(&'static str, Grind, CharacterId)> = GRINDERS
        .iter()
        .map(|&(name, grind)| {
            let character = Character::new(args.level, Attributes::uniform(15.0));
            let id = character.id;
            registry.insert(character);
            (name, grind, id)
        })
        .collect();

    info!(
        grinders = grinders.len(),
        actions = args.actions,
        level = args.level,
        seed = args.seed,
        "grind started"
    );

    for tick in 0..args.actions {
        let events: Vec<ActionEvent> = grinders
            .iter()
            .map(|(_, grind, id)| grind(*id, tick, args.level, cap))
            .collect();
        system.resolve_tick(&registry, &events, args.seed.wrapping_add(u64::from(tick)))?;
    }

    let mut skills = Vec::new();
    for &(grinder, _, id) in &grinders {
        let character = registry.snapshot(id)?;
        let mut values: Vec<_> = character.progression.values().collect();
        values.sort_by_key(|(key, _)| key.to_string());
        skills.extend(values.into_iter().map(|(key, value)| SkillReport {
            grinder,
            skill: key.to_string(),
            value,
        }));
    }

    let report = Report {
        seed: args.seed,
        actions: args.actions,
        level: args.level,
        cap,
        skills,
        counters: system.counters().snapshot(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "grind-sim: {} actions at level {} (cap {:.0}), seed {}",
            report.actions, report.level, report.cap, report.seed
        );
        for skill in &report.skills {
            println!("  {:<16} {:<28} {:>7.2}", skill.grinder, skill.skill, skill.value);
        }
        let c = report.counters;
        println!(
            "  attempts {}  applied {}  salvaged {}  gated {}  at cap {}  failed {}  refused {}  ({:.1}% moved)",
            c.attempts,
            c.applied,
            c.partial_on_fail,
            c.gate_rejected,
            c.at_cap,
            c.failed,
            c.disqualified,
            c.apply_rate() * 100.0
        );
    }
    Ok(())
}
