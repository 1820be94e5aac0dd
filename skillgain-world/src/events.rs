//! Action events that drive proficiency gains.
//!
//! The game's action resolution emits one [`ActionEvent`] per skill use. Each
//! variant names its actor and carries the family's action payload, so the
//! progression system never has to guess which strategy applies.

use skillgain_core::families::{
    ArmorAction, CraftAction, DualWieldAction, GatherAction, HandleAction, OutdoorAction,
    PerformanceAction, ReactiveAction, SpellCast, SummonAction, WeaponAction,
};
use skillgain_core::types::{CharacterId, CraftKey, PerformanceKind, SkillFamily};

/// A skill use reported by the game.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    /// An evasion, parry or block against an attack.
    Reactive {
        actor: CharacterId,
        action: ReactiveAction,
    },

    /// A dance, song or instrument performance.
    Performance {
        actor: CharacterId,
        kind: PerformanceKind,
        action: PerformanceAction,
    },

    /// A recipe attempt.
    Craft {
        actor: CharacterId,
        action: CraftAction,
    },

    /// A generic training session at a craft, with no particular recipe.
    CraftTraining {
        actor: CharacterId,
        craft: CraftKey,
        success: bool,
    },

    /// A gathering attempt.
    Gather {
        actor: CharacterId,
        action: GatherAction,
    },

    /// Time spent swimming, sailing, riding or climbing.
    Outdoor {
        actor: CharacterId,
        action: OutdoorAction,
    },

    /// A weapon attack or technique.
    Weapon {
        actor: CharacterId,
        action: WeaponAction,
    },

    /// An attack with a weapon in each hand.
    DualWield {
        actor: CharacterId,
        action: DualWieldAction,
    },

    /// A hit taken while wearing armor.
    Armor {
        actor: CharacterId,
        action: ArmorAction,
    },

    /// Handling an animal.
    Handle {
        actor: CharacterId,
        action: HandleAction,
    },

    /// A spell cast; trains element and school.
    Spell { actor: CharacterId, cast: SpellCast },

    /// A summon cast, summon ability or maintenance tick.
    Summon {
        actor: CharacterId,
        action: SummonAction,
    },
}

impl ActionEvent {
    /// Character who performed the action.
    #[must_use]
    pub fn actor(&self) -> CharacterId {
        match self {
            Self::Reactive { actor, .. }
            | Self::Performance { actor, .. }
            | Self::Craft { actor, .. }
            | Self::CraftTraining { actor, .. }
            | Self::Gather { actor, .. }
            | Self::Outdoor { actor, .. }
            | Self::Weapon { actor, .. }
            | Self::DualWield { actor, .. }
            | Self::Armor { actor, .. }
            | Self::Handle { actor, .. }
            | Self::Spell { actor, .. }
            | Self::Summon { actor, .. } => *actor,
        }
    }

    /// Family whose strategy resolves this event.
    #[must_use]
    pub fn family(&self) -> SkillFamily {
        match self {
            Self::Reactive { .. } => SkillFamily::Reactive,
            Self::Performance { .. } => SkillFamily::Performance,
            Self::Craft { .. } | Self::CraftTraining { .. } => SkillFamily::Crafting,
            Self::Gather { .. } => SkillFamily::Gathering,
            Self::Outdoor { .. } => SkillFamily::Outdoor,
            Self::Weapon { .. } | Self::DualWield { .. } => SkillFamily::Weapon,
            Self::Armor { .. } => SkillFamily::Armor,
            Self::Handle { .. } => SkillFamily::AnimalHandling,
            Self::Spell { .. } => SkillFamily::Elemental,
            Self::Summon { .. } => SkillFamily::Summoning,
        }
    }
}
