//! Core type definitions shared by every progression family.
//!
//! Skill identities are closed enums so a typo in a skill name is a compile
//! error rather than a silently fresh proficiency track.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a character whose proficiencies are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new random character ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Fold the id into 64 bits, used to derive per-character RNG streams.
    #[must_use]
    pub fn fold_u64(&self) -> u64 {
        let wide = self.0.as_u128();
        #[allow(clippy::cast_possible_truncation)]
        let (hi, lo) = ((wide >> 64) as u64, wide as u64);
        hi ^ lo.rotate_left(29)
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A primary character attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Attribute {
    /// Strength.
    Str,
    /// Dexterity.
    Dex,
    /// Agility.
    Agi,
    /// Constitution.
    Con,
    /// Vitality.
    Vit,
    /// Intelligence.
    Int,
    /// Wisdom.
    Wis,
}

/// Attribute scores of a character. Missing scores read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Strength.
    pub str: f64,
    /// Dexterity.
    pub dex: f64,
    /// Agility.
    pub agi: f64,
    /// Constitution.
    pub con: f64,
    /// Vitality.
    pub vit: f64,
    /// Intelligence.
    pub int: f64,
    /// Wisdom.
    pub wis: f64,
}

impl Attributes {
    /// Every attribute set to the same score.
    #[must_use]
    pub fn uniform(score: f64) -> Self {
        Self {
            str: score,
            dex: score,
            agi: score,
            con: score,
            vit: score,
            int: score,
            wis: score,
        }
    }

    /// Read a single attribute.
    #[must_use]
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Dex => self.dex,
            Attribute::Agi => self.agi,
            Attribute::Con => self.con,
            Attribute::Vit => self.vit,
            Attribute::Int => self.int,
            Attribute::Wis => self.wis,
        }
    }

    /// Overwrite a single attribute, returning the updated set.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, score: f64) -> Self {
        let slot = match attribute {
            Attribute::Str => &mut self.str,
            Attribute::Dex => &mut self.dex,
            Attribute::Agi => &mut self.agi,
            Attribute::Con => &mut self.con,
            Attribute::Vit => &mut self.vit,
            Attribute::Int => &mut self.int,
            Attribute::Wis => &mut self.wis,
        };
        *slot = score;
        self
    }

    /// Mean of the given attributes (zero for an empty slice).
    #[must_use]
    pub fn mean(&self, attributes: &[Attribute]) -> f64 {
        if attributes.is_empty() {
            return 0.0;
        }
        let total: f64 = attributes.iter().map(|a| self.get(*a)).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = attributes.len() as f64;
        total / count
    }
}

// ---------------------------------------------------------------------------
// Action Context
// ---------------------------------------------------------------------------

/// How serious the situation was in which a skill was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityContext {
    /// Solo practice or rehearsal.
    #[default]
    Practice,
    /// Sparring or a friendly bout.
    Spar,
    /// Real combat or a live show.
    Battle,
}

/// Three-way result of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Clean success.
    Success,
    /// Partial success (grazed, half-parried, shaky performance).
    Partial,
    /// Failure.
    Fail,
}

impl Outcome {
    /// Whether the outcome counts as a success for bookkeeping purposes.
    #[must_use]
    pub fn succeeded(self) -> bool {
        !matches!(self, Self::Fail)
    }

    /// Collapse a boolean success flag into an outcome.
    #[must_use]
    pub fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Fail }
    }
}

// ---------------------------------------------------------------------------
// Skill Identities
// ---------------------------------------------------------------------------

/// Family a skill belongs to. Families share tuning tables and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillFamily {
    /// Evasion, parry, block.
    Reactive,
    /// Dance, song, instrument.
    Performance,
    /// Recipe-driven crafts.
    Crafting,
    /// Resource gathering.
    Gathering,
    /// Traversal skills.
    Outdoor,
    /// Weapon use, dual wield included.
    Weapon,
    /// Armor wear.
    Armor,
    /// Taming and handling animals.
    AnimalHandling,
    /// Elements and schools of magic.
    Elemental,
    /// Summoning magic.
    Summoning,
}

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable lowercase label used in logs and bookkeeping keys.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_enum! {
    /// Defensive reaction to an incoming attack.
    ReactiveKind {
        /// Getting out of the way.
        Evasion => "evasion",
        /// Deflecting with a weapon.
        Parry => "parry",
        /// Stopping with a shield.
        Block => "block",
    }
}

named_enum! {
    /// Performance discipline.
    PerformanceKind {
        /// Dancing.
        Dance => "dance",
        /// Singing.
        Song => "song",
        /// Playing an instrument.
        Instrument => "instrument",
    }
}

named_enum! {
    /// Recipe-driven craft.
    CraftKey {
        /// Glassblowing.
        Glassblowing => "glassblowing",
        /// Blacksmithing.
        Blacksmithing => "blacksmithing",
        /// Carpentry.
        Carpentry => "carpentry",
        /// Tailoring.
        Tailoring => "tailoring",
        /// Leatherworking.
        Leatherworking => "leatherworking",
        /// Alchemy.
        Alchemy => "alchemy",
        /// Enchanting.
        Enchanting => "enchanting",
        /// Pearl diving (as a craft).
        PearlDiving => "pearl_diving",
        /// Masonry.
        Masonry => "masonry",
        /// Textiles.
        Textiles => "textiles",
    }
}

named_enum! {
    /// Resource gathering skill.
    GatheringSkill {
        /// Felling trees.
        Logging => "logging",
        /// Mining ore and stone.
        Mining => "mining",
        /// Foraging wild plants.
        Foraging => "foraging",
        /// Field farming.
        Farming => "farming",
        /// Garden tending.
        Gardening => "gardening",
        /// Herb collecting.
        Herbalism => "herbalism",
        /// Grape growing.
        Viticulture => "viticulture",
        /// Pearl diving.
        PearlDiving => "pearl_diving",
        /// Fishing.
        Fishing => "fishing",
        /// Hunting game.
        Hunting => "hunting",
    }
}

named_enum! {
    /// Traversal skill trained by time spent doing it.
    OutdoorSkill {
        /// Swimming.
        Swimming => "swimming",
        /// Sailing.
        Sailing => "sailing",
        /// Riding.
        Riding => "riding",
        /// Climbing.
        Climbing => "climbing",
    }
}

named_enum! {
    /// Weapon type.
    WeaponKind {
        /// Sword.
        Sword => "sword",
        /// Greatsword.
        Greatsword => "greatsword",
        /// Polearm.
        Polearm => "polearm",
        /// Axe.
        Axe => "axe",
        /// Greataxe.
        Greataxe => "greataxe",
        /// Staff.
        Staff => "staff",
        /// Bow.
        Bow => "bow",
        /// Crossbow.
        Crossbow => "crossbow",
        /// Martial arts.
        Martial => "martial",
        /// Wand.
        Wand => "wand",
        /// Dagger.
        Dagger => "dagger",
        /// Shield used offensively.
        Shield => "shield",
    }
}

named_enum! {
    /// Armor weight class.
    ArmorKind {
        /// Light armor.
        Light => "light",
        /// Medium armor.
        Medium => "medium",
        /// Heavy armor.
        Heavy => "heavy",
    }
}

named_enum! {
    /// Pure magical element.
    Element {
        /// Stone.
        Stone => "stone",
        /// Water.
        Water => "water",
        /// Wind.
        Wind => "wind",
        /// Fire.
        Fire => "fire",
        /// Ice.
        Ice => "ice",
        /// Thunder.
        Thunder => "thunder",
        /// Dark.
        Dark => "dark",
        /// Light.
        Light => "light",
    }
}

named_enum! {
    /// School of magic.
    MagicSchool {
        /// Damage-dealing spells.
        Destructive => "destructive",
        /// Restoration.
        Healing => "healing",
        /// Buffs.
        Reinforcement => "reinforcement",
        /// Debuffs.
        Enfeebling => "enfeebling",
        /// Summons.
        Summoning => "summoning",
    }
}

/// Identity of a single proficiency track on a character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkillKey {
    /// A reactive defence.
    Reactive(ReactiveKind),
    /// A performance discipline.
    Performance(PerformanceKind),
    /// A craft.
    Craft(CraftKey),
    /// A gathering skill.
    Gathering(GatheringSkill),
    /// An outdoor skill.
    Outdoor(OutdoorSkill),
    /// A weapon type.
    Weapon(WeaponKind),
    /// Fighting with a one-handed weapon in each hand.
    DualWield,
    /// An armor class.
    Armor(ArmorKind),
    /// Handling a particular animal kind (free-form, e.g. `horse`).
    AnimalHandling(String),
    /// A magical element.
    Element(Element),
    /// A school of magic.
    School(MagicSchool),
}

impl SkillKey {
    /// Family this skill belongs to.
    #[must_use]
    pub fn family(&self) -> SkillFamily {
        match self {
            Self::Reactive(_) => SkillFamily::Reactive,
            Self::Performance(_) => SkillFamily::Performance,
            Self::Craft(_) => SkillFamily::Crafting,
            Self::Gathering(_) => SkillFamily::Gathering,
            Self::Outdoor(_) => SkillFamily::Outdoor,
            Self::Weapon(_) | Self::DualWield => SkillFamily::Weapon,
            Self::Armor(_) => SkillFamily::Armor,
            Self::AnimalHandling(_) => SkillFamily::AnimalHandling,
            Self::Element(_) => SkillFamily::Elemental,
            Self::School(MagicSchool::Summoning) => SkillFamily::Summoning,
            Self::School(_) => SkillFamily::Elemental,
        }
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reactive(k) => write!(f, "reactive.{k}"),
            Self::Performance(k) => write!(f, "performance.{k}"),
            Self::Craft(k) => write!(f, "craft.{k}"),
            Self::Gathering(k) => write!(f, "gathering.{k}"),
            Self::Outdoor(k) => write!(f, "outdoor.{k}"),
            Self::Weapon(k) => write!(f, "weapon.{k}"),
            Self::DualWield => f.write_str("weapon.dual_wield"),
            Self::Armor(k) => write!(f, "armor.{k}"),
            Self::AnimalHandling(animal) => write!(f, "animal_handling.{animal}"),
            Self::Element(e) => write!(f, "element.{e}"),
            Self::School(s) => write!(f, "school.{s}"),
        }
    }
}
