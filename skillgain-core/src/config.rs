//! Configuration for proficiency progression.
//!
//! Maps directly to `progression.toml`. Every family has its own table and
//! every table is optional: a file only needs the values it overrides, the
//! rest come from the built-in tuning.

use serde::{Deserialize, Serialize};

use crate::engine::{CapRule, ChanceGate, FailPolicy, Novelty};
use crate::error::{ProgressionError, Result};
use crate::factors::{
    AttributeBand, BonusCurve, ClampedLinear, ContextWeights, OutcomeWeights, SteppedLevel,
    UptimeCurve,
};
use crate::types::{Attribute, OutdoorSkill, PerformanceKind, ReactiveKind};

/// Top-level progression configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// General settings.
    pub general: GeneralConfig,
    /// Cap derivation for families without an external cap.
    pub cap: CapRule,
    /// Evasion / parry / block.
    pub reactive: ReactiveTuning,
    /// Dance.
    pub dance: PerformanceTuning,
    /// Song.
    pub song: PerformanceTuning,
    /// Instrument.
    pub instrument: PerformanceTuning,
    /// Crafting.
    pub crafting: CraftingTuning,
    /// Gathering.
    pub gathering: GatheringTuning,
    /// Outdoor traversal.
    pub outdoor: OutdoorTuning,
    /// Weapons and dual wield.
    pub weapon: WeaponTuning,
    /// Armor.
    pub armor: ArmorTuning,
    /// Animal handling.
    pub animal_handling: AnimalHandlingTuning,
    /// Elements and schools.
    pub elemental: ElementalTuning,
    /// Summoning.
    pub summoning: SummoningTuning,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            cap: CapRule::default(),
            reactive: ReactiveTuning::default(),
            dance: PerformanceTuning::dance(),
            song: PerformanceTuning::song(),
            instrument: PerformanceTuning::instrument(),
            crafting: CraftingTuning::default(),
            gathering: GatheringTuning::default(),
            outdoor: OutdoorTuning::default(),
            weapon: WeaponTuning::default(),
            armor: ArmorTuning::default(),
            animal_handling: AnimalHandlingTuning::default(),
            elemental: ElementalTuning::default(),
            summoning: SummoningTuning::default(),
        }
    }
}

impl ProgressionConfig {
    /// Load configuration from a TOML string, layered over the defaults.
    ///
    /// # Errors
    /// Returns `ProgressionError::Config` if the TOML is invalid and
    /// `ProgressionError::InvalidTuning` if a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let overlay: toml::Value =
            toml::from_str(toml_str).map_err(|e| ProgressionError::Config(e.to_string()))?;
        let mut layered = toml::Value::try_from(Self::default())
            .map_err(|e| ProgressionError::Config(e.to_string()))?;
        merge(&mut layered, overlay);
        let config: Self = layered
            .try_into()
            .map_err(|e: toml::de::Error| ProgressionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Tuning for one performance discipline.
    #[must_use]
    pub fn performance(&self, kind: PerformanceKind) -> &PerformanceTuning {
        match kind {
            PerformanceKind::Dance => &self.dance,
            PerformanceKind::Song => &self.song,
            PerformanceKind::Instrument => &self.instrument,
        }
    }

    /// Check every tuning value against its allowed range.
    ///
    /// # Errors
    /// Returns `ProgressionError::InvalidTuning` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        non_negative("cap.per_level", self.cap.per_level)?;
        self.reactive.validate("reactive")?;
        self.dance.validate("dance")?;
        self.song.validate("song")?;
        self.instrument.validate("instrument")?;
        self.crafting.validate("crafting")?;
        self.gathering.validate("gathering")?;
        self.outdoor.validate("outdoor")?;
        self.weapon.validate("weapon")?;
        self.armor.validate("armor")?;
        self.animal_handling.validate("animal_handling")?;
        self.elemental.validate("elemental")?;
        self.summoning.validate("summoning")
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProgressionError::invalid(field, format!("{value} must be a finite value >= 0")))
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProgressionError::invalid(field, format!("{value} must be positive")))
    }
}

fn unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProgressionError::invalid(field, format!("{value} must lie in [0, 1]")))
    }
}

fn positive_window(field: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(ProgressionError::invalid(field, "must be at least 1"))
    }
}

fn check_gate(prefix: &str, gate: &ChanceGate) -> Result<()> {
    non_negative(&format!("{prefix}.gate.tau_low"), gate.tau_low)?;
    non_negative(&format!("{prefix}.gate.tau_high"), gate.tau_high)?;
    unit_interval(&format!("{prefix}.gate.p_small_min"), gate.p_small_min)?;
    if gate.tau_high < gate.tau_low {
        return Err(ProgressionError::invalid(
            format!("{prefix}.gate.tau_high"),
            "must not be below tau_low",
        ));
    }
    Ok(())
}

fn check_fail_policy(prefix: &str, policy: &FailPolicy) -> Result<()> {
    match policy {
        FailPolicy::NoGain => Ok(()),
        FailPolicy::Partial { chance, factor } | FailPolicy::PartialThenGate { chance, factor } => {
            unit_interval(&format!("{prefix}.on_fail.chance"), *chance)?;
            unit_interval(&format!("{prefix}.on_fail.factor"), *factor)
        }
    }
}

fn check_clamped(field: &str, curve: &ClampedLinear) -> Result<()> {
    non_negative(&format!("{field}.min"), curve.min)?;
    if curve.max < curve.min {
        return Err(ProgressionError::invalid(format!("{field}.max"), "must not be below min"));
    }
    Ok(())
}

fn check_stepped(field: &str, level: &SteppedLevel) -> Result<()> {
    non_negative(&format!("{field}.floor_equal"), level.floor_equal)?;
    non_negative(&format!("{field}.slope"), level.slope)?;
    non_negative(&format!("{field}.cap"), level.cap)?;
    non_negative(&format!("{field}.trivial"), level.trivial)
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Variety bonus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarietyTuning {
    /// How many recent targets count.
    pub window: usize,
    /// Distinct targets needed for the full bonus.
    pub target_distinct: usize,
    /// Maximum bonus above `1.0`.
    pub bonus_max: f64,
}

impl VarietyTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        positive_window(&format!("{prefix}.variety.window"), self.window)?;
        positive_window(&format!("{prefix}.variety.target_distinct"), self.target_distinct)?;
        non_negative(&format!("{prefix}.variety.bonus_max"), self.bonus_max)
    }
}

/// Slowdown just past a family threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChokeTuning {
    /// Width of the window above each threshold.
    pub window: f64,
    /// Multiplier applied inside the window.
    pub choke: f64,
}

impl ChokeTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.choke.window"), self.window)?;
        unit_interval(&format!("{prefix}.choke.choke"), self.choke)
    }
}

/// Per-kind weight of reactive events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactiveWeights {
    /// Evasion.
    pub evasion: f64,
    /// Parry.
    pub parry: f64,
    /// Block.
    pub block: f64,
}

impl ReactiveWeights {
    /// Weight for a kind.
    #[must_use]
    pub fn weight(&self, kind: ReactiveKind) -> f64 {
        match kind {
            ReactiveKind::Evasion => self.evasion,
            ReactiveKind::Parry => self.parry,
            ReactiveKind::Block => self.block,
        }
    }
}

/// Reactive (evasion / parry / block) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactiveTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Refuse gains outside combat and sparring.
    pub require_combat_or_spar: bool,
    /// Refuse gains with training weapons.
    pub require_real_weapons: bool,
    /// Refuse gains against weaker opponents.
    pub require_stronger_opponent: bool,
    /// Weight per event kind.
    pub event_weight: ReactiveWeights,
    /// Opponent level curve.
    pub level: SteppedLevel,
    /// Weight per outcome.
    pub outcome_weight: OutcomeWeights,
    /// Floor of the repeat decay.
    pub min_repeat_factor: f64,
    /// Mixing bonus.
    pub variety: VarietyTuning,
    /// Post-threshold slowdown.
    pub choke: ChokeTuning,
    /// Cap-gap exponent.
    pub cap_softener_k: f64,
    /// Chance gate.
    pub gate: ChanceGate,
    /// Chance that a failed reaction still teaches something.
    pub partial_on_fail_chance: f64,
}

impl Default for ReactiveTuning {
    fn default() -> Self {
        Self {
            base_gain: 0.035,
            require_combat_or_spar: true,
            require_real_weapons: true,
            require_stronger_opponent: true,
            event_weight: ReactiveWeights {
                evasion: 1.0,
                parry: 0.85,
                block: 0.75,
            },
            level: SteppedLevel {
                floor_equal: 0.15,
                slope: 0.17,
                cap: 1.0,
                trivial: 0.0,
                trivial_margin: 0,
            },
            outcome_weight: OutcomeWeights {
                success: 1.0,
                partial: 0.20,
                fail: 0.0,
            },
            min_repeat_factor: 0.35,
            variety: VarietyTuning {
                window: 12,
                target_distinct: 3,
                bonus_max: 0.20,
            },
            choke: ChokeTuning {
                window: 6.0,
                choke: 0.25,
            },
            cap_softener_k: 0.75,
            gate: ChanceGate {
                tau_low: 0.010,
                tau_high: 0.045,
                p_small_min: 0.08,
            },
            partial_on_fail_chance: 0.05,
        }
    }
}

impl ReactiveTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        check_stepped(&format!("{prefix}.level"), &self.level)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        self.variety.validate(prefix)?;
        self.choke.validate(prefix)?;
        non_negative(&format!("{prefix}.cap_softener_k"), self.cap_softener_k)?;
        check_gate(prefix, &self.gate)?;
        unit_interval(&format!("{prefix}.partial_on_fail_chance"), self.partial_on_fail_chance)
    }
}

/// Dance / song / instrument tuning. Optional curves are skipped when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Weight per context.
    pub context_weight: ContextWeights,
    /// Audience / opponent level curve.
    pub level: SteppedLevel,
    /// Sustained-time curve.
    pub uptime: Option<UptimeCurve>,
    /// Allies (or targets) reached.
    pub crowd: BonusCurve,
    /// Enemies pressuring the performer.
    pub pressure: Option<BonusCurve>,
    /// Venue acoustics.
    pub acoustic: Option<BonusCurve>,
    /// Ensemble synergy.
    pub ensemble: Option<BonusCurve>,
    /// Floor of the repeat decay.
    pub min_repeat_factor: f64,
    /// Mixing bonus.
    pub variety: VarietyTuning,
    /// Post-threshold slowdown.
    pub choke: ChokeTuning,
    /// Cap-gap exponent.
    pub cap_softener_k: f64,
    /// Weight per outcome.
    pub outcome_weight: OutcomeWeights,
    /// Extra fraction granted on the closing event of a sustained piece.
    pub stop_bonus: f64,
    /// Chance gate.
    pub gate: ChanceGate,
}

impl Default for PerformanceTuning {
    fn default() -> Self {
        Self::dance()
    }
}

impl PerformanceTuning {
    /// Built-in dance tuning.
    #[must_use]
    pub fn dance() -> Self {
        Self {
            base_gain: 0.075,
            context_weight: ContextWeights {
                practice: 0.25,
                spar: 0.75,
                battle: 1.0,
            },
            level: SteppedLevel {
                floor_equal: 0.30,
                slope: 0.11,
                cap: 1.0,
                trivial: 0.05,
                trivial_margin: 1,
            },
            uptime: Some(UptimeCurve { sec_norm: 4.0, k: 0.6 }),
            crowd: BonusCurve { k: 0.08, max: 1.30 },
            pressure: Some(BonusCurve { k: 0.10, max: 1.35 }),
            acoustic: None,
            ensemble: None,
            min_repeat_factor: 0.45,
            variety: VarietyTuning {
                window: 10,
                target_distinct: 4,
                bonus_max: 0.25,
            },
            choke: ChokeTuning {
                window: 8.0,
                choke: 0.35,
            },
            cap_softener_k: 0.9,
            outcome_weight: OutcomeWeights {
                success: 1.0,
                partial: 0.35,
                fail: 0.0,
            },
            stop_bonus: 0.12,
            gate: ChanceGate {
                tau_low: 0.018,
                tau_high: 0.055,
                p_small_min: 0.12,
            },
        }
    }

    /// Built-in song tuning.
    #[must_use]
    pub fn song() -> Self {
        Self {
            base_gain: 0.072,
            context_weight: ContextWeights {
                practice: 0.28,
                spar: 0.72,
                battle: 1.0,
            },
            level: SteppedLevel {
                floor_equal: 0.32,
                ..Self::dance().level
            },
            pressure: Some(BonusCurve { k: 0.09, max: 1.30 }),
            acoustic: Some(BonusCurve { k: 0.10, max: 1.15 }),
            ensemble: Some(BonusCurve { k: 0.12, max: 1.18 }),
            outcome_weight: OutcomeWeights {
                success: 1.0,
                partial: 0.30,
                fail: 0.0,
            },
            ..Self::dance()
        }
    }

    /// Built-in instrument tuning.
    #[must_use]
    pub fn instrument() -> Self {
        Self {
            base_gain: 0.065,
            context_weight: ContextWeights {
                practice: 0.20,
                spar: 0.65,
                battle: 1.0,
            },
            level: SteppedLevel {
                floor_equal: 0.35,
                slope: 0.12,
                ..Self::dance().level
            },
            uptime: None,
            pressure: None,
            outcome_weight: OutcomeWeights {
                success: 1.0,
                partial: 0.25,
                fail: 0.0,
            },
            stop_bonus: 0.0,
            gate: ChanceGate {
                tau_low: 0.020,
                tau_high: 0.060,
                p_small_min: 0.12,
            },
            ..Self::dance()
        }
    }

    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        check_stepped(&format!("{prefix}.level"), &self.level)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        self.variety.validate(prefix)?;
        self.choke.validate(prefix)?;
        non_negative(&format!("{prefix}.cap_softener_k"), self.cap_softener_k)?;
        non_negative(&format!("{prefix}.stop_bonus"), self.stop_bonus)?;
        if let Some(uptime) = &self.uptime {
            non_negative(&format!("{prefix}.uptime.sec_norm"), uptime.sec_norm)?;
        }
        check_gate(prefix, &self.gate)
    }
}

/// Crafting tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Levels below a recipe's unlock over which the learning bonus spreads.
    pub unlock_window: f64,
    /// How fast gains fade once a recipe is mastered past its unlock.
    pub post_unlock_choke_k: f64,
    /// Floor of the repeat decay (`0.0` leaves it unfloored).
    pub min_repeat_factor: f64,
    /// Recent recipes kept per craft.
    pub history: usize,
    /// Recipe id used by training sessions.
    pub training_recipe: String,
    /// Training recipes sit this far above the current value.
    pub training_unlock_offset: f64,
}

impl Default for CraftingTuning {
    fn default() -> Self {
        Self {
            base_gain: 0.5,
            unlock_window: 10.0,
            post_unlock_choke_k: 3.0,
            min_repeat_factor: 0.0,
            history: 8,
            training_recipe: "training-session".to_string(),
            training_unlock_offset: 5.0,
        }
    }
}

impl CraftingTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        positive(&format!("{prefix}.unlock_window"), self.unlock_window)?;
        positive(&format!("{prefix}.post_unlock_choke_k"), self.post_unlock_choke_k)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        positive_window(&format!("{prefix}.history"), self.history)
    }
}

/// Gathering tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatheringTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Fitness of the skill's attribute pair.
    pub attribute: AttributeBand,
    /// Divisor of the node-difficulty distance curve.
    pub difficulty_divisor: f64,
    /// Floor of the repeat decay (`0.0` leaves it unfloored).
    pub min_repeat_factor: f64,
    /// Recent nodes kept per skill.
    pub history: usize,
    /// Chance gate.
    pub gate: ChanceGate,
    /// Behaviour on a failed gather.
    pub on_fail: FailPolicy,
}

impl Default for GatheringTuning {
    fn default() -> Self {
        Self {
            base_gain: 1.0,
            attribute: AttributeBand {
                base: 0.7,
                slope: 0.01,
                max: 1.3,
            },
            difficulty_divisor: 1.0,
            min_repeat_factor: 0.0,
            history: 8,
            gate: ChanceGate::default(),
            on_fail: FailPolicy::NoGain,
        }
    }
}

impl GatheringTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        non_negative(&format!("{prefix}.difficulty_divisor"), self.difficulty_divisor)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        positive_window(&format!("{prefix}.history"), self.history)?;
        check_gate(prefix, &self.gate)?;
        check_fail_policy(prefix, &self.on_fail)
    }
}

/// Per-minute base rates of the outdoor skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutdoorRates {
    /// Swimming.
    pub swimming: f64,
    /// Sailing.
    pub sailing: f64,
    /// Riding.
    pub riding: f64,
    /// Climbing.
    pub climbing: f64,
}

impl OutdoorRates {
    /// Rate for a skill.
    #[must_use]
    pub fn rate(&self, skill: OutdoorSkill) -> f64 {
        match skill {
            OutdoorSkill::Swimming => self.swimming,
            OutdoorSkill::Sailing => self.sailing,
            OutdoorSkill::Riding => self.riding,
            OutdoorSkill::Climbing => self.climbing,
        }
    }
}

/// Outdoor traversal tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutdoorTuning {
    /// Gain per minute at zero proficiency.
    pub rates: OutdoorRates,
    /// Cap-gap exponent.
    pub cap_softener_k: f64,
}

impl Default for OutdoorTuning {
    fn default() -> Self {
        Self {
            rates: OutdoorRates {
                swimming: 0.06,
                sailing: 0.05,
                riding: 0.055,
                climbing: 0.05,
            },
            cap_softener_k: 0.8,
        }
    }
}

impl OutdoorTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        for skill in OutdoorSkill::ALL {
            non_negative(&format!("{prefix}.rates.{skill}"), self.rates.rate(*skill))?;
        }
        non_negative(&format!("{prefix}.cap_softener_k"), self.cap_softener_k)
    }
}

/// Weapon and dual-wield tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Weight per context.
    pub context_weight: ContextWeights,
    /// Opponent level curve.
    pub level: ClampedLinear,
    /// Key-attribute comparison against the opponent.
    pub attribute: ClampedLinear,
    /// Floor of the repeat decay.
    pub min_repeat_factor: f64,
    /// Recent techniques kept per weapon.
    pub history: usize,
    /// Base-rate multiplier when both hands hold the same weapon type.
    pub dual_wield_same_type: f64,
    /// Attribute compared while dual wielding.
    pub dual_wield_attribute: Attribute,
    /// Chance gate.
    pub gate: ChanceGate,
    /// Behaviour on a missed attack.
    pub on_fail: FailPolicy,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            base_gain: 1.0,
            context_weight: ContextWeights {
                practice: 0.2,
                spar: 0.6,
                battle: 1.0,
            },
            level: ClampedLinear {
                slope: 0.1,
                min: 0.25,
                max: 1.75,
            },
            attribute: ClampedLinear {
                slope: 0.01,
                min: 0.7,
                max: 1.3,
            },
            min_repeat_factor: 0.35,
            history: 8,
            dual_wield_same_type: 1.5,
            dual_wield_attribute: Attribute::Dex,
            gate: ChanceGate::default(),
            on_fail: FailPolicy::NoGain,
        }
    }
}

impl WeaponTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        check_clamped(&format!("{prefix}.level"), &self.level)?;
        check_clamped(&format!("{prefix}.attribute"), &self.attribute)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        positive_window(&format!("{prefix}.history"), self.history)?;
        non_negative(&format!("{prefix}.dual_wield_same_type"), self.dual_wield_same_type)?;
        check_gate(prefix, &self.gate)?;
        check_fail_policy(prefix, &self.on_fail)
    }
}

/// Armor tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Attacker level curve.
    pub level: SteppedLevel,
    /// Fitness from the mean of STR, DEX and AGI.
    pub attribute: AttributeBand,
    /// Largest gain a single hit can grant.
    pub max_gain: f64,
    /// A chest piece must be worn.
    pub require_chest: bool,
    /// Strictly more than this fraction of slots must be filled.
    pub min_coverage: f64,
    /// Chance gate.
    pub gate: ChanceGate,
}

impl Default for ArmorTuning {
    fn default() -> Self {
        Self {
            base_gain: 0.04,
            level: SteppedLevel {
                floor_equal: 0.2,
                slope: 0.15,
                cap: 1.0,
                trivial: 0.0,
                trivial_margin: 0,
            },
            attribute: AttributeBand {
                base: 0.7,
                slope: 0.01,
                max: 1.3,
            },
            max_gain: 0.5,
            require_chest: true,
            min_coverage: 0.5,
            gate: ChanceGate {
                tau_low: 0.015,
                tau_high: 0.05,
                p_small_min: 0.1,
            },
        }
    }
}

impl ArmorTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        check_stepped(&format!("{prefix}.level"), &self.level)?;
        non_negative(&format!("{prefix}.max_gain"), self.max_gain)?;
        unit_interval(&format!("{prefix}.min_coverage"), self.min_coverage)?;
        check_gate(prefix, &self.gate)
    }
}

/// Weight per handling situation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandlingWeights {
    /// Feeding, grooming, everyday riding.
    pub routine: f64,
    /// Deliberate training.
    pub training: f64,
    /// Calming a panicked or hostile animal.
    pub emergency: f64,
}

/// Animal handling tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalHandlingTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Weight per situation.
    pub context_weight: HandlingWeights,
    /// Divisor of the difficulty distance curve.
    pub difficulty_divisor: f64,
    /// Floor of the repeat decay (`0.0` leaves it unfloored).
    pub min_repeat_factor: f64,
    /// Recent animals kept.
    pub history: usize,
    /// Chance gate.
    pub gate: ChanceGate,
}

impl Default for AnimalHandlingTuning {
    fn default() -> Self {
        Self {
            base_gain: 1.0,
            context_weight: HandlingWeights {
                routine: 0.6,
                training: 0.75,
                emergency: 1.0,
            },
            difficulty_divisor: 2.0,
            min_repeat_factor: 0.0,
            history: 8,
            gate: ChanceGate::default(),
        }
    }
}

impl AnimalHandlingTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        non_negative(&format!("{prefix}.difficulty_divisor"), self.difficulty_divisor)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        positive_window(&format!("{prefix}.history"), self.history)?;
        check_gate(prefix, &self.gate)
    }
}

/// Element and school tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementalTuning {
    /// Base rate.
    pub base_gain: f64,
    /// Weight per context.
    pub context_weight: ContextWeights,
    /// Opponent level curve.
    pub level: ClampedLinear,
    /// Floor of the repeat decay (`0.0` leaves it unfloored).
    pub min_repeat_factor: f64,
    /// Recent spells kept per element and per school.
    pub history: usize,
    /// First-cast treatment of a spell.
    pub novelty: Novelty,
    /// Chance gate.
    pub gate: ChanceGate,
}

impl Default for ElementalTuning {
    fn default() -> Self {
        Self {
            base_gain: 1.0,
            context_weight: ContextWeights {
                practice: 0.2,
                spar: 0.6,
                battle: 1.0,
            },
            level: ClampedLinear {
                slope: 0.1,
                min: 0.25,
                max: 1.75,
            },
            min_repeat_factor: 0.0,
            history: 8,
            novelty: Novelty::default(),
            gate: ChanceGate::default(),
        }
    }
}

impl ElementalTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.base_gain"), self.base_gain)?;
        check_clamped(&format!("{prefix}.level"), &self.level)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        positive_window(&format!("{prefix}.history"), self.history)?;
        non_negative(&format!("{prefix}.novelty.multiplier"), self.novelty.multiplier)?;
        unit_interval(&format!("{prefix}.novelty.probability"), self.novelty.probability)?;
        check_gate(prefix, &self.gate)
    }
}

/// Summoning tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummoningTuning {
    /// Base rate of a successful summon.
    pub cast_gain: f64,
    /// Base rate of an effective ability.
    pub effect_gain: f64,
    /// Base rate of a maintenance tick.
    pub maintenance_gain: f64,
    /// Weight per context.
    pub context_weight: ContextWeights,
    /// Opponent level curve.
    pub level: SteppedLevel,
    /// Floor of the repeat decay.
    pub min_repeat_factor: f64,
    /// Mixing bonus for casts and abilities.
    pub variety: VarietyTuning,
    /// Post-threshold slowdown.
    pub choke: ChokeTuning,
    /// Cap-gap exponent.
    pub cap_softener_k: f64,
    /// Weight per outcome.
    pub outcome_weight: OutcomeWeights,
    /// Minimum effectiveness credit for an effectful ability.
    pub effectiveness_floor: f64,
    /// Curvature of the effectiveness credit.
    pub effectiveness_k: f64,
    /// Upper bound of the ability impact multiplier.
    pub impact_max: f64,
    /// Seconds of upkeep that count as one unit.
    pub maintenance_sec_norm: f64,
    /// Diminishing exponent of upkeep time.
    pub maintenance_exp: f64,
    /// Bonus per engaged enemy during upkeep.
    pub maintenance_pressure: BonusCurve,
    /// Bonus per benefitting ally beyond the first.
    pub maintenance_benefit: BonusCurve,
    /// Chance gate.
    pub gate: ChanceGate,
}

impl Default for SummoningTuning {
    fn default() -> Self {
        Self {
            cast_gain: 0.10,
            effect_gain: 0.08,
            maintenance_gain: 0.03,
            context_weight: ContextWeights {
                practice: 0.20,
                spar: 0.70,
                battle: 1.0,
            },
            level: SteppedLevel {
                floor_equal: 0.30,
                slope: 0.12,
                cap: 1.0,
                trivial: 0.05,
                trivial_margin: 1,
            },
            min_repeat_factor: 0.45,
            variety: VarietyTuning {
                window: 10,
                target_distinct: 4,
                bonus_max: 0.25,
            },
            choke: ChokeTuning {
                window: 6.0,
                choke: 0.35,
            },
            cap_softener_k: 0.9,
            outcome_weight: OutcomeWeights {
                success: 1.0,
                partial: 0.40,
                fail: 0.0,
            },
            effectiveness_floor: 0.10,
            effectiveness_k: 0.75,
            impact_max: 2.0,
            maintenance_sec_norm: 5.0,
            maintenance_exp: 0.6,
            maintenance_pressure: BonusCurve { k: 0.08, max: 1.30 },
            maintenance_benefit: BonusCurve { k: 0.06, max: 1.25 },
            gate: ChanceGate {
                tau_low: 0.020,
                tau_high: 0.060,
                p_small_min: 0.12,
            },
        }
    }
}

impl SummoningTuning {
    fn validate(&self, prefix: &str) -> Result<()> {
        non_negative(&format!("{prefix}.cast_gain"), self.cast_gain)?;
        non_negative(&format!("{prefix}.effect_gain"), self.effect_gain)?;
        non_negative(&format!("{prefix}.maintenance_gain"), self.maintenance_gain)?;
        check_stepped(&format!("{prefix}.level"), &self.level)?;
        unit_interval(&format!("{prefix}.min_repeat_factor"), self.min_repeat_factor)?;
        self.variety.validate(prefix)?;
        self.choke.validate(prefix)?;
        unit_interval(&format!("{prefix}.effectiveness_floor"), self.effectiveness_floor)?;
        positive(&format!("{prefix}.maintenance_sec_norm"), self.maintenance_sec_norm)?;
        check_gate(prefix, &self.gate)
    }
}
