//! # Skillgain Core Library
//!
//! Game-agnostic proficiency progression for game characters.
//!
//! Every proficiency (a weapon, a craft, a dance, a school of magic) is a
//! number between zero and a cap. Actions push it upward through one shared
//! pipeline:
//!
//! - a **family strategy** ([`families`]) turns an action into named
//!   multiplicative factors: context, level, attributes, repetition,
//!   variety, threshold choke, cap gap and the family's own signals;
//! - the **gain engine** ([`engine`]) multiplies them into a candidate
//!   delta, clamps it under the cap and lets a **chance gate** decide
//!   whether it lands;
//! - the **state store** ([`state`]) on each [`Character`] keeps the values
//!   plus the repeat and variety bookkeeping.
//!
//! Randomness is always injected through [`random::RandomSource`], so every
//! outcome is reproducible under a fixed source.
//!
//! ```
//! use skillgain_core::{Character, ProgressionConfig, SkillCatalog};
//! use skillgain_core::families::{CraftAction, Crafting};
//! use skillgain_core::random::FixedRoll;
//! use skillgain_core::strategy::progress;
//! use skillgain_core::types::{Attributes, CraftKey};
//!
//! let config = ProgressionConfig::default();
//! let crafting = Crafting::new(&config.crafting, &config.cap);
//! let mut smith = Character::new(20, Attributes::default());
//! let action = CraftAction {
//!     craft: CraftKey::Blacksmithing,
//!     recipe: "nails".into(),
//!     recipe_unlock: 5.0,
//!     success: true,
//!     cap: None,
//! };
//! let outcome = progress(&crafting, &mut smith, &action, &mut FixedRoll(0.0));
//! assert!(outcome.value > 0.0);
//! # let _ = SkillCatalog::standard();
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod character;
pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod families;
pub mod heuristics;
pub mod metrics;
pub mod random;
pub mod state;
pub mod strategy;
pub mod types;

pub use catalog::SkillCatalog;
pub use character::Character;
pub use config::ProgressionConfig;
pub use engine::{GainOutcome, Verdict};
pub use error::{ProgressionError, Result};
pub use types::*;
