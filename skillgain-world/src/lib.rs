//! # skillgain-world: World Integration for skillgain
//!
//! This crate connects the game-agnostic `skillgain-core` library to a
//! running game: the game reports skill uses as events, and each tick the
//! progression system resolves them against a registry of characters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Game action resolution        │
//! │  ┌───────────────────────────────────┐  │
//! │  │       skillgain-world             │  │
//! │  │  ┌─────────────┐ ┌─────────────┐ │  │
//! │  │  │   Events    │ │  Registry   │ │  │
//! │  │  └──────┬──────┘ └──────┬──────┘ │  │
//! │  │         │               │         │  │
//! │  │         ▼               ▼         │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │   Systems (per tick)    │    │  │
//! │  │    └────────────┬────────────┘    │  │
//! │  │                 ▼                 │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │     skillgain-core      │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  └───────────────────────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events`: Action events, one variant per family
//! - `registry`: Characters keyed by id, one lock per character
//! - `systems`: Event routing, parallel tick resolution, counters
//! - `logging`: Subscriber setup for binaries

#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod events;
pub mod logging;
pub mod registry;
pub mod systems;

pub use events::ActionEvent;
pub use registry::CharacterRegistry;
pub use systems::{ProgressionSystem, ResolvedGain, SkillGain};
