//! Progression families.
//!
//! Each family is a small value type borrowing its tuning (and, where it
//! needs one, the [`crate::catalog::SkillCatalog`]) and implementing
//! [`crate::strategy::ProgressionStrategy`]. None of them touch the random
//! source directly: the shared driver and engine do.

pub mod animal;
pub mod armor;
pub mod crafting;
pub mod elemental;
pub mod gathering;
pub mod outdoor;
pub mod performance;
pub mod reactive;
pub mod summoning;
pub mod weapon;

pub use animal::{AnimalHandling, HandleAction, HandlingContext};
pub use armor::{Armor, ArmorAction};
pub use crafting::{CraftAction, Crafting};
pub use elemental::{Discipline, DisciplineUse, Elemental, SpellCast, SpellElement, SpellGains};
pub use gathering::{GatherAction, Gathering};
pub use outdoor::{Outdoor, OutdoorAction};
pub use performance::{Performance, PerformanceAction};
pub use reactive::{Reactive, ReactiveAction};
pub use summoning::{SummonAction, SummonEvent, Summoning};
pub use weapon::{DualWield, DualWieldAction, WeaponAction, Weapons, WieldedWeapon};
