//! D&D 5e character rules and dice engine.
//!
//! This crate provides:
//! - Point-buy validation and costing for ability scores
//! - Derived character stats (final scores, HP, AC, proficiency bonus)
//! - Dice rolling with advantage/disadvantage and D&D derived rolls
//! - Typed race and class reference data
//!
//! Everything is synchronous and free of shared mutable state; only the dice
//! draw from a random source.
//!
//! # Quick Start
//!
//! ```
//! use dnd_rules::{
//!     calculate_character_stats, point_buy, AbilityScores, CheckOptions, DiceRoller,
//!     ReferenceCatalog,
//! };
//!
//! let base = AbilityScores::new(15, 13, 14, 10, 12, 8);
//! assert!(point_buy::validate(&base).valid);
//!
//! let stats =
//!     calculate_character_stats(ReferenceCatalog::srd(), &base, "Dwarf", "Fighter", 1).unwrap();
//! assert_eq!(stats.hp.max, 13);
//!
//! let mut dice = DiceRoller::new();
//! let attack = dice.attack_roll(
//!     stats.final_stats.strength,
//!     stats.proficiency_bonus,
//!     &CheckOptions::new(),
//! );
//! println!("{attack}");
//! ```

pub mod ability;
pub mod config;
pub mod derivation;
pub mod dice;
pub mod error;
pub mod point_buy;
pub mod reference;
pub mod rolls;

// Primary public API
pub use ability::{ability_modifier, Ability, AbilityScores, Skill};
pub use config::EngineConfig;
pub use derivation::{
    calculate_character_stats, CharacterCalculations, HitPoints, StatCalculator,
};
pub use dice::{
    format_roll, roll, Advantage, DiceError, DiceNotation, DiceRoll, DiceRoller, DieType,
    RollOptions,
};
pub use error::{ConfigError, RulesError};
pub use point_buy::{PointBuyError, PointBuyErrorKind, PointBuyResult, SubmissionPolicy};
pub use reference::{
    ClassDefinition, RaceDefinition, ReferenceCatalog, ReferenceData, ReferenceDataMissing,
};
pub use rolls::{check_success, CheckOptions};
