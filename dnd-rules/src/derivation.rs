//! Character sheet numbers derived from base scores, race, class and level.
//!
//! Race and class come from a [`ReferenceData`] source. Missing entries do
//! not fail character creation: homebrew races and classes are common, so a
//! missing race contributes no bonuses and a missing class falls back to a
//! d8 hit die. Each fallback is logged and recorded on the result.

use crate::ability::{ability_modifier, Ability, AbilityScores};
use crate::error::RulesError;
use crate::reference::{ReferenceData, ReferenceDataMissing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hit die used when the class is not in the reference data.
pub const DEFAULT_HIT_DIE: u32 = 8;
/// Highest character level.
pub const MAX_LEVEL: u32 = 20;

/// Proficiency bonus for a character level: `ceil(level / 4) + 1`.
///
/// Levels outside 1-20 are clamped, so the result is always 2 through 6.
pub fn proficiency_bonus(level: u32) -> i32 {
    let level = level.clamp(1, MAX_LEVEL);
    (level.div_ceil(4) + 1) as i32
}

/// Add racial bonuses to base scores. Abilities without an entry are unchanged.
pub fn apply_racial_bonuses(
    base: &AbilityScores,
    bonuses: &BTreeMap<Ability, i32>,
) -> AbilityScores {
    let mut scores = *base;
    for (ability, score) in base.iter() {
        scores.set(ability, score + bonuses.get(&ability).copied().unwrap_or(0));
    }
    scores
}

/// Maximum HP using the fixed average per level.
///
/// Level 1 gets the full hit die plus CON; each later level gets
/// `hit_die / 2 + 1` plus CON. Never less than 1.
pub fn max_hit_points(hit_die: u32, level: u32, constitution_modifier: i32) -> i32 {
    let first_level = hit_die as i32 + constitution_modifier;
    let per_level = (hit_die / 2 + 1) as i32 + constitution_modifier;
    let later_levels = level.saturating_sub(1) as i32 * per_level;
    (first_level + later_levels).max(1)
}

/// Unarmored AC: 10 + DEX modifier.
pub fn base_armor_class(dexterity_modifier: i32) -> i32 {
    10 + dexterity_modifier
}

/// Current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
}

impl HitPoints {
    /// Full health.
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// Derived numbers for a new character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCalculations {
    pub final_stats: AbilityScores,
    pub hp: HitPoints,
    pub proficiency_bonus: i32,
    pub ac: i32,
    /// Lookups that fell back to defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_reference: Vec<ReferenceDataMissing>,
}

/// Derives character stats against a reference data source.
pub struct StatCalculator<'a, R: ReferenceData + ?Sized> {
    reference: &'a R,
    default_hit_die: u32,
}

impl<'a, R: ReferenceData + ?Sized> StatCalculator<'a, R> {
    pub fn new(reference: &'a R) -> Self {
        Self {
            reference,
            default_hit_die: DEFAULT_HIT_DIE,
        }
    }

    pub fn with_default_hit_die(mut self, hit_die: u32) -> Self {
        self.default_hit_die = hit_die;
        self
    }

    /// Compute final scores, HP, AC and proficiency bonus.
    ///
    /// Fails only for a level outside 1-20.
    pub fn calculate(
        &self,
        base: &AbilityScores,
        race: &str,
        class: &str,
        level: u32,
    ) -> Result<CharacterCalculations, RulesError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(RulesError::malformed(format!(
                "level {level} is outside 1-{MAX_LEVEL}"
            )));
        }

        let mut missing_reference = Vec::new();

        let final_stats = match self.reference.race(race) {
            Ok(definition) => apply_racial_bonuses(base, &definition.ability_score_increase),
            Err(miss) => {
                tracing::warn!(race, "race not in reference data; applying no racial bonuses");
                missing_reference.push(miss);
                *base
            }
        };

        let hit_die = match self.reference.class(class) {
            Ok(definition) => definition.hit_die,
            Err(miss) => {
                tracing::warn!(
                    class,
                    hit_die = self.default_hit_die,
                    "class not in reference data; using default hit die"
                );
                missing_reference.push(miss);
                self.default_hit_die
            }
        };

        let con_mod = ability_modifier(final_stats.constitution);
        let dex_mod = ability_modifier(final_stats.dexterity);

        let calculations = CharacterCalculations {
            final_stats,
            hp: HitPoints::new(max_hit_points(hit_die, level, con_mod)),
            proficiency_bonus: proficiency_bonus(level),
            ac: base_armor_class(dex_mod),
            missing_reference,
        };
        tracing::debug!(
            race,
            class,
            level,
            hp = calculations.hp.max,
            ac = calculations.ac,
            "derived character stats"
        );
        Ok(calculations)
    }
}

/// Compute character stats with the default d8 fallback hit die.
pub fn calculate_character_stats<R: ReferenceData + ?Sized>(
    reference: &R,
    base: &AbilityScores,
    race: &str,
    class: &str,
    level: u32,
) -> Result<CharacterCalculations, RulesError> {
    StatCalculator::new(reference).calculate(base, race, class, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{ClassDefinition, RaceDefinition, ReferenceCatalog, ReferenceKind};

    #[test]
    fn test_proficiency_progression() {
        let expected = [
            (1, 2),
            (4, 2),
            (5, 3),
            (8, 3),
            (9, 4),
            (12, 4),
            (13, 5),
            (16, 5),
            (17, 6),
            (20, 6),
        ];
        for (level, bonus) in expected {
            assert_eq!(proficiency_bonus(level), bonus, "level {level}");
        }
        assert_eq!(proficiency_bonus(0), 2);
        assert_eq!(proficiency_bonus(30), 6);
    }

    #[test]
    fn test_apply_racial_bonuses() {
        let base = AbilityScores::uniform(10);
        let bonuses = BTreeMap::from([(Ability::Strength, 2), (Ability::Charisma, 1)]);
        let final_scores = apply_racial_bonuses(&base, &bonuses);
        assert_eq!(final_scores, AbilityScores::new(12, 10, 10, 10, 10, 11));
    }

    #[test]
    fn test_max_hit_points() {
        assert_eq!(max_hit_points(10, 1, 3), 13);
        // d8, level 3, +1 CON: 9 + 2 * (5 + 1)
        assert_eq!(max_hit_points(8, 3, 1), 21);
        // d12, level 5, +0: 12 + 4 * 7
        assert_eq!(max_hit_points(12, 5, 0), 40);
    }

    #[test]
    fn test_max_hit_points_never_below_one() {
        assert_eq!(max_hit_points(6, 1, -5), 1);
        assert_eq!(max_hit_points(4, 5, -4), 1);
    }

    #[test]
    fn test_base_armor_class() {
        assert_eq!(base_armor_class(0), 10);
        assert_eq!(base_armor_class(3), 13);
        assert_eq!(base_armor_class(-1), 9);
    }

    #[test]
    fn test_plain_character() {
        let mut catalog = ReferenceCatalog::new();
        catalog.insert_race(RaceDefinition::new("Commoner"));
        catalog
            .insert_class(ClassDefinition::new("Adventurer", 8, &[], &[]))
            .unwrap();

        let base = AbilityScores::uniform(10);
        let stats =
            calculate_character_stats(&catalog, &base, "commoner", "adventurer", 1).unwrap();
        assert_eq!(stats.hp, HitPoints { current: 8, max: 8 });
        assert_eq!(stats.ac, 10);
        assert_eq!(stats.proficiency_bonus, 2);
        assert_eq!(stats.final_stats, AbilityScores::uniform(10));
        assert!(stats.missing_reference.is_empty());
    }

    #[test]
    fn test_missing_reference_falls_back() {
        let stats = calculate_character_stats(
            ReferenceCatalog::srd(),
            &AbilityScores::new(10, 14, 12, 10, 10, 10),
            "Warforged",
            "Artificer",
            1,
        )
        .unwrap();

        assert_eq!(stats.final_stats, AbilityScores::new(10, 14, 12, 10, 10, 10));
        assert_eq!(stats.hp.max, 9); // d8 + 1
        assert_eq!(stats.ac, 12);
        let kinds: Vec<_> = stats.missing_reference.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![ReferenceKind::Race, ReferenceKind::Class]);
    }

    #[test]
    fn test_custom_default_hit_die() {
        let stats = StatCalculator::new(ReferenceCatalog::srd())
            .with_default_hit_die(12)
            .calculate(&AbilityScores::uniform(10), "Human", "Homebrew Knight", 1)
            .unwrap();
        // Human CON 11 gives +0
        assert_eq!(stats.hp.max, 12);
    }

    #[test]
    fn test_level_out_of_range() {
        let srd = ReferenceCatalog::srd();
        let base = AbilityScores::uniform(10);
        assert!(calculate_character_stats(srd, &base, "Elf", "Rogue", 0).is_err());
        assert!(calculate_character_stats(srd, &base, "Elf", "Rogue", 21).is_err());
    }

    #[test]
    fn test_higher_level_character() {
        // Half-Orc Barbarian, CON 15 + 1 = 16 (+3), level 5
        let stats = calculate_character_stats(
            ReferenceCatalog::srd(),
            &AbilityScores::new(15, 13, 15, 8, 10, 8),
            "half-orc",
            "barbarian",
            5,
        )
        .unwrap();
        assert_eq!(stats.final_stats.strength, 17);
        assert_eq!(stats.final_stats.constitution, 16);
        assert_eq!(stats.hp.max, 15 + 4 * 10);
        assert_eq!(stats.hp.current, stats.hp.max);
        assert_eq!(stats.proficiency_bonus, 3);
    }

    #[test]
    fn test_calculations_json_shape() {
        let stats = calculate_character_stats(
            ReferenceCatalog::srd(),
            &AbilityScores::uniform(10),
            "Elf",
            "Wizard",
            1,
        )
        .unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["finalStats"]["dexterity"], 12);
        assert_eq!(json["hp"]["current"], 6);
        assert_eq!(json["hp"]["max"], 6);
        assert_eq!(json["proficiencyBonus"], 2);
        assert_eq!(json["ac"], 11);
        assert!(json.get("missingReference").is_none());
    }
}
