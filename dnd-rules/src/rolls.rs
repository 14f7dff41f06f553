//! Ability checks, saves, attacks and the other rolls D&D play asks for.
//!
//! Every roll here is a d20 (or a damage/hit die) plus a modifier worked out
//! from numbers the caller already knows. Nothing reads a character sheet:
//! pass in the ability score, the proficiency bonus and whether the
//! character is proficient.

use crate::ability::{ability_modifier, AbilityScores, Skill};
use crate::dice::{check_roll_bounds, Advantage, DiceError, DiceRoll, DiceRoller, DieType};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Proficiency bonus assumed when the caller does not supply one (level 1-4).
pub const DEFAULT_PROFICIENCY_BONUS: i32 = 2;

/// Situational options for a derived roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckOptions {
    pub advantage: bool,
    pub disadvantage: bool,
    /// Replaces the default purpose label.
    pub purpose: Option<String>,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advantage(mut self) -> Self {
        self.advantage = true;
        self
    }

    pub fn disadvantage(mut self) -> Self {
        self.disadvantage = true;
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    fn advantage_state(&self) -> Advantage {
        Advantage::from_flags(self.advantage, self.disadvantage)
    }

    fn purpose_or(&self, default: impl Into<String>) -> String {
        self.purpose.clone().unwrap_or_else(|| default.into())
    }
}

fn proficiency(is_proficient: bool, proficiency_bonus: i32) -> i32 {
    if is_proficient {
        proficiency_bonus
    } else {
        0
    }
}

impl<R: Rng> DiceRoller<R> {
    fn d20(
        &mut self,
        modifier: i32,
        options: &CheckOptions,
        purpose: String,
        skill: Option<String>,
    ) -> DiceRoll {
        self.draw(DieType::D20, 1, modifier, options.advantage_state(), purpose, skill)
    }

    /// d20 + ability modifier + `proficiency_bonus`.
    pub fn ability_check(
        &mut self,
        ability_score: i32,
        proficiency_bonus: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        let modifier = ability_modifier(ability_score).saturating_add(proficiency_bonus);
        self.d20(modifier, options, options.purpose_or("Ability Check"), None)
    }

    /// d20 + ability modifier, plus proficiency if proficient. The skill name
    /// is recorded on the roll.
    pub fn skill_check(
        &mut self,
        skill: &str,
        ability_score: i32,
        is_proficient: bool,
        proficiency_bonus: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        let modifier = ability_modifier(ability_score)
            .saturating_add(proficiency(is_proficient, proficiency_bonus));
        self.d20(
            modifier,
            options,
            options.purpose_or(format!("{skill} Check")),
            Some(skill.to_string()),
        )
    }

    /// Skill check that reads the governing ability from `scores`.
    pub fn character_skill_check(
        &mut self,
        skill: Skill,
        scores: &AbilityScores,
        is_proficient: bool,
        proficiency_bonus: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        self.skill_check(
            skill.name(),
            scores.get(skill.ability()),
            is_proficient,
            proficiency_bonus,
            options,
        )
    }

    pub fn saving_throw(
        &mut self,
        ability_score: i32,
        is_proficient: bool,
        proficiency_bonus: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        let modifier = ability_modifier(ability_score)
            .saturating_add(proficiency(is_proficient, proficiency_bonus));
        self.d20(modifier, options, options.purpose_or("Saving Throw"), None)
    }

    /// Attacks always add proficiency.
    pub fn attack_roll(
        &mut self,
        ability_score: i32,
        proficiency_bonus: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        let modifier = ability_modifier(ability_score).saturating_add(proficiency_bonus);
        self.d20(modifier, options, options.purpose_or("Attack Roll"), None)
    }

    /// Plain damage roll labelled with its damage type. Never rolled with
    /// advantage. Subject to the same dice limits as [`DiceRoller::roll`].
    pub fn damage_roll(
        &mut self,
        die: DieType,
        count: u32,
        modifier: i32,
        damage_type: &str,
    ) -> Result<DiceRoll, DiceError> {
        check_roll_bounds(die, count, modifier)?;
        Ok(self.draw(
            die,
            count,
            modifier,
            Advantage::Normal,
            damage_type.to_string(),
            None,
        ))
    }

    /// d20 + DEX modifier. The purpose is always "Initiative".
    pub fn initiative_roll(&mut self, dexterity_score: i32, options: &CheckOptions) -> DiceRoll {
        self.d20(
            ability_modifier(dexterity_score),
            options,
            "Initiative".to_string(),
            None,
        )
    }

    /// Spend one hit die: die + CON modifier, but never less than +1.
    pub fn hit_die_recovery(
        &mut self,
        hit_die: DieType,
        constitution_score: i32,
        options: &CheckOptions,
    ) -> DiceRoll {
        let modifier = ability_modifier(constitution_score).max(1);
        self.draw(
            hit_die,
            1,
            modifier,
            options.advantage_state(),
            options.purpose_or("Hit Die Recovery"),
            None,
        )
    }
}

/// Whether `roll` meets or beats `difficulty_class`.
pub fn check_success(roll: &DiceRoll, difficulty_class: i32) -> bool {
    roll.meets_dc(difficulty_class)
}

pub fn ability_check(
    ability_score: i32,
    proficiency_bonus: i32,
    options: &CheckOptions,
) -> DiceRoll {
    DiceRoller::new().ability_check(ability_score, proficiency_bonus, options)
}

pub fn skill_check(
    skill: &str,
    ability_score: i32,
    is_proficient: bool,
    proficiency_bonus: i32,
    options: &CheckOptions,
) -> DiceRoll {
    DiceRoller::new().skill_check(skill, ability_score, is_proficient, proficiency_bonus, options)
}

pub fn saving_throw(
    ability_score: i32,
    is_proficient: bool,
    proficiency_bonus: i32,
    options: &CheckOptions,
) -> DiceRoll {
    DiceRoller::new().saving_throw(ability_score, is_proficient, proficiency_bonus, options)
}

pub fn attack_roll(
    ability_score: i32,
    proficiency_bonus: i32,
    options: &CheckOptions,
) -> DiceRoll {
    DiceRoller::new().attack_roll(ability_score, proficiency_bonus, options)
}

pub fn damage_roll(
    die: DieType,
    count: u32,
    modifier: i32,
    damage_type: &str,
) -> Result<DiceRoll, DiceError> {
    DiceRoller::new().damage_roll(die, count, modifier, damage_type)
}

pub fn initiative_roll(dexterity_score: i32, options: &CheckOptions) -> DiceRoll {
    DiceRoller::new().initiative_roll(dexterity_score, options)
}

pub fn hit_die_recovery(
    hit_die: DieType,
    constitution_score: i32,
    options: &CheckOptions,
) -> DiceRoll {
    DiceRoller::new().hit_die_recovery(hit_die, constitution_score, options)
}
