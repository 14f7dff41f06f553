//! D&D dice rolling system.
//!
//! Rolls a single kind of polyhedral die (`XdY+Z`), resolving advantage and
//! disadvantage for d20s. D&D-specific rolls built on top of this live in
//! [`crate::rolls`].

use crate::error::RulesError;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error type for dice parsing and rolling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("Unknown die type: {0}")]
    UnknownDieType(String),
    #[error("No dice specified")]
    NoDice,
    #[error("Cannot roll {0} dice at once (limit {max})", max = MAX_DICE)]
    TooManyDice(u32),
    #[error("Modifier {0} would overflow the roll total")]
    ModifierOutOfRange(i64),
}

/// Most dice a single roll may contain.
pub const MAX_DICE: u32 = 1_000;

/// Reject rolls whose dice count or total cannot be represented.
pub(crate) fn check_roll_bounds(die: DieType, count: u32, modifier: i32) -> Result<(), DiceError> {
    if count == 0 {
        return Err(DiceError::NoDice);
    }
    if count > MAX_DICE {
        return Err(DiceError::TooManyDice(count));
    }
    // Bounded by MAX_DICE * 100, well inside i32.
    let highest = (count * die.sides()) as i32;
    match modifier.checked_add(highest) {
        Some(_) => Ok(()),
        None => Err(DiceError::ModifierOutOfRange(modifier.into())),
    }
}

impl From<DiceError> for RulesError {
    fn from(e: DiceError) -> Self {
        RulesError::MalformedInput(e.to_string())
    }
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: Advantage) -> Advantage {
        match (self, other) {
            (Advantage::Normal, x) | (x, Advantage::Normal) => x,
            (Advantage::Advantage, Advantage::Disadvantage) => Advantage::Normal,
            (Advantage::Disadvantage, Advantage::Advantage) => Advantage::Normal,
            (Advantage::Advantage, Advantage::Advantage) => Advantage::Advantage,
            (Advantage::Disadvantage, Advantage::Disadvantage) => Advantage::Disadvantage,
        }
    }

    /// Resolve a pair of request flags. Both set cancel out.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Advantage {
        let adv = if advantage {
            Advantage::Advantage
        } else {
            Advantage::Normal
        };
        let dis = if disadvantage {
            Advantage::Disadvantage
        } else {
            Advantage::Normal
        };
        adv.combine(dis)
    }
}

/// Standard D&D die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }

    pub fn all() -> [DieType; 7] {
        [
            DieType::D4,
            DieType::D6,
            DieType::D8,
            DieType::D10,
            DieType::D12,
            DieType::D20,
            DieType::D100,
        ]
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    /// Parses `d20`, `D20` or a bare side count such as `20`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed.strip_prefix('d').unwrap_or(&trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(DieType::from_sides)
            .ok_or_else(|| DiceError::UnknownDieType(s.to_string()))
    }
}

/// Unique identifier for a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollId(pub Uuid);

impl RollId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RollId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for a plain roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RollOptions {
    /// Dice rolled and summed. Ignored when advantage or disadvantage applies.
    pub count: u32,
    pub modifier: i32,
    pub advantage: bool,
    pub disadvantage: bool,
    pub purpose: Option<String>,
    pub skill: Option<String>,
}

impl Default for RollOptions {
    fn default() -> Self {
        Self {
            count: 1,
            modifier: 0,
            advantage: false,
            disadvantage: false,
            purpose: None,
            skill: None,
        }
    }
}

impl RollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
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

    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }
}

/// One roll event. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    pub id: RollId,
    #[serde(rename = "type")]
    pub die_type: DieType,
    pub count: u32,
    pub modifier: i32,
    /// Faces that count toward the total; a single kept face when advantage
    /// or disadvantage collapsed two d20s.
    pub result: Vec<u32>,
    pub total: i32,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    /// Advantage actually applied, after cancellation and die-type checks.
    pub advantage: bool,
    pub disadvantage: bool,
}

impl DiceRoll {
    /// Check if the roll meets or exceeds a DC.
    pub fn meets_dc(&self, dc: i32) -> bool {
        self.total >= dc
    }

    fn single_d20_face(&self) -> Option<u32> {
        match (self.die_type, self.result.as_slice()) {
            (DieType::D20, [face]) => Some(*face),
            _ => None,
        }
    }

    pub fn is_natural_20(&self) -> bool {
        self.single_d20_face() == Some(20)
    }

    pub fn is_natural_1(&self) -> bool {
        self.single_d20_face() == Some(1)
    }

    fn advantage_state(&self) -> Advantage {
        Advantage::from_flags(self.advantage, self.disadvantage)
    }
}

impl fmt::Display for DiceRoll {
    /// `1d20+3: 14 = 17` for one die, `[4, 6]+2 = 12` for several.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifier = match self.modifier {
            0 => String::new(),
            m if m > 0 => format!("+{m}"),
            m => format!("{m}"),
        };

        match self.result.as_slice() {
            [face] => write!(
                f,
                "{}{}{}: {} = {}",
                self.count, self.die_type, modifier, face, self.total
            )?,
            faces => {
                let faces: Vec<String> = faces.iter().map(|r| r.to_string()).collect();
                write!(f, "[{}]{} = {}", faces.join(", "), modifier, self.total)?
            }
        }

        match self.advantage_state() {
            Advantage::Advantage => write!(f, " (Advantage)"),
            Advantage::Disadvantage => write!(f, " (Disadvantage)"),
            Advantage::Normal => Ok(()),
        }
    }
}

/// Render a roll for display.
pub fn format_roll(roll: &DiceRoll) -> String {
    roll.to_string()
}

/// A single-term dice expression such as `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceNotation {
    pub count: u32,
    pub die: DieType,
    pub modifier: i32,
}

impl DiceNotation {
    /// Parse dice notation: `d20`, `1d8-1`, `2d6 + 3`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let compact: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if compact.is_empty() {
            return Err(DiceError::NoDice);
        }

        let invalid = || DiceError::InvalidNotation(notation.to_string());

        let (count_str, rest) = compact.split_once('d').ok_or_else(invalid)?;
        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| invalid())?
        };
        if count == 0 {
            return Err(DiceError::NoDice);
        }
        if count > MAX_DICE {
            return Err(DiceError::TooManyDice(count));
        }

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let (sides, modifier) = rest.split_at(pos);
                let value: i32 = modifier[1..].parse().map_err(|_| invalid())?;
                let sign = if modifier.starts_with('-') { -1 } else { 1 };
                (sides, sign * value)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides_str.parse().map_err(|_| invalid())?;
        let die = DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;

        Ok(DiceNotation {
            count,
            die,
            modifier,
        })
    }

    /// Options for rolling this expression.
    pub fn options(&self) -> RollOptions {
        RollOptions::new().count(self.count).modifier(self.modifier)
    }
}

impl FromStr for DiceNotation {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceNotation::parse(s)
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Rolls dice from an owned random source.
///
/// [`DiceRoller::new`] draws from the thread-local generator; tests use
/// [`DiceRoller::seeded`] for repeatable sequences.
#[derive(Debug, Clone)]
pub struct DiceRoller<R = ThreadRng> {
    rng: R,
}

impl DiceRoller<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for DiceRoller<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> DiceRoller<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn face(&mut self, die: DieType) -> u32 {
        self.rng.gen_range(1..=die.sides())
    }

    /// Roll `options.count` dice of one type.
    pub fn roll(&mut self, die: DieType, options: &RollOptions) -> Result<DiceRoll, DiceError> {
        check_roll_bounds(die, options.count, options.modifier)?;
        Ok(self.draw(
            die,
            options.count,
            options.modifier,
            Advantage::from_flags(options.advantage, options.disadvantage),
            options.purpose.clone().unwrap_or_else(|| "Roll".to_string()),
            options.skill.clone(),
        ))
    }

    /// Parse and roll notation like `2d6+3`. A modifier in `options` is
    /// added on top of the notation's own.
    pub fn roll_notation(
        &mut self,
        notation: &str,
        options: &RollOptions,
    ) -> Result<DiceRoll, DiceError> {
        let parsed = DiceNotation::parse(notation)?;
        let options = RollOptions {
            count: parsed.count,
            modifier: parsed
                .modifier
                .checked_add(options.modifier)
                .ok_or_else(|| {
                    DiceError::ModifierOutOfRange(
                        i64::from(parsed.modifier) + i64::from(options.modifier),
                    )
                })?,
            purpose: Some(options.purpose.clone().unwrap_or_else(|| parsed.to_string())),
            ..options.clone()
        };
        self.roll(parsed.die, &options)
    }

    /// Roll with an already-validated count (at least one die, at most
    /// [`MAX_DICE`]). The total saturates rather than overflowing.
    pub(crate) fn draw(
        &mut self,
        die: DieType,
        count: u32,
        modifier: i32,
        advantage: Advantage,
        purpose: String,
        skill: Option<String>,
    ) -> DiceRoll {
        let advantage = if die == DieType::D20 {
            advantage
        } else {
            Advantage::Normal
        };

        let (count, result): (u32, Vec<u32>) = match advantage {
            Advantage::Normal => (count, (0..count).map(|_| self.face(die)).collect()),
            Advantage::Advantage | Advantage::Disadvantage => {
                let roll1 = self.face(die);
                let roll2 = self.face(die);
                let kept = if advantage == Advantage::Advantage {
                    roll1.max(roll2)
                } else {
                    roll1.min(roll2)
                };
                (1, vec![kept])
            }
        };

        let dice_total = result
            .iter()
            .fold(0i32, |sum, &face| sum.saturating_add(face as i32));
        let roll = DiceRoll {
            id: RollId::new(),
            die_type: die,
            count,
            modifier,
            result,
            total: dice_total.saturating_add(modifier),
            purpose,
            skill,
            advantage: advantage == Advantage::Advantage,
            disadvantage: advantage == Advantage::Disadvantage,
        };
        tracing::debug!(purpose = %roll.purpose, roll = %roll, "dice rolled");
        roll
    }
}

/// Convenience function to roll with the thread-local generator.
pub fn roll(die: DieType, options: &RollOptions) -> Result<DiceRoll, DiceError> {
    DiceRoller::new().roll(die, options)
}

/// Convenience function to roll dice from a notation string.
pub fn roll_notation(notation: &str, options: &RollOptions) -> Result<DiceRoll, DiceError> {
    DiceRoller::new().roll_notation(notation, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roll(die_type: DieType, result: Vec<u32>, modifier: i32) -> DiceRoll {
        let total = result.iter().sum::<u32>() as i32 + modifier;
        DiceRoll {
            id: RollId::new(),
            die_type,
            count: result.len() as u32,
            modifier,
            result,
            total,
            purpose: "Test".to_string(),
            skill: None,
            advantage: false,
            disadvantage: false,
        }
    }

    #[test]
    fn test_die_type_parse() {
        assert_eq!("d20".parse::<DieType>().unwrap(), DieType::D20);
        assert_eq!("D100".parse::<DieType>().unwrap(), DieType::D100);
        assert_eq!("6".parse::<DieType>().unwrap(), DieType::D6);
        assert!(matches!(
            "d7".parse::<DieType>(),
            Err(DiceError::UnknownDieType(_))
        ));
        assert!("banana".parse::<DieType>().is_err());
    }

    #[test]
    fn test_unknown_die_type_is_malformed_input() {
        let err: RulesError = "d3".parse::<DieType>().unwrap_err().into();
        assert!(matches!(err, RulesError::MalformedInput(_)));
    }

    #[test]
    fn test_roll_range() {
        let mut roller = DiceRoller::seeded(7);
        for die in DieType::all() {
            for _ in 0..200 {
                let roll = roller.roll(die, &RollOptions::new()).unwrap();
                assert_eq!(roll.result.len(), 1);
                assert!((1..=die.sides()).contains(&roll.result[0]));
                assert_eq!(roll.total, roll.result[0] as i32);
            }
        }
    }

    #[test]
    fn test_roll_count_and_modifier() {
        let mut roller = DiceRoller::seeded(11);
        let options = RollOptions::new().count(3).modifier(-2).purpose("Fireball");
        for _ in 0..100 {
            let roll = roller.roll(DieType::D6, &options).unwrap();
            assert_eq!(roll.count, 3);
            assert_eq!(roll.result.len(), 3);
            assert_eq!(roll.total, roll.result.iter().sum::<u32>() as i32 - 2);
            assert_eq!(roll.purpose, "Fireball");
            assert!(!roll.advantage && !roll.disadvantage);
        }
    }

    #[test]
    fn test_zero_dice_rejected() {
        let result = roll(DieType::D6, &RollOptions::new().count(0));
        assert_eq!(result.unwrap_err(), DiceError::NoDice);
    }

    #[test]
    fn test_dice_limit() {
        let mut roller = DiceRoller::seeded(12);
        let roll = roller
            .roll(DieType::D100, &RollOptions::new().count(MAX_DICE))
            .unwrap();
        assert_eq!(roll.result.len(), MAX_DICE as usize);

        assert_eq!(
            roller.roll(DieType::D6, &RollOptions::new().count(4_000_000_000)),
            Err(DiceError::TooManyDice(4_000_000_000))
        );
        let err: RulesError = DiceError::TooManyDice(MAX_DICE + 1).into();
        assert!(matches!(err, RulesError::MalformedInput(_)));
    }

    #[test]
    fn test_modifier_overflow_rejected() {
        let mut roller = DiceRoller::seeded(1);
        assert_eq!(
            roller.roll(DieType::D20, &RollOptions::new().modifier(i32::MAX)),
            Err(DiceError::ModifierOutOfRange(i32::MAX.into()))
        );

        // The largest modifier whose best roll still fits is accepted.
        let roll = roller
            .roll(DieType::D20, &RollOptions::new().modifier(i32::MAX - 20))
            .unwrap();
        assert!(roll.total > i32::MAX - 20);

        let low = roller
            .roll(DieType::D20, &RollOptions::new().modifier(i32::MIN))
            .unwrap();
        assert_eq!(low.total, i32::MIN + low.result[0] as i32);

        assert!(matches!(
            roller.roll_notation("1d20+2000000000", &RollOptions::new().modifier(2_000_000_000)),
            Err(DiceError::ModifierOutOfRange(4_000_000_000))
        ));
    }

    #[test]
    fn test_advantage_keeps_higher_of_two() {
        for seed in 0..50 {
            let roll = DiceRoller::seeded(seed)
                .roll(DieType::D20, &RollOptions::new().advantage())
                .unwrap();

            let mut replay = StdRng::seed_from_u64(seed);
            let first = replay.gen_range(1..=20u32);
            let second = replay.gen_range(1..=20u32);

            assert_eq!(roll.result, vec![first.max(second)]);
            assert_eq!(roll.count, 1);
            assert!(roll.advantage);
            assert!(!roll.disadvantage);
        }
    }

    #[test]
    fn test_disadvantage_keeps_lower_of_two() {
        for seed in 0..50 {
            let roll = DiceRoller::seeded(seed)
                .roll(DieType::D20, &RollOptions::new().disadvantage().modifier(4))
                .unwrap();

            let mut replay = StdRng::seed_from_u64(seed);
            let first = replay.gen_range(1..=20u32);
            let second = replay.gen_range(1..=20u32);

            assert_eq!(roll.result, vec![first.min(second)]);
            assert_eq!(roll.total, first.min(second) as i32 + 4);
            assert!(roll.disadvantage);
        }
    }

    #[test]
    fn test_advantage_and_disadvantage_cancel() {
        let options = RollOptions::new().advantage().disadvantage();
        let roll = DiceRoller::seeded(3).roll(DieType::D20, &options).unwrap();

        // A plain roll draws exactly one face from the same stream.
        let mut replay = StdRng::seed_from_u64(3);
        assert_eq!(roll.result, vec![replay.gen_range(1..=20u32)]);
        assert!(!roll.advantage);
        assert!(!roll.disadvantage);
    }

    #[test]
    fn test_advantage_ignored_off_d20() {
        let options = RollOptions::new().count(2).advantage();
        let roll = DiceRoller::seeded(5).roll(DieType::D8, &options).unwrap();
        assert_eq!(roll.result.len(), 2);
        assert_eq!(roll.count, 2);
        assert!(!roll.advantage);
    }

    #[test]
    fn test_format_single_die() {
        let roll = sample_roll(DieType::D20, vec![14], 3);
        assert_eq!(format_roll(&roll), "1d20+3: 14 = 17");

        let roll = sample_roll(DieType::D20, vec![14], -1);
        assert_eq!(roll.to_string(), "1d20-1: 14 = 13");

        let roll = sample_roll(DieType::D8, vec![5], 0);
        assert_eq!(roll.to_string(), "1d8: 5 = 5");
    }

    #[test]
    fn test_format_multiple_dice() {
        let roll = sample_roll(DieType::D6, vec![4, 6], 2);
        assert_eq!(roll.to_string(), "[4, 6]+2 = 12");

        let roll = sample_roll(DieType::D6, vec![1, 2, 3], 0);
        assert_eq!(roll.to_string(), "[1, 2, 3] = 6");
    }

    #[test]
    fn test_format_advantage_suffix() {
        let mut roll = sample_roll(DieType::D20, vec![18], 5);
        roll.advantage = true;
        assert_eq!(roll.to_string(), "1d20+5: 18 = 23 (Advantage)");

        roll.advantage = false;
        roll.disadvantage = true;
        assert_eq!(roll.to_string(), "1d20+5: 18 = 23 (Disadvantage)");
    }

    #[test]
    fn test_natural_results() {
        assert!(sample_roll(DieType::D20, vec![20], 0).is_natural_20());
        assert!(sample_roll(DieType::D20, vec![1], 5).is_natural_1());
        assert!(!sample_roll(DieType::D100, vec![20], 0).is_natural_20());
        assert!(!sample_roll(DieType::D20, vec![20, 1], 0).is_natural_20());
    }

    #[test]
    fn test_parse_notation() {
        let n = DiceNotation::parse("2d6+3").unwrap();
        assert_eq!((n.count, n.die, n.modifier), (2, DieType::D6, 3));

        let n = DiceNotation::parse("d20").unwrap();
        assert_eq!((n.count, n.die, n.modifier), (1, DieType::D20, 0));

        let n = DiceNotation::parse(" 1D8 - 1 ").unwrap();
        assert_eq!((n.count, n.die, n.modifier), (1, DieType::D8, -1));
        assert_eq!(n.to_string(), "1d8-1");
    }

    #[test]
    fn test_parse_notation_errors() {
        assert_eq!(DiceNotation::parse(""), Err(DiceError::NoDice));
        assert_eq!(DiceNotation::parse("0d6"), Err(DiceError::NoDice));
        assert_eq!(DiceNotation::parse("1d7"), Err(DiceError::InvalidDieSize(7)));
        assert!(matches!(
            DiceNotation::parse("fireball"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceNotation::parse("2d6+x"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert_eq!(
            DiceNotation::parse("1001d6"),
            Err(DiceError::TooManyDice(1001))
        );
        assert!(matches!(
            DiceNotation::parse("99999999999d6"),
            Err(DiceError::InvalidNotation(_))
        ));
    }

    #[test]
    fn test_roll_notation() {
        let mut roller = DiceRoller::seeded(9);
        for _ in 0..100 {
            let roll = roller.roll_notation("2d4+1", &RollOptions::new()).unwrap();
            assert_eq!(roll.die_type, DieType::D4);
            assert_eq!(roll.count, 2);
            assert!((3..=9).contains(&roll.total));
            assert_eq!(roll.purpose, "2d4+1");
        }
    }

    #[test]
    fn test_roll_json_shape() {
        let roll = sample_roll(DieType::D20, vec![12], 2);
        let json = serde_json::to_value(&roll).unwrap();
        assert_eq!(json["type"], "d20");
        assert_eq!(json["result"], serde_json::json!([12]));
        assert_eq!(json["total"], 14);
        assert!(json.get("skill").is_none());
        assert!(json["id"].is_string());

        let options: RollOptions = serde_json::from_str(r#"{"advantage": true}"#).unwrap();
        assert_eq!(options.count, 1);
        assert!(options.advantage);
    }
}
