//! Race and class reference data.
//!
//! The derivation engine never sees raw JSON: race and class data are parsed
//! once into [`RaceDefinition`] and [`ClassDefinition`] at this boundary and
//! looked up through the [`ReferenceData`] trait. Lookups are
//! case-insensitive and report a miss as a [`ReferenceDataMissing`] value so
//! callers decide explicitly how to degrade.

use crate::ability::Ability;
use crate::dice::DieType;
use crate::error::{ConfigError, RulesError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Creature size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
}

/// A playable race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDefinition {
    pub name: String,
    #[serde(default, deserialize_with = "ability_bonus_map")]
    pub ability_score_increase: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub size: Size,
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_speed() -> u32 {
    30
}

/// Ability keys are parsed with [`Ability::from_str`], so full names and
/// abbreviations in any case are accepted. Naming one ability twice (say
/// `strength` and `str`) is an error.
fn ability_bonus_map<'de, D>(deserializer: D) -> Result<BTreeMap<Ability, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i32>::deserialize(deserializer)?;
    let mut bonuses = BTreeMap::new();
    for (name, bonus) in raw {
        let ability = Ability::from_str(&name).map_err(de::Error::custom)?;
        if bonuses.insert(ability, bonus).is_some() {
            return Err(de::Error::custom(format!(
                "ability {} given more than once",
                ability.name()
            )));
        }
    }
    Ok(bonuses)
}

impl RaceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ability_score_increase: BTreeMap::new(),
            traits: Vec::new(),
            size: Size::Medium,
            speed: default_speed(),
        }
    }

    pub fn with_bonus(mut self, ability: Ability, bonus: i32) -> Self {
        self.ability_score_increase.insert(ability, bonus);
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Bonus for one ability, 0 if the race grants none.
    pub fn bonus(&self, ability: Ability) -> i32 {
        self.ability_score_increase.get(&ability).copied().unwrap_or(0)
    }
}

/// A character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub name: String,
    pub hit_die: u32,
    #[serde(default)]
    pub primary_ability: Vec<Ability>,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
}

impl ClassDefinition {
    pub fn new(
        name: impl Into<String>,
        hit_die: u32,
        primary_ability: &[Ability],
        saving_throws: &[Ability],
    ) -> Self {
        Self {
            name: name.into(),
            hit_die,
            primary_ability: primary_ability.to_vec(),
            saving_throws: saving_throws.to_vec(),
        }
    }

    /// The hit die as a die type; `None` only for hand-built invalid data.
    pub fn hit_die_type(&self) -> Option<DieType> {
        DieType::from_sides(self.hit_die)
    }

    fn check(&self) -> Result<(), RulesError> {
        match self.hit_die {
            4 | 6 | 8 | 10 | 12 => Ok(()),
            other => Err(RulesError::malformed(format!(
                "class {} has hit die d{other}; expected d4, d6, d8, d10 or d12",
                self.name
            ))),
        }
    }
}

/// Which kind of reference record a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    Race,
    Class,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Race => write!(f, "race"),
            ReferenceKind::Class => write!(f, "class"),
        }
    }
}

/// A race or class lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("no {kind} named '{name}' in reference data")]
pub struct ReferenceDataMissing {
    pub kind: ReferenceKind,
    pub name: String,
}

/// Source of race and class definitions.
pub trait ReferenceData {
    fn race(&self, name: &str) -> Result<&RaceDefinition, ReferenceDataMissing>;
    fn class(&self, name: &str) -> Result<&ClassDefinition, ReferenceDataMissing>;
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// On-disk catalog layout.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    races: Vec<RaceDefinition>,
    #[serde(default)]
    classes: Vec<ClassDefinition>,
}

/// In-memory race and class catalog.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    races: HashMap<String, RaceDefinition>,
    classes: HashMap<String, ClassDefinition>,
}

lazy_static::lazy_static! {
    /// The races and classes of the 5e System Reference Document.
    static ref SRD: ReferenceCatalog = ReferenceCatalog::build_srd();
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in SRD races and the twelve PHB classes.
    pub fn srd() -> &'static ReferenceCatalog {
        &SRD
    }

    /// Build a catalog, rejecting duplicate names and impossible hit dice.
    pub fn from_definitions(
        races: Vec<RaceDefinition>,
        classes: Vec<ClassDefinition>,
    ) -> Result<Self, RulesError> {
        let mut catalog = Self::new();
        for race in races {
            if catalog.races.contains_key(&key(&race.name)) {
                return Err(RulesError::malformed(format!("race {} defined twice", race.name)));
            }
            catalog.insert_race(race);
        }
        for class in classes {
            class.check()?;
            if catalog.classes.contains_key(&key(&class.name)) {
                return Err(RulesError::malformed(format!(
                    "class {} defined twice",
                    class.name
                )));
            }
            catalog.classes.insert(key(&class.name), class);
        }
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::from_definitions(file.races, file.classes)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Ok(Self::from_definitions(file.races, file.classes)?)
    }

    /// Load a `.toml` or `.json` catalog file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(
            path = %path.display(),
            races = catalog.races.len(),
            classes = catalog.classes.len(),
            "loaded reference catalog"
        );
        Ok(catalog)
    }

    /// Add or replace a race.
    pub fn insert_race(&mut self, race: RaceDefinition) {
        self.races.insert(key(&race.name), race);
    }

    /// Add or replace a class.
    pub fn insert_class(&mut self, class: ClassDefinition) -> Result<(), RulesError> {
        class.check()?;
        self.classes.insert(key(&class.name), class);
        Ok(())
    }

    /// Races sorted by name.
    pub fn races(&self) -> Vec<&RaceDefinition> {
        let mut races: Vec<_> = self.races.values().collect();
        races.sort_by(|a, b| a.name.cmp(&b.name));
        races
    }

    /// Classes sorted by name.
    pub fn classes(&self) -> Vec<&ClassDefinition> {
        let mut classes: Vec<_> = self.classes.values().collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    fn build_srd() -> Self {
        use Ability::*;

        let mut catalog = Self::new();

        let races = [
            Ability::all()
                .into_iter()
                .fold(RaceDefinition::new("Human"), |race, a| race.with_bonus(a, 1))
                .with_traits(&["Extra Language"]),
            RaceDefinition::new("Elf")
                .with_bonus(Dexterity, 2)
                .with_traits(&["Darkvision", "Keen Senses", "Fey Ancestry", "Trance"]),
            RaceDefinition::new("Dwarf")
                .with_bonus(Constitution, 2)
                .with_speed(25)
                .with_traits(&["Darkvision", "Dwarven Resilience", "Stonecunning"]),
            RaceDefinition::new("Halfling")
                .with_bonus(Dexterity, 2)
                .with_size(Size::Small)
                .with_speed(25)
                .with_traits(&["Lucky", "Brave", "Halfling Nimbleness"]),
            RaceDefinition::new("Half-Orc")
                .with_bonus(Strength, 2)
                .with_bonus(Constitution, 1)
                .with_traits(&["Darkvision", "Menacing", "Relentless Endurance", "Savage Attacks"]),
            // The two free +1 choices are a wizard decision, not reference data.
            RaceDefinition::new("Half-Elf")
                .with_bonus(Charisma, 2)
                .with_traits(&["Darkvision", "Fey Ancestry", "Skill Versatility"]),
            RaceDefinition::new("Tiefling")
                .with_bonus(Charisma, 2)
                .with_bonus(Intelligence, 1)
                .with_traits(&["Darkvision", "Hellish Resistance", "Infernal Legacy"]),
            RaceDefinition::new("Gnome")
                .with_bonus(Intelligence, 2)
                .with_size(Size::Small)
                .with_speed(25)
                .with_traits(&["Darkvision", "Gnome Cunning"]),
            RaceDefinition::new("Dragonborn")
                .with_bonus(Strength, 2)
                .with_bonus(Charisma, 1)
                .with_traits(&["Draconic Ancestry", "Breath Weapon", "Damage Resistance"]),
        ];
        for race in races {
            catalog.insert_race(race);
        }

        let classes = [
            ClassDefinition::new("Barbarian", 12, &[Strength], &[Strength, Constitution]),
            ClassDefinition::new("Bard", 8, &[Charisma], &[Dexterity, Charisma]),
            ClassDefinition::new("Cleric", 8, &[Wisdom], &[Wisdom, Charisma]),
            ClassDefinition::new("Druid", 8, &[Wisdom], &[Intelligence, Wisdom]),
            ClassDefinition::new("Fighter", 10, &[Strength, Dexterity], &[Strength, Constitution]),
            ClassDefinition::new("Monk", 8, &[Dexterity, Wisdom], &[Strength, Dexterity]),
            ClassDefinition::new("Paladin", 10, &[Strength, Charisma], &[Wisdom, Charisma]),
            ClassDefinition::new("Ranger", 10, &[Dexterity, Wisdom], &[Strength, Dexterity]),
            ClassDefinition::new("Rogue", 8, &[Dexterity], &[Dexterity, Intelligence]),
            ClassDefinition::new("Sorcerer", 6, &[Charisma], &[Constitution, Charisma]),
            ClassDefinition::new("Warlock", 8, &[Charisma], &[Wisdom, Charisma]),
            ClassDefinition::new("Wizard", 6, &[Intelligence], &[Intelligence, Wisdom]),
        ];
        for class in classes {
            catalog.classes.insert(key(&class.name), class);
        }

        catalog
    }
}

impl ReferenceData for ReferenceCatalog {
    fn race(&self, name: &str) -> Result<&RaceDefinition, ReferenceDataMissing> {
        self.races.get(&key(name)).ok_or_else(|| ReferenceDataMissing {
            kind: ReferenceKind::Race,
            name: name.to_string(),
        })
    }

    fn class(&self, name: &str) -> Result<&ClassDefinition, ReferenceDataMissing> {
        self.classes.get(&key(name)).ok_or_else(|| ReferenceDataMissing {
            kind: ReferenceKind::Class,
            name: name.to_string(),
        })
    }
}
