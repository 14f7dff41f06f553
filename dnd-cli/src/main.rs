//! `dnd`: roll dice, check point buy and derive character stats from the
//! command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dnd_rules::dice::{DiceNotation, DiceRoller};
use dnd_rules::point_buy::{self, validate_submission};
use dnd_rules::reference::ReferenceCatalog;
use dnd_rules::rolls::DEFAULT_PROFICIENCY_BONUS;
use dnd_rules::{
    check_success, AbilityScores, CheckOptions, DiceRoll, DieType, EngineConfig, PointBuyResult,
    RollOptions, Skill,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dnd", version, about = "D&D 5e dice and character rules")]
struct Cli {
    /// Engine configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CheckKind {
    Ability,
    Skill,
    Save,
    Attack,
    Initiative,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Roll dice notation such as `d20`, `2d6+3`.
    Roll {
        notation: DiceNotation,
        #[arg(long)]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
        #[arg(long)]
        purpose: Option<String>,
        /// Succeed if the total meets this DC.
        #[arg(long)]
        dc: Option<i32>,
    },
    /// Roll a d20 check for a character.
    Check {
        #[arg(value_enum)]
        kind: CheckKind,
        /// Relevant ability score (DEX for initiative).
        #[arg(long)]
        score: i32,
        /// Skill name, required for skill checks.
        #[arg(long)]
        skill: Option<Skill>,
        #[arg(long)]
        proficient: bool,
        #[arg(long, default_value_t = DEFAULT_PROFICIENCY_BONUS)]
        proficiency_bonus: i32,
        #[arg(long)]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
        #[arg(long)]
        dc: Option<i32>,
    },
    /// Roll damage dice.
    Damage {
        die: DieType,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,
        #[arg(long = "type", default_value = "damage")]
        damage_type: String,
    },
    /// Spend a hit die during a short rest.
    HitDie {
        die: DieType,
        /// Constitution score.
        #[arg(long)]
        con: i32,
    },
    /// Check a point-buy array.
    PointBuy {
        #[arg(num_args = 6, value_names = ["STR", "DEX", "CON", "INT", "WIS", "CHA"])]
        scores: Vec<i32>,
        /// Apply the final-submission policy instead of editing rules.
        #[arg(long)]
        submit: bool,
    },
    /// Derive HP, AC and proficiency for a new character.
    Stats {
        #[arg(num_args = 6, value_names = ["STR", "DEX", "CON", "INT", "WIS", "CHA"])]
        scores: Vec<i32>,
        #[arg(long)]
        race: String,
        #[arg(long)]
        class: String,
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// List known races.
    Races,
    /// List known classes.
    Classes,
}

fn scores_from(values: &[i32]) -> Result<AbilityScores> {
    match values {
        &[strength, dexterity, constitution, intelligence, wisdom, charisma] => Ok(
            AbilityScores::new(strength, dexterity, constitution, intelligence, wisdom, charisma),
        ),
        _ => bail!("expected six ability scores, got {}", values.len()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckedRoll<'a> {
    #[serde(flatten)]
    roll: &'a DiceRoll,
    #[serde(skip_serializing_if = "Option::is_none")]
    difficulty_class: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
}

fn report_roll(roll: &DiceRoll, dc: Option<i32>, json: bool) -> Result<()> {
    let success = dc.map(|dc| check_success(roll, dc));
    if json {
        return print_json(&CheckedRoll {
            roll,
            difficulty_class: dc,
            success,
        });
    }

    print!("{}: {roll}", roll.purpose);
    match (dc, success) {
        (Some(dc), Some(true)) => println!("  vs DC {dc}: success"),
        (Some(dc), Some(_)) => println!("  vs DC {dc}: failure"),
        _ => println!(),
    }
    Ok(())
}

/// Editing rules, or the configured submission policy with `--submit`.
fn check_point_buy(config: &EngineConfig, scores: &AbilityScores, submit: bool) -> PointBuyResult {
    if submit {
        validate_submission(scores, config.point_buy.submission)
    } else {
        point_buy::validate(scores)
    }
}

fn report_point_buy(scores: &AbilityScores, result: &PointBuyResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }
    println!("{scores}");
    println!(
        "{} points used, {} remaining",
        result.points_used, result.points_remaining
    );
    match &result.error {
        Some(error) => println!("invalid: {error}"),
        None => println!("valid"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut dice = DiceRoller::new();

    match cli.command {
        Command::Roll {
            notation,
            advantage,
            disadvantage,
            purpose,
            dc,
        } => {
            let options = RollOptions {
                advantage,
                disadvantage,
                purpose: Some(purpose.unwrap_or_else(|| notation.to_string())),
                ..notation.options()
            };
            let roll = dice.roll(notation.die, &options)?;
            report_roll(&roll, dc, cli.json)
        }
        Command::Check {
            kind,
            score,
            skill,
            proficient,
            proficiency_bonus,
            advantage,
            disadvantage,
            dc,
        } => {
            let options = CheckOptions {
                advantage,
                disadvantage,
                purpose: None,
            };
            let roll = match kind {
                CheckKind::Ability => dice.ability_check(
                    score,
                    if proficient { proficiency_bonus } else { 0 },
                    &options,
                ),
                CheckKind::Skill => {
                    let skill = skill.context("--skill is required for skill checks")?;
                    dice.skill_check(skill.name(), score, proficient, proficiency_bonus, &options)
                }
                CheckKind::Save => {
                    dice.saving_throw(score, proficient, proficiency_bonus, &options)
                }
                CheckKind::Attack => dice.attack_roll(score, proficiency_bonus, &options),
                CheckKind::Initiative => dice.initiative_roll(score, &options),
            };
            report_roll(&roll, dc, cli.json)
        }
        Command::Damage {
            die,
            count,
            modifier,
            damage_type,
        } => {
            let roll = dice.damage_roll(die, count, modifier, &damage_type)?;
            report_roll(&roll, None, cli.json)
        }
        Command::HitDie { die, con } => {
            let roll = dice.hit_die_recovery(die, con, &CheckOptions::new());
            report_roll(&roll, None, cli.json)
        }
        Command::PointBuy { scores, submit } => {
            let scores = scores_from(&scores)?;
            let result = check_point_buy(&config, &scores, submit);
            report_point_buy(&scores, &result, cli.json)
        }
        Command::Stats {
            scores,
            race,
            class,
            level,
        } => {
            let scores = scores_from(&scores)?;
            let catalog = config.reference_catalog()?;
            let stats = config
                .stat_calculator(&catalog)
                .calculate(&scores, &race, &class, level)?;

            if cli.json {
                return print_json(&stats);
            }
            println!("{race} {class}, level {level}");
            println!("Scores: {}", stats.final_stats);
            println!("HP {}/{}", stats.hp.current, stats.hp.max);
            println!("AC {}", stats.ac);
            println!("Proficiency +{}", stats.proficiency_bonus);
            for miss in &stats.missing_reference {
                println!("note: {miss}; defaults used");
            }
            Ok(())
        }
        Command::Races => {
            let catalog = config.reference_catalog()?;
            if cli.json {
                return print_json(&catalog.races());
            }
            for race in catalog.races() {
                let bonuses: Vec<String> = race
                    .ability_score_increase
                    .iter()
                    .map(|(ability, bonus)| format!("{ability} {bonus:+}"))
                    .collect();
                println!("{:<12} {} (speed {})", race.name, bonuses.join(", "), race.speed);
            }
            Ok(())
        }
        Command::Classes => {
            let catalog: ReferenceCatalog = config.reference_catalog()?;
            if cli.json {
                return print_json(&catalog.classes());
            }
            for class in catalog.classes() {
                println!("{:<10} d{}", class.name, class.hit_die);
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dnd_rules=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnd_rules::ReferenceData;

    #[test]
    fn test_parse_roll() {
        let cli = Cli::try_parse_from(["dnd", "roll", "2d6+3", "--dc", "10"]).unwrap();
        match cli.command {
            Command::Roll { notation, dc, .. } => {
                assert_eq!(notation.count, 2);
                assert_eq!(notation.die, DieType::D6);
                assert_eq!(notation.modifier, 3);
                assert_eq!(dc, Some(10));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_die() {
        assert!(Cli::try_parse_from(["dnd", "roll", "1d7"]).is_err());
        assert!(Cli::try_parse_from(["dnd", "damage", "d3"]).is_err());
    }

    #[test]
    fn test_parse_skill_check() {
        let cli = Cli::try_parse_from([
            "dnd",
            "check",
            "skill",
            "--score",
            "14",
            "--skill",
            "sleight of hand",
            "--proficient",
        ])
        .unwrap();
        match cli.command {
            Command::Check {
                kind,
                skill,
                proficient,
                proficiency_bonus,
                ..
            } => {
                assert_eq!(kind, CheckKind::Skill);
                assert_eq!(skill, Some(Skill::SleightOfHand));
                assert!(proficient);
                assert_eq!(proficiency_bonus, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_point_buy_needs_six_scores() {
        let cli = Cli::try_parse_from(["dnd", "point-buy", "15", "13", "14", "10", "12", "8"])
            .unwrap();
        match cli.command {
            Command::PointBuy { scores, submit } => {
                assert_eq!(scores_from(&scores).unwrap().constitution, 14);
                assert!(!submit);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["dnd", "point-buy", "15", "13"]).is_err());
    }

    #[test]
    fn test_negative_damage_modifier() {
        let cli =
            Cli::try_parse_from(["dnd", "damage", "d4", "--modifier", "-1", "--type", "necrotic"])
                .unwrap();
        match cli.command {
            Command::Damage {
                modifier,
                damage_type,
                ..
            } => {
                assert_eq!(modifier, -1);
                assert_eq!(damage_type, "necrotic");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_stats_with_defaults() {
        let cli = Cli::try_parse_from([
            "dnd", "stats", "15", "13", "14", "10", "12", "8", "--race", "Dwarf", "--class",
            "Fighter",
        ])
        .unwrap();
        assert!(run(cli).is_ok());
    }

    #[test]
    fn test_run_roll() {
        let cli = Cli::try_parse_from(["dnd", "roll", "2d6+3", "--dc", "5", "--json"]).unwrap();
        assert!(run(cli).is_ok());

        let cli = Cli::try_parse_from(["dnd", "roll", "d20", "--advantage"]).unwrap();
        assert!(run(cli).is_ok());

        assert!(Cli::try_parse_from(["dnd", "roll", "1001d6"]).is_err());
    }

    #[test]
    fn test_run_point_buy_submit_with_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("dnd.toml");
        std::fs::write(&config_path, "[point_buy]\nsubmission = \"allow_underspend\"\n").unwrap();

        let config = EngineConfig::load(&config_path).unwrap();
        let underspent = AbilityScores::uniform(8);
        assert!(check_point_buy(&config, &underspent, true).valid);
        assert!(!check_point_buy(&EngineConfig::default(), &underspent, true).valid);

        let cli = Cli::try_parse_from([
            "dnd",
            "point-buy",
            "8",
            "8",
            "8",
            "8",
            "8",
            "8",
            "--submit",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(cli.config.is_some());
        assert!(run(cli).is_ok());
    }

    #[test]
    fn test_run_point_buy_survives_huge_scores() {
        let cli = Cli::try_parse_from(["dnd", "point-buy", "2000000000", "8", "8", "8", "8", "8"])
            .unwrap();
        assert!(run(cli).is_ok());
    }

    #[test]
    fn test_run_races_json_with_homebrew_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("homebrew.toml"),
            "[[races]]\nname = \"Shardmind\"\n[races.abilityScoreIncrease]\nwis = 2\n",
        )
        .unwrap();
        let config_path = dir.path().join("dnd.toml");
        std::fs::write(&config_path, "[reference]\ncatalog = \"homebrew.toml\"\n").unwrap();

        let catalog = EngineConfig::load(&config_path)
            .unwrap()
            .reference_catalog()
            .unwrap();
        assert!(catalog.race("shardmind").is_ok());
        assert!(catalog.race("Dwarf").is_err());

        let cli = Cli::try_parse_from([
            "dnd",
            "races",
            "--json",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).is_ok());

        let cli = Cli::try_parse_from(["dnd", "races", "--json"]).unwrap();
        assert!(run(cli).is_ok());
    }

    #[test]
    fn test_run_skill_check_without_skill_fails() {
        let cli = Cli::try_parse_from(["dnd", "check", "skill", "--score", "10"]).unwrap();
        assert!(run(cli).is_err());
    }
}
