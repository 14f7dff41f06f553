//! Roll a handful of dice and print them the way the game log shows them.
//!
//! Run with: `cargo run -p dnd-rules --example roll_dice`

use dnd_rules::dice::{roll_notation, DiceRoller};
use dnd_rules::{CheckOptions, DieType, RollOptions};

fn main() {
    println!("=== Rolling Dice ===\n");

    show_notation("1d20", "Basic d20");
    show_notation("2d6", "Two d6");
    show_notation("1d20+5", "d20 with modifier");
    show_notation("8d6", "Fireball damage");
    show_notation("1d7", "Not a real die");

    let mut dice = DiceRoller::new();
    println!();
    println!(
        "d20 with advantage:    {}",
        dice.roll(DieType::D20, &RollOptions::new().advantage().modifier(5))
            .map(|r| r.to_string())
            .unwrap_or_else(|e| e.to_string())
    );
    println!(
        "d20 with disadvantage: {}",
        dice.roll(DieType::D20, &RollOptions::new().disadvantage())
            .map(|r| r.to_string())
            .unwrap_or_else(|e| e.to_string())
    );
    println!(
        "Stealth (DEX 16, proficient): {}",
        dice.skill_check("Stealth", 16, true, 2, &CheckOptions::new())
    );
    println!(
        "Second wind hit die (CON 8): {}",
        dice.hit_die_recovery(DieType::D10, 8, &CheckOptions::new())
    );
}

fn show_notation(notation: &str, description: &str) {
    match roll_notation(notation, &RollOptions::new()) {
        Ok(roll) => println!("{description:<20} {roll}"),
        Err(e) => println!("{description:<20} error: {e}"),
    }
}
