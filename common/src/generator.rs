//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Random character generation
//!
//! Produces a throwaway sheet for the `/characters/random` endpoint: ability
//! scores rolled as four six-sided dice dropping the lowest, race, class and
//! alignment picked from fixed enumerations. Generated sheets carry no
//! identifier and are never persisted.

use crate::resolver::Fields;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::Value;

/// Sample names for generated sheets.
pub const NAMES: &[&str] = &[
    "Mira", "Thorin", "Elowen", "Garrick", "Seraphine", "Bram", "Isolde", "Cassian",
];

/// Playable races.
pub const RACES: &[&str] = &[
    "Human", "Elf", "Dwarf", "Halfling", "Gnome", "Half-Orc", "Tiefling", "Dragonborn",
];

/// Playable classes.
pub const CLASSES: &[&str] = &[
    "Fighter", "Wizard", "Rogue", "Cleric", "Ranger", "Bard", "Paladin", "Druid",
];

/// The nine alignments.
pub const ALIGNMENTS: &[&str] = &[
    "Lawful Good", "Neutral Good", "Chaotic Good",
    "Lawful Neutral", "True Neutral", "Chaotic Neutral",
    "Lawful Evil", "Neutral Evil", "Chaotic Evil",
];

/// Full-name ability columns populated by the generator. The three-letter
/// columns stay unset; alias pairs are independent everywhere.
const ABILITIES: &[&str] = &[
    "strength", "dexterity", "constitution", "intelligence", "wisdom", "charisma",
];

/// Roll four six-sided dice, drop the lowest, sum the remaining three.
pub fn roll_ability_score(rng: &mut impl Rng) -> i64 {
    let mut dice = [0i64; 4];
    for die in &mut dice {
        *die = rng.random_range(1..=6);
    }
    dice.sort_unstable();
    dice[1..].iter().sum()
}

/// Generate a fresh character sheet with rolled abilities and random
/// race/class/alignment. No identifier is assigned.
pub fn random_character() -> Fields {
    let mut rng = rand::rng();
    let mut sheet = Fields::new();
    sheet.insert("name".to_string(), pick(NAMES, &mut rng));
    sheet.insert("race".to_string(), pick(RACES, &mut rng));
    sheet.insert("class".to_string(), pick(CLASSES, &mut rng));
    sheet.insert("alignment".to_string(), pick(ALIGNMENTS, &mut rng));
    sheet.insert("level".to_string(), Value::from(1));
    for ability in ABILITIES {
        sheet.insert(ability.to_string(), Value::from(roll_ability_score(&mut rng)));
    }
    sheet
}

fn pick(options: &[&str], rng: &mut impl Rng) -> Value {
    Value::from(options.choose(rng).copied().unwrap_or_default())
}
