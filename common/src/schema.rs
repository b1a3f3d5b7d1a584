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

//! Canonical character-sheet schema
//!
//! The column set grows monotonically across releases and never shrinks;
//! storage backends reconcile themselves against this list at boot. Each
//! column carries an ordered lookup list of accepted input key names, with
//! the canonical name always first. Several columns declare each other as
//! aliases (full ability names and their three-letter forms, `hp` feeding
//! both hit point columns); those pairs are deliberately independent and are
//! never synchronized by the resolver.

/// Key under which the record identifier is stored. Never a [`Column`].
pub const ID_KEY: &str = "id";

/// Key of the catch-all object holding input fields no column models.
pub const EXTRAS_KEY: &str = "extras";

/// Coercion class applied to a column's input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Whole numbers; fractional input truncates toward zero.
    Integer,
    /// True/false flags with loose textual and numeric forms.
    Boolean,
    /// Free text; values pass through untouched.
    Text,
}

/// One canonical column of the character table.
#[derive(Debug)]
pub struct Column {
    /// Canonical column name, used verbatim in storage.
    pub name: &'static str,

    /// Coercion class for client input.
    pub kind: ColumnKind,

    /// Ordered input lookup list. The first entry is always `name`; the
    /// first entry present as a key in the input wins, whatever its value.
    pub lookup: &'static [&'static str],
}

/// The canonical column set, in storage order.
pub const COLUMNS: &[Column] = &[
    // Identity and meta
    Column { name: "name", kind: ColumnKind::Text, lookup: &["name", "character_name", "characterName"] },
    Column { name: "class", kind: ColumnKind::Text, lookup: &["class", "character_class", "characterClass"] },
    Column { name: "race", kind: ColumnKind::Text, lookup: &["race"] },
    Column { name: "subrace", kind: ColumnKind::Text, lookup: &["subrace", "sub_race", "subRace"] },
    Column { name: "background", kind: ColumnKind::Text, lookup: &["background"] },
    Column { name: "alignment", kind: ColumnKind::Text, lookup: &["alignment"] },
    Column { name: "player_name", kind: ColumnKind::Text, lookup: &["player_name", "playerName", "player"] },
    // Progression
    Column { name: "level", kind: ColumnKind::Integer, lookup: &["level", "lvl"] },
    Column { name: "experience", kind: ColumnKind::Integer, lookup: &["experience", "xp", "exp"] },
    Column { name: "inspiration", kind: ColumnKind::Boolean, lookup: &["inspiration", "inspired"] },
    Column { name: "proficiency_bonus", kind: ColumnKind::Integer, lookup: &["proficiency_bonus", "proficiencyBonus", "proficiency", "prof"] },
    // Ability scores, full names and three-letter forms as distinct columns
    Column { name: "strength", kind: ColumnKind::Integer, lookup: &["strength", "str"] },
    Column { name: "dexterity", kind: ColumnKind::Integer, lookup: &["dexterity", "dex"] },
    Column { name: "constitution", kind: ColumnKind::Integer, lookup: &["constitution", "con"] },
    Column { name: "intelligence", kind: ColumnKind::Integer, lookup: &["intelligence", "int"] },
    Column { name: "wisdom", kind: ColumnKind::Integer, lookup: &["wisdom", "wis"] },
    Column { name: "charisma", kind: ColumnKind::Integer, lookup: &["charisma", "cha"] },
    Column { name: "str", kind: ColumnKind::Integer, lookup: &["str", "strength"] },
    Column { name: "dex", kind: ColumnKind::Integer, lookup: &["dex", "dexterity"] },
    Column { name: "con", kind: ColumnKind::Integer, lookup: &["con", "constitution"] },
    Column { name: "int", kind: ColumnKind::Integer, lookup: &["int", "intelligence"] },
    Column { name: "wis", kind: ColumnKind::Integer, lookup: &["wis", "wisdom"] },
    Column { name: "cha", kind: ColumnKind::Integer, lookup: &["cha", "charisma"] },
    // Combat
    Column { name: "current_hp", kind: ColumnKind::Integer, lookup: &["current_hp", "currentHp", "hp"] },
    Column { name: "max_hp", kind: ColumnKind::Integer, lookup: &["max_hp", "maxHp", "hp", "hit_points"] },
    Column { name: "armor_class", kind: ColumnKind::Integer, lookup: &["armor_class", "armorClass", "ac"] },
    Column { name: "initiative", kind: ColumnKind::Integer, lookup: &["initiative", "init"] },
    Column { name: "speed", kind: ColumnKind::Integer, lookup: &["speed"] },
    Column { name: "hit_dice", kind: ColumnKind::Text, lookup: &["hit_dice", "hitDice", "hd"] },
    // Narrative
    Column { name: "traits", kind: ColumnKind::Text, lookup: &["traits", "personality_traits", "personalityTraits"] },
    Column { name: "ideals", kind: ColumnKind::Text, lookup: &["ideals"] },
    Column { name: "bonds", kind: ColumnKind::Text, lookup: &["bonds"] },
    Column { name: "flaws", kind: ColumnKind::Text, lookup: &["flaws"] },
    Column { name: "appearance", kind: ColumnKind::Text, lookup: &["appearance", "looks"] },
    Column { name: "backstory", kind: ColumnKind::Text, lookup: &["backstory", "story", "bio"] },
];

/// Look up a canonical column by name.
pub fn column(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|column| column.name == name)
}

/// Whether an input key is consumed by the model: the identifier, the
/// extras object, or any column's lookup list. Keys that are not modeled
/// land in the extras blob.
pub fn is_modeled_key(key: &str) -> bool {
    key == ID_KEY
        || key == EXTRAS_KEY
        || COLUMNS
            .iter()
            .any(|column| column.lookup.contains(&key))
}
