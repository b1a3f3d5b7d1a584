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

//! Field resolution and type coercion
//!
//! Client input has no fixed shape: keys are free-form, values are loosely
//! typed, and the same column answers to several names. The resolver maps
//! such input onto the canonical column set in two modes:
//! - insert: every canonical column gets a value, Null when nothing matched
//! - update: columns with no matching input key are omitted so prior stored
//!   values survive a partial update
//!
//! Resolution never fails; malformed values degrade to Null.

use crate::schema::{self, Column, ColumnKind};
use serde_json::Value;

/// A loose key/value record, as received from or returned to a client.
pub type Fields = serde_json::Map<String, Value>;

/// Outcome of resolving client input against the canonical column set.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    /// Canonical column values. Fully populated for insert, sparse for
    /// update.
    pub columns: Fields,

    /// Input fields no column models, kept verbatim for the extras blob.
    pub extras: Fields,
}

/// Coerce a value according to the column's kind.
pub fn coerce(kind: ColumnKind, value: &Value) -> Value {
    match kind {
        ColumnKind::Integer => coerce_integer(value),
        ColumnKind::Boolean => coerce_boolean(value),
        ColumnKind::Text => coerce_text(value),
    }
}

/// Integer coercion: numbers and numeric strings truncate toward zero,
/// everything else degrades to Null.
pub fn coerce_integer(value: &Value) -> Value {
    match value {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Value::from(integer)
            } else if let Some(float) = number.as_f64() {
                if float.is_finite() {
                    Value::from(float.trunc() as i64)
                } else {
                    Value::Null
                }
            } else {
                Value::Null
            }
        }
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Value::Null;
            }
            match text.parse::<f64>() {
                Ok(float) if float.is_finite() => Value::from(float.trunc() as i64),
                _ => Value::Null,
            }
        }
        _ => Value::Null,
    }
}

/// Boolean coercion: booleans pass through, nonzero numbers are true, and
/// the textual forms `true`/`1`/`yes`/`y` are true case-insensitively.
/// Remaining non-empty text is false; empty text and everything else is
/// Null.
pub fn coerce_boolean(value: &Value) -> Value {
    match value {
        Value::Bool(flag) => Value::Bool(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(float) => Value::Bool(float != 0.0),
            None => Value::Null,
        },
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Value::Null;
            }
            Value::Bool(matches!(
                text.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "y"
            ))
        }
        _ => Value::Null,
    }
}

/// Text coercion: values pass through as-is.
pub fn coerce_text(value: &Value) -> Value {
    value.clone()
}

/// First lookup entry present as a key in the input, whatever its value.
/// An explicit null under an earlier alias still wins over a later alias.
fn lookup<'input>(input: &'input Fields, column: &Column) -> Option<&'input Value> {
    column.lookup.iter().find_map(|alias| input.get(*alias))
}

/// Input fields consumed by no column, plus anything the client already
/// nested under the extras key.
fn collect_extras(input: &Fields) -> Fields {
    let mut extras = Fields::new();
    if let Some(Value::Object(nested)) = input.get(schema::EXTRAS_KEY) {
        for (key, value) in nested {
            extras.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in input {
        if !schema::is_modeled_key(key) {
            extras.insert(key.clone(), value.clone());
        }
    }
    extras
}

/// Resolve input for a full-record insert. Every canonical column appears
/// in the result, Null when none of its aliases were supplied.
pub fn resolve_for_insert(input: &Fields) -> Resolved {
    let mut columns = Fields::new();
    for column in schema::COLUMNS {
        let value = match lookup(input, column) {
            Some(value) => coerce(column.kind, value),
            None => Value::Null,
        };
        columns.insert(column.name.to_string(), value);
    }
    Resolved {
        columns,
        extras: collect_extras(input),
    }
}

/// Resolve input for a partial update. Columns with no alias present are
/// omitted entirely rather than set to Null, so the stored value survives.
pub fn resolve_for_update(input: &Fields) -> Resolved {
    let mut columns = Fields::new();
    for column in schema::COLUMNS {
        if let Some(value) = lookup(input, column) {
            columns.insert(column.name.to_string(), coerce(column.kind, value));
        }
    }
    Resolved {
        columns,
        extras: collect_extras(input),
    }
}

/// Build a complete stored record from an insert resolution.
pub fn into_record(id: i64, resolved: &Resolved) -> Fields {
    let mut record = Fields::new();
    record.insert(schema::ID_KEY.to_string(), Value::from(id));
    for (name, value) in &resolved.columns {
        record.insert(name.clone(), value.clone());
    }
    record.insert(
        schema::EXTRAS_KEY.to_string(),
        Value::Object(resolved.extras.clone()),
    );
    record
}

/// Merge an update resolution into a stored record: present columns
/// overwrite, extras merge per key, everything else is untouched. Shared by
/// all storage backends so partial-update semantics never diverge.
pub fn apply_update(stored: &mut Fields, resolved: &Resolved) {
    for (name, value) in &resolved.columns {
        stored.insert(name.clone(), value.clone());
    }
    if resolved.extras.is_empty() {
        return;
    }
    let extras = stored
        .entry(schema::EXTRAS_KEY.to_string())
        .or_insert_with(|| Value::Object(Fields::new()));
    if let Value::Object(map) = extras {
        for (key, value) in &resolved.extras {
            map.insert(key.clone(), value.clone());
        }
    } else {
        *extras = Value::Object(resolved.extras.clone());
    }
}
