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

//! Charsheet Common Types and Logic
//!
//! This crate defines the parts of Charsheet shared between the server and
//! any future tooling:
//! - The canonical column set of a character sheet
//! - Alias-aware field resolution and type coercion
//! - The random character generator

pub mod generator;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use resolver::{Fields, Resolved};
pub use schema::{Column, ColumnKind};
