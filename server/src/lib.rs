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

//! Charsheet Server Library
//!
//! This library provides the core functionality for the Charsheet HTTP
//! service: configuration, the storage backends and their boot-time schema
//! reconciliation, and the character REST routes.

pub mod config;
pub mod context;
pub mod error;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use context::ServerContext;
pub use error::{ApiError, StoreError};
pub use store::{CharacterStore, JsonFileStore, MemoryStore, SqliteStore};
