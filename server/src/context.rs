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

use crate::store::CharacterStore;
use std::sync::Arc;

/// Server context containing shared resources
#[derive(Clone)]
pub struct ServerContext {
    /// Storage backend serving all character routes
    pub store: Arc<dyn CharacterStore>,
}

impl ServerContext {
    /// Create a new server context
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }

    /// Get the character store
    pub fn store(&self) -> &Arc<dyn CharacterStore> {
        &self.store
    }
}
