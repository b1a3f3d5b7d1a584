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

use charsheet_server::config::{Arguments, Configuration, StorageBackend};
use charsheet_server::context::ServerContext;
use charsheet_server::routes;
use charsheet_server::store::{CharacterStore, JsonFileStore, MemoryStore, SqliteStore};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        // Try default .env file
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution,
    // falling back to defaults when no file is present
    let config: Configuration = if std::path::Path::new(&arguments.config_file).exists() {
        Configuration::load(&arguments.config_file)
            .inspect_err(|err| eprintln!("Configuration load error: {}", err))
            .expect("Unable to load configuration file")
    } else {
        info!(
            "No configuration file at {}, using defaults",
            arguments.config_file
        );
        Configuration::default()
    };

    debug!("Configuration loaded: {:?}", config);
    info!("Starting Charsheet Server...");

    // Attach the configured storage backend. For SQLite the schema is
    // reconciled before any request is served; a missing base table is
    // fatal since every character route depends on it.
    let store: Arc<dyn CharacterStore> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage (state is lost on restart)");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Json => {
            let path = config.storage.path_or_default();
            info!("Using JSON file storage at {}", path);
            Arc::new(JsonFileStore::new(path))
        }
        StorageBackend::Sqlite => {
            let path = config.storage.path_or_default();
            info!("Opening SQLite database at {}", path);
            let store = SqliteStore::open(&path)
                .await
                .expect("Failed to open and reconcile the character database");
            Arc::new(store)
        }
    };

    // Create server context and build the application routes
    let context = ServerContext::new(store);
    let app = routes::router(context);

    let listener = tokio::net::TcpListener::bind(config.http.addr.to_addr())
        .await
        .expect("Unable to bind to the HTTP port");

    info!(
        "HTTP Server listening on {} ({}:{})",
        config.http.addr,
        config.http.addr.to_ip(),
        config.http.addr.to_port()
    );

    axum::serve(listener, app).await.expect("HTTP server failed");
}
