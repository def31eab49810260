//! Runtime configuration, read from the environment with local defaults.

/// Settings every front-end shares.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Base URL of the upstream API (`POKEAPI_BASE_URL`).
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://pokemon_scout.db".to_string()),
            api_base_url: std::env::var("POKEAPI_BASE_URL")
                .unwrap_or_else(|_| "https://pokeapi.co/api/v2".to_string()),
        }
    }
}
