use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Side length of generated grids
    pub grid_size: usize,
    pub preset_path: String,
    /// Preset words drawn when a request names none
    pub default_word_count: usize,
    /// How long a served puzzle is kept, in seconds
    pub puzzle_ttl_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            preset_path: "./preset.txt".to_string(),
            default_word_count: 10,
            puzzle_ttl_secs: 600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let defaults = GameConfig::default();
        let game = GameConfig {
            grid_size: env::var("GRID_SIZE")
                .unwrap_or_else(|_| defaults.grid_size.to_string())
                .parse()
                .context("GRID_SIZE must be a positive number")?,
            preset_path: env::var("PRESET_PATH")
                .unwrap_or(defaults.preset_path),
            default_word_count: env::var("DEFAULT_WORD_COUNT")
                .unwrap_or_else(|_| defaults.default_word_count.to_string())
                .parse()
                .context("DEFAULT_WORD_COUNT must be a number")?,
            puzzle_ttl_secs: env::var("PUZZLE_TTL_SECS")
                .unwrap_or_else(|_| defaults.puzzle_ttl_secs.to_string())
                .parse()
                .context("PUZZLE_TTL_SECS must be a number")?,
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GameConfig {
    pub fn puzzle_ttl(&self) -> Duration {
        Duration::from_secs(self.puzzle_ttl_secs)
    }
}
