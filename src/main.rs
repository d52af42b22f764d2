mod config;
mod game;
mod models;
mod routes;
mod terminal;
mod utils;
mod words;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use config::Config;
use dashmap::DashMap;
use game::WordGrid;
use models::PlacementReport;
use terminal::TerminalSession;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use words::WordList;

/// How often expired puzzles are swept from memory
pub const PUZZLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// Front end selected by the first command-line argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive menu on stdin/stdout
    Play,
    /// HTTP API
    Serve,
}

impl Mode {
    pub fn from_arg(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("play") => Ok(Mode::Play),
            Some("serve") => Ok(Mode::Serve),
            Some(other) => anyhow::bail!("unknown mode '{}', expected 'play' or 'serve'", other),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub presets: WordList,
    pub puzzles: DashMap<Uuid, PuzzleSession>,
}

/// A generated puzzle kept in memory for later rendering.
/// The grid is finished before it is stored and only read afterwards.
pub struct PuzzleSession {
    pub puzzle_id: Uuid,
    pub grid: WordGrid,
    pub placements: Vec<PlacementReport>,
    pub created_at: DateTime<Utc>,
}

impl PuzzleSession {
    pub fn new(grid: WordGrid, placements: Vec<PlacementReport>) -> Self {
        Self {
            puzzle_id: Uuid::new_v4(),
            grid,
            placements,
            created_at: Utc::now(),
        }
    }

    /// True once the session has outlived `ttl`
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at)
            .to_std()
            .map(|age| age > ttl)
            .unwrap_or(false)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout belongs to the terminal menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_search_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mode = Mode::from_arg(std::env::args().nth(1).as_deref())?;
    tracing::info!("Starting word search backend in {:?} mode...", mode);

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load preset words
    let presets = match WordList::load(&config.game.preset_path).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("{:#}. Random word generation is unavailable.", e);
            tracing::warn!(
                "Put a newline-separated word list at {} to enable it",
                config.game.preset_path
            );
            WordList::empty()
        }
    };

    match mode {
        Mode::Play => play(config, presets).await,
        Mode::Serve => serve(config, presets).await,
    }
}

async fn play(config: Config, presets: WordList) -> Result<()> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = TerminalSession::new(
        input,
        tokio::io::stdout(),
        config.game,
        presets,
        rand::rng(),
    );
    session.run().await
}

async fn serve(config: Config, presets: WordList) -> Result<()> {
    let addr = config.server_addr();
    let state = Arc::new(AppState {
        config,
        presets,
        puzzles: DashMap::new(),
    });

    // Spawn background task to drop expired puzzles
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        puzzle_cleanup_task(cleanup_state).await;
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Puzzles: http://{}/api/puzzles", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically removes puzzles older than the configured TTL
async fn puzzle_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(PUZZLE_CLEANUP_INTERVAL);
    let ttl = state.config.game.puzzle_ttl();

    loop {
        interval.tick().await;
        let removed = remove_expired(&state.puzzles, ttl, Utc::now());
        if removed > 0 {
            tracing::info!("Removed {} expired puzzle(s)", removed);
        }
    }
}

/// Drop every session older than `ttl`, returning how many went
fn remove_expired(puzzles: &DashMap<Uuid, PuzzleSession>, ttl: Duration, now: DateTime<Utc>) -> usize {
    let before = puzzles.len();
    puzzles.retain(|_, session| !session.is_expired(ttl, now));
    before - puzzles.len()
}
