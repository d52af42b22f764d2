use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint, with the number of puzzles held in memory
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "word-search-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "puzzles": state.puzzles.len()
    }))
}
