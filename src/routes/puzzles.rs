use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    game::WordGrid,
    models::{CreatePuzzleRequest, PlacementReport, PuzzleCreated, PuzzleView, SolutionView},
    AppState, PuzzleSession,
};

/// Largest grid the API will build
pub const MAX_API_GRID_SIZE: usize = 100;

/// Most words a single request may hide, given or drawn
pub const MAX_API_WORD_COUNT: usize = 200;

/// Build a puzzle from the given words, or from random preset words
pub async fn create_puzzle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePuzzleRequest>,
) -> Result<(StatusCode, Json<PuzzleCreated>), StatusCode> {
    let size = payload.size.unwrap_or(state.config.game.grid_size);
    if size > MAX_API_GRID_SIZE {
        tracing::warn!("Rejected puzzle of size {} (limit {})", size, MAX_API_GRID_SIZE);
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut grid = WordGrid::new(size).map_err(|e| {
        tracing::warn!("Rejected puzzle request: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let requested = payload
        .words
        .as_ref()
        .map_or_else(|| payload.count.unwrap_or(state.config.game.default_word_count), Vec::len);
    if requested > MAX_API_WORD_COUNT {
        tracing::warn!("Rejected request for {} words (limit {})", requested, MAX_API_WORD_COUNT);
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut rng = rand::rng();
    let words = match payload.words {
        Some(words) => clean_words(words).ok_or_else(|| {
            tracing::warn!("Rejected puzzle request with an empty word");
            StatusCode::BAD_REQUEST
        })?,
        None => state
            .presets
            .pick(requested, grid.max_word_length(), &mut rng)
            .map_err(|e| {
                tracing::warn!("Cannot draw preset words: {}", e);
                StatusCode::UNPROCESSABLE_ENTITY
            })?,
    };

    let results = grid.place_words(&words, &mut rng);
    let placements: Vec<PlacementReport> = words
        .iter()
        .zip(&results)
        .map(|(word, result)| PlacementReport::new(word, result))
        .collect();

    let session = PuzzleSession::new(grid, placements);
    let response = PuzzleCreated {
        puzzle_id: session.puzzle_id,
        size: session.grid.size(),
        max_word_length: session.grid.max_word_length(),
        placements: session.placements.clone(),
        puzzle: session.grid.puzzle(&mut rng),
        created_at: session.created_at,
    };

    tracing::info!(
        "Created puzzle {} ({}x{}, {}/{} words placed)",
        session.puzzle_id,
        size,
        size,
        session.grid.placements().len(),
        words.len()
    );
    state.puzzles.insert(session.puzzle_id, session);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Strip whitespace from each word; `None` if any word ends up empty
fn clean_words(words: Vec<String>) -> Option<Vec<String>> {
    words
        .into_iter()
        .map(|word| {
            let word: String = word.chars().filter(|c| !c.is_whitespace()).collect();
            (!word.is_empty()).then_some(word)
        })
        .collect()
}

/// Render the puzzle view again; filler letters change on every call
pub async fn get_puzzle(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<Json<PuzzleView>, StatusCode> {
    let session = state.puzzles.get(&puzzle_id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(PuzzleView {
        puzzle_id,
        puzzle: session.grid.puzzle(&mut rand::rng()),
    }))
}

pub async fn get_solution(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<Json<SolutionView>, StatusCode> {
    let session = state.puzzles.get(&puzzle_id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(SolutionView {
        puzzle_id,
        solution: session.grid.solution(),
        placements: session.placements.clone(),
    }))
}

pub async fn delete_puzzle(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> StatusCode {
    match state.puzzles.remove(&puzzle_id) {
        Some(_) => {
            tracing::info!("Deleted puzzle {}", puzzle_id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
