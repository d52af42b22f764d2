use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Direction, GridError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// A word committed to the grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub start: Position,
    pub direction: Direction,
}

impl Placement {
    /// Cells occupied by the word, first letter first
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let (dr, dc) = self.direction.delta();
        (0..self.word.chars().count() as isize).map(move |i| Position {
            row: (self.start.row as isize + i * dr) as usize,
            col: (self.start.col as isize + i * dc) as usize,
        })
    }
}

/// Outcome of placing one requested word, as reported to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementReport {
    pub word: String,
    pub placed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlacementReport {
    pub fn new(word: &str, result: &Result<Placement, GridError>) -> Self {
        match result {
            Ok(placement) => Self {
                word: placement.word.clone(),
                placed: true,
                start: Some(placement.start),
                direction: Some(placement.direction),
                error: None,
            },
            Err(e) => Self {
                word: word.to_uppercase(),
                placed: false,
                start: None,
                direction: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePuzzleRequest {
    /// Side length; falls back to the configured grid size
    pub size: Option<usize>,
    /// Words to hide; when absent, random preset words are drawn
    pub words: Option<Vec<String>>,
    /// Number of preset words to draw when `words` is absent
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleCreated {
    pub puzzle_id: Uuid,
    pub size: usize,
    pub max_word_length: usize,
    pub placements: Vec<PlacementReport>,
    pub puzzle: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleView {
    pub puzzle_id: Uuid,
    pub puzzle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionView {
    pub puzzle_id: Uuid,
    pub solution: String,
    pub placements: Vec<PlacementReport>,
}
