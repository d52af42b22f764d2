// Word search engine: grid, placement and rendering

pub mod direction;
pub mod grid;

pub use direction::Direction;
pub use grid::{GridError, WordGrid, MAX_ATTEMPTS, UNFILLED};
