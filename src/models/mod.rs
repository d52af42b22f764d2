pub mod puzzle;

pub use puzzle::{
    // Engine types
    Placement, Position,
    // HTTP payloads
    CreatePuzzleRequest, PlacementReport, PuzzleCreated, PuzzleView, SolutionView,
};
