use rand::Rng;
use thiserror::Error;

use crate::{
    game::Direction,
    models::{Placement, Position},
    utils::letters::random_letter,
};

/// Marker shown in the solution view for cells no word passes through
pub const UNFILLED: char = 'X';

/// Random placements tried per word before giving up on it
pub const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size must be greater than zero (got {0})")]
    InvalidSize(usize),

    #[error("word \"{word}\" has {len} letters, the limit for this grid is {max}")]
    WordTooLong { word: String, len: usize, max: usize },

    #[error("could not place \"{word}\" after {attempts} attempts")]
    PlacementFailed { word: String, attempts: usize },
}

/// Square letter grid that hides words along straight lines.
///
/// A grid is owned by a single caller. Placement mutates it in place and the
/// render methods only read it; there is no way to remove a word again.
#[derive(Debug, Clone)]
pub struct WordGrid {
    size: usize,
    max_word_length: usize,
    cells: Vec<Vec<Option<char>>>,
    placements: Vec<Placement>,
}

impl WordGrid {
    /// Create an empty `size` x `size` grid
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::InvalidSize(size));
        }

        // Length of the diagonal, floor(sqrt(2 * size^2))
        let max_word_length = ((2 * size * size) as f64).sqrt() as usize;

        Ok(Self {
            size,
            max_word_length,
            cells: vec![vec![None; size]; size],
            placements: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Longest word accepted for placement
    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    /// Letter at `pos`, or `None` if the cell is unfilled or out of bounds
    pub fn cell(&self, pos: Position) -> Option<char> {
        self.cells.get(pos.row)?.get(pos.col).copied().flatten()
    }

    /// Words placed so far, in placement order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Place every word in order, each independently of the others.
    ///
    /// Returns one result per input word. A word that is too long or that
    /// finds no free slot is reported and skipped; the rest still get placed.
    pub fn place_words<S: AsRef<str>>(
        &mut self,
        words: &[S],
        rng: &mut impl Rng,
    ) -> Vec<Result<Placement, GridError>> {
        words
            .iter()
            .map(|word| self.place_word(word.as_ref(), rng))
            .collect()
    }

    /// Hide a single word, trying up to [`MAX_ATTEMPTS`] random slots
    pub fn place_word(&mut self, word: &str, rng: &mut impl Rng) -> Result<Placement, GridError> {
        let word = word.to_uppercase();
        let len = word.chars().count();
        if len > self.max_word_length {
            return Err(GridError::WordTooLong {
                word,
                len,
                max: self.max_word_length,
            });
        }

        for attempt in 1..=MAX_ATTEMPTS {
            let direction = Direction::random(rng);
            let start = Position {
                row: rng.random_range(0..self.size),
                col: rng.random_range(0..self.size),
            };

            if let Some(placement) = self.try_place(&word, start, direction) {
                tracing::debug!(
                    "Placed {} at ({}, {}) going {:?} on attempt {}",
                    placement.word,
                    start.row,
                    start.col,
                    direction,
                    attempt
                );
                return Ok(placement);
            }
        }

        tracing::debug!("Gave up on {} after {} attempts", word, MAX_ATTEMPTS);
        Err(GridError::PlacementFailed {
            word,
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Write `word` from `start` along `direction` if it fits.
    ///
    /// The word must stay on the grid and may only cross cells that are
    /// unfilled or already hold the same letter. Nothing is written otherwise.
    pub fn try_place(
        &mut self,
        word: &str,
        start: Position,
        direction: Direction,
    ) -> Option<Placement> {
        let word = word.to_uppercase();
        let targets = self.fit(&word, start, direction)?;

        for (pos, letter) in targets.into_iter().zip(word.chars()) {
            self.cells[pos.row][pos.col] = Some(letter);
        }

        let placement = Placement {
            word,
            start,
            direction,
        };
        self.placements.push(placement.clone());
        Some(placement)
    }

    /// Cells the word would occupy, or `None` on a bounds or letter clash
    fn fit(&self, word: &str, start: Position, direction: Direction) -> Option<Vec<Position>> {
        let (dr, dc) = direction.delta();
        let mut targets = Vec::with_capacity(word.len());

        for (i, letter) in word.chars().enumerate() {
            let row = start.row.checked_add_signed(dr * i as isize)?;
            let col = start.col.checked_add_signed(dc * i as isize)?;
            if row >= self.size || col >= self.size {
                return None;
            }

            match self.cells[row][col] {
                Some(existing) if existing != letter => return None,
                _ => targets.push(Position { row, col }),
            }
        }

        Some(targets)
    }

    /// Puzzle view: unfilled cells get a fresh random letter on every call
    pub fn puzzle(&self, rng: &mut impl Rng) -> String {
        self.render(|cell| cell.unwrap_or_else(|| random_letter(rng)))
    }

    /// Solution view: unfilled cells show [`UNFILLED`]
    pub fn solution(&self) -> String {
        self.render(|cell| cell.unwrap_or(UNFILLED))
    }

    fn render(&self, mut show: impl FnMut(Option<char>) -> char) -> String {
        // Each row is `size` letters plus separators and a newline
        let mut out = String::with_capacity(self.size * self.size * 2);
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    out.push(' ');
                }
                out.push(show(*cell));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Split a rendered grid back into rows of single-letter tokens
    fn parse(rendered: &str) -> Vec<Vec<char>> {
        rendered
            .lines()
            .map(|line| {
                line.split(' ')
                    .map(|token| {
                        assert_eq!(token.chars().count(), 1, "token '{}' is not one letter", token);
                        token.chars().next().unwrap()
                    })
                    .collect()
            })
            .collect()
    }

    fn read_back(solution: &[Vec<char>], placement: &Placement) -> String {
        placement
            .cells()
            .map(|pos| solution[pos.row][pos.col])
            .collect()
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(WordGrid::new(0).unwrap_err(), GridError::InvalidSize(0));
    }

    #[test]
    fn test_new_grid_is_unfilled() {
        for size in 1..=12 {
            let grid = WordGrid::new(size).unwrap();
            let rows = parse(&grid.solution());
            assert_eq!(rows.len(), size);
            assert!(rows.iter().all(|row| row.len() == size));
            assert!(rows.iter().flatten().all(|&c| c == UNFILLED));
            assert!(grid.placements().is_empty());
        }
    }

    #[test]
    fn test_max_word_length_is_diagonal() {
        let expected = [(1, 1), (2, 2), (3, 4), (5, 7), (10, 14), (20, 28)];
        for (size, max) in expected {
            assert_eq!(WordGrid::new(size).unwrap().max_word_length(), max, "size {}", size);
        }
        for size in 1..=50 {
            let grid = WordGrid::new(size).unwrap();
            let diagonal = (size as f64 * std::f64::consts::SQRT_2).floor() as usize;
            assert_eq!(grid.max_word_length(), diagonal, "size {}", size);
        }
    }

    #[test]
    fn test_cat_on_five_by_five() {
        let mut grid = WordGrid::new(5).unwrap();
        let results = grid.place_words(&["CAT"], &mut rng());
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());

        let rows = parse(&grid.solution());
        let mut found = false;
        for row in 0..5 {
            for col in 0..5 {
                for direction in Direction::ALL {
                    let (dr, dc) = direction.delta();
                    let word: Option<String> = (0..3)
                        .map(|i| {
                            let r = row as isize + dr * i;
                            let c = col as isize + dc * i;
                            if (0..5).contains(&r) && (0..5).contains(&c) {
                                Some(rows[r as usize][c as usize])
                            } else {
                                None
                            }
                        })
                        .collect();
                    found |= word.as_deref() == Some("CAT");
                }
            }
        }
        assert!(found, "CAT not readable in:\n{}", grid.solution());

        let filled = rows.iter().flatten().filter(|&&c| c != UNFILLED).count();
        assert_eq!(filled, 3, "only the three letters of CAT are filled");
    }

    #[test]
    fn test_words_are_uppercased() {
        let mut grid = WordGrid::new(6).unwrap();
        let placement = grid.place_word("dog", &mut rng()).unwrap();
        assert_eq!(placement.word, "DOG");
        assert!(placement.cells().all(|pos| grid.cell(pos).is_some()));
    }

    #[test]
    fn test_placed_words_read_back_from_solution() {
        let words = [
            "rust", "cargo", "borrow", "trait", "lifetime", "closure", "macro", "tokio",
            "serde", "crate", "module", "enum", "struct", "match", "slice",
        ];
        let mut grid = WordGrid::new(15).unwrap();
        let results = grid.place_words(&words, &mut rng());
        assert_eq!(results.len(), words.len());

        let solution = parse(&grid.solution());
        let placed: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert!(!placed.is_empty());
        assert_eq!(placed.len(), grid.placements().len());

        // Reading back every word also proves shared cells agree
        for placement in placed {
            assert_eq!(read_back(&solution, placement), placement.word);
        }
    }

    #[test]
    fn test_crossing_requires_matching_letter() {
        let mut grid = WordGrid::new(5).unwrap();
        let origin = Position { row: 0, col: 0 };

        assert!(grid.try_place("CAT", origin, Direction::Right).is_some());
        assert!(grid.try_place("CAR", origin, Direction::Down).is_some());
        assert!(grid.try_place("DOG", origin, Direction::DownRight).is_none());
        assert!(grid.try_place("TEN", Position { row: 0, col: 2 }, Direction::Down).is_some());
        assert!(grid.try_place("AXE", Position { row: 0, col: 1 }, Direction::Down).is_some());
        assert!(grid.try_place("BOX", Position { row: 1, col: 1 }, Direction::Left).is_none());

        assert_eq!(grid.cell(origin), Some('C'));
        assert_eq!(grid.cell(Position { row: 2, col: 1 }), Some('E'));
        assert_eq!(grid.placements().len(), 4);
    }

    #[test]
    fn test_out_of_bounds_slot_leaves_grid_untouched() {
        let mut grid = WordGrid::new(4).unwrap();
        let before = grid.solution();
        assert!(grid.try_place("HOUSE", Position { row: 0, col: 0 }, Direction::Right).is_none());
        assert!(grid.try_place("OWL", Position { row: 1, col: 1 }, Direction::UpLeft).is_none());
        assert!(grid.try_place("OWL", Position { row: 3, col: 2 }, Direction::Down).is_none());
        assert_eq!(grid.solution(), before);
        assert!(grid.placements().is_empty());
    }

    #[test]
    fn test_max_length_word_fits_small_diagonal() {
        for size in [1, 2] {
            let mut grid = WordGrid::new(size).unwrap();
            let word: String = "AB".chars().take(grid.max_word_length()).collect();
            assert!(grid.place_word(&word, &mut rng()).is_ok(), "size {}", size);
        }

        let mut grid = WordGrid::new(2).unwrap();
        let diagonal = grid.try_place("AB", Position { row: 0, col: 0 }, Direction::DownRight);
        assert!(diagonal.is_some());
    }

    #[test]
    fn test_word_longer_than_max_is_rejected_up_front() {
        let mut grid = WordGrid::new(5).unwrap();
        let err = grid.place_word("ABCDEFGH", &mut rng()).unwrap_err();
        assert_eq!(
            err,
            GridError::WordTooLong {
                word: "ABCDEFGH".to_string(),
                len: 8,
                max: 7
            }
        );
        assert_eq!(grid.solution(), WordGrid::new(5).unwrap().solution());
    }

    #[test]
    fn test_word_longer_than_side_fails_after_attempts() {
        // Seven letters pass the length check on a 5x5 grid but fit no line
        let mut grid = WordGrid::new(5).unwrap();
        let err = grid.place_word("ABCDEFG", &mut rng()).unwrap_err();
        assert_eq!(
            err,
            GridError::PlacementFailed {
                word: "ABCDEFG".to_string(),
                attempts: MAX_ATTEMPTS
            }
        );
    }

    #[test]
    fn test_crowded_grid_reports_failures_and_continues() {
        let mut grid = WordGrid::new(3).unwrap();
        let words = ["ABC", "DEF", "GHI", "JKL", "MNO", "PQR"];
        let results = grid.place_words(&words, &mut rng());

        assert_eq!(results.len(), words.len());
        let failed = results
            .iter()
            .filter(|r| matches!(r, Err(GridError::PlacementFailed { .. })))
            .count();
        assert!(failed >= 1, "a 3x3 grid cannot hold six disjoint words");

        let solution = parse(&grid.solution());
        for placement in grid.placements() {
            assert_eq!(read_back(&solution, placement), placement.word);
        }
    }

    #[test]
    fn test_render_format() {
        let mut grid = WordGrid::new(4).unwrap();
        grid.place_words(&["SUN", "MOON"], &mut rng());

        for rendered in [grid.solution(), grid.puzzle(&mut rng())] {
            assert!(rendered.ends_with('\n'));
            let lines: Vec<&str> = rendered.split_terminator('\n').collect();
            assert_eq!(lines.len(), 4);
            for line in lines {
                assert_eq!(line.len(), 7, "line '{}' should be 4 letters and 3 spaces", line);
                assert!(!line.ends_with(' '));
            }
        }
    }

    #[test]
    fn test_solution_is_stable() {
        let mut grid = WordGrid::new(8).unwrap();
        grid.place_words(&["APPLE", "PEAR", "PLUM"], &mut rng());
        assert_eq!(grid.solution(), grid.solution());
    }

    #[test]
    fn test_puzzle_varies_only_on_unfilled_cells() {
        let mut grid = WordGrid::new(10).unwrap();
        grid.place_words(&["ORANGE", "LEMON", "LIME"], &mut rng());

        let mut render_rng = StdRng::seed_from_u64(7);
        let first = parse(&grid.puzzle(&mut render_rng));
        let second = parse(&grid.puzzle(&mut render_rng));
        assert_ne!(first, second, "fresh fill is drawn on every render");

        for row in 0..10 {
            for col in 0..10 {
                let pos = Position { row, col };
                match grid.cell(pos) {
                    Some(letter) => {
                        assert_eq!(first[row][col], letter);
                        assert_eq!(second[row][col], letter);
                    }
                    None => {
                        assert!(first[row][col].is_ascii_uppercase());
                        assert!(second[row][col].is_ascii_uppercase());
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let words = ["NORTH", "SOUTH", "EAST", "WEST"];
        let mut a = WordGrid::new(9).unwrap();
        let mut b = WordGrid::new(9).unwrap();
        a.place_words(&words, &mut StdRng::seed_from_u64(99));
        b.place_words(&words, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.solution(), b.solution());
        assert_eq!(a.placements(), b.placements());
    }

    #[test]
    fn test_cell_out_of_bounds_is_none() {
        let grid = WordGrid::new(3).unwrap();
        assert_eq!(grid.cell(Position { row: 3, col: 0 }), None);
        assert_eq!(grid.cell(Position { row: 0, col: 9 }), None);
    }
}
