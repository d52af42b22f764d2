use anyhow::{Context, Result};
use rand::Rng;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{config::GameConfig, game::WordGrid, words::WordList};

pub const OPTION_GENERATE: char = 'g';
pub const OPTION_PRINT: char = 'p';
pub const OPTION_SOLUTION: char = 's';
pub const OPTION_QUIT: char = 'q';

// Sub-prompt keys, only meaningful inside their own command
pub const SUBOPTION_LOAD: char = 'r';
pub const SUBOPTION_MANUAL: char = 'm';
pub const SUBOPTION_SAVE: char = 's';

const NO_PUZZLE: &str = "You have to generate a word search first.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Generate,
    Print,
    Solution,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("You provided an empty command. Please try it again.")]
    Empty,

    #[error("Given command ({0}) is not a valid command. Please try it again.")]
    Unknown(char),
}

impl MenuCommand {
    /// Parse a menu line; only its first character counts
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let key = first_key(line).ok_or(CommandError::Empty)?;
        match key {
            OPTION_GENERATE => Ok(MenuCommand::Generate),
            OPTION_PRINT => Ok(MenuCommand::Print),
            OPTION_SOLUTION => Ok(MenuCommand::Solution),
            OPTION_QUIT => Ok(MenuCommand::Quit),
            other => Err(CommandError::Unknown(other)),
        }
    }
}

fn first_key(line: &str) -> Option<char> {
    line.trim().chars().next().map(|c| c.to_ascii_lowercase())
}

/// Interactive menu for building, printing and saving a word search.
///
/// Reads one answer per line from `input` and writes prompts to `output`.
/// End of input ends the session the same way `q` does.
pub struct TerminalSession<R, W, G> {
    input: R,
    output: W,
    rng: G,
    config: GameConfig,
    presets: WordList,
    grid: Option<WordGrid>,
}

impl<R, W, G> TerminalSession<R, W, G>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: Rng,
{
    pub fn new(input: R, output: W, config: GameConfig, presets: WordList, rng: G) -> Self {
        Self {
            input,
            output,
            rng,
            config,
            presets,
            grid: None,
        }
    }

    /// The most recently generated grid, if any
    pub fn grid(&self) -> Option<&WordGrid> {
        self.grid.as_ref()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Terminal session started");

        loop {
            self.print_intro().await?;
            let Some(line) = self.read_line().await? else {
                break;
            };

            match MenuCommand::parse(&line) {
                Ok(MenuCommand::Generate) => self.generate().await?,
                Ok(MenuCommand::Print) => self.print().await?,
                Ok(MenuCommand::Solution) => self.show_solution().await?,
                Ok(MenuCommand::Quit) => break,
                Err(e) => self.say(&format!("{e}\n")).await?,
            }
        }

        tracing::info!("Terminal session finished");
        Ok(())
    }

    async fn print_intro(&mut self) -> Result<()> {
        self.say(&format!(
            "Welcome to the word search generator!\n\
             This program lets you generate your own search puzzle\n\
             Please select an option:\n\
             Generate a new word search ({OPTION_GENERATE})\n\
             Print out your word search ({OPTION_PRINT})\n\
             Show the solution to your word search ({OPTION_SOLUTION})\n\
             Quit the program ({OPTION_QUIT})\n"
        ))
        .await
    }

    /// Build a fresh grid from preset or typed-in words
    async fn generate(&mut self) -> Result<()> {
        let mut grid = match WordGrid::new(self.config.grid_size) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::error!("Cannot create grid: {}", e);
                return self.say(&format!("Cannot create a word search: {e}\n")).await;
            }
        };

        self.say("How many words do you need?\n").await?;
        let Some(line) = self.read_line().await? else {
            return Ok(());
        };
        let count: usize = match line.trim().parse() {
            Ok(count) => count,
            Err(_) => {
                return self
                    .say(&format!(
                        "Given count ({}) is not a number. Please try it again.\n",
                        line.trim()
                    ))
                    .await;
            }
        };
        // More words than cells can never all be hidden
        let max_count = grid.size() * grid.size();
        if count > max_count {
            return self
                .say(&format!(
                    "Given count ({count}) is more than this grid can hold ({max_count}). Please try it again.\n"
                ))
                .await;
        }

        self.say(&format!(
            "If you want to add random words ({SUBOPTION_LOAD})\n\
             If you want to manually add your words ({SUBOPTION_MANUAL})\n"
        ))
        .await?;
        let Some(line) = self.read_line().await? else {
            return Ok(());
        };

        let max_len = grid.max_word_length();
        let words = match first_key(&line) {
            Some(SUBOPTION_LOAD) => match self.presets.pick(count, max_len, &mut self.rng) {
                Ok(words) => words,
                Err(e) => {
                    tracing::warn!("Preset words unavailable: {}", e);
                    return self
                        .say(&format!("Failed to load preset words: {e}\n"))
                        .await;
                }
            },
            Some(SUBOPTION_MANUAL) => match self.read_manual_words(count, max_len).await? {
                Some(words) => words,
                None => return Ok(()),
            },
            Some(other) => return self.say(&format!("{}\n", CommandError::Unknown(other))).await,
            None => return self.say(&format!("{}\n", CommandError::Empty)).await,
        };

        let results = grid.place_words(&words, &mut self.rng);
        let missing: Vec<String> = results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .map(|e| {
                tracing::warn!("{}", e);
                e.to_string()
            })
            .collect();

        tracing::info!(
            "Generated {}x{} grid with {}/{} words placed",
            grid.size(),
            grid.size(),
            grid.placements().len(),
            words.len()
        );

        self.grid = Some(grid);
        self.say(&format!(
            "Placed {} of {} words.\n",
            words.len() - missing.len(),
            words.len()
        ))
        .await?;
        for reason in missing {
            self.say(&format!("  {reason}\n")).await?;
        }
        Ok(())
    }

    /// Prompt for `count` words; `None` if input ends first
    async fn read_manual_words(&mut self, count: usize, max_len: usize) -> Result<Option<Vec<String>>> {
        let mut words = Vec::new();

        while words.len() < count {
            self.say(&format!("Please input your next word. Index: {}\n", words.len() + 1))
                .await?;
            let Some(line) = self.read_line().await? else {
                return Ok(None);
            };

            // No spaces inside a word
            let word: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            if word.is_empty() {
                self.say("An empty word cannot be hidden. Please retry\n").await?;
            } else if word.chars().count() > max_len {
                self.say("Given word is too long to be fit in the game. Please retry\n")
                    .await?;
            } else {
                words.push(word);
            }
        }

        Ok(Some(words))
    }

    /// Show the puzzle, or save it to a file
    async fn print(&mut self) -> Result<()> {
        if self.grid.is_none() {
            return self.say(NO_PUZZLE).await;
        }

        self.say(&format!(
            "Press ({SUBOPTION_SAVE}) to save or press any keys to continue\n"
        ))
        .await?;
        let choice = self.read_line().await?.unwrap_or_default();

        let puzzle = match &self.grid {
            Some(grid) => grid.puzzle(&mut self.rng),
            None => return Ok(()),
        };

        if first_key(&choice) != Some(SUBOPTION_SAVE) {
            return self.say(&puzzle).await;
        }

        self.say("Please input the filename to be saved as\n").await?;
        let Some(line) = self.read_line().await? else {
            return Ok(());
        };
        let file_name = line.trim();
        if file_name.is_empty() {
            return self.say("No filename given, nothing was saved.\n").await;
        }

        match tokio::fs::write(file_name, &puzzle).await {
            Ok(()) => {
                tracing::info!("Saved puzzle to {}", file_name);
                self.say(&format!("Saved puzzle to {file_name}\n")).await
            }
            Err(e) => {
                tracing::error!("Failed to save puzzle to {}: {}", file_name, e);
                self.say(&format!("Failed to save {file_name}: {e}\n")).await
            }
        }
    }

    async fn show_solution(&mut self) -> Result<()> {
        let solution = match &self.grid {
            Some(grid) => grid.solution(),
            None => NO_PUZZLE.to_string(),
        };
        self.say(&solution).await
    }

    /// Next input line without its line ending; `None` at end of input
    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .await
            .context("failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .await
            .context("failed to write to terminal")?;
        self.output.flush().await.context("failed to flush terminal")
    }
}
