//! Game core: generation history, advancement, and termination
//! classification.
//!
//! A [`Game`] owns the current generation and an append-only history of
//! every generation computed so far (index 0 is the initial board).
//! [`Game::advance`] evaluates every cell's rule against the *old*
//! generation, so the transition is order-independent; the result is
//! appended to history and classified as continuing, stable, or
//! extinct.
//!
//! Game over is sticky: once tripped, further [`Game::advance`] calls
//! fail fast with [`GameError::AlreadyOver`] rather than silently
//! continuing.

use std::fmt;

use serde::{Deserialize, Serialize};
use torus_grid::{Generation, GridError, RuleCache, RuleError, Unit};
use tracing::debug;

/// Why a simulation reached its terminal state.
///
/// The `Display` text of each variant is a compatibility contract
/// verified by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// No alive cells remain.
    ZeroPopulation,
    /// The new generation is cell-by-cell identical to the one
    /// immediately before it. Only the one-step-back generation is
    /// compared, so oscillators with period two or more are never
    /// flagged and run forever.
    StableState,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPopulation => f.write_str("The game came to zero population"),
            Self::StableState => f.write_str("The game came to a stable state"),
        }
    }
}

/// Errors from game operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A board operation failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },

    /// A rule lookup failed.
    #[error("rule error: {source}")]
    Rule {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },

    /// [`Game::advance`] was called after game over was signaled.
    #[error("game is already over: {reason}")]
    AlreadyOver {
        /// The reason recorded when the game ended.
        reason: GameOverReason,
    },
}

/// Classification of a freshly computed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The simulation continues.
    Continuing,
    /// The simulation reached a terminal condition.
    GameOver(GameOverReason),
}

/// Summary of one successful [`Game::advance`] call.
#[derive(Debug, Clone)]
pub struct Advance {
    /// 1-based index of the new generation in history.
    pub number: u64,
    /// Snapshot of the new generation.
    pub generation: Generation,
    /// Classification of the new generation.
    pub outcome: Outcome,
}

/// The simulation: current generation plus append-only history.
///
/// Internally the current generation is held apart from the past ones
/// so it can be edited in place before the simulation starts; the
/// conceptual history is `past ++ [current]`, with the invariant that
/// the last history entry is always the current generation.
#[derive(Debug, Clone)]
pub struct Game {
    past: Vec<Generation>,
    current: Generation,
    rules: RuleCache,
    game_over: Option<GameOverReason>,
}

impl Game {
    /// Create a game over a fresh all-dead board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Grid`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GameError> {
        Ok(Self::from_generation(Generation::new(width, height)?))
    }

    /// Create a game over a pre-seeded initial board.
    pub fn from_generation(generation: Generation) -> Self {
        Self {
            past: Vec::new(),
            current: generation,
            rules: RuleCache::new(),
            game_over: None,
        }
    }

    /// The current (newest) generation.
    pub const fn current(&self) -> &Generation {
        &self.current
    }

    /// Number of generations in history, including the current one.
    pub fn history_len(&self) -> u64 {
        u64::try_from(self.past.len())
            .unwrap_or(u64::MAX)
            .saturating_add(1)
    }

    /// Index of the current generation in history (0 for the initial
    /// board, incremented by one per advance).
    pub fn generation_number(&self) -> u64 {
        u64::try_from(self.past.len()).unwrap_or(u64::MAX)
    }

    /// Iterate the full history oldest-first, ending with the current
    /// generation.
    pub fn history(&self) -> impl Iterator<Item = &Generation> {
        self.past.iter().chain(std::iter::once(&self.current))
    }

    /// The stored generation at a history index, if it exists.
    ///
    /// Index `generation_number()` resolves to the current generation.
    pub fn generation_at(&self, number: u64) -> Option<&Generation> {
        let index = usize::try_from(number).ok()?;
        if index == self.past.len() {
            Some(&self.current)
        } else {
            self.past.get(index)
        }
    }

    /// The recorded game-over reason, if the game has ended.
    pub const fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    /// Flip a cell on the live current generation and return the
    /// post-toggle unit.
    ///
    /// This is the pre-simulation editing path; it mutates the board
    /// that is conceptually `history[0]` while nothing has been
    /// computed yet.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Grid`] if the coordinate is outside the
    /// board.
    pub fn toggle_unit(&mut self, x: u32, y: u32) -> Result<Unit, GameError> {
        Ok(self.current.toggle(x, y)?)
    }

    /// Compute the next generation from the current one.
    ///
    /// Every unit's rule is resolved through the rule cache by state
    /// name and evaluated against the generation being replaced, so the
    /// result is independent of evaluation order. The new generation is
    /// appended to history and becomes current regardless of the
    /// classification:
    ///
    /// - population 0 -> game over, [`GameOverReason::ZeroPopulation`]
    /// - identical to the immediately preceding generation -> game
    ///   over, [`GameOverReason::StableState`]
    /// - otherwise continuing
    ///
    /// # Errors
    ///
    /// Returns [`GameError::AlreadyOver`] once game over has been
    /// signaled; game over is sticky.
    pub fn advance(&mut self) -> Result<Advance, GameError> {
        if let Some(reason) = self.game_over {
            return Err(GameError::AlreadyOver { reason });
        }

        let next = self.step()?;
        let stable = next == self.current;
        let population = next.population();

        let previous = std::mem::replace(&mut self.current, next);
        self.past.push(previous);

        let outcome = if population == 0 {
            self.game_over = Some(GameOverReason::ZeroPopulation);
            Outcome::GameOver(GameOverReason::ZeroPopulation)
        } else if stable {
            self.game_over = Some(GameOverReason::StableState);
            Outcome::GameOver(GameOverReason::StableState)
        } else {
            Outcome::Continuing
        };

        let number = self.generation_number();
        debug!(number, population, outcome = ?outcome, "generation advanced");

        Ok(Advance {
            number,
            generation: self.current.clone(),
            outcome,
        })
    }

    /// Evaluate every cell of the current generation and build the next
    /// one. Pure with respect to `self.current`.
    fn step(&self) -> Result<Generation, GameError> {
        let mut next = Generation::new(self.current.width(), self.current.height())?;
        for unit in self.current.units() {
            let rule = self.rules.get(unit.state.name())?;
            next.add(rule(unit, &self.current)?)?;
        }
        Ok(next)
    }
}
