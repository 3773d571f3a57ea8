#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use analysis::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use player::*;
pub use questions::*;
pub use registry::*;
pub use tile::*;
pub use types::*;

mod analysis;
mod engine;
mod error;
mod grid;
mod player;
mod questions;
mod registry;
mod tile;
mod types;

/// Scoring, chance, and timing rules of a board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub single_points: u32,
    pub round_points: u32,
    pub bonus_points: u32,
    /// Misses on one cell before it is forfeited.
    pub max_chances: u8,
    pub result_display_secs: f64,
    pub scramble_secs: f64,
    pub scramble_step_secs: f64,
}

impl Rules {
    pub const fn points(&self, win_type: WinType, bonus: bool) -> u32 {
        let base = match win_type {
            WinType::Single => self.single_points,
            WinType::Round => self.round_points,
        };
        if bonus {
            base.saturating_add(self.bonus_points)
        } else {
            base
        }
    }

    pub(crate) const fn chances(&self) -> u8 {
        if self.max_chances == 0 {
            1
        } else {
            self.max_chances
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            single_points: 50,
            round_points: 500,
            bonus_points: 25,
            max_chances: 2,
            result_display_secs: 1.5,
            scramble_secs: 2.0,
            scramble_step_secs: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: Rules,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub excluded_letters: Vec<char>,
}

impl GameConfig {
    pub fn alphabet(&self) -> Alphabet {
        Alphabet::english(&self.excluded_letters)
    }

    pub fn question_filter(&self, letter: char) -> QuestionFilter {
        QuestionFilter {
            letter: Some(letter),
            category: self.category.clone(),
            difficulty: self.difficulty,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            category: None,
            difficulty: None,
            excluded_letters: Alphabet::DEFAULT_EXCLUDED.to_vec(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    QuestionPosed,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::QuestionPosed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// What happened to the contested cell once its result was shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Claimed,
    /// The claim completed a spanning path.
    Won,
    /// Missed once; the cell stays contested and carries a bonus.
    BonusOffered,
    Forfeited,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    NoChange,
    Scrambled,
    PhaseChanged(BoardPhase),
    QuestionPosed,
    Answered(AnswerOutcome),
    Resolved(Resolution),
}

impl UpdateOutcome {
    pub const fn has_update(self) -> bool {
        use UpdateOutcome::*;
        match self {
            NoChange => false,
            Scrambled => true,
            PhaseChanged(_) => true,
            QuestionPosed => true,
            Answered(_) => true,
            Resolved(_) => true,
        }
    }
}
