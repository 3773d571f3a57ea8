use alloc::string::String;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Which pair of opposite board edges a player has to connect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Left edge to right edge.
    Horizontal,
    /// Top edge to bottom edge.
    Vertical,
}

impl Orientation {
    pub const fn edges(self) -> (Edges, Edges) {
        match self {
            Self::Horizontal => (Edges::LEFT, Edges::RIGHT),
            Self::Vertical => (Edges::TOP, Edges::BOTTOM),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Waiting,
    Engaging,
}

/// How the player's latest claim was scored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinType {
    Single,
    /// The claim completed a spanning path.
    Round,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub colour: Colour,
    pub orientation: Orientation,
    pub score: u32,
    pub consecutive: u32,
    pub rounds_won: u32,
    pub turn: TurnState,
    pub win_type: WinType,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, colour: Colour, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            colour,
            orientation,
            score: 0,
            consecutive: 0,
            rounds_won: 0,
            turn: TurnState::Waiting,
            win_type: WinType::Single,
        }
    }

    pub fn is_engaging(&self) -> bool {
        matches!(self.turn, TurnState::Engaging)
    }

    pub(crate) fn award(&mut self, points: u32, win_type: WinType) {
        self.score = self.score.saturating_add(points);
        self.consecutive += 1;
        self.win_type = win_type;
        if win_type == WinType::Round {
            self.rounds_won += 1;
        }
    }

    pub(crate) fn miss(&mut self) {
        self.consecutive = 0;
    }

    pub(crate) fn clear_progress(&mut self) {
        self.score = 0;
        self.consecutive = 0;
        self.rounds_won = 0;
        self.win_type = WinType::Single;
    }
}

/// Anything that can sit at the board: a person at the controls or the computer.
pub trait Contestant {
    fn state(&self) -> &PlayerState;

    fn state_mut(&mut self) -> &mut PlayerState;

    /// Answer to the posed question, or `None` to wait for outside input.
    fn submits_answer(&mut self, question: &QuestionRecord) -> Option<OptionLetter>;

    /// Letter to play next out of `open_letters`, or `None` to wait for outside input.
    fn picks_cell(&mut self, open_letters: &[char]) -> Option<char>;

    fn display_name(&self) -> &str {
        &self.state().name
    }

    fn score(&self) -> u32 {
        self.state().score
    }
}

/// Player driven by input events from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Human {
    state: PlayerState,
}

impl Human {
    pub fn new(state: PlayerState) -> Self {
        Self { state }
    }
}

impl Contestant for Human {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn submits_answer(&mut self, _question: &QuestionRecord) -> Option<OptionLetter> {
        None
    }

    fn picks_cell(&mut self, _open_letters: &[char]) -> Option<char> {
        None
    }
}

/// Computer player that knows the right answer with probability `accuracy`.
#[derive(Clone, Debug)]
pub struct Cpu {
    state: PlayerState,
    accuracy: f64,
    rng: SmallRng,
}

impl Cpu {
    pub fn new(state: PlayerState, accuracy: f64, seed: u64) -> Self {
        let accuracy = if accuracy.is_nan() {
            0.0
        } else {
            accuracy.clamp(0.0, 1.0)
        };
        Self {
            state,
            accuracy,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

impl Contestant for Cpu {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn submits_answer(&mut self, question: &QuestionRecord) -> Option<OptionLetter> {
        if self.rng.random_bool(self.accuracy) {
            return Some(question.answer);
        }
        let wrong = self.rng.random_range(0..OptionLetter::ALL.len() - 1);
        OptionLetter::ALL
            .into_iter()
            .filter(|&option| option != question.answer)
            .nth(wrong)
    }

    fn picks_cell(&mut self, open_letters: &[char]) -> Option<char> {
        open_letters.choose(&mut self.rng).copied()
    }
}

#[derive(Clone, Debug)]
pub enum Seat {
    Human(Human),
    Cpu(Cpu),
}

impl Seat {
    pub fn human(state: PlayerState) -> Self {
        Self::Human(Human::new(state))
    }

    pub fn cpu(state: PlayerState, accuracy: f64, seed: u64) -> Self {
        Self::Cpu(Cpu::new(state, accuracy, seed))
    }

    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu(_))
    }

    fn contestant(&self) -> &dyn Contestant {
        match self {
            Self::Human(human) => human,
            Self::Cpu(cpu) => cpu,
        }
    }

    fn contestant_mut(&mut self) -> &mut dyn Contestant {
        match self {
            Self::Human(human) => human,
            Self::Cpu(cpu) => cpu,
        }
    }
}

impl Contestant for Seat {
    fn state(&self) -> &PlayerState {
        self.contestant().state()
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        self.contestant_mut().state_mut()
    }

    fn submits_answer(&mut self, question: &QuestionRecord) -> Option<OptionLetter> {
        self.contestant_mut().submits_answer(question)
    }

    fn picks_cell(&mut self, open_letters: &[char]) -> Option<char> {
        self.contestant_mut().picks_cell(open_letters)
    }
}
