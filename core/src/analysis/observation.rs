use alloc::string::String;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Question as shown to players; the answer stays hidden until it is chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosedQuestion {
    pub cell: Coord2,
    pub letter: char,
    pub category: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub options: [String; 4],
}

impl PosedQuestion {
    fn new(cell: Coord2, record: &QuestionRecord) -> Self {
        Self {
            cell,
            letter: record.letter,
            category: record.category.clone(),
            difficulty: record.difficulty,
            question: record.question.clone(),
            options: record.options.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownResult {
    pub chosen: OptionLetter,
    pub answer: OptionLetter,
    pub correct: bool,
}

/// Read-only snapshot of a board for presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub phase: BoardPhase,
    pub size: Coord2,
    pub cells: Array2<Cell>,
    pub shimmer: Array2<Option<Colour>>,
    pub players: Vec<PlayerState>,
    pub active_player: usize,
    pub chances: u8,
    pub bonus_pending: bool,
    pub contested: Option<Coord2>,
    pub question: Option<PosedQuestion>,
    pub result: Option<ShownResult>,
    pub last_resolution: Option<Resolution>,
    pub winner: Option<usize>,
}

impl Observation {
    pub fn from_engine<S: QuestionSupplier>(engine: &RoundEngine<S>) -> Self {
        let size = engine.size();
        let mut cells = Array2::default(size.to_nd_index());
        let mut shimmer = Array2::from_elem(size.to_nd_index(), None);

        let (rows, cols) = size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                cells[coords.to_nd_index()] = engine.cell_at(coords);
                shimmer[coords.to_nd_index()] = engine.shimmer_at(coords);
            }
        }

        let (question, result) = match engine.stage() {
            TurnStage::Idle => (None, None),
            TurnStage::QuestionPosed { cell, question } => {
                (Some(PosedQuestion::new(*cell, question)), None)
            }
            TurnStage::ResultDisplayed {
                cell,
                question,
                chosen,
                correct,
                ..
            } => (
                Some(PosedQuestion::new(*cell, question)),
                Some(ShownResult {
                    chosen: *chosen,
                    answer: question.answer,
                    correct: *correct,
                }),
            ),
        };

        let round = engine.round();
        Self {
            phase: round.phase,
            size,
            cells,
            shimmer,
            players: engine.players().cloned().collect(),
            active_player: round.active,
            chances: round.chances,
            bonus_pending: round.bonus_pending,
            contested: round.contested,
            question,
            result,
            last_resolution: engine.last_resolution(),
            winner: round.winner,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or_default()
    }

    /// Claimed cells of every colour in row-major order.
    pub fn claims(&self) -> Vec<(Coord2, Colour)> {
        self.cells
            .indexed_iter()
            .filter_map(|((row, col), cell)| match cell.owner {
                Owner::Claimed(colour) => Some(((row as Coord, col as Coord), colour)),
                _ => None,
            })
            .collect()
    }
}
