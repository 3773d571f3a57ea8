use thiserror::Error;

use crate::BoardPhase;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board map rows have differing lengths")]
    InvalidBoardShape,
    #[error("Board map contains a tile id that does not fit a tile")]
    InvalidTileId,
    #[error("Board map could not be read")]
    MapUnreadable,
    #[error("Not enough letters: {needed} open cells but only {available} letters")]
    AlphabetExhausted { needed: usize, available: usize },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Board is not accepting input while {0:?}")]
    NotAccepting(BoardPhase),
    #[error("A question is already posed")]
    QuestionPending,
    #[error("No question is posed")]
    NoQuestionPosed,
    #[error("Cell already claimed or forfeited")]
    AlreadyClaimed,
    #[error("No matching question")]
    QuestionNotFound,
    #[error("Question is missing its {0}")]
    IncompleteQuestion(&'static str),
    #[error("A game needs at least one player")]
    NoPlayers,
    #[error("Players sharing a colour must share an orientation")]
    ConflictingOrientation,
}

pub type Result<T> = core::result::Result<T, GameError>;
