//! Error types for rejected game actions

use std::fmt;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, HiveError>;

/// The rule an action broke
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    WrongColor,
    QueenOnOpeningTurn,
    QueenNotPlaced,
    QueenForced,
    MissingReference,
    CellOccupied,
    AlreadyPlayed,
    TouchesOpponent,
    NotOnBoard,
    Pinned,
    SameCell,
    BreaksHive,
    IllegalDestination,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::WrongColor => "not this color's turn",
            Rejection::QueenOnOpeningTurn => "queen cannot be placed on the first turn",
            Rejection::QueenNotPlaced => "queen must be placed before moving",
            Rejection::QueenForced => "queen must be placed this turn",
            Rejection::MissingReference => "reference piece is not on the board",
            Rejection::CellOccupied => "target cell is occupied",
            Rejection::AlreadyPlayed => "piece is already on the board",
            Rejection::TouchesOpponent => "target touches an opponent piece",
            Rejection::NotOnBoard => "piece is not on the board",
            Rejection::Pinned => "piece is covered by another piece",
            Rejection::SameCell => "piece is already in the target cell",
            Rejection::BreaksHive => "moving the piece would split the hive",
            Rejection::IllegalDestination => "piece cannot reach the target cell",
        };
        f.write_str(text)
    }
}

/// Errors reported by the engine
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HiveError {
    #[error("invalid placement of {piece}: {reason}")]
    InvalidPlacement { piece: String, reason: Rejection },

    #[error("invalid movement of {piece}: {reason}")]
    InvalidMovement { piece: String, reason: Rejection },

    #[error("unknown piece: {0}")]
    UnknownPiece(String),

    #[error("piece not found on board: {0}")]
    NotFound(String),

    #[error("malformed piece code: {0}")]
    InvalidPieceCode(String),

    #[error("inconsistent snapshot: {0}")]
    InvalidSnapshot(String),
}

impl HiveError {
    /// The broken rule, for placement and movement rejections
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            HiveError::InvalidPlacement { reason, .. } | HiveError::InvalidMovement { reason, .. } => {
                Some(*reason)
            }
            _ => None,
        }
    }
}
