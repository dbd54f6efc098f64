//! Hive Core - Rules engine for the Hive board game
//!
//! This crate provides the game logic:
//! - Board geometry (offset hex grid, stacked cells)
//! - Piece identities and the standard piece set
//! - Movement rules and the one-hive check
//! - Turn sequencing, placement/movement legality and victory detection

pub mod board;
pub mod error;
pub mod game;
pub mod pieces;
pub mod rules;

// Re-exports for convenient access
pub use board::{Board, Cell, Direction};
pub use error::{HiveError, Rejection, Result};
pub use game::{GameStatus, Hive, HiveSnapshot};
pub use pieces::{piece_set, Color, Piece, PieceKind};
