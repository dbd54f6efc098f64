//! Piece identity: color, kind and ordinal

use crate::error::HiveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Insect kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Ant,
    Beetle,
    Grasshopper,
    Queen,
    Spider,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Ant,
        PieceKind::Beetle,
        PieceKind::Grasshopper,
        PieceKind::Queen,
        PieceKind::Spider,
    ];

    pub fn letter(self) -> char {
        match self {
            PieceKind::Ant => 'A',
            PieceKind::Beetle => 'B',
            PieceKind::Grasshopper => 'G',
            PieceKind::Queen => 'Q',
            PieceKind::Spider => 'S',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        PieceKind::ALL.into_iter().find(|k| k.letter() == c)
    }

    /// Copies of this kind in one player's set
    pub fn count(self) -> u8 {
        match self {
            PieceKind::Ant | PieceKind::Grasshopper => 3,
            PieceKind::Beetle | PieceKind::Spider => 2,
            PieceKind::Queen => 1,
        }
    }
}

/// A single game piece. Unique per game; `Display` gives the canonical code
/// (`wQ1`, `bA2`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub number: u8,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind, number: u8) -> Self {
        Self { color, kind, number }
    }

    pub const fn queen(color: Color) -> Self {
        Self::new(color, PieceKind::Queen, 1)
    }

    pub fn is_queen(&self) -> bool {
        self.kind == PieceKind::Queen
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.color.letter(), self.kind.letter(), self.number)
    }
}

impl FromStr for Piece {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || HiveError::InvalidPieceCode(s.to_string());
        let mut chars = s.chars();
        let (Some(c), Some(k), Some(n), None) = (chars.next(), chars.next(), chars.next(), chars.next())
        else {
            return Err(bad());
        };

        let color = Color::from_letter(c).ok_or_else(bad)?;
        let kind = PieceKind::from_letter(k).ok_or_else(bad)?;
        let number = n.to_digit(10).ok_or_else(bad)? as u8;
        if number == 0 || number > kind.count() {
            return Err(bad());
        }

        Ok(Piece::new(color, kind, number))
    }
}

/// Full hand for one player: 3 ants, 3 grasshoppers, 2 spiders, 2 beetles, 1 queen
pub fn piece_set(color: Color) -> Vec<Piece> {
    PieceKind::ALL
        .into_iter()
        .flat_map(|kind| (1..=kind.count()).map(move |n| Piece::new(color, kind, n)))
        .collect()
}
