//! Shell command parsing
//!
//! A play is `{piece}` for the opening placement, otherwise
//! `{piece}{contact}{reference}` where the two-character contact token says
//! which side of the reference piece to land on:
//!
//! | token | side       |
//! |-------|------------|
//! | `\|*` | west       |
//! | `/*`  | north-west |
//! | `*\`  | north-east |
//! | `*\|` | east       |
//! | `*/`  | south-east |
//! | `\*`  | south-west |
//! | `=*`  | on top     |
//!
//! Lines starting with `:` are shell commands.

use anyhow::{bail, Result};
use hive_core::Direction;

/// One parsed shell line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Play {
        piece: String,
        reference: Option<String>,
        direction: Option<Direction>,
    },
    /// Show the active player's hand
    Hand,
    /// List destinations for a played piece
    Moves(String),
    /// Dump the game snapshot as JSON
    State,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix(':') {
        let mut words = rest.split_whitespace();
        return match (words.next(), words.next(), words.next()) {
            (Some("hand"), None, _) => Ok(Command::Hand),
            (Some("moves"), Some(piece), None) => Ok(Command::Moves(piece.to_string())),
            (Some("state"), None, _) => Ok(Command::State),
            (Some("quit" | "q"), None, _) => Ok(Command::Quit),
            _ => bail!("unknown command: {line}"),
        };
    }

    if !line.is_ascii() {
        bail!("bad move notation: {line}");
    }
    match line.len() {
        3 => Ok(Command::Play {
            piece: line.to_string(),
            reference: None,
            direction: None,
        }),
        8 => {
            let direction = contact_direction(&line[3..5])?;
            Ok(Command::Play {
                piece: line[..3].to_string(),
                reference: Some(line[5..].to_string()),
                direction: Some(direction),
            })
        }
        _ => bail!("bad move notation: {line}"),
    }
}

fn contact_direction(token: &str) -> Result<Direction> {
    let dir = match token {
        "|*" => Direction::West,
        "/*" => Direction::NorthWest,
        "*\\" => Direction::NorthEast,
        "*|" => Direction::East,
        "*/" => Direction::SouthEast,
        "\\*" => Direction::SouthWest,
        "=*" => Direction::Origin,
        _ => bail!("unknown point of contact: {token}"),
    };
    Ok(dir)
}
