//! Interactive shell - two players sharing one terminal
//!
//! ## Flow
//!
//! - run(): set up the game, replay a record if asked, then read stdin
//! - feed(): one line at a time until the game ends or input runs out
//! - execute(): a single parsed command against the engine

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hive_core::{GameStatus, Hive, Piece};

use crate::notation::{parse_command, Command};
use crate::view;

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Append every accepted play to this game record
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Play the commands in this file before reading stdin
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Don't print the board between turns
    #[arg(long)]
    pub no_board: bool,
}

/// Whether the shell should keep reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Shell {
    hive: Hive,
    record: Option<File>,
    show_board: bool,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: ShellArgs) -> Result<()> {
    let record = match &args.record {
        Some(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open game record: {}", path.display()))?,
        ),
        None => None,
    };

    let mut hive = Hive::new();
    hive.setup();
    let mut shell = Shell {
        hive,
        record,
        show_board: !args.no_board,
    };

    let mut flow = Flow::Continue;
    if let Some(path) = &args.replay {
        let file = File::open(path)
            .with_context(|| format!("Failed to open replay file: {}", path.display()))?;
        tracing::info!("Replaying {}", path.display());
        flow = shell.feed(BufReader::new(file), false)?;
    }
    if flow == Flow::Continue {
        shell.feed(io::stdin().lock(), true)?;
    }

    match shell.hive.status() {
        GameStatus::Unfinished => println!("\nGame abandoned on turn {}.", shell.hive.turn()),
        status => {
            if shell.show_board {
                print!("{}", view::render(&shell.hive));
            }
            println!("\nGame over: {status}");
        }
    }
    println!("Thanks for playing Hive. Have a nice day!");

    Ok(())
}

// ============================================================================
// INPUT
// ============================================================================

impl Shell {
    fn feed(&mut self, mut input: impl BufRead, interactive: bool) -> Result<Flow> {
        let mut line = String::new();

        while self.hive.status() == GameStatus::Unfinished {
            if interactive {
                self.prompt()?;
            }

            line.clear();
            if input.read_line(&mut line).context("Failed to read command")? == 0 {
                return Ok(Flow::Continue);
            }
            let cmd = line.trim();
            if cmd.is_empty() {
                continue;
            }
            if !interactive {
                println!("> {cmd}");
            }

            if self.execute(cmd)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn prompt(&self) -> Result<()> {
        println!("Turn: {}", self.hive.turn());
        if self.show_board {
            print!("{}", view::render(&self.hive));
        }
        if let Some(color) = self.hive.active_player() {
            println!("pieces available: {}", format_pieces(self.hive.unplayed_pieces(color)));
            print!("{color} play: ");
        }
        io::stdout().flush().context("Failed to flush stdout")
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("invalid play! {err}");
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Play { piece, reference, direction } => {
                match self.hive.action(&piece, reference.as_deref(), direction) {
                    Ok(cell) => {
                        tracing::debug!("{piece} -> ({}, {})", cell.x, cell.y);
                        self.write_record(line)?;
                        println!("\n{}\n", "=".repeat(79));
                    }
                    Err(err) => println!("invalid play! {err}"),
                }
            }
            Command::Hand => {
                if let Some(color) = self.hive.active_player() {
                    println!("{}", format_pieces(self.hive.unplayed_pieces(color)));
                }
            }
            Command::Moves(code) => match code.parse::<Piece>() {
                Ok(piece) => {
                    let cells: Vec<String> = self
                        .hive
                        .valid_destinations(piece)
                        .into_iter()
                        .map(|c| format!("({}, {})", c.x, c.y))
                        .collect();
                    if cells.is_empty() {
                        println!("{piece} can't move");
                    } else {
                        println!("{}", cells.join(" "));
                    }
                }
                Err(err) => println!("{err}"),
            },
            Command::State => {
                let json = serde_json::to_string_pretty(&self.hive.snapshot())?;
                println!("{json}");
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn write_record(&mut self, line: &str) -> Result<()> {
        if let Some(file) = &mut self.record {
            writeln!(file, "{line}").context("Failed to write game record")?;
            file.flush().context("Failed to write game record")?;
        }
        Ok(())
    }
}

fn format_pieces<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> String {
    pieces
        .into_iter()
        .map(Piece::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
