//! Movement rules: the one-hive check and the five piece-kind predicates
//!
//! Every predicate here expects the moving piece to be lifted off the board
//! (see [`Lifted`]) so it never blocks its own path.

use crate::board::{Board, Cell, Direction};
use crate::pieces::{Piece, PieceKind};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::ops::Deref;

// ============================================================================
// LIFTED PIECE GUARD
// ============================================================================

/// A piece temporarily taken off the top of its stack.
///
/// The piece goes back on the same stack when the guard drops, on every exit
/// path, leaving the board exactly as it was.
pub struct Lifted<'a> {
    board: &'a mut Board,
    piece: Piece,
    cell: Cell,
}

impl<'a> Lifted<'a> {
    /// Lift `piece`. `None` if it is not on the board or is covered.
    pub fn lift(board: &'a mut Board, piece: Piece) -> Option<Self> {
        let cell = board.locate(piece)?;
        if board.top(cell) != Some(piece) {
            return None;
        }
        board.remove(piece).ok()?;
        Some(Self { board, piece, cell })
    }

    /// Cell the piece was lifted from
    pub fn cell(&self) -> Cell {
        self.cell
    }
}

impl Deref for Lifted<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Lifted<'_> {
    fn drop(&mut self) {
        self.board.place(self.cell, self.piece);
    }
}

// ============================================================================
// ONE HIVE
// ============================================================================

/// Whether `piece` can leave its cell without splitting the hive.
///
/// Pieces off the board, and pieces sharing their cell with others, are
/// always free to leave. Otherwise every occupied neighbor of the vacated
/// cell must still reach the others.
pub fn one_hive(board: &mut Board, piece: Piece) -> bool {
    let Some(cell) = board.locate(piece) else {
        return true;
    };
    if board.get(cell).len() > 1 {
        return true;
    }
    let Some(lifted) = Lifted::lift(board, piece) else {
        return true;
    };

    let around = lifted.occupied_neighbors(cell);
    match around.split_first() {
        Some((&first, rest)) if !rest.is_empty() => reaches_all(&lifted, first, rest),
        _ => true,
    }
}

/// Breadth-first search over occupied cells from `from` until every cell in
/// `targets` is visited
fn reaches_all(board: &Board, from: Cell, targets: &[Cell]) -> bool {
    let mut pending: FxHashSet<Cell> = targets.iter().copied().collect();
    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::from([from]);
    visited.insert(from);

    while let Some(cell) = queue.pop_front() {
        pending.remove(&cell);
        if pending.is_empty() {
            return true;
        }
        for next in board.occupied_neighbors(cell) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    pending.is_empty()
}

// ============================================================================
// BEE STEP
// ============================================================================

/// Single-cell slides from `cell`.
///
/// A neighbor is reachable when it is free, one of the two cells flanking
/// the step is free (the gap is wide enough to slide through), and it
/// touches some occupied cell other than `cell`.
pub fn bee_moves(board: &Board, cell: Cell) -> Vec<Cell> {
    let around = cell.neighbors();
    let mut moves = Vec::with_capacity(6);

    for i in 0..6 {
        let target = around[(i + 5) % 6];
        if !board.is_free(target) {
            continue;
        }
        if !board.is_free(around[i]) && !board.is_free(around[(i + 4) % 6]) {
            continue;
        }
        if board.occupied_neighbors(target).into_iter().any(|c| c != cell) {
            moves.push(target);
        }
    }

    moves
}

// ============================================================================
// PIECE KINDS
// ============================================================================

/// Every cell the lifted piece of `kind` can reach from `start`
pub fn destinations(board: &Board, kind: PieceKind, start: Cell) -> Vec<Cell> {
    match kind {
        PieceKind::Queen => bee_moves(board, start),
        PieceKind::Beetle => beetle_moves(board, start),
        PieceKind::Grasshopper => grasshopper_moves(board, start),
        PieceKind::Spider => spider_moves(board, start),
        PieceKind::Ant => ant_moves(board, start),
    }
}

/// Whether the lifted piece of `kind` can go from `start` to `end`
pub fn can_reach(board: &Board, kind: PieceKind, start: Cell, end: Cell) -> bool {
    match kind {
        PieceKind::Queen => bee_moves(board, start).contains(&end),
        PieceKind::Beetle => beetle_moves(board, start).contains(&end),
        PieceKind::Grasshopper => grasshopper_jump(board, start, end),
        PieceKind::Spider => spider_moves(board, start).contains(&end),
        PieceKind::Ant => ant_reaches(board, start, end),
    }
}

/// On top of the hive a beetle goes anywhere adjacent. On the ground it
/// slides like a queen or climbs onto any neighbor.
fn beetle_moves(board: &Board, start: Cell) -> Vec<Cell> {
    if !board.is_free(start) {
        return start.neighbors().to_vec();
    }
    let mut moves = bee_moves(board, start);
    moves.extend(board.occupied_neighbors(start));
    moves
}

/// Straight jumps over at least one piece, landing on the first gap
fn grasshopper_moves(board: &Board, start: Cell) -> Vec<Cell> {
    Direction::AROUND
        .into_iter()
        .filter_map(|dir| {
            let mut cell = start.neighbor(dir);
            if board.is_free(cell) {
                return None;
            }
            while !board.is_free(cell) {
                cell = cell.neighbor(dir);
            }
            Some(cell)
        })
        .collect()
}

fn grasshopper_jump(board: &Board, start: Cell, end: Cell) -> bool {
    let dir = match start.line_direction(end) {
        Some(Direction::Origin) | None => return false,
        Some(dir) => dir,
    };

    let mut cell = start.neighbor(dir);
    // Must jump over something
    if cell == end {
        return false;
    }
    while cell != end {
        if board.is_free(cell) {
            return false;
        }
        cell = cell.neighbor(dir);
    }

    board.is_free(end)
}

/// Cells exactly three slides away, never doubling back
fn spider_moves(board: &Board, start: Cell) -> Vec<Cell> {
    let mut visited = FxHashSet::default();
    visited.insert(start);
    let mut frontier = vec![start];

    for _ in 0..3 {
        let mut next: Vec<Cell> = Vec::new();
        for &cell in &frontier {
            for target in bee_moves(board, cell) {
                if !visited.contains(&target) && !next.contains(&target) {
                    next.push(target);
                }
            }
        }
        visited.extend(next.iter().copied());
        frontier = next;
    }

    frontier.sort();
    frontier
}

/// Closure of the slide relation from `start`, excluding `start`
fn ant_moves(board: &Board, start: Cell) -> Vec<Cell> {
    let mut reached = slide_closure(board, start, None);
    reached.remove(&start);
    let mut moves: Vec<Cell> = reached.into_iter().collect();
    moves.sort();
    moves
}

fn ant_reaches(board: &Board, start: Cell, end: Cell) -> bool {
    end != start && slide_closure(board, start, Some(end)).contains(&end)
}

/// Cells reachable by repeated slides. Stops early once `goal` is found.
fn slide_closure(board: &Board, start: Cell, goal: Option<Cell>) -> FxHashSet<Cell> {
    let mut visited = FxHashSet::default();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        for next in bee_moves(board, cell) {
            if visited.insert(next) {
                if Some(next) == goal {
                    return visited;
                }
                queue.push_back(next);
            }
        }
    }

    visited
}

// ============================================================================
// TESTS
// ============================================================================
