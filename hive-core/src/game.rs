//! Game state: turns, hands, placement and movement

use crate::board::{Board, Cell, Direction};
use crate::error::{HiveError, Rejection, Result};
use crate::pieces::{piece_set, Color, Piece};
use crate::rules::{self, Lifted};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Turn on which white must place its queen if it hasn't yet
const WHITE_QUEEN_DEADLINE: u32 = 7;
/// Turn on which black must place its queen if it hasn't yet
const BLACK_QUEEN_DEADLINE: u32 = 8;

/// Widest board, in cells per axis, a snapshot may describe
const MAX_SNAPSHOT_SPAN: i64 = 1024;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Unfinished,
    WhiteWin,
    BlackWin,
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Unfinished => f.write_str("unfinished"),
            GameStatus::WhiteWin => f.write_str("white wins"),
            GameStatus::BlackWin => f.write_str("black wins"),
            GameStatus::Draw => f.write_str("draw"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionKind {
    Place,
    Move,
}

/// Plain copy of a game, enough to rebuild it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiveSnapshot {
    pub turn: u32,
    pub white_hand: Vec<Piece>,
    pub black_hand: Vec<Piece>,
    /// Non-empty cells with their stacks, bottom to top
    pub stacks: Vec<(Cell, Vec<Piece>)>,
    /// (min_x, min_y, max_x, max_y)
    pub boundaries: (i32, i32, i32, i32),
}

impl HiveSnapshot {
    /// Every piece at most once across hands and stacks, hands holding their
    /// own color, no empty or repeated stacks, everything inside boundaries
    /// that contain (0, 0).
    pub fn validate(&self) -> Result<()> {
        let bad = HiveError::InvalidSnapshot;
        let (min_x, min_y, max_x, max_y) = self.boundaries;
        let inside = |cell: Cell| {
            (min_x..=max_x).contains(&cell.x) && (min_y..=max_y).contains(&cell.y)
        };

        if !inside(Cell::ORIGIN) {
            return Err(bad(format!("boundaries {:?} leave out (0, 0)", self.boundaries)));
        }
        let span_x = i64::from(max_x) - i64::from(min_x) + 1;
        let span_y = i64::from(max_y) - i64::from(min_y) + 1;
        if span_x > MAX_SNAPSHOT_SPAN || span_y > MAX_SNAPSHOT_SPAN {
            return Err(bad(format!("boundaries {:?} are too wide", self.boundaries)));
        }

        let mut seen = FxHashSet::default();
        for (color, hand) in [(Color::White, &self.white_hand), (Color::Black, &self.black_hand)] {
            for &piece in hand {
                if piece.color != color {
                    return Err(bad(format!("{piece} is in the {color} hand")));
                }
                if !seen.insert(piece) {
                    return Err(bad(format!("{piece} appears more than once")));
                }
            }
        }

        let mut cells = FxHashSet::default();
        for (cell, stack) in &self.stacks {
            let at = format!("({}, {})", cell.x, cell.y);
            if !inside(*cell) {
                return Err(bad(format!("{at} is outside the boundaries")));
            }
            if !cells.insert(*cell) {
                return Err(bad(format!("{at} is listed twice")));
            }
            if stack.is_empty() {
                return Err(bad(format!("empty stack at {at}")));
            }
            for &piece in stack {
                if !seen.insert(piece) {
                    return Err(bad(format!("{piece} appears more than once")));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// A game of Hive.
///
/// Every public mutation either applies completely and advances the turn,
/// or fails and leaves the game untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hive {
    /// 0 before setup; odd turns are white's
    turn: u32,
    /// Occupancy of every cell, and where each played piece is
    board: Board,
    /// Pieces still in hand, by color
    hands: [BTreeSet<Piece>; 2],
}

impl Hive {
    /// Empty game; call [`Hive::setup`] before playing
    pub fn new() -> Self {
        Self {
            turn: 0,
            board: Board::new(),
            hands: [BTreeSet::new(), BTreeSet::new()],
        }
    }

    /// Fill both hands and start at turn 1
    pub fn setup(&mut self) {
        self.board = Board::new();
        for color in Color::ALL {
            self.hands[color.index()] = piece_set(color).into_iter().collect();
        }
        self.turn = 1;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Color to move, `None` before setup
    pub fn active_player(&self) -> Option<Color> {
        match self.turn {
            0 => None,
            t if t % 2 == 1 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub fn unplayed_pieces(&self, color: Color) -> &BTreeSet<Piece> {
        &self.hands[color.index()]
    }

    pub fn locate(&self, piece: Piece) -> Option<Cell> {
        self.board.locate(piece)
    }

    /// Stack at `cell`, bottom to top
    pub fn get_pieces(&self, cell: Cell) -> &[Piece] {
        self.board.get(cell)
    }

    /// (min_x, min_y, max_x, max_y)
    pub fn board_boundaries(&self) -> (i32, i32, i32, i32) {
        self.board.boundaries()
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Play `piece_code` for the active player: a placement when the piece
    /// is in hand, a movement when it is on the board.
    pub fn action(
        &mut self,
        piece_code: &str,
        reference: Option<&str>,
        direction: Option<Direction>,
    ) -> Result<Cell> {
        let unknown = || HiveError::UnknownPiece(piece_code.to_string());
        let piece: Piece = piece_code.parse().map_err(|_| unknown())?;
        let reference = reference.map(str::parse::<Piece>).transpose()?;
        let active = self.active_player().ok_or_else(unknown)?;

        if self.hands[active.index()].contains(&piece) {
            self.place_piece(piece, reference, direction)
        } else if self.board.locate(piece).is_some() {
            self.move_piece(piece, reference, direction)
        } else {
            tracing::debug!(piece = %piece, turn = self.turn, "piece is neither in hand nor on the board");
            Err(unknown())
        }
    }

    /// Put `piece` from its owner's hand next to (or, with `Origin`, onto)
    /// `reference`. The very first placement needs no reference and lands
    /// on (0, 0).
    pub fn place_piece(
        &mut self,
        piece: Piece,
        reference: Option<Piece>,
        direction: Option<Direction>,
    ) -> Result<Cell> {
        let reject = |reason| HiveError::InvalidPlacement { piece: piece.to_string(), reason };

        let target = match (reference, self.turn) {
            (None, 1) => Cell::ORIGIN,
            _ => match self.resolve(reference, direction) {
                Some(cell) => cell,
                None => return Err(self.rejected(reject(Rejection::MissingReference))),
            },
        };

        if let Err(reason) = self.check_turn(piece, ActionKind::Place) {
            return Err(self.rejected(reject(reason)));
        }
        if let Err(reason) = self.check_placement(piece, target) {
            return Err(self.rejected(reject(reason)));
        }

        self.board.place(target, piece);
        self.hands[piece.color.index()].remove(&piece);
        tracing::trace!(piece = %piece, x = target.x, y = target.y, turn = self.turn, "placed");
        self.end_turn();

        Ok(target)
    }

    /// Move a played `piece` next to (or onto) `reference`
    pub fn move_piece(
        &mut self,
        piece: Piece,
        reference: Option<Piece>,
        direction: Option<Direction>,
    ) -> Result<Cell> {
        let reject = |reason| HiveError::InvalidMovement { piece: piece.to_string(), reason };

        let target = match self.resolve(reference, direction) {
            Some(cell) => cell,
            None => return Err(self.rejected(reject(Rejection::MissingReference))),
        };

        if let Err(reason) = self.check_turn(piece, ActionKind::Move) {
            return Err(self.rejected(reject(reason)));
        }
        if let Err(reason) = self.check_move(piece, target) {
            return Err(self.rejected(reject(reason)));
        }

        let from = self.board.remove(piece)?;
        self.board.place(target, piece);
        tracing::trace!(
            piece = %piece,
            from_x = from.x, from_y = from.y,
            to_x = target.x, to_y = target.y,
            turn = self.turn,
            "moved"
        );
        self.end_turn();

        Ok(target)
    }

    /// Cells `piece` may legally move to right now.
    ///
    /// Lifting the piece needs a mutable board, so this works on a copy.
    pub fn valid_destinations(&self, piece: Piece) -> Vec<Cell> {
        if self.check_turn(piece, ActionKind::Move).is_err() {
            return Vec::new();
        }
        let mut board = self.board.clone();
        if !rules::one_hive(&mut board, piece) {
            return Vec::new();
        }
        let Some(lifted) = Lifted::lift(&mut board, piece) else {
            return Vec::new();
        };

        let mut cells = rules::destinations(&lifted, piece.kind, lifted.cell());
        cells.sort();
        cells.dedup();
        cells
    }

    /// A queen with all six sides covered loses; both covered is a draw
    pub fn check_victory(&self) -> GameStatus {
        let surrounded = |color| {
            self.board
                .locate(Piece::queen(color))
                .is_some_and(|cell| self.board.occupied_neighbors(cell).len() == 6)
        };

        match (surrounded(Color::White), surrounded(Color::Black)) {
            (true, true) => GameStatus::Draw,
            (true, false) => GameStatus::BlackWin,
            (false, true) => GameStatus::WhiteWin,
            (false, false) => GameStatus::Unfinished,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.check_victory()
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    fn resolve(&self, reference: Option<Piece>, direction: Option<Direction>) -> Option<Cell> {
        let cell = self.board.locate(reference?)?;
        Some(cell.neighbor(direction?))
    }

    fn check_turn(&self, piece: Piece, action: ActionKind) -> std::result::Result<(), Rejection> {
        let active = self.active_player().ok_or(Rejection::WrongColor)?;
        if piece.color != active {
            return Err(Rejection::WrongColor);
        }

        // Tournament rule: no queen on either player's first turn
        if self.turn <= 2 && piece.is_queen() {
            return Err(Rejection::QueenOnOpeningTurn);
        }

        let queen_placed = self.board.locate(Piece::queen(active)).is_some();
        if action == ActionKind::Move && !queen_placed {
            return Err(Rejection::QueenNotPlaced);
        }

        let deadline = match active {
            Color::White => WHITE_QUEEN_DEADLINE,
            Color::Black => BLACK_QUEEN_DEADLINE,
        };
        if self.turn == deadline && !queen_placed && !(piece.is_queen() && action == ActionKind::Place) {
            return Err(Rejection::QueenForced);
        }

        Ok(())
    }

    fn check_placement(&self, piece: Piece, target: Cell) -> std::result::Result<(), Rejection> {
        if !self.board.is_free(target) {
            return Err(Rejection::CellOccupied);
        }
        if self.board.locate(piece).is_some() {
            return Err(Rejection::AlreadyPlayed);
        }

        // The first two pieces can't help touching each other
        if self.turn <= 2 {
            return Ok(());
        }

        let touches_opponent = self
            .board
            .occupied_neighbors(target)
            .into_iter()
            .filter_map(|cell| self.board.top(cell))
            .any(|visible| visible.color == piece.color.opponent());
        if touches_opponent {
            return Err(Rejection::TouchesOpponent);
        }

        Ok(())
    }

    fn check_move(&mut self, piece: Piece, target: Cell) -> std::result::Result<(), Rejection> {
        let start = self.board.locate(piece).ok_or(Rejection::NotOnBoard)?;
        if self.board.get(target).contains(&piece) {
            return Err(Rejection::SameCell);
        }
        if self.board.top(start) != Some(piece) {
            return Err(Rejection::Pinned);
        }
        if !rules::one_hive(&mut self.board, piece) {
            return Err(Rejection::BreaksHive);
        }

        let lifted = Lifted::lift(&mut self.board, piece).ok_or(Rejection::Pinned)?;
        if !rules::can_reach(&lifted, piece.kind, start, target) {
            return Err(Rejection::IllegalDestination);
        }

        Ok(())
    }

    fn rejected(&self, err: HiveError) -> HiveError {
        tracing::debug!(turn = self.turn, "{err}");
        err
    }

    fn end_turn(&mut self) {
        self.turn += 1;

        let status = self.check_victory();
        if status != GameStatus::Unfinished {
            tracing::info!(turn = self.turn, "game over: {status}");
        }
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    pub fn snapshot(&self) -> HiveSnapshot {
        let stacks = self
            .board
            .occupied_cells()
            .map(|cell| (cell, self.board.get(cell).to_vec()))
            .collect();

        HiveSnapshot {
            turn: self.turn,
            white_hand: self.hands[Color::White.index()].iter().copied().collect(),
            black_hand: self.hands[Color::Black.index()].iter().copied().collect(),
            stacks,
            boundaries: self.board.boundaries(),
        }
    }

    /// Rebuild a game, rejecting snapshots that fail [`HiveSnapshot::validate`]
    pub fn from_snapshot(snapshot: &HiveSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut board = Board::new();
        let (min_x, min_y, max_x, max_y) = snapshot.boundaries;
        board.resize(Cell::new(min_x, min_y));
        board.resize(Cell::new(max_x, max_y));
        for (cell, stack) in &snapshot.stacks {
            for &piece in stack {
                board.place(*cell, piece);
            }
        }

        Ok(Self {
            turn: snapshot.turn,
            board,
            hands: [
                snapshot.white_hand.iter().copied().collect(),
                snapshot.black_hand.iter().copied().collect(),
            ],
        })
    }
}

impl Default for Hive {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceKind;

    fn piece(code: &str) -> Piece {
        code.parse().unwrap()
    }

    /// Ten placements, white to move on turn 11.
    ///
    /// ```text
    ///  row -1:   wB1(-2) wS2(-1)  .(0)   bB1(1)
    ///  row  0: wG1(-2)  .(-1)  wS1(0) bS1(1) bG1(2)
    ///  row  1:       .(-2)  wQ1(-1)  .(0)   bQ1(1)
    ///  row  2:                          bA1(1)
    /// ```
    fn reference_game() -> Hive {
        let mut hive = Hive::new();
        hive.setup();
        hive.action("wS1", None, None).unwrap();
        for (code, reference, dir) in [
            ("bS1", "wS1", Direction::East),
            ("wQ1", "wS1", Direction::SouthWest),
            ("bQ1", "bS1", Direction::SouthEast),
            ("wS2", "wS1", Direction::NorthWest),
            ("bG1", "bS1", Direction::East),
            ("wB1", "wS2", Direction::West),
            ("bA1", "bQ1", Direction::SouthWest),
            ("wG1", "wB1", Direction::SouthWest),
            ("bB1", "bS1", Direction::NorthEast),
        ] {
            hive.action(code, Some(reference), Some(dir)).unwrap();
        }
        hive
    }

    fn reason(result: Result<Cell>) -> Option<Rejection> {
        result.err().and_then(|e| e.rejection())
    }

    #[test]
    fn test_reference_layout() {
        let hive = reference_game();
        assert_eq!(hive.turn(), 11);
        assert_eq!(hive.active_player(), Some(Color::White));
        assert_eq!(hive.locate(piece("wQ1")), Some(Cell::new(-1, 1)));
        assert_eq!(hive.locate(piece("bQ1")), Some(Cell::new(1, 1)));
        assert_eq!(hive.locate(piece("wG1")), Some(Cell::new(-2, 0)));
        assert_eq!(hive.locate(piece("bB1")), Some(Cell::new(1, -1)));
        assert_eq!(hive.unplayed_pieces(Color::White).len(), 6);
        assert_eq!(hive.unplayed_pieces(Color::Black).len(), 6);
        assert_eq!(hive.board_boundaries(), (-2, -1, 2, 2));
    }

    #[test]
    fn test_active_player_alternates() {
        let mut hive = Hive::new();
        assert_eq!(hive.active_player(), None);
        for turn in 1..=40 {
            hive.turn = turn;
            let expected = if turn % 2 == 1 { Color::White } else { Color::Black };
            assert_eq!(hive.active_player(), Some(expected));
        }
    }

    #[test]
    fn test_first_placement() {
        let mut hive = Hive::new();
        hive.setup();
        assert_eq!(hive.turn(), 1);
        assert_eq!(reason(hive.action("wQ1", None, None)), Some(Rejection::QueenOnOpeningTurn));
        assert_eq!(
            reason(hive.place_piece(piece("bS1"), None, None)),
            Some(Rejection::WrongColor)
        );
        assert_eq!(hive.action("wA1", None, None), Ok(Cell::ORIGIN));
        assert_eq!(hive.turn(), 2);
        assert!(!hive.unplayed_pieces(Color::White).contains(&piece("wA1")));

        // Black can't open with its queen either, and needs a reference
        assert_eq!(
            reason(hive.action("bQ1", Some("wA1"), Some(Direction::East))),
            Some(Rejection::QueenOnOpeningTurn)
        );
        assert_eq!(reason(hive.action("bA1", None, None)), Some(Rejection::MissingReference));
        assert_eq!(hive.action("bA1", Some("wA1"), Some(Direction::West)), Ok(Cell::new(-1, 0)));
    }

    #[test]
    fn test_unknown_pieces() {
        let mut hive = reference_game();
        assert_eq!(hive.action("xx1", None, None), Err(HiveError::UnknownPiece("xx1".to_string())));
        // Black's hand is not white's to play from
        assert_eq!(
            hive.action("bA2", Some("wQ1"), Some(Direction::West)),
            Err(HiveError::UnknownPiece("bA2".to_string()))
        );
        assert!(matches!(
            hive.action("wA1", Some("zz"), Some(Direction::West)),
            Err(HiveError::InvalidPieceCode(_))
        ));
        assert_eq!(hive.turn(), 11);
    }

    #[test]
    fn test_move_needs_queen() {
        let mut hive = Hive::new();
        hive.setup();
        hive.action("wS1", None, None).unwrap();
        hive.action("bS1", Some("wS1"), Some(Direction::East)).unwrap();
        assert_eq!(
            reason(hive.action("wS1", Some("bS1"), Some(Direction::NorthEast))),
            Some(Rejection::QueenNotPlaced)
        );
    }

    #[test]
    fn test_queen_forced_by_fourth_turn() {
        let mut hive = Hive::new();
        hive.setup();
        hive.action("wS1", None, None).unwrap();
        for (code, reference, dir) in [
            ("bS1", "wS1", Direction::East),
            ("wS2", "wS1", Direction::West),
            ("bS2", "bS1", Direction::East),
            ("wA1", "wS2", Direction::West),
            ("bA1", "bS2", Direction::East),
        ] {
            hive.action(code, Some(reference), Some(dir)).unwrap();
        }
        assert_eq!(hive.turn(), 7);

        assert_eq!(
            reason(hive.action("wA2", Some("wA1"), Some(Direction::West))),
            Some(Rejection::QueenForced)
        );
        hive.action("wQ1", Some("wA1"), Some(Direction::West)).unwrap();

        assert_eq!(
            reason(hive.action("bA2", Some("bA1"), Some(Direction::East))),
            Some(Rejection::QueenForced)
        );
        hive.action("bQ1", Some("bA1"), Some(Direction::East)).unwrap();
        assert_eq!(hive.turn(), 9);
    }

    #[test]
    fn test_validate_placement() {
        let hive = reference_game();

        // Over another piece
        let cell = Cell::new(0, 0).neighbor(Direction::SouthWest);
        assert_eq!(hive.check_placement(piece("wA1"), cell), Err(Rejection::CellOccupied));

        let cell = Cell::new(2, 0).neighbor(Direction::East);
        assert_eq!(hive.check_placement(piece("bB2"), cell), Ok(()));

        // Touches black
        let cell = Cell::new(-1, 1).neighbor(Direction::East);
        assert_eq!(hive.check_placement(piece("wA1"), cell), Err(Rejection::TouchesOpponent));

        assert_eq!(hive.check_placement(piece("wS1"), Cell::new(5, 5)), Err(Rejection::AlreadyPlayed));
    }

    #[test]
    fn test_placement_sees_only_top_piece() {
        let mut hive = reference_game();

        // A black beetle on wG1 turns that cell black
        let wg1 = hive.locate(piece("wG1")).unwrap();
        hive.board.place(wg1, piece("bB2"));
        let target = wg1.neighbor(Direction::West);
        assert_eq!(hive.check_placement(piece("wA1"), target), Err(Rejection::TouchesOpponent));

        // A white beetle on bA1 turns that cell white
        let ba1 = hive.locate(piece("bA1")).unwrap();
        hive.board.place(ba1, piece("wB2"));
        let target = ba1.neighbor(Direction::SouthEast);
        assert_eq!(hive.check_placement(piece("wA1"), target), Ok(()));
    }

    #[test]
    fn test_move_piece() {
        let mut hive = reference_game();
        hive.turn = 12;
        let cell = hive.locate(piece("bS1")).unwrap();
        hive.move_piece(piece("bB1"), Some(piece("bS1")), Some(Direction::Origin)).unwrap();

        assert_eq!(hive.locate(piece("bB1")), Some(cell));
        assert_eq!(hive.get_pieces(cell), &[piece("bS1"), piece("bB1")]);
        assert_eq!(hive.turn(), 13);

        // Pinned under the beetle
        hive.turn = 12;
        assert_eq!(
            reason(hive.move_piece(piece("bS1"), Some(piece("bG1")), Some(Direction::NorthEast))),
            Some(Rejection::Pinned)
        );
        // Already there
        assert_eq!(
            reason(hive.move_piece(piece("bB1"), Some(piece("bS1")), Some(Direction::Origin))),
            Some(Rejection::SameCell)
        );
    }

    #[test]
    fn test_action_places_from_hand() {
        let mut hive = reference_game();
        let cell = hive.action("wA1", Some("wQ1"), Some(Direction::West)).unwrap();
        assert_eq!(cell, Cell::new(-2, 1));
        assert!(!hive.unplayed_pieces(Color::White).contains(&piece("wA1")));
        assert_eq!(hive.turn(), 12);
    }

    #[test]
    fn test_beetle_blocked_by_gate() {
        let mut hive = reference_game();
        hive.place_piece(piece("wB2"), Some(piece("wQ1")), Some(Direction::West)).unwrap();
        let target = Cell::new(-1, 1).neighbor(Direction::NorthWest);
        assert_eq!(hive.check_move(piece("wB2"), target), Err(Rejection::IllegalDestination));
    }

    #[test]
    fn test_queen_escape_blocked() {
        let mut hive = reference_game();
        hive.move_piece(piece("wQ1"), Some(piece("wS1")), Some(Direction::West)).unwrap();
        hive.move_piece(piece("bA1"), Some(piece("wG1")), Some(Direction::SouthEast)).unwrap();

        let before = hive.clone();
        assert_eq!(
            reason(hive.move_piece(piece("wQ1"), Some(piece("wS1")), Some(Direction::SouthWest))),
            Some(Rejection::IllegalDestination)
        );
        assert_eq!(hive, before);
    }

    #[test]
    fn test_breaking_the_hive() {
        let mut hive = reference_game();
        let before = hive.clone();
        assert_eq!(
            reason(hive.move_piece(piece("wS1"), Some(piece("wQ1")), Some(Direction::West))),
            Some(Rejection::BreaksHive)
        );
        assert_eq!(hive, before);
    }

    #[test]
    fn test_valid_destinations() {
        let hive = reference_game();
        let before = hive.clone();

        let shared: &Hive = &hive;
        assert_eq!(
            shared.valid_destinations(piece("wQ1")),
            vec![Cell::new(-2, 1), Cell::new(-1, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
        // Articulation point
        assert!(hive.valid_destinations(piece("wS1")).is_empty());
        // Not white's turn
        assert!(hive.valid_destinations(piece("bA1")).is_empty());
        // In hand
        assert!(hive.valid_destinations(piece("wA1")).is_empty());
        assert_eq!(hive, before);

        let moves = hive.valid_destinations(piece("wG1"));
        for cell in &moves {
            let mut trial = hive.clone();
            let start = trial.locate(piece("wG1")).unwrap();
            assert!(rules::can_reach(
                &Lifted::lift(&mut trial.board, piece("wG1")).unwrap(),
                PieceKind::Grasshopper,
                start,
                *cell
            ));
        }
    }

    #[test]
    fn test_victory_statuses() {
        let mut hive = reference_game();
        assert_eq!(hive.check_victory(), GameStatus::Unfinished);

        // Cover the black queen's remaining sides by hand
        let bq = hive.locate(piece("bQ1")).unwrap();
        let fillers = ["wA1", "wA2", "wA3"];
        let free: Vec<Cell> = bq.neighbors().into_iter().filter(|&c| hive.board.is_free(c)).collect();
        assert_eq!(free.len(), 3);
        for (cell, code) in free.into_iter().zip(fillers) {
            hive.board.place(cell, piece(code));
        }
        assert_eq!(hive.check_victory(), GameStatus::WhiteWin);
        assert_eq!(hive.status(), GameStatus::WhiteWin);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut hive = reference_game();
        hive.turn = 12;
        hive.move_piece(piece("bB1"), Some(piece("bS1")), Some(Direction::Origin)).unwrap();

        let snapshot = hive.snapshot();
        assert_eq!(snapshot.turn, 13);
        assert_eq!(snapshot.white_hand.len(), 6);
        assert!(snapshot.stacks.contains(&(Cell::new(1, 0), vec![piece("bS1"), piece("bB1")])));

        let restored = Hive::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, hive);
        assert_eq!(restored.snapshot(), snapshot);

        let fresh = Hive::new().snapshot();
        assert_eq!(Hive::from_snapshot(&fresh).unwrap(), Hive::new());
    }

    #[test]
    fn test_inconsistent_snapshots() {
        fn check(good: &HiveSnapshot, edit: impl FnOnce(&mut HiveSnapshot)) {
            let mut snapshot = good.clone();
            edit(&mut snapshot);
            assert!(
                matches!(Hive::from_snapshot(&snapshot), Err(HiveError::InvalidSnapshot(_))),
                "{snapshot:?}"
            );
        }

        let good = reference_game().snapshot();

        // Same piece on two cells
        check(&good, |s| {
            s.stacks = vec![
                (Cell::new(0, 0), vec![piece("wA1")]),
                (Cell::new(1, 0), vec![piece("wA1")]),
            ];
            s.white_hand.retain(|&p| p != piece("wA1"));
        });
        // In hand and on the board
        check(&good, |s| s.white_hand.push(piece("wS1")));
        // Black piece in the white hand
        check(&good, |s| {
            s.black_hand.retain(|&p| p != piece("bA2"));
            s.white_hand.push(piece("bA2"));
        });
        check(&good, |s| s.stacks.push((Cell::new(2, 2), Vec::new())));
        check(&good, |s| s.stacks.push((Cell::new(9, 0), vec![piece("wA1")])));
        check(&good, |s| {
            let (cell, _) = s.stacks[0].clone();
            s.stacks.push((cell, vec![piece("bA2")]));
        });
        check(&good, |s| s.boundaries = (1, 1, 3, 3));
        check(&good, |s| s.boundaries = (i32::MIN, -1, i32::MAX, 2));

        assert!(Hive::from_snapshot(&good).is_ok());
    }
}
