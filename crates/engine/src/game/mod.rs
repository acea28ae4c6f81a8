use crate::board::Board;
use crate::types::*;

// Declare submodules
pub mod evaluation;
pub mod fen;
pub mod moves;
pub mod san;
pub mod state;
pub mod validation;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything `undo_move` needs to put a position back exactly.
#[derive(Debug, Clone)]
struct Snapshot {
    board: Board,
    active_color: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    half_move_clock: u32,
    full_move_number: u32,
    status: GameStatus,
}

/// A chess game: position, rule state and history.
///
/// All methods are synchronous and touch only in-process memory. Callers that
/// share a `Game` across threads serialize mutation themselves; read-only
/// queries can run against a clone.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active_color: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    half_move_clock: u32,
    full_move_number: u32,
    move_history: Vec<Move>,
    status: GameStatus,
    /// FEN the game was loaded from, `None` for the default start.
    starting_fen: Option<String>,
    snapshots: Vec<Snapshot>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active_color: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant_target: None,
            half_move_clock: 0,
            full_move_number: 1,
            move_history: Vec::new(),
            status: GameStatus::InProgress,
            starting_fen: None,
            snapshots: Vec::new(),
        }
    }

    /// Independent copy of the board.
    pub fn board(&self) -> Board {
        self.board.clone()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get_piece(square)
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    /// Full-move number, starting at 1 and bumped after each black move.
    pub fn move_count(&self) -> u32 {
        self.full_move_number
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.last()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn starting_fen(&self) -> Option<&str> {
        self.starting_fen.as_deref()
    }

    pub fn started_from_fen(&self) -> bool {
        self.starting_fen.is_some()
    }

    /// Position-only copy with no history, used for look-ahead.
    fn scratch(&self) -> Game {
        Game {
            board: self.board.clone(),
            active_color: self.active_color,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
            move_history: Vec::new(),
            status: self.status,
            starting_fen: None,
            snapshots: Vec::new(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active_color: self.active_color,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
            status: self.status,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.active_color = snapshot.active_color;
        self.castling_rights = snapshot.castling_rights;
        self.en_passant_target = snapshot.en_passant_target;
        self.half_move_clock = snapshot.half_move_clock;
        self.full_move_number = snapshot.full_move_number;
        self.status = snapshot.status;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
