use tracing::{debug, warn};

use super::moves::en_passant_victim;
use super::Game;
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::*;

/// Home square side of a rook: `Some(true)` for h-file, `Some(false)` for a-file.
fn rook_home_side(color: Color, square: Square) -> Option<bool> {
    let rank = color.home_rank();
    if square == Square::new(7, rank) {
        Some(true)
    } else if square == Square::new(0, rank) {
        Some(false)
    } else {
        None
    }
}

/// Rook origin and destination for a castle.
fn castling_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let rank = color.home_rank();
    if kingside {
        (Square::new(7, rank), Square::new(5, rank))
    } else {
        (Square::new(0, rank), Square::new(3, rank))
    }
}

/// Piece placement effects of `mv`. No rule checks.
pub(crate) fn apply_to_board(board: &mut Board, mv: &Move) {
    let color = mv.piece.color;
    board.relocate(mv.from, mv.to);

    match mv.kind {
        MoveKind::Castling => {
            let (rook_from, rook_to) = castling_rook_squares(color, mv.is_kingside_castle());
            board.relocate(rook_from, rook_to);
        }
        MoveKind::EnPassant => {
            if let Some(victim) = en_passant_victim(mv.to, color) {
                board.set_piece(victim, None);
            }
        }
        _ => {
            if let Some(kind) = mv.promotion {
                board.set_piece(mv.to, Some(Piece::new(kind, color)));
            }
        }
    }
}

impl Game {
    /// Validate and apply a move. An illegal move leaves the game untouched.
    pub fn make_move(&mut self, mv: &Move) -> EngineResult<()> {
        if !self.is_legal_move(mv) {
            debug!(mv = %mv, fen = %self.to_fen(), "rejected illegal move");
            return Err(EngineError::IllegalMove { notation: mv.to_string() });
        }

        self.snapshots.push(self.snapshot());
        self.apply_move(mv);
        self.move_history.push(*mv);
        self.update_status();

        debug!(mv = %mv, status = %self.status, "move applied");
        Ok(())
    }

    fn apply_move(&mut self, mv: &Move) {
        let color = mv.piece.color;
        apply_to_board(&mut self.board, mv);

        // Castling rights
        match mv.piece.kind {
            PieceKind::King => self.castling_rights.remove_color(color),
            PieceKind::Rook => {
                if let Some(kingside) = rook_home_side(color, mv.from) {
                    self.castling_rights.remove(color, kingside);
                }
            }
            _ => {}
        }
        if let Some(captured) = mv.captured {
            if captured.kind == PieceKind::Rook {
                if let Some(kingside) = rook_home_side(captured.color, mv.to) {
                    self.castling_rights.remove(captured.color, kingside);
                }
            }
        }

        // En passant target only survives one ply after a double push
        let rank_delta = (mv.to.rank() as i8 - mv.from.rank() as i8).abs();
        self.en_passant_target = if mv.piece.kind == PieceKind::Pawn && rank_delta == 2 {
            Some(Square((mv.from.0 + mv.to.0) / 2))
        } else {
            None
        };

        if mv.piece.kind == PieceKind::Pawn || mv.captured.is_some() {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock = self.half_move_clock.saturating_add(1);
        }

        if color == Color::Black {
            self.full_move_number = self.full_move_number.saturating_add(1);
        }
        self.active_color = color.opposite();
    }

    /// Take back the last move and return it.
    pub fn undo_move(&mut self) -> EngineResult<Move> {
        let Some(last) = self.move_history.pop() else {
            return Err(EngineError::NothingToUndo);
        };

        match self.snapshots.pop() {
            Some(snapshot) => self.restore(snapshot),
            None => {
                warn!("undo snapshot missing, replaying history");
                self.replay_history()?;
            }
        }

        debug!(mv = %last, "move undone");
        Ok(last)
    }

    /// Rebuild the position by replaying `move_history` from the start.
    fn replay_history(&mut self) -> EngineResult<()> {
        let history = std::mem::take(&mut self.move_history);
        let mut replay = self.starting_game()?;
        for mv in &history {
            replay.make_move(mv)?;
        }
        *self = replay;
        Ok(())
    }

    /// Fresh game at this game's starting position.
    pub(crate) fn starting_game(&self) -> EngineResult<Game> {
        match &self.starting_fen {
            Some(fen) => Ok(Game::from_fen(fen)?),
            None => Ok(Game::new()),
        }
    }

    /// Recompute `status` for the side to move.
    pub(crate) fn update_status(&mut self) {
        let in_check = self.is_in_check(self.active_color);
        self.status = if self.has_legal_move() {
            if in_check {
                GameStatus::Check
            } else {
                GameStatus::InProgress
            }
        } else if in_check {
            match self.active_color {
                Color::White => GameStatus::BlackWins,
                Color::Black => GameStatus::WhiteWins,
            }
        } else {
            GameStatus::Draw
        };
    }
}
