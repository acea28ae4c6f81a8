use tracing::warn;

use super::Game;
use crate::types::*;

impl Game {
    /// Standard Algebraic Notation for every move played so far.
    ///
    /// Moves are replayed from the starting position. If replay diverges from
    /// the recorded history, the moves rendered up to that point are returned.
    pub fn generate_san(&self) -> Vec<String> {
        let mut replay = match self.starting_game() {
            Ok(game) => game,
            Err(err) => {
                warn!(%err, "cannot rebuild starting position for SAN");
                return Vec::new();
            }
        };

        let mut moves = Vec::with_capacity(self.move_history.len());
        for mv in &self.move_history {
            moves.push(replay.san(mv));
            if let Err(err) = replay.make_move(mv) {
                warn!(%err, mv = %mv, "SAN replay diverged from history");
                break;
            }
        }
        moves
    }

    /// SAN of `mv` in the current position, with `+` or `#` when it applies.
    pub fn san(&self, mv: &Move) -> String {
        let mut text = String::new();

        if mv.is_castling() {
            text.push_str(if mv.is_kingside_castle() { "O-O" } else { "O-O-O" });
        } else if mv.piece.kind == PieceKind::Pawn {
            if mv.is_capture() {
                text.push(file_char(mv.from));
                text.push('x');
            }
            text.push_str(&mv.to.to_string());
            if let Some(kind) = mv.promotion {
                text.push('=');
                text.push(kind.letter());
            }
        } else {
            text.push(mv.piece.kind.letter());
            let (need_file, need_rank) = self.disambiguation(mv);
            if need_file {
                text.push(file_char(mv.from));
            }
            if need_rank {
                text.push(rank_char(mv.from));
            }
            if mv.is_capture() {
                text.push('x');
            }
            text.push_str(&mv.to.to_string());
        }

        let mut after = self.scratch();
        if after.make_move(mv).is_ok() {
            match after.status {
                GameStatus::WhiteWins | GameStatus::BlackWins => text.push('#'),
                GameStatus::Check => text.push('+'),
                GameStatus::InProgress | GameStatus::Draw => {}
            }
        }
        text
    }

    /// Which source coordinates SAN needs to tell `mv` apart from moves of
    /// other same-kind pieces that reach the same square.
    fn disambiguation(&self, mv: &Move) -> (bool, bool) {
        if matches!(mv.piece.kind, PieceKind::Pawn | PieceKind::King) {
            return (false, false);
        }

        let mut need_file = false;
        let mut need_rank = false;
        for (square, piece) in self.board.pieces(mv.piece.color) {
            if square == mv.from || piece.kind != mv.piece.kind {
                continue;
            }
            let reaches_target = self
                .pseudo_legal_moves_from(square)
                .iter()
                .any(|other| other.to == mv.to && self.is_legal_move(other));
            if !reaches_target {
                continue;
            }

            if square.file() == mv.from.file() {
                need_rank = true;
            } else {
                need_file = true;
            }
        }
        (need_file, need_rank)
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.file()) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.rank()) as char
}
