use engine::{Game, Move, PieceKind, Square};

use crate::types::*;

/// The four center squares d4, e4, d5, e5.
fn is_center(square: Square) -> bool {
    (3..=4).contains(&square.file()) && (3..=4).contains(&square.rank())
}

/// One-ply score of `mv` in `game`: capture value, center landing and early
/// minor-piece development. Higher is better for the side to move.
pub fn score_move(game: &Game, mv: &Move) -> i32 {
    let mut score = 0;

    if let Some(captured) = mv.captured {
        score += piece_value(captured.kind);
    }

    if is_center(mv.to) {
        score += CENTER_BONUS;
    }

    let is_minor = matches!(mv.piece.kind, PieceKind::Knight | PieceKind::Bishop);
    if is_minor && mv.from.rank() == mv.piece.color.home_rank() && game.move_count() < OPENING_MOVE_LIMIT {
        score += DEVELOPMENT_BONUS;
    }

    score
}
