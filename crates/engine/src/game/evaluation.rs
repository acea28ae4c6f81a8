use super::Game;
use crate::types::*;

/// Centipawn value of a piece kind. Kings are not counted.
pub fn material_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Bonus for each piece standing on c3-f6.
pub const CENTRAL_BONUS: i32 = 5;

fn is_central(square: Square) -> bool {
    (2..=5).contains(&square.file()) && (2..=5).contains(&square.rank())
}

impl Game {
    /// Static score in centipawns from White's point of view.
    pub fn evaluate(&self) -> i32 {
        let mut score = 0;
        for square in Square::all() {
            let Some(piece) = self.board.get_piece(square) else {
                continue;
            };
            let mut value = material_value(piece.kind);
            if is_central(square) {
                value += CENTRAL_BONUS;
            }
            score += match piece.color {
                Color::White => value,
                Color::Black => -value,
            };
        }
        score
    }
}
