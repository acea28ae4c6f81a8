use std::fmt;

use crate::types::*;

/// Piece placement only. Rules live in `Game`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Board with the standard starting position.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    pub fn empty() -> Self {
        Self { squares: [None; 64] }
    }

    pub fn setup_starting_position(&mut self) {
        self.squares = [None; 64];

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for (file, &kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            self.set_piece(Square::new(file, 0), Some(Piece::new(kind, Color::White)));
            self.set_piece(Square::new(file, 1), Some(Piece::new(PieceKind::Pawn, Color::White)));
            self.set_piece(Square::new(file, 6), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            self.set_piece(Square::new(file, 7), Some(Piece::new(kind, Color::Black)));
        }
    }

    /// Piece on `square`, `None` for empty or out-of-range squares.
    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.squares.get(square.index()).copied().flatten()
    }

    /// No-op when `square` is off the board.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(slot) = self.squares.get_mut(square.index()) {
            *slot = piece;
        }
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get_piece(square).is_none()
    }

    /// Move whatever stands on `from` to `to`, leaving `from` empty.
    pub fn relocate(&mut self, from: Square, to: Square) {
        let piece = self.get_piece(from);
        self.set_piece(to, piece);
        self.set_piece(from, None);
    }

    /// First king of `color`, if the position has one.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Occupied squares of one color, a1 first.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| match self.get_piece(square) {
            Some(piece) if piece.color == color => Some((square, piece)),
            _ => None,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                match self.get_piece(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "{}", rank + 1)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}
