use tracing::debug;

use super::Game;
use crate::error::{EngineResult, NotationError};
use crate::types::*;

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1),
    (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Square of the pawn taken by an en passant capture landing on `target`.
pub(crate) fn en_passant_victim(target: Square, mover: Color) -> Option<Square> {
    target.offset(0, -mover.pawn_direction())
}

impl Game {
    /// Parse coordinate notation (`e2e4`, `e7e8q`) or a castling token
    /// (`O-O`, `0-0-0`) against the current position.
    ///
    /// Only syntax and the moving piece are checked here; whether the move is
    /// actually allowed is decided by `is_legal_move`.
    pub fn parse_move(&self, notation: &str) -> Result<Move, NotationError> {
        let notation = notation.trim();
        match notation {
            "O-O" | "0-0" => return self.parse_castling(true),
            "O-O-O" | "0-0-0" => return self.parse_castling(false),
            _ => {}
        }

        let chars: Vec<char> = notation.chars().collect();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(NotationError::WrongLength {
                notation: notation.to_string(),
                len: chars.len(),
            });
        }

        let from_text: String = chars[0..2].iter().collect();
        let to_text: String = chars[2..4].iter().collect();
        let from = Square::from_algebraic(&from_text)?;
        let to = Square::from_algebraic(&to_text)?;

        let piece = self
            .board
            .get_piece(from)
            .ok_or_else(|| NotationError::NoPieceToMove { square: from.to_string() })?;
        if piece.color != self.active_color {
            return Err(NotationError::WrongColor { square: from.to_string() });
        }

        let mut mv = Move::new(from, to, piece);
        if let Some(target) = self.board.get_piece(to) {
            mv.kind = MoveKind::Capture;
            mv.captured = Some(target);
        } else if piece.kind == PieceKind::Pawn
            && from.file() != to.file()
            && self.en_passant_target == Some(to)
        {
            mv.kind = MoveKind::EnPassant;
            mv.captured = en_passant_victim(to, piece.color).and_then(|sq| self.board.get_piece(sq));
        }

        if let Some(&suffix) = chars.get(4) {
            let kind = PieceKind::from_promotion_char(suffix)
                .ok_or(NotationError::InvalidPromotion(suffix))?;
            if piece.kind != PieceKind::Pawn {
                return Err(NotationError::UnexpectedPromotion {
                    piece: format!("{:?}", piece.kind).to_lowercase(),
                });
            }
            mv.kind = MoveKind::Promotion;
            mv.promotion = Some(kind);
        }

        Ok(mv)
    }

    fn parse_castling(&self, kingside: bool) -> Result<Move, NotationError> {
        let color = self.active_color;
        let home = Square::new(4, color.home_rank());
        let king = Piece::new(PieceKind::King, color);
        if self.board.get_piece(home) != Some(king) {
            return Err(NotationError::KingNotHome);
        }

        let target_file = if kingside { 6 } else { 2 };
        let mut mv = Move::new(home, Square::new(target_file, color.home_rank()), king);
        mv.kind = MoveKind::Castling;
        Ok(mv)
    }

    /// Parse and play a move in one step.
    pub fn play(&mut self, notation: &str) -> EngineResult<Move> {
        let mv = self.parse_move(notation)?;
        self.make_move(&mv)?;
        Ok(mv)
    }

    /// All legal moves for the side to move.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (square, _) in self.board.pieces(self.active_color) {
            moves.extend(self.legal_moves_from(square));
        }
        debug!(count = moves.len(), color = %self.active_color, "generated legal moves");
        moves
    }

    /// Legal moves of the piece on `square`. Empty when the square is empty
    /// or holds a piece of the side not on move.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        match self.board.get_piece(square) {
            Some(piece) if piece.color == self.active_color => self
                .pseudo_legal_moves_from(square)
                .into_iter()
                .filter(|mv| self.is_legal_move(mv))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True as soon as one legal move is found.
    pub(crate) fn has_legal_move(&self) -> bool {
        self.board
            .pieces(self.active_color)
            .any(|(square, _)| !self.legal_moves_from(square).is_empty())
    }

    /// Moves following the piece's movement pattern, ignoring king safety.
    pub(crate) fn pseudo_legal_moves_from(&self, square: Square) -> Vec<Move> {
        let Some(piece) = self.board.get_piece(square) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(square, piece, &mut moves),
            PieceKind::Knight => self.step_moves(square, piece, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop => self.sliding_moves(square, piece, &BISHOP_DIRECTIONS, &mut moves),
            PieceKind::Rook => self.sliding_moves(square, piece, &ROOK_DIRECTIONS, &mut moves),
            PieceKind::Queen => {
                self.sliding_moves(square, piece, &ROOK_DIRECTIONS, &mut moves);
                self.sliding_moves(square, piece, &BISHOP_DIRECTIONS, &mut moves);
            }
            PieceKind::King => {
                self.step_moves(square, piece, &KING_OFFSETS, &mut moves);
                self.castling_moves(square, piece, &mut moves);
            }
        }
        moves
    }

    fn pawn_moves(&self, from: Square, pawn: Piece, moves: &mut Vec<Move>) {
        let direction = pawn.color.pawn_direction();
        let start_rank = match pawn.color {
            Color::White => 1,
            Color::Black => 6,
        };

        // Pushes
        if let Some(one) = from.offset(0, direction) {
            if self.board.is_empty(one) {
                push_pawn_move(Move::new(from, one, pawn), moves);

                if from.rank() == start_rank {
                    if let Some(two) = from.offset(0, 2 * direction) {
                        if self.board.is_empty(two) {
                            moves.push(Move::new(from, two, pawn));
                        }
                    }
                }
            }
        }

        // Captures, including en passant
        for df in [-1, 1] {
            let Some(to) = from.offset(df, direction) else {
                continue;
            };
            match self.board.get_piece(to) {
                Some(target) if target.color != pawn.color => {
                    push_pawn_move(Move::with_capture(from, to, pawn, target), moves);
                }
                None if self.en_passant_target == Some(to) => {
                    let victim = en_passant_victim(to, pawn.color).and_then(|sq| self.board.get_piece(sq));
                    let mut mv = Move::new(from, to, pawn);
                    mv.kind = MoveKind::EnPassant;
                    mv.captured = victim;
                    moves.push(mv);
                }
                _ => {}
            }
        }
    }

    fn step_moves(&self, from: Square, piece: Piece, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(df, dr) in offsets {
            let Some(to) = from.offset(df, dr) else {
                continue;
            };
            match self.board.get_piece(to) {
                None => moves.push(Move::new(from, to, piece)),
                Some(target) if target.color != piece.color => {
                    moves.push(Move::with_capture(from, to, piece, target));
                }
                Some(_) => {}
            }
        }
    }

    fn sliding_moves(&self, from: Square, piece: Piece, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(df, dr) in directions {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                match self.board.get_piece(to) {
                    None => moves.push(Move::new(from, to, piece)),
                    Some(target) => {
                        if target.color != piece.color {
                            moves.push(Move::with_capture(from, to, piece, target));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    fn castling_moves(&self, from: Square, king: Piece, moves: &mut Vec<Move>) {
        if from != Square::new(4, king.color.home_rank()) {
            return;
        }
        for kingside in [true, false] {
            if self.can_castle(king.color, kingside) {
                let file = if kingside { 6 } else { 2 };
                let mut mv = Move::new(from, Square::new(file, king.color.home_rank()), king);
                mv.kind = MoveKind::Castling;
                moves.push(mv);
            }
        }
    }
}

/// Push a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(mv: Move, moves: &mut Vec<Move>) {
    let last_rank = mv.piece.color.opposite().home_rank();
    if mv.to.rank() != last_rank {
        moves.push(mv);
        return;
    }
    for kind in PieceKind::PROMOTIONS {
        moves.push(Move {
            kind: MoveKind::Promotion,
            promotion: Some(kind),
            ..mv
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_move() {
        let game = Game::new();
        let mv = game.parse_move("e2e4").unwrap();

        assert_eq!(mv.from, Square::new(4, 1));
        assert_eq!(mv.to, Square::new(4, 3));
        assert_eq!(mv.kind, MoveKind::Normal);
        assert_eq!(mv.piece, Piece::new(PieceKind::Pawn, Color::White));
        assert_eq!(mv.captured, None);
    }

    #[test]
    fn test_parse_rejects_bad_notation() {
        let game = Game::new();

        assert!(matches!(game.parse_move("e2"), Err(NotationError::WrongLength { len: 2, .. })));
        assert!(matches!(game.parse_move("e2e4e5"), Err(NotationError::WrongLength { .. })));
        assert!(matches!(game.parse_move("z9e4"), Err(NotationError::InvalidSquare(_))));
        assert!(matches!(game.parse_move("e4e5"), Err(NotationError::NoPieceToMove { .. })));
        assert!(matches!(game.parse_move("e7e5"), Err(NotationError::WrongColor { .. })));
        assert!(matches!(game.parse_move("e2e4x"), Err(NotationError::InvalidPromotion('x'))));
        assert!(matches!(
            game.parse_move("g1f3q"),
            Err(NotationError::UnexpectedPromotion { .. })
        ));
    }

    #[test]
    fn test_parse_castling_tokens() {
        let game = Game::new();
        let kingside = game.parse_move("O-O").unwrap();
        assert_eq!(kingside.kind, MoveKind::Castling);
        assert_eq!((kingside.from, kingside.to), (Square::E1, Square::G1));

        let queenside = game.parse_move("0-0-0").unwrap();
        assert_eq!((queenside.from, queenside.to), (Square::E1, Square::C1));

        let moved = Game::from_fen("4k3/8/8/8/8/8/8/3K3R w - - 0 1").unwrap();
        assert_eq!(moved.parse_move("O-O"), Err(NotationError::KingNotHome));
    }

    #[test]
    fn test_parse_promotion_keeps_capture() {
        let game = Game::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = game.parse_move("a7b8n").unwrap();

        assert_eq!(mv.kind, MoveKind::Promotion);
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert_eq!(mv.captured, Some(Piece::new(PieceKind::Knight, Color::Black)));
    }

    #[test]
    fn test_parse_en_passant() {
        let game = Game::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = game.parse_move("e5d6").unwrap();

        assert_eq!(mv.kind, MoveKind::EnPassant);
        assert_eq!(mv.captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
    }

    #[test]
    fn test_starting_position_move_count() {
        let game = Game::new();
        assert_eq!(game.all_legal_moves().len(), 20);
        assert_eq!(game.legal_moves_from(Square::G1).len(), 2);
        assert!(game.legal_moves_from(Square::E8).is_empty(), "black pieces are not on move");
        assert!(game.legal_moves_from(Square::new(4, 4)).is_empty());
    }

    #[test]
    fn test_promotions_expand_to_four_moves() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = game.legal_moves_from(Square::new(0, 6));

        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mv| mv.kind == MoveKind::Promotion));
        for kind in PieceKind::PROMOTIONS {
            assert!(moves.iter().any(|mv| mv.promotion == Some(kind)), "missing {:?}", kind);
        }
    }

    #[test]
    fn test_castling_moves_generated() {
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles: Vec<Move> = game
            .legal_moves_from(Square::E1)
            .into_iter()
            .filter(|mv| mv.is_castling())
            .collect();

        assert_eq!(castles.len(), 2);
        assert!(castles.iter().any(|mv| mv.to == Square::G1));
        assert!(castles.iter().any(|mv| mv.to == Square::C1));
    }
}
