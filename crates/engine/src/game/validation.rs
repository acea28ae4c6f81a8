use super::moves::{en_passant_victim, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};
use super::state::apply_to_board;
use super::Game;
use crate::board::Board;
use crate::types::*;

impl Game {
    /// Full legality check for a move in the current position.
    pub fn is_legal_move(&self, mv: &Move) -> bool {
        let Some(piece) = self.board.get_piece(mv.from) else {
            return false; // No piece to move
        };
        if piece != mv.piece || piece.color != self.active_color {
            return false;
        }

        // Kings are never captured
        if matches!(self.board.get_piece(mv.to), Some(target) if target.kind == PieceKind::King) {
            return false;
        }

        if !self.follows_movement_rules(mv) {
            return false;
        }

        // Simulate on a copy and make sure our own king is safe afterwards
        let mut scratch = self.board.clone();
        apply_to_board(&mut scratch, mv);
        !is_king_attacked(&scratch, piece.color)
    }

    /// Whether `color`'s king is attacked. False when that king is missing.
    pub fn is_in_check(&self, color: Color) -> bool {
        is_king_attacked(&self.board, color)
    }

    /// Whether `square` is attacked by any piece of `by`.
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        is_square_attacked(&self.board, square, by)
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, true)
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, false)
    }

    /// Castling preconditions, in order: right held, king and rook at home,
    /// path empty, king not in check, no transit or landing square attacked.
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        if !self.castling_rights.has(color, kingside) {
            return false;
        }

        let rank = color.home_rank();
        let king_home = Square::new(4, rank);
        let rook_home = Square::new(if kingside { 7 } else { 0 }, rank);
        if self.board.get_piece(king_home) != Some(Piece::new(PieceKind::King, color))
            || self.board.get_piece(rook_home) != Some(Piece::new(PieceKind::Rook, color))
        {
            return false;
        }

        let between: &[u8] = if kingside { &[5, 6] } else { &[1, 2, 3] };
        if between.iter().any(|&file| !self.board.is_empty(Square::new(file, rank))) {
            return false;
        }

        if self.is_in_check(color) {
            return false;
        }

        // Walk the king one square at a time on a copy
        let step = if kingside { 1 } else { -1 };
        let mut scratch = self.board.clone();
        let mut current = king_home;
        for _ in 0..2 {
            let Some(next) = current.offset(step, 0) else {
                return false;
            };
            scratch.relocate(current, next);
            if is_square_attacked(&scratch, next, color.opposite()) {
                return false;
            }
            current = next;
        }
        true
    }

    fn follows_movement_rules(&self, mv: &Move) -> bool {
        if mv.from == mv.to || !mv.to.is_valid() {
            return false;
        }

        if mv.kind == MoveKind::Castling {
            return match castle_side(mv) {
                Some(kingside) => self.can_castle(mv.piece.color, kingside),
                None => false,
            };
        }

        let target = self.board.get_piece(mv.to);
        if matches!(target, Some(p) if p.color == mv.piece.color) {
            return false; // Can't capture your own piece
        }

        if !promotion_is_consistent(mv) {
            return false;
        }

        if mv.kind == MoveKind::EnPassant {
            return self.is_en_passant_capture(mv);
        }

        // The move's capture info has to match the board
        if mv.captured != target {
            return false;
        }
        match (mv.kind, target) {
            (MoveKind::Normal, Some(_)) | (MoveKind::Capture, None) => return false,
            _ => {}
        }

        let df = (mv.to.file() as i8 - mv.from.file() as i8).abs();
        let dr = (mv.to.rank() as i8 - mv.from.rank() as i8).abs();
        match mv.piece.kind {
            PieceKind::Pawn => self.is_pawn_step(mv, target.is_some()),
            PieceKind::Knight => (df == 1 && dr == 2) || (df == 2 && dr == 1),
            PieceKind::Bishop => df == dr && self.path_is_clear(mv.from, mv.to),
            PieceKind::Rook => (df == 0 || dr == 0) && self.path_is_clear(mv.from, mv.to),
            PieceKind::Queen => (df == dr || df == 0 || dr == 0) && self.path_is_clear(mv.from, mv.to),
            PieceKind::King => df <= 1 && dr <= 1,
        }
    }

    fn is_pawn_step(&self, mv: &Move, captures: bool) -> bool {
        let direction = mv.piece.color.pawn_direction();
        let dr = mv.to.rank() as i8 - mv.from.rank() as i8;
        let df = (mv.to.file() as i8 - mv.from.file() as i8).abs();
        let start_rank = match mv.piece.color {
            Color::White => 1,
            Color::Black => 6,
        };

        if df == 1 {
            return captures && dr == direction;
        }
        if df != 0 || captures {
            return false;
        }
        if dr == direction {
            return true;
        }
        dr == 2 * direction
            && mv.from.rank() == start_rank
            && mv.from.offset(0, direction).is_some_and(|mid| self.board.is_empty(mid))
    }

    fn is_en_passant_capture(&self, mv: &Move) -> bool {
        if mv.piece.kind != PieceKind::Pawn || self.en_passant_target != Some(mv.to) {
            return false;
        }
        let dr = mv.to.rank() as i8 - mv.from.rank() as i8;
        let df = (mv.to.file() as i8 - mv.from.file() as i8).abs();
        if df != 1 || dr != mv.piece.color.pawn_direction() || !self.board.is_empty(mv.to) {
            return false;
        }

        let expected = Piece::new(PieceKind::Pawn, mv.piece.color.opposite());
        let victim = en_passant_victim(mv.to, mv.piece.color).and_then(|sq| self.board.get_piece(sq));
        victim == Some(expected) && mv.captured == victim
    }

    /// Every square strictly between `from` and `to` on a straight line is empty.
    fn path_is_clear(&self, from: Square, to: Square) -> bool {
        let df = (to.file() as i8 - from.file() as i8).signum();
        let dr = (to.rank() as i8 - from.rank() as i8).signum();
        let mut current = from;
        loop {
            let Some(next) = current.offset(df, dr) else {
                return false;
            };
            if next == to {
                return true;
            }
            if !self.board.is_empty(next) {
                return false;
            }
            current = next;
        }
    }
}

/// Kingside (`true`) or queenside for a king move between castling squares.
fn castle_side(mv: &Move) -> Option<bool> {
    let rank = mv.piece.color.home_rank();
    if mv.piece.kind != PieceKind::King || mv.from != Square::new(4, rank) {
        return None;
    }
    match mv.to {
        to if to == Square::new(6, rank) => Some(true),
        to if to == Square::new(2, rank) => Some(false),
        _ => None,
    }
}

/// A pawn reaching the last rank must promote to Q/R/B/N; nothing else may.
fn promotion_is_consistent(mv: &Move) -> bool {
    let reaches_last_rank =
        mv.piece.kind == PieceKind::Pawn && mv.to.rank() == mv.piece.color.opposite().home_rank();
    if reaches_last_rank {
        mv.kind == MoveKind::Promotion
            && mv.promotion.is_some_and(|kind| PieceKind::PROMOTIONS.contains(&kind))
    } else {
        mv.kind != MoveKind::Promotion && mv.promotion.is_none()
    }
}

pub(crate) fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Ray-traced attack test, independent of whose turn it is.
pub(crate) fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    sliding_threat(board, square, by)
        || step_threat(board, square, by, &KNIGHT_OFFSETS, PieceKind::Knight)
        || step_threat(board, square, by, &KING_OFFSETS, PieceKind::King)
        || pawn_threat(board, square, by)
}

fn sliding_threat(board: &Board, square: Square, by: Color) -> bool {
    let rays = ROOK_DIRECTIONS
        .iter()
        .map(|&dir| (dir, PieceKind::Rook))
        .chain(BISHOP_DIRECTIONS.iter().map(|&dir| (dir, PieceKind::Bishop)));

    for ((df, dr), slider) in rays {
        if let Some(piece) = cast_ray(board, square, df, dr) {
            if piece.color == by && (piece.kind == slider || piece.kind == PieceKind::Queen) {
                return true;
            }
        }
    }
    false
}

/// First piece met walking from `square` in direction (df, dr).
fn cast_ray(board: &Board, square: Square, df: i8, dr: i8) -> Option<Piece> {
    let mut current = square;
    while let Some(next) = current.offset(df, dr) {
        if let Some(piece) = board.get_piece(next) {
            return Some(piece);
        }
        current = next;
    }
    None
}

fn step_threat(board: &Board, square: Square, by: Color, offsets: &[(i8, i8)], kind: PieceKind) -> bool {
    offsets.iter().any(|&(df, dr)| {
        square
            .offset(df, dr)
            .and_then(|sq| board.get_piece(sq))
            .is_some_and(|piece| piece == Piece::new(kind, by))
    })
}

fn pawn_threat(board: &Board, square: Square, by: Color) -> bool {
    // An attacking pawn sits one step behind the square from its own point of view
    let back = -by.pawn_direction();
    [-1, 1].iter().any(|&df| {
        square
            .offset(df, back)
            .and_then(|sq| board.get_piece(sq))
            .is_some_and(|piece| piece == Piece::new(PieceKind::Pawn, by))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_piece_cannot_expose_king() {
        // Bishop on e2 pinned by the rook on e8
        let game = Game::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let moves = game.legal_moves_from(Square::new(4, 1));
        assert!(moves.is_empty(), "pinned bishop has no legal moves, got {:?}", moves);
    }

    #[test]
    fn test_is_legal_move_rejects_mismatched_moves() {
        let game = Game::new();
        let mut mv = game.parse_move("e2e4").unwrap();
        assert!(game.is_legal_move(&mv));

        mv.piece = Piece::new(PieceKind::Queen, Color::White);
        assert!(!game.is_legal_move(&mv), "piece must match the board");

        let triple = game.parse_move("e2e5").unwrap();
        assert!(!game.is_legal_move(&triple));

        let own_capture = game.parse_move("a1a2").unwrap();
        assert!(!game.is_legal_move(&own_capture));
    }

    #[test]
    fn test_pawn_on_last_rank_must_promote() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let bare = game.parse_move("a7a8").unwrap();
        let promoted = game.parse_move("a7a8q").unwrap();

        assert!(!game.is_legal_move(&bare));
        assert!(game.is_legal_move(&promoted));

        let early = Game::new().parse_move("e2e4q").unwrap();
        assert!(!Game::new().is_legal_move(&early), "promotion only on the last rank");
    }

    #[test]
    fn test_king_capture_is_never_legal() {
        // Checking the king is fine, taking it is not
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        let mv = game.parse_move("h1h8").unwrap();
        assert!(game.is_legal_move(&mv));

        let adjacent = Game::from_fen("8/8/8/8/8/8/3k4/4K3 w - - 0 1").unwrap();
        let capture = adjacent.parse_move("e1d2").unwrap();
        assert!(!adjacent.is_legal_move(&capture));
    }

    #[test]
    fn test_attack_detection() {
        let game = Game::new();
        assert!(game.is_square_attacked(Square::new(4, 2), Color::White), "e3 covered by pawns");
        assert!(game.is_square_attacked(Square::new(5, 2), Color::White), "f3 covered by g1 knight");
        assert!(!game.is_square_attacked(Square::new(4, 3), Color::White));
        assert!(game.is_square_attacked(Square::new(4, 5), Color::Black));
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let game = Game::from_fen("8/8/8/8/8/8/8/R7 w - - 0 1").unwrap();
        assert!(!game.is_in_check(Color::White));
        assert!(!game.is_in_check(Color::Black));
    }

    #[test]
    fn test_castling_blocked_by_attacked_transit() {
        // Black rook on f8 covers f1
        let game = Game::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!game.can_castle(Color::White, true));
        assert!(game.can_castle(Color::White, false));
    }

    #[test]
    fn test_castling_requires_rights_and_empty_path() {
        let no_rights = Game::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(!no_rights.can_castle(Color::White, true));

        let blocked = Game::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        assert!(!blocked.can_castle(Color::White, true));
        assert!(!blocked.can_castle(Color::White, false));

        let in_check = Game::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!in_check.can_castle(Color::White, true));
    }

    #[test]
    fn test_en_passant_requires_target_square() {
        let without = Game::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = without.parse_move("e5d6").unwrap();
        assert_eq!(mv.kind, MoveKind::Normal);
        assert!(!without.is_legal_move(&mv));

        let with = Game::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let ep = with.parse_move("e5d6").unwrap();
        assert!(with.is_legal_move(&ep));
    }
}
