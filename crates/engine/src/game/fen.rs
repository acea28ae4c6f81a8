use tracing::{debug, warn};

use super::Game;
use crate::board::Board;
use crate::error::FenError;
use crate::types::*;

/// Fully parsed FEN fields, committed to a `Game` only once every field is valid.
struct FenPosition {
    board: Board,
    active_color: Color,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    half_move_clock: u32,
    full_move_number: u32,
}

impl FenPosition {
    fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let board = parse_placement(fields[0])?;

        let active_color = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling_rights = parse_castling(fields[2])?;

        let en_passant_target = match fields[3] {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .map_err(|_| FenError::InvalidEnPassant(text.to_string()))?,
            ),
        };

        let half_move_clock = match fields.get(4) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfMoveClock(text.to_string()))?,
            None => 0,
        };

        let full_move_number = match fields.get(5) {
            Some(text) => match text.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(FenError::InvalidFullMoveNumber(text.to_string())),
            },
            None => 1,
        };

        Ok(Self {
            board,
            active_color,
            castling_rights,
            en_passant_target,
            half_move_clock,
            full_move_number,
        })
    }
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = Board::empty();
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0usize;

        for ch in rank_text.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::InvalidPiece(ch));
                }
                file += skip as usize;
            } else {
                let piece = Piece::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                if file >= 8 {
                    return Err(FenError::RankWidth { rank: rank + 1, files: file + 1 });
                }
                board.set_piece(Square::new(file as u8, rank), Some(piece));
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: rank + 1, files: file });
        }
    }
    Ok(board)
}

fn parse_castling(text: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if text == "-" {
        return Ok(rights);
    }
    for ch in text.chars() {
        match ch {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => return Err(FenError::InvalidCastling(text.to_string())),
        }
    }
    Ok(rights)
}

impl Game {
    /// Build a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut game = Game::new();
        game.parse_fen(fen)?;
        Ok(game)
    }

    /// Replace the position with the one described by `fen`.
    ///
    /// History is cleared and `fen` becomes the starting position for SAN
    /// replay and PGN export. On error the game is left as it was.
    pub fn parse_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fen = fen.trim();
        let position = FenPosition::parse(fen).inspect_err(|err| {
            warn!(%err, fen, "rejected FEN");
        })?;

        self.board = position.board;
        self.active_color = position.active_color;
        self.castling_rights = position.castling_rights;
        self.en_passant_target = position.en_passant_target;
        self.half_move_clock = position.half_move_clock;
        self.full_move_number = position.full_move_number;
        self.move_history.clear();
        self.snapshots.clear();
        self.starting_fen = Some(fen.to_string());
        self.update_status();

        debug!(fen, status = %self.status, "position loaded from FEN");
        Ok(())
    }

    /// Current position as a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.board.get_piece(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let en_passant = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.active_color.fen_char(),
            self.castling_rights,
            en_passant,
            self.half_move_clock,
            self.full_move_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::STARTING_FEN;

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 40",
        ];
        for fen in fens {
            let game = Game::from_fen(fen).unwrap();
            assert_eq!(game.to_fen(), fen);
        }
    }

    #[test]
    fn test_optional_clock_fields_default() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b -  -").unwrap();
        assert_eq!(game.half_move_clock(), 0);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.active_color(), Color::Black);
        assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        let cases: [(&str, FenError); 9] = [
            ("8/8/8 w", FenError::FieldCount(2)),
            ("8/8/8/8/8/8/8 w - - 0 1", FenError::RankCount(7)),
            ("9/8/8/8/8/8/8/8 w - - 0 1", FenError::InvalidPiece('9')),
            ("7/8/8/8/8/8/8/8 w - - 0 1", FenError::RankWidth { rank: 8, files: 7 }),
            ("8/8/8/8/8/8/8/7X w - - 0 1", FenError::InvalidPiece('X')),
            ("8/8/8/8/8/8/8/8 x - - 0 1", FenError::InvalidActiveColor("x".into())),
            ("8/8/8/8/8/8/8/8 w KX - 0 1", FenError::InvalidCastling("KX".into())),
            ("8/8/8/8/8/8/8/8 w - e9 0 1", FenError::InvalidEnPassant("e9".into())),
            ("8/8/8/8/8/8/8/8 w - - 0 0", FenError::InvalidFullMoveNumber("0".into())),
        ];
        for (fen, expected) in cases {
            assert_eq!(Game::from_fen(fen).err(), Some(expected), "fen: {}", fen);
        }
        assert!(matches!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - - -1 1"),
            Err(FenError::InvalidHalfMoveClock(_))
        ));
    }

    #[test]
    fn test_failed_parse_keeps_previous_state() {
        let mut game = Game::new();
        game.play("e2e4").unwrap();
        let before = game.to_fen();

        assert!(game.parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0").is_ok());
        assert!(game.move_history().is_empty());

        let loaded = game.to_fen();
        assert_ne!(loaded, before);
        assert!(game.parse_fen("not a fen").is_err());
        assert_eq!(game.to_fen(), loaded);
    }

    #[test]
    fn test_late_field_error_keeps_previous_board() {
        let mut game = Game::new();
        game.play("e2e4").unwrap();
        let before = game.to_fen();
        let board = game.board();

        // Placement, colour and castling are fine, the fullmove number is not
        let result = game.parse_fen("4k3/8/8/8/8/8/8/4K3 b KQkq - 0 0");
        assert_eq!(result, Err(FenError::InvalidFullMoveNumber("0".into())));
        assert_eq!(game.board(), board);
        assert_eq!(game.to_fen(), before);
        assert_eq!(game.move_history().len(), 1);
        assert!(!game.started_from_fen());
    }

    #[test]
    fn test_loaded_position_recomputes_status() {
        let mated = Game::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(mated.status(), GameStatus::WhiteWins);
        assert!(mated.started_from_fen());
    }
}
