use engine::perft::{perft, PERFT_POSITIONS};
use engine::*;

fn play_all(game: &mut Game, moves: &[&str]) {
    for mv in moves {
        if let Err(err) = game.play(mv) {
            panic!("move {} failed: {}", mv, err);
        }
    }
}

#[test]
fn fen_round_trip_after_castling() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6", "O-O"],
    );

    let fen = game.to_fen();
    assert_eq!(fen, "r1bqkb1r/1ppp1ppp/p1n2n2/4p3/B3P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 5");
    assert!(!fen.split(' ').nth(2).unwrap().contains('K'));

    let reloaded = Game::from_fen(&fen).unwrap();
    assert_eq!(reloaded.to_fen(), fen);
    assert_eq!(reloaded.board(), game.board());
    assert_eq!(reloaded.castling_rights(), game.castling_rights());
    assert_eq!(reloaded.en_passant_target(), game.en_passant_target());
}

#[test]
fn undo_restores_every_prefix() {
    let moves = ["e2e4", "d7d5", "e4d5", "c7c5", "d5c6", "b8c6", "g1f3", "e7e5", "f1c4", "g8f6", "O-O"];
    let mut game = Game::new();
    let mut fens = vec![game.to_fen()];
    for mv in moves {
        game.play(mv).unwrap();
        fens.push(game.to_fen());
    }

    while let Some(expected) = fens.pop() {
        assert_eq!(game.to_fen(), expected);
        if fens.is_empty() {
            break;
        }
        game.undo_move().unwrap();
    }
    assert_eq!(game.to_fen(), STARTING_FEN);
    assert!(game.move_history().is_empty());
    assert_eq!(game.undo_move(), Err(EngineError::NothingToUndo));
}

#[test]
fn undo_every_move_of_reference_positions() {
    for case in PERFT_POSITIONS {
        let mut game = Game::from_fen(case.fen).unwrap();
        let start = game.to_fen();
        for mv in game.all_legal_moves() {
            game.make_move(&mv).unwrap();
            game.undo_move().unwrap();
            assert_eq!(game.to_fen(), start, "{}: undo of {} drifted", case.name, mv);
        }
    }
}

#[test]
fn generated_moves_are_legal_and_king_safe() {
    for case in PERFT_POSITIONS {
        let game = Game::from_fen(case.fen).unwrap();
        let mover = game.active_color();
        for mv in game.all_legal_moves() {
            assert!(game.is_legal_move(&mv), "{}: {} failed legality", case.name, mv);

            let mut after = game.clone();
            after.make_move(&mv).unwrap();
            assert!(!after.is_in_check(mover), "{}: {} leaves king in check", case.name, mv);
        }
    }
}

#[test]
fn promotion_check_is_not_mate() {
    let game = Game::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mv = game.parse_move("e7e8Q").unwrap();
    assert_eq!(game.san(&mv), "e8=Q+");

    let mut after = game.clone();
    after.make_move(&mv).unwrap();
    assert_eq!(after.status(), GameStatus::Check);
}

#[test]
fn back_rank_mate_is_marked() {
    let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    game.play("a1a8").unwrap();

    assert_eq!(game.status(), GameStatus::WhiteWins);
    assert_eq!(game.generate_san(), vec!["Ra8#"]);
}

#[test]
fn san_disambiguation() {
    let same_file = Game::from_fen("4k3/8/8/8/8/1N6/8/1N2K3 w - - 0 1").unwrap();
    let mv = same_file.parse_move("b1d2").unwrap();
    assert_eq!(same_file.san(&mv), "N1d2");

    let same_rank = Game::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
    let mv = same_rank.parse_move("f1d2").unwrap();
    assert_eq!(same_rank.san(&mv), "Nfd2");

    let rooks = Game::from_fen("4k3/8/8/8/8/6K1/8/R2n3R w - - 0 1").unwrap();
    let mv = rooks.parse_move("a1d1").unwrap();
    assert_eq!(rooks.san(&mv), "Raxd1");
}

#[test]
fn en_passant_san_is_plain_capture() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);

    assert_eq!(game.generate_san().last().map(String::as_str), Some("exd6"));
    assert_eq!(game.piece_at(Square::from_algebraic("d5").unwrap()), None);
}

#[test]
fn starting_position_invariants() {
    let game = Game::new();
    assert_eq!(game.active_color(), Color::White);
    assert_eq!(game.move_count(), 1);
    assert!(game.move_history().is_empty());
    assert_eq!(game.castling_rights(), CastlingRights::all());
    assert_eq!(game.to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
}

fn assert_castle_rejected(fen: &str, token: &str) {
    let mut game = Game::from_fen(fen).unwrap();
    let mv = game.parse_move(token).unwrap();

    assert!(!game.is_legal_move(&mv));
    assert!(matches!(game.make_move(&mv), Err(EngineError::IllegalMove { .. })));
    assert_eq!(game.to_fen(), Game::from_fen(fen).unwrap().to_fen(), "state must be untouched");
}

#[test]
fn castling_denied_when_path_blocked() {
    assert_castle_rejected("4k3/8/8/8/8/8/8/R3KB1R w KQ - 0 1", "O-O");
}

#[test]
fn castling_denied_when_in_check() {
    assert_castle_rejected("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1", "O-O");
}

#[test]
fn castling_denied_through_attacked_square() {
    assert_castle_rejected("3rk3/8/8/8/8/8/8/R3K2R w KQ - 0 1", "O-O-O");
}

#[test]
fn stalemate_and_checkmate_status() {
    let stalemate = Game::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
    assert_eq!(stalemate.status(), GameStatus::Draw);
    assert!(!stalemate.is_in_check(Color::Black));

    let mate = Game::from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(mate.status(), GameStatus::WhiteWins);
    assert!(mate.is_in_check(Color::Black));
}

#[test]
fn perft_reference_counts() {
    let expectations: [(usize, &[u64]); 3] = [(0, &[20, 400, 8_902]), (1, &[48, 2_039]), (2, &[14, 191, 2_812])];
    for (index, counts) in expectations {
        let case = &PERFT_POSITIONS[index];
        let mut game = Game::from_fen(case.fen).unwrap();
        for (depth, &expected) in counts.iter().enumerate() {
            let nodes = perft(&mut game, depth as u32 + 1).unwrap();
            assert_eq!(nodes, expected, "{} depth {}", case.name, depth + 1);
        }
    }
}

#[test]
fn value_types_serialize_in_snake_case() {
    let game = Game::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let mv = game.parse_move("e5d6").unwrap();

    let json = serde_json::to_string(&mv).unwrap();
    assert!(json.contains("\"kind\":\"en_passant\""), "{}", json);
    assert_eq!(serde_json::to_string(&GameStatus::WhiteWins).unwrap(), "\"white_wins\"");

    let back: Move = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mv);
}

#[test]
fn parse_errors_are_distinct_from_illegal_moves() {
    let mut game = Game::new();
    assert!(matches!(game.play("e9e4"), Err(EngineError::Notation(NotationError::InvalidSquare(_)))));
    assert!(matches!(game.play("e2e5"), Err(EngineError::IllegalMove { .. })));
    assert!(matches!(
        game.parse_fen("bad fen"),
        Err(FenError::FieldCount(2))
    ));
    assert_eq!(game.to_fen(), STARTING_FEN);
}
