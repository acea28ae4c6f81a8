//! Move-generation verification by exhaustive node counting.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::EngineResult;
use crate::game::Game;
use crate::types::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerftResult {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
    pub time_ms: u128,
}

impl PerftResult {
    pub fn nodes_per_second(&self) -> u64 {
        if self.time_ms == 0 {
            return 0;
        }
        self.nodes.saturating_mul(1000) / (self.time_ms as u64)
    }

    fn absorb(&mut self, other: &PerftResult) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.en_passant += other.en_passant;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

#[derive(Debug)]
pub struct PerftTestCase {
    pub name: &'static str,
    pub fen: &'static str,
    pub expected_results: &'static [(u32, u64)], // (depth, expected_nodes)
}

/// One depth of a reference run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftOutcome {
    pub depth: u32,
    pub expected: u64,
    pub nodes: u64,
    pub time_ms: u128,
}

impl PerftOutcome {
    pub fn passed(&self) -> bool {
        self.nodes == self.expected
    }
}

// Standard perft test positions
pub const PERFT_POSITIONS: &[PerftTestCase] = &[
    PerftTestCase {
        name: "Starting Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        expected_results: &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    },
    PerftTestCase {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_results: &[(1, 48), (2, 2_039), (3, 97_862)],
    },
    PerftTestCase {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_results: &[(1, 14), (2, 191), (3, 2_812), (4, 43_238)],
    },
    PerftTestCase {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        expected_results: &[(1, 6), (2, 264), (3, 9_467)],
    },
    PerftTestCase {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        expected_results: &[(1, 44), (2, 1_486), (3, 62_379)],
    },
];

/// Count leaf nodes of the legal move tree to `depth`.
///
/// Every move goes through `make_move` and `undo_move`, so the count also
/// exercises make/undo. The game is back in its original position on return.
pub fn perft(game: &mut Game, depth: u32) -> EngineResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let mut nodes = 0;
    for mv in game.all_legal_moves() {
        game.make_move(&mv)?;
        nodes += perft(game, depth - 1)?;
        game.undo_move()?;
    }
    Ok(nodes)
}

/// Perft that also tallies move types at the leaves.
pub fn perft_detailed(game: &mut Game, depth: u32) -> EngineResult<PerftResult> {
    let start_time = Instant::now();
    let mut result = PerftResult::default();

    if depth == 0 {
        result.nodes = 1;
        return Ok(result);
    }

    for mv in game.all_legal_moves() {
        game.make_move(&mv)?;
        if depth == 1 {
            result.nodes += 1;
            if mv.is_capture() {
                result.captures += 1;
            }
            match mv.kind {
                MoveKind::EnPassant => result.en_passant += 1,
                MoveKind::Castling => result.castles += 1,
                _ => {}
            }
            if mv.promotion.is_some() {
                result.promotions += 1;
            }
            match game.status() {
                GameStatus::Check => result.checks += 1,
                GameStatus::WhiteWins | GameStatus::BlackWins => {
                    result.checks += 1;
                    result.checkmates += 1;
                }
                _ => {}
            }
        } else {
            let sub_result = perft_detailed(game, depth - 1)?;
            result.absorb(&sub_result);
        }
        game.undo_move()?;
    }

    result.time_ms = start_time.elapsed().as_millis();
    Ok(result)
}

/// Per-root-move node counts, largest subtree first.
pub fn perft_divide(game: &mut Game, depth: u32) -> EngineResult<Vec<(Move, u64)>> {
    let mut results = Vec::new();
    for mv in game.all_legal_moves() {
        game.make_move(&mv)?;
        let nodes = if depth > 1 { perft(game, depth - 1)? } else { 1 };
        results.push((mv, nodes));
        game.undo_move()?;
    }

    results.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(results)
}

/// Run a reference position up to `max_depth`, stopping at the first mismatch.
pub fn run_position_tests(test_case: &PerftTestCase, max_depth: Option<u32>) -> EngineResult<Vec<PerftOutcome>> {
    info!(name = test_case.name, fen = test_case.fen, "perft position");
    let mut game = Game::from_fen(test_case.fen)?;
    let mut outcomes = Vec::new();

    for &(depth, expected) in test_case.expected_results {
        if max_depth.is_some_and(|max| depth > max) {
            break;
        }

        let start_time = Instant::now();
        let nodes = perft(&mut game, depth)?;
        let outcome = PerftOutcome {
            depth,
            expected,
            nodes,
            time_ms: start_time.elapsed().as_millis(),
        };
        debug!(depth, nodes, expected, "perft depth finished");

        let passed = outcome.passed();
        outcomes.push(outcome);
        if !passed {
            break;
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_start_shallow() {
        let mut game = Game::new();
        assert_eq!(perft(&mut game, 1).unwrap(), 20);
        assert_eq!(perft(&mut game, 2).unwrap(), 400);
        assert_eq!(game.to_fen(), crate::game::STARTING_FEN, "perft must leave the game untouched");
    }

    #[test]
    fn test_perft_divide_sums_to_perft() {
        let mut game = Game::new();
        let divide = perft_divide(&mut game, 2).unwrap();

        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert!(divide.iter().all(|(_, n)| *n == 20));
    }

    #[test]
    fn test_perft_detailed_kiwipete_depth_one() {
        let mut game = Game::from_fen(PERFT_POSITIONS[1].fen).unwrap();
        let result = perft_detailed(&mut game, 1).unwrap();

        assert_eq!(result.nodes, 48);
        assert_eq!(result.captures, 8);
        assert_eq!(result.castles, 2);
        assert_eq!(result.en_passant, 0);
    }

    #[test]
    fn test_nodes_per_second() {
        let result = PerftResult {
            nodes: 5_000,
            time_ms: 250,
            ..PerftResult::default()
        };
        assert_eq!(result.nodes_per_second(), 20_000);
        assert_eq!(PerftResult::default().nodes_per_second(), 0, "zero elapsed time reports zero");
    }

    #[test]
    fn test_run_position_tests_respects_max_depth() {
        let outcomes = run_position_tests(&PERFT_POSITIONS[2], Some(2)).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(PerftOutcome::passed));
    }
}
