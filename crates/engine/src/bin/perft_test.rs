use std::env;

use engine::perft::{perft_detailed, perft_divide, run_position_tests, PERFT_POSITIONS};
use engine::Game;
use tracing_subscriber::EnvFilter;

// Usage: perft_test [max_depth] [--divide <fen> <depth>] [--detailed <fen> <depth>]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--divide") => {
            run_divide(&args[1..]);
            return;
        }
        Some("--detailed") => {
            run_detailed(&args[1..]);
            return;
        }
        _ => {}
    }

    let max_depth = args.first().and_then(|arg| arg.parse::<u32>().ok());
    println!("Starting Perft Tests (max depth: {})", max_depth.map_or("all".to_string(), |d| d.to_string()));

    let mut passed = 0;
    for test_case in PERFT_POSITIONS {
        println!("\nTesting: {}", test_case.name);
        println!("FEN: {}", test_case.fen);

        let outcomes = match run_position_tests(test_case, max_depth) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                println!("ERROR - {}", err);
                continue;
            }
        };

        for outcome in &outcomes {
            let status = if outcome.passed() { "PASS" } else { "FAIL" };
            println!(
                "{} - Depth {}: {} nodes (expected {}) in {}ms",
                status, outcome.depth, outcome.nodes, outcome.expected, outcome.time_ms
            );
        }
        if outcomes.iter().all(|outcome| outcome.passed()) {
            passed += 1;
        }
    }

    println!("\nResults: {}/{} positions passed", passed, PERFT_POSITIONS.len());
    if passed != PERFT_POSITIONS.len() {
        std::process::exit(1);
    }
}

fn load(args: &[String], mode: &str) -> (Game, u32) {
    let (Some(fen), Some(depth)) = (args.first(), args.get(1).and_then(|d| d.parse::<u32>().ok())) else {
        eprintln!("usage: perft_test {} <fen> <depth>", mode);
        std::process::exit(2);
    };

    match Game::from_fen(fen) {
        Ok(game) => (game, depth),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    }
}

fn run_detailed(args: &[String]) {
    let (mut game, depth) = load(args, "--detailed");

    match perft_detailed(&mut game, depth) {
        Ok(result) => {
            println!("Nodes:      {}", result.nodes);
            println!("Captures:   {}", result.captures);
            println!("E.p.:       {}", result.en_passant);
            println!("Castles:    {}", result.castles);
            println!("Promotions: {}", result.promotions);
            println!("Checks:     {}", result.checks);
            println!("Checkmates: {}", result.checkmates);
            println!("Time:       {}ms ({} nodes/s)", result.time_ms, result.nodes_per_second());
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn run_divide(args: &[String]) {
    let (mut game, depth) = load(args, "--divide");

    match perft_divide(&mut game, depth) {
        Ok(results) => {
            let total: u64 = results.iter().map(|(_, nodes)| nodes).sum();
            for (mv, nodes) in results {
                println!("{}: {}", mv, nodes);
            }
            println!("\nTotal: {}", total);
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
