//! PGN export.

use crate::game::{Game, STARTING_FEN};
use crate::types::Color;

const LINE_WIDTH: usize = 80;

/// Seven Tag Roster values, minus `Result` which comes from the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "?".to_string(),
            date: chrono::Local::now().format("%Y.%m.%d").to_string(),
            round: "-".to_string(),
            white: "White".to_string(),
            black: "Black".to_string(),
        }
    }
}

fn tag(out: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("[{} \"{}\"]\n", name, escaped));
}

/// Render `game` as PGN with the given headers.
pub fn to_pgn(game: &Game, headers: &PgnHeaders) -> String {
    let result = game.status().result_token();
    let mut out = String::new();

    tag(&mut out, "Event", &headers.event);
    tag(&mut out, "Site", &headers.site);
    tag(&mut out, "Date", &headers.date);
    tag(&mut out, "Round", &headers.round);
    tag(&mut out, "White", &headers.white);
    tag(&mut out, "Black", &headers.black);
    tag(&mut out, "Result", result);

    // Numbering starts from the position the game was loaded from
    let (mut number, mut color) = (1, Color::White);
    if let Some(fen) = game.starting_fen().filter(|fen| *fen != STARTING_FEN) {
        tag(&mut out, "SetUp", "1");
        tag(&mut out, "FEN", fen);
        if let Ok(start) = Game::from_fen(fen) {
            number = start.move_count();
            color = start.active_color();
        }
    }
    out.push('\n');

    let mut tokens = Vec::new();
    for (i, san) in game.generate_san().into_iter().enumerate() {
        if color == Color::White {
            tokens.push(format!("{}.", number));
        } else if i == 0 {
            tokens.push(format!("{}...", number));
        }
        tokens.push(san);

        if color == Color::Black {
            number += 1;
        }
        color = color.opposite();
    }
    tokens.push(result.to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
    out
}
