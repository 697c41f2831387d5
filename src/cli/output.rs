//! Output formatting for CLI

use crate::{
    Result,
    ports::Observer,
    records::{GameMatch, GameStats},
    tictactoe::{Board, Evaluation, Player},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format `part / whole` as a percentage with one decimal
pub fn format_rate(part: u64, whole: u64) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 * 100.0 / whole as f64)
    }
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_stats(stats: &GameStats) {
    let player_games = stats.player_games();
    print_subsection("Against humans");
    print_kv("Games", &format_number(player_games));
    print_kv(
        "Player wins",
        &format!(
            "{} ({})",
            format_number(stats.player_wins),
            format_rate(stats.player_wins, player_games)
        ),
    );
    print_kv(
        "AI wins",
        &format!(
            "{} ({})",
            format_number(stats.ai_wins),
            format_rate(stats.ai_wins, player_games)
        ),
    );

    print_subsection("Self-play");
    print_kv("Games", &format_number(stats.ai_vs_ai_games));
    print_kv("X wins", &format_number(stats.ai_x_wins));
    print_kv("O wins", &format_number(stats.ai_o_wins));

    print_subsection("Overall");
    print_kv("Total games", &format_number(stats.total_games));
    print_kv("Draws", &format_number(stats.draws));
    print_kv(
        "Last played",
        &stats.last_played.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
}

/// One line per match: time, mode, result, winner and length
pub fn print_match_line(record: &GameMatch) {
    let winner = record
        .winner
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {}  {:12} {:5} winner {}  {} moves  {} ms",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.mode.to_string(),
        record.result.as_str(),
        winner,
        record.iterations,
        record.duration_ms
    );
}

/// Observer that prints the board after every move
#[derive(Debug, Default)]
pub struct BoardPrinter;

impl Observer for BoardPrinter {
    fn on_game_start(&mut self, game_num: usize) -> Result<()> {
        println!("\nGame {}", game_num + 1);
        Ok(())
    }

    fn on_move(
        &mut self,
        _game_num: usize,
        _step_num: usize,
        board: &Board,
        position: usize,
        player: Player,
    ) -> Result<()> {
        println!("\n{player} plays {}\n{board}", position + 1);
        Ok(())
    }

    fn on_game_end(
        &mut self,
        _game_num: usize,
        evaluation: &Evaluation,
        _record: &GameMatch,
    ) -> Result<()> {
        match (evaluation.winner, evaluation.line) {
            (Some(winner), Some([a, b, c])) => {
                println!("{winner} wins on {}-{}-{}", a + 1, b + 1, c + 1)
            }
            _ => println!("Draw"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1, 0), "-");
        assert_eq!(format_rate(1, 4), "25.0%");
    }
}
