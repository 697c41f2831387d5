//! Play command - one or more games against the agent on the terminal

use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    Error,
    cli::{config::StoreArgs, output},
    pipeline::MatchRunner,
    ports::MoveInput,
    tictactoe::{Board, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play against the agent")]
pub struct PlayArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Which mark you play (`x` moves first, or `o`)
    #[arg(long, default_value = "x")]
    pub player: String,

    /// Number of games to play in a row
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Pause before each agent move, in milliseconds
    #[arg(long, default_value_t = 300)]
    pub think_ms: u64,
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" => Ok(Player::X),
        "o" | "second" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

/// Reads cell numbers 1-9 from a line-based reader.
///
/// Unparseable lines are answered with a hint and read again; end of input
/// or `q` aborts the match.
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn prompt(&mut self, text: &str) -> crate::Result<()> {
        write!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> MoveInput for LineInput<R, W> {
    fn next_move(&mut self, board: &Board, _legal_moves: &[usize]) -> crate::Result<usize> {
        writeln!(self.writer, "\n{board}")?;
        loop {
            self.prompt("Your move (1-9, q to quit): ")?;
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(Error::Io {
                    operation: "read move".to_string(),
                    source: io::Error::from(io::ErrorKind::UnexpectedEof),
                });
            }
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                return Err(Error::Io {
                    operation: "read move".to_string(),
                    source: io::Error::new(io::ErrorKind::Interrupted, "player quit"),
                });
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=9).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.writer, "Enter a number from 1 to 9.")?,
            }
        }
    }

    fn on_rejected(&mut self, error: &Error) {
        // Write failures surface on the next prompt
        let _ = writeln!(self.writer, "{error}");
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let human = parse_player_token(&args.player, "--player")?;
    let mut app = args.store.open_app()?;

    let stdin = io::stdin();
    let mut input = LineInput::new(stdin.lock(), io::stdout());
    let mut runner = MatchRunner::new().with_agent_delay(Duration::from_millis(args.think_ms));

    output::print_section(&format!("You are {human}. X moves first."));
    for _ in 0..args.games {
        let record = runner
            .run(&mut app, human, &mut input)
            .context("match aborted")?;

        if let Some(last) = record.moves.last() {
            let final_board = Board::parse(last.state.as_str())
                .and_then(|b| b.place(last.action, last.player))
                .ok();
            if let Some(board) = final_board {
                println!("\n{board}");
            }
        }
        match record.winner {
            Some(winner) if winner == human => println!("You win!"),
            Some(_) => println!("The agent wins."),
            None => println!("Draw."),
        }
    }

    output::print_subsection("Totals");
    output::print_stats(app.stats());
    Ok(())
}
