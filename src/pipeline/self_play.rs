//! Self-play training
//!
//! One agent plays both marks. Every move goes into the same trace, and the
//! game is learned once, from the side of whoever made the final move: a win
//! if that move completed a line, a draw otherwise.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    app::App,
    ports::Observer,
    records::{GameMatch, GameMode, MatchMove},
    tictactoe::{Board, EpisodeOutcome, Evaluation, Player, evaluate_board},
};

/// Base pause after each move when the board is displayed
pub const MOVE_DELAY: Duration = Duration::from_millis(1000);
/// Base pause after the final position of a game
pub const END_DELAY: Duration = Duration::from_millis(500);

/// Display pacing; both base delays are divided by `speed`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPace {
    pub speed: f64,
}

impl DisplayPace {
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    pub fn move_delay(&self) -> Duration {
        scaled(MOVE_DELAY, self.speed).unwrap_or(Duration::MAX)
    }

    pub fn end_delay(&self) -> Duration {
        scaled(END_DELAY, self.speed).unwrap_or(Duration::MAX)
    }

    /// Speed is positive and both scaled delays fit in a `Duration`
    fn is_valid(&self) -> bool {
        self.speed.is_finite()
            && self.speed > 0.0
            && scaled(MOVE_DELAY, self.speed).is_some()
            && scaled(END_DELAY, self.speed).is_some()
    }
}

fn scaled(base: Duration, speed: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(base.as_secs_f64() / speed).ok()
}

/// Configuration for a self-play session.
///
/// # Examples
///
/// ```
/// use tictac_rl::pipeline::SelfPlayConfig;
///
/// let config = SelfPlayConfig::new()
///     .with_games(500)
///     .with_save_interval(50)
///     .with_history(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelfPlayConfig {
    /// Stop after this many games; `None` runs until stopped
    pub games: Option<usize>,
    /// Persist every this many completed games
    pub save_interval: usize,
    /// Pause between moves for display
    pub display: Option<DisplayPace>,
    /// Keep a match record for every game
    pub keep_history: bool,
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self {
            games: None,
            save_interval: 10,
            display: None,
            keep_history: false,
        }
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = Some(games);
        self
    }

    pub fn with_save_interval(mut self, interval: usize) -> Self {
        self.save_interval = interval;
        self
    }

    pub fn with_display(mut self, pace: DisplayPace) -> Self {
        self.display = Some(pace);
        self
    }

    pub fn with_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.save_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "save interval must be at least 1".to_string(),
            });
        }
        if let Some(pace) = self.display
            && !pace.is_valid()
        {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "display speed must be positive and give a representable delay, got {}",
                    pace.speed
                ),
            });
        }
        Ok(())
    }
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared flag that ends a running session after the current game
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Totals for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfPlaySummary {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    /// Distinct states known when the session ended
    pub table_size: usize,
}

/// Self-play session driver
pub struct SelfPlay {
    config: SelfPlayConfig,
    observers: Vec<Box<dyn Observer>>,
    stop: StopHandle,
}

impl SelfPlay {
    pub fn new(config: SelfPlayConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            stop: StopHandle::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Handle that can end the session from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    /// Play games until the configured count is reached or the stop handle
    /// fires.
    ///
    /// State is saved every `save_interval` games and once more at the end.
    /// Save failures are logged and do not end the session.
    pub fn run(&mut self, app: &mut App) -> Result<SelfPlaySummary> {
        self.config.validate()?;
        app.agent_mut().reset_trace();

        info!(
            games = ?self.config.games,
            save_interval = self.config.save_interval,
            "self-play started"
        );
        for observer in &mut self.observers {
            observer.on_session_start(self.config.games)?;
        }

        let mut summary = SelfPlaySummary::default();
        let mut unsaved = 0;
        while !self.stop.is_stopped() && self.config.games.is_none_or(|n| summary.games < n) {
            let game_num = summary.games;
            for observer in &mut self.observers {
                observer.on_game_start(game_num)?;
            }

            let (evaluation, record) = self.play_game(app, game_num)?;
            match evaluation.winner {
                Some(Player::X) => summary.x_wins += 1,
                Some(Player::O) => summary.o_wins += 1,
                None => summary.draws += 1,
            }
            summary.games += 1;

            if self.config.keep_history {
                app.record_match(record.clone());
            } else {
                app.record_self_play(evaluation.winner);
            }

            for observer in &mut self.observers {
                observer.on_game_end(game_num, &evaluation, &record)?;
            }

            unsaved += 1;
            if unsaved >= self.config.save_interval {
                app.save_or_warn();
                unsaved = 0;
            }
        }

        if unsaved > 0 {
            app.save_or_warn();
        }
        summary.table_size = app.agent().table_size();

        for observer in &mut self.observers {
            observer.on_session_end()?;
        }
        info!(
            games = summary.games,
            x_wins = summary.x_wins,
            o_wins = summary.o_wins,
            draws = summary.draws,
            states = summary.table_size,
            "self-play finished"
        );
        Ok(summary)
    }

    fn play_game(&mut self, app: &mut App, game_num: usize) -> Result<(Evaluation, GameMatch)> {
        let started = Instant::now();
        let started_at = Utc::now();
        let mut board = Board::new();
        let mut player = Player::X;
        let mut moves = Vec::new();

        let evaluation = loop {
            let agent = app.agent_mut();
            let position = agent.choose_move(&board).ok_or(Error::NoValidMoves)?;
            agent.record_step(&board, position);
            moves.push(MatchMove {
                state: board.state_key(),
                action: position,
                player,
            });
            board = board.place(position, player)?;

            for observer in &mut self.observers {
                observer.on_move(game_num, moves.len() - 1, &board, position, player)?;
            }
            if let Some(pace) = self.config.display {
                thread::sleep(pace.move_delay());
            }

            let evaluation = evaluate_board(&board);
            if evaluation.has_winner() || board.is_full() {
                // The last mover either completed a line or filled the board
                let outcome = EpisodeOutcome::for_player(evaluation.winner, player);
                let steps = app.agent_mut().finish_episode(outcome);
                debug!(game = game_num, steps, outcome = outcome.as_str(), "self-play game over");
                break evaluation;
            }
            player = player.opponent();
        };

        if let Some(pace) = self.config.display {
            thread::sleep(pace.end_delay());
        }

        let record = GameMatch {
            id: app.next_match_id(),
            timestamp: started_at,
            mode: GameMode::AiVsAi,
            iterations: moves.len(),
            moves,
            result: if evaluation.has_winner() {
                EpisodeOutcome::Win
            } else {
                EpisodeOutcome::Draw
            },
            winner: evaluation.winner,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        Ok((evaluation, record))
    }
}
