//! Human-vs-agent matches
//!
//! A match moves through three phases. X always opens, so a human playing O
//! starts in [`MatchPhase::AgentThinking`].
//!
//! ```text
//!   AwaitingInput ──human move──▶ AgentThinking ──agent move──▶ AwaitingInput
//!         │                             │
//!         └──────── line or full ───────┴────────▶ EpisodeOver
//! ```
//!
//! The agent records only its own moves. When the match ends it learns from
//! its own point of view, including when the human wins.

use std::{thread, time::Duration, time::Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    Error, Result,
    app::App,
    ports::{MoveInput, Observer},
    q_learning::QLearningAgent,
    records::{GameMatch, GameMode, MatchMove},
    tictactoe::{Board, EpisodeOutcome, Evaluation, Player, evaluate_board},
};

/// Where a match currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Waiting for the human's move
    AwaitingInput,
    /// The agent is to move
    AgentThinking,
    /// A line was completed or the board filled up
    EpisodeOver,
}

/// State of one human-vs-agent game
#[derive(Debug, Clone)]
pub struct HumanMatch {
    board: Board,
    human: Player,
    to_move: Player,
    phase: MatchPhase,
    evaluation: Evaluation,
    moves: Vec<MatchMove>,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl HumanMatch {
    /// Start a match with the human playing `human`; X moves first.
    pub fn new(human: Player) -> Self {
        let phase = if human == Player::X {
            MatchPhase::AwaitingInput
        } else {
            MatchPhase::AgentThinking
        };
        Self {
            board: Board::new(),
            human,
            to_move: Player::X,
            phase,
            evaluation: Evaluation::default(),
            moves: Vec::new(),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn agent_player(&self) -> Player {
        self.human.opponent()
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn moves(&self) -> &[MatchMove] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&MatchMove> {
        self.moves.last()
    }

    /// Human's result once the match is over
    pub fn human_result(&self) -> Option<EpisodeOutcome> {
        (self.phase == MatchPhase::EpisodeOver)
            .then(|| EpisodeOutcome::for_player(self.evaluation.winner, self.human))
    }

    /// Place the human's mark at `position`.
    ///
    /// # Errors
    ///
    /// [`Error::GameOver`] after the end, [`Error::WrongTurn`] while the agent
    /// is to move, and the board's errors for occupied or out-of-range cells
    /// (the match is unchanged in every error case).
    pub fn play_human(
        &mut self,
        agent: &mut QLearningAgent,
        position: usize,
    ) -> Result<MatchPhase> {
        match self.phase {
            MatchPhase::EpisodeOver => Err(Error::GameOver),
            MatchPhase::AgentThinking => Err(Error::WrongTurn {
                player: "human player's",
            }),
            MatchPhase::AwaitingInput => {
                let next = self.board.place(position, self.human)?;
                self.advance(agent, next, position, self.human);
                Ok(self.phase)
            }
        }
    }

    /// Let the agent pick and play its move.
    pub fn play_agent(&mut self, agent: &mut QLearningAgent) -> Result<MatchPhase> {
        match self.phase {
            MatchPhase::EpisodeOver => Err(Error::GameOver),
            MatchPhase::AwaitingInput => Err(Error::WrongTurn {
                player: "agent's",
            }),
            MatchPhase::AgentThinking => {
                let position = agent.choose_move(&self.board).ok_or(Error::NoValidMoves)?;
                let next = self.board.place(position, self.agent_player())?;
                agent.record_step(&self.board, position);
                self.advance(agent, next, position, self.agent_player());
                Ok(self.phase)
            }
        }
    }

    fn advance(&mut self, agent: &mut QLearningAgent, next: Board, position: usize, player: Player) {
        self.moves.push(MatchMove {
            state: self.board.state_key(),
            action: position,
            player,
        });
        self.board = next;
        self.evaluation = evaluate_board(&self.board);

        if self.evaluation.has_winner() || self.board.is_full() {
            self.phase = MatchPhase::EpisodeOver;
            let outcome = EpisodeOutcome::for_player(self.evaluation.winner, self.agent_player());
            agent.finish_episode(outcome);
        } else {
            self.to_move = player.opponent();
            self.phase = if self.to_move == self.human {
                MatchPhase::AwaitingInput
            } else {
                MatchPhase::AgentThinking
            };
        }
    }

    /// Match record for history, once the match is over
    pub fn to_record(&self, id: String) -> Option<GameMatch> {
        (self.phase == MatchPhase::EpisodeOver).then(|| self.record(id))
    }

    fn record(&self, id: String) -> GameMatch {
        GameMatch {
            id,
            timestamp: self.started_at,
            mode: GameMode::PlayerVsAi,
            moves: self.moves.clone(),
            result: EpisodeOutcome::for_player(self.evaluation.winner, self.human),
            winner: self.evaluation.winner,
            iterations: self.moves.len(),
            duration_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Drives a [`HumanMatch`] from start to finish.
pub struct MatchRunner {
    observers: Vec<Box<dyn Observer>>,
    agent_delay: Option<Duration>,
}

impl MatchRunner {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            agent_delay: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Pause before each agent move (display only; off by default).
    pub fn with_agent_delay(mut self, delay: Duration) -> Self {
        self.agent_delay = Some(delay);
        self
    }

    /// Play one match with the human as `human`, asking `input` for moves.
    ///
    /// Refused moves are reported to `input` and asked for again. The match
    /// is recorded in the app's statistics and history and the app state is
    /// saved; a failed save is logged, not returned.
    pub fn run(
        &mut self,
        app: &mut App,
        human: Player,
        input: &mut dyn MoveInput,
    ) -> Result<GameMatch> {
        // A trace left by an abandoned game must not leak into this one.
        app.agent_mut().reset_trace();
        let mut game = HumanMatch::new(human);
        info!(human = %human, "match started");

        for observer in &mut self.observers {
            observer.on_session_start(Some(1))?;
            observer.on_game_start(0)?;
        }

        let record = loop {
            let played = match game.phase() {
                MatchPhase::EpisodeOver => break game.record(app.next_match_id()),
                MatchPhase::AwaitingInput => {
                    let legal = game.board().legal_moves();
                    let position = input.next_move(game.board(), &legal)?;
                    match game.play_human(app.agent_mut(), position) {
                        Ok(_) => true,
                        Err(err @ (Error::CellOccupied { .. } | Error::InvalidPosition { .. })) => {
                            debug!(position, error = %err, "human move refused");
                            input.on_rejected(&err);
                            false
                        }
                        Err(err) => return Err(err),
                    }
                }
                MatchPhase::AgentThinking => {
                    if let Some(delay) = self.agent_delay {
                        thread::sleep(delay);
                    }
                    game.play_agent(app.agent_mut())?;
                    true
                }
            };

            if !played {
                continue;
            }
            if let Some(last) = game.last_move() {
                let step = game.moves().len() - 1;
                for observer in &mut self.observers {
                    observer.on_move(0, step, game.board(), last.action, last.player)?;
                }
            }
        };

        app.record_match(record.clone());
        app.save_or_warn();
        info!(
            result = record.result.as_str(),
            moves = record.iterations,
            "match finished"
        );

        for observer in &mut self.observers {
            observer.on_game_end(0, game.evaluation(), &record)?;
            observer.on_session_end()?;
        }
        Ok(record)
    }
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new()
    }
}
