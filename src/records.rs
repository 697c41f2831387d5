//! Aggregate play statistics and match history

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    tictactoe::{EpisodeOutcome, Player},
    types::StateKey,
};

/// Who played a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "player-vs-ai")]
    PlayerVsAi,
    #[serde(rename = "ai-vs-ai")]
    AiVsAi,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::PlayerVsAi => f.write_str("player-vs-ai"),
            GameMode::AiVsAi => f.write_str("ai-vs-ai"),
        }
    }
}

/// Running totals across all games ever played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_games: u64,
    pub player_wins: u64,
    pub ai_wins: u64,
    pub draws: u64,
    pub ai_vs_ai_games: u64,
    pub ai_x_wins: u64,
    pub ai_o_wins: u64,
    pub last_played: DateTime<Utc>,
}

impl GameStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_games: 0,
            player_wins: 0,
            ai_wins: 0,
            draws: 0,
            ai_vs_ai_games: 0,
            ai_x_wins: 0,
            ai_o_wins: 0,
            last_played: now,
        }
    }

    /// Count a human game; `result` is from the human's side.
    pub fn record_player_game(&mut self, result: EpisodeOutcome, now: DateTime<Utc>) {
        self.total_games += 1;
        self.last_played = now;
        match result {
            EpisodeOutcome::Win => self.player_wins += 1,
            EpisodeOutcome::Lose => self.ai_wins += 1,
            EpisodeOutcome::Draw => self.draws += 1,
        }
    }

    /// Count a self-play game by its winning mark.
    pub fn record_self_play(&mut self, winner: Option<Player>, now: DateTime<Utc>) {
        self.total_games += 1;
        self.ai_vs_ai_games += 1;
        self.last_played = now;
        match winner {
            Some(Player::X) => self.ai_x_wins += 1,
            Some(Player::O) => self.ai_o_wins += 1,
            None => self.draws += 1,
        }
    }

    /// Games against a human, derived from the totals
    pub fn player_games(&self) -> u64 {
        self.total_games.saturating_sub(self.ai_vs_ai_games)
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// One move as stored in a match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMove {
    /// Board before the move
    pub state: StateKey,
    pub action: usize,
    pub player: Player,
}

/// A completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub mode: GameMode,
    pub moves: Vec<MatchMove>,
    /// Human's result for `player-vs-ai`; `win` or `draw` for `ai-vs-ai`
    pub result: EpisodeOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    /// Number of moves played
    pub iterations: usize,
    pub duration_ms: u64,
}

/// All recorded matches, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchHistory {
    matches: Vec<GameMatch>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a match, replacing any existing one with the same id.
    pub fn put(&mut self, record: GameMatch) {
        match self.matches.iter_mut().find(|m| m.id == record.id) {
            Some(existing) => *existing = record,
            None => self.matches.push(record),
        }
    }

    /// Matches newest first, truncated to `limit` when given
    pub fn recent(&self, limit: Option<usize>) -> Vec<&GameMatch> {
        let mut sorted: Vec<&GameMatch> = self.matches.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            sorted.truncate(limit);
        }
        sorted
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn clear(&mut self) {
        self.matches.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter()
    }
}

impl FromIterator<GameMatch> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = GameMatch>>(iter: I) -> Self {
        let mut history = MatchHistory::new();
        for record in iter {
            history.put(record);
        }
        history
    }
}

/// Build a match id that is unique within one process run
pub fn match_id(timestamp: DateTime<Utc>, sequence: u64) -> String {
    format!("{}-{sequence}", timestamp.timestamp_millis())
}
