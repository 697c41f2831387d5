//! Observers for self-play sessions

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    ports::Observer,
    records::GameMatch,
    tictactoe::{Evaluation, Player},
};

/// Progress bar observer - shows self-play progress with X/O/draw tallies
///
/// Sessions without a game limit get a spinner instead of a bar.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn tally(&self) -> String {
        format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, total_games: Option<usize>) -> Result<()> {
        let (pb, template) = match total_games {
            Some(total) => (
                ProgressBar::new(total as u64),
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})",
            ),
            None => (
                ProgressBar::new_spinner(),
                "[{elapsed_precise}] {spinner} {pos} games ({msg})",
            ),
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(
        &mut self,
        game_num: usize,
        evaluation: &Evaluation,
        _record: &GameMatch,
    ) -> Result<()> {
        match evaluation.winner {
            Some(Player::X) => self.x_wins += 1,
            Some(Player::O) => self.o_wins += 1,
            None => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{records::GameMode, tictactoe::EpisodeOutcome};

    fn record() -> GameMatch {
        GameMatch {
            id: "t".to_string(),
            timestamp: Utc::now(),
            mode: GameMode::AiVsAi,
            moves: Vec::new(),
            result: EpisodeOutcome::Draw,
            winner: None,
            iterations: 0,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_progress_observer_tallies() {
        let mut observer = ProgressObserver::new();
        observer.on_session_start(Some(3)).unwrap();

        let x_win = Evaluation {
            winner: Some(Player::X),
            line: Some([0, 1, 2]),
        };
        observer.on_game_end(0, &x_win, &record()).unwrap();
        observer.on_game_end(1, &Evaluation::default(), &record()).unwrap();
        observer.on_game_end(2, &x_win, &record()).unwrap();
        observer.on_session_end().unwrap();

        assert_eq!(observer.tally(), "X:2 O:0 D:1");
    }

    #[test]
    fn test_unbounded_session_uses_spinner() {
        let mut observer = ProgressObserver::new();
        observer.on_session_start(None).unwrap();
        assert!(observer.progress_bar.is_some());
    }
}
