//! Tests for human matches and self-play sessions

mod common;

use std::{cell::RefCell, rc::Rc};

use common::ScriptedInput;
use tictac_rl::{
    Result,
    adapters::InMemoryRepository,
    app::{AgentConfig, App},
    pipeline::{MatchRunner, SelfPlay, SelfPlayConfig},
    ports::{Observer, StateRepository},
    q_learning::Hyperparameters,
    records::{GameMatch, GameMode},
    tictactoe::{Board, EpisodeOutcome, Evaluation, Player, evaluate_board},
};

fn greedy_app(repo: InMemoryRepository) -> App {
    let config = AgentConfig::new()
        .with_params(Hyperparameters::new(0.5, 0.9, 0.0))
        .with_seed(11);
    App::open(repo, config).unwrap()
}

#[derive(Default)]
struct Recorded {
    moves: usize,
    games: Vec<(Option<Player>, usize)>,
    sessions_ended: usize,
}

struct Recorder(Rc<RefCell<Recorded>>);

impl Observer for Recorder {
    fn on_move(
        &mut self,
        _game_num: usize,
        _step_num: usize,
        _board: &Board,
        _position: usize,
        _player: Player,
    ) -> Result<()> {
        self.0.borrow_mut().moves += 1;
        Ok(())
    }

    fn on_game_end(
        &mut self,
        _game_num: usize,
        evaluation: &Evaluation,
        record: &GameMatch,
    ) -> Result<()> {
        self.0
            .borrow_mut()
            .games
            .push((evaluation.winner, record.iterations));
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        self.0.borrow_mut().sessions_ended += 1;
        Ok(())
    }
}

#[test]
fn test_human_win_is_recorded_and_saved() {
    let repo = InMemoryRepository::new();
    let mut app = greedy_app(repo.clone());
    let seen = Rc::new(RefCell::new(Recorded::default()));
    let mut runner = MatchRunner::new().with_observer(Box::new(Recorder(Rc::clone(&seen))));

    // Greedy agent on an empty table answers with the lowest free cell:
    // X 4, O 0, X 2, O 1, X 6 wins on the 2-4-6 diagonal.
    let mut input = ScriptedInput::new(&[4, 2, 6]);
    let record = runner.run(&mut app, Player::X, &mut input).unwrap();

    assert_eq!(record.mode, GameMode::PlayerVsAi);
    assert_eq!(record.result, EpisodeOutcome::Win);
    assert_eq!(record.winner, Some(Player::X));
    assert_eq!(record.iterations, 5);
    assert!(app.agent().trace().is_empty());

    let stats = app.stats();
    assert_eq!(stats.total_games, 1);
    assert_eq!(stats.player_wins, 1);
    assert_eq!(app.history().len(), 1);
    assert_eq!(repo.save_count(), 1);
    assert_eq!(repo.load().unwrap().unwrap().matches.len(), 1);

    let seen = seen.borrow();
    assert_eq!(seen.moves, 5);
    assert_eq!(seen.games, vec![(Some(Player::X), 5)]);
    assert_eq!(seen.sessions_ended, 1);
}

#[test]
fn test_rejected_moves_are_asked_again() {
    let mut app = greedy_app(InMemoryRepository::new());
    let mut runner = MatchRunner::new();

    // 4 is taken on the second prompt and 12 is off the board
    let mut input = ScriptedInput::new(&[4, 4, 12, 2, 6]);
    let record = runner.run(&mut app, Player::X, &mut input).unwrap();

    assert_eq!(input.rejected, 2);
    assert_eq!(record.winner, Some(Player::X));
}

#[test]
fn test_agent_opens_when_human_is_o() {
    let mut app = greedy_app(InMemoryRepository::new());
    let mut runner = MatchRunner::new();

    let mut input = ScriptedInput::new(&[]);
    let record = runner.run(&mut app, Player::O, &mut input).unwrap();

    assert_eq!(record.moves[0].player, Player::X);
    assert_eq!(record.moves[0].state.as_str(), ".........");
    let agent_moves = record.moves.iter().filter(|m| m.player == Player::X).count();
    assert!(agent_moves >= 3);
}

#[test]
fn test_self_play_games_end_properly() {
    let mut app = App::for_testing().with_default_seed(5).build().unwrap();
    let seen = Rc::new(RefCell::new(Recorded::default()));
    let mut session = SelfPlay::new(SelfPlayConfig::new().with_games(50).with_history(true))
        .with_observer(Box::new(Recorder(Rc::clone(&seen))));

    let summary = session.run(&mut app).unwrap();
    assert_eq!(summary.games, 50);

    for record in app.history().iter() {
        assert_eq!(record.mode, GameMode::AiVsAi);
        assert!((5..=9).contains(&record.iterations));
        let last = record.moves.last().unwrap();
        let final_board = Board::parse(last.state.as_str())
            .unwrap()
            .place(last.action, last.player)
            .unwrap();
        let evaluation = evaluate_board(&final_board);
        assert_eq!(evaluation.winner, record.winner);
        if record.winner.is_none() {
            assert!(final_board.is_full());
            assert_eq!(record.result, EpisodeOutcome::Draw);
        } else {
            assert_eq!(record.winner, Some(last.player));
            assert_eq!(record.result, EpisodeOutcome::Win);
        }
    }

    let stats = app.stats();
    assert_eq!(stats.ai_x_wins as usize, summary.x_wins);
    assert_eq!(stats.ai_o_wins as usize, summary.o_wins);
    assert_eq!(stats.draws as usize, summary.draws);
    assert_eq!(seen.borrow().games.len(), 50);
    assert!(app.agent().trace().is_empty());
}

#[test]
fn test_stop_handle_ends_unbounded_session() {
    struct StopAfter {
        handle: tictac_rl::pipeline::StopHandle,
        after: usize,
    }

    impl Observer for StopAfter {
        fn on_game_end(
            &mut self,
            game_num: usize,
            _evaluation: &Evaluation,
            _record: &GameMatch,
        ) -> Result<()> {
            if game_num + 1 >= self.after {
                self.handle.stop();
            }
            Ok(())
        }
    }

    let repo = InMemoryRepository::new();
    let mut app = greedy_app(repo.clone());
    let session = SelfPlay::new(SelfPlayConfig::new().with_save_interval(4));
    let handle = session.stop_handle();
    let mut session = session.with_observer(Box::new(StopAfter { handle, after: 6 }));

    let summary = session.run(&mut app).unwrap();
    assert_eq!(summary.games, 6);
    // One batch of four, then the remaining two at the end
    assert_eq!(repo.save_count(), 2);
    assert_eq!(repo.load().unwrap().unwrap().stats.total_games, 6);
}
