//! Behavioural properties of the search and learning players.

use std::collections::HashMap;

use jokettt::{
    LearningAgent, Mark, SearchAgent,
    pipeline::{GameDriver, GameOutcome, MatchConfig, MatchRunner, Side},
    ports::Agent,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

mod common;

use common::{play_out, seeded_board};

#[test]
fn test_minimax_self_play_always_draws() {
    let mut board = seeded_board(Mark::X, 10);
    let mut a = SearchAgent::new(Mark::X);
    let mut b = SearchAgent::new(Mark::O);
    let config = MatchConfig {
        num_games: 2,
        switch_turn: true,
        ..MatchConfig::default()
    };

    let result = MatchRunner::new(config)
        .run(&mut board, &mut a, &mut b)
        .unwrap();
    assert_eq!(result.draws, 2);
}

#[test]
fn test_minimax_is_deterministic() {
    let mut board = seeded_board(Mark::X, 11);
    board.place(1, 1, Mark::X).unwrap();
    board.place(0, 2, Mark::O).unwrap();
    board.place(2, 0, Mark::X).unwrap();

    let mut first = SearchAgent::new(Mark::O);
    let mut second = SearchAgent::new(Mark::O).with_seed(99);
    let chosen = first.select_move(&board).unwrap();
    for _ in 0..3 {
        assert_eq!(first.select_move(&board).unwrap(), chosen);
        assert_eq!(second.select_move(&board).unwrap(), chosen);
    }
}

#[test]
fn test_minimax_never_loses_to_random() {
    for (seed, minimax_first) in (0..20).map(|seed| (seed, seed % 2 == 0)) {
        let mut board = seeded_board(Mark::X, seed);
        let mut minimax = SearchAgent::new(Mark::X);
        let mut random = SearchAgent::random(Mark::O).with_seed(seed);

        let outcome = GameDriver::new()
            .play_game(&mut board, &mut minimax, &mut random, minimax_first)
            .unwrap();
        assert_ne!(outcome, GameOutcome::Win(Side::B), "seed {seed}");
    }
}

#[test]
fn test_minimax_as_second_player_never_loses_to_random() {
    let mut board = seeded_board(Mark::X, 12);
    let mut random = SearchAgent::random(Mark::X);
    let mut minimax = SearchAgent::new(Mark::O);
    let config = MatchConfig {
        num_games: 20,
        seed: Some(12),
        ..MatchConfig::default()
    };

    let result = MatchRunner::new(config)
        .run(&mut board, &mut random, &mut minimax)
        .unwrap();
    assert_eq!(result.a_wins, 0);
}

#[test]
fn test_greedy_learner_never_picks_lower_estimate() {
    let mut rng = StdRng::seed_from_u64(13);
    for seed in 0..20 {
        let mut board = seeded_board(Mark::X, seed);
        board.place(0, 0, Mark::O).unwrap();

        // Random estimates for every position one X move away.
        let values: HashMap<u64, f64> = board
            .empty_squares()
            .into_iter()
            .map(|square| (board.hash_after(square, Mark::X).unwrap(), rng.random::<f64>()))
            .collect();
        let mut learner = LearningAgent::new(Mark::X, 0.1, 0.0)
            .unwrap()
            .with_values(values);

        let chosen = learner.select_move(&board).unwrap();
        let chosen_estimate = learner
            .value_table()
            .estimate(board.hash_after(chosen, Mark::X).unwrap());
        for square in board.empty_squares() {
            let estimate = learner
                .value_table()
                .estimate(board.hash_after(square, Mark::X).unwrap());
            assert!(estimate <= chosen_estimate);
        }
        assert!(!learner.exploring_move_flag());
    }
}

#[test]
fn test_defeat_never_raises_estimates_on_losing_path() {
    let mut board = seeded_board(Mark::X, 14);
    let mut learner = LearningAgent::new(Mark::X, 0.3, 0.0).unwrap().with_seed(14);
    let mut minimax = SearchAgent::new(Mark::O);

    let mut losses = 0;
    for _ in 0..10 {
        board.reset();
        let winner = play_out(&mut board, &mut learner, &mut minimax).unwrap();
        if winner != Some(Mark::O) {
            continue;
        }
        losses += 1;

        let trajectory = learner.trajectory().to_vec();
        let before: Vec<f64> = trajectory
            .iter()
            .map(|&hash| learner.value_table().estimate(hash))
            .collect();

        learner.learn_from_defeat(&board);

        for (hash, old) in trajectory.iter().zip(&before) {
            assert!(learner.value_table().estimate(*hash) <= *old);
        }
        let last = *trajectory.last().unwrap();
        assert!(learner.value_table().estimate(last) < *before.last().unwrap());
        assert_eq!(learner.value_table().estimate(board.hash()), 0.0);
        assert!(learner.trajectory().is_empty());
    }
    assert!(losses > 0, "a greedy novice should lose to minimax");
}

#[test]
fn test_learner_stops_losing_the_same_way() {
    // A greedy learner that lost along a path must leave it: after the backup
    // its next game differs from the lost one.
    let mut board = seeded_board(Mark::X, 15);
    let mut learner = LearningAgent::new(Mark::X, 0.5, 0.0).unwrap().with_seed(15);
    let mut minimax = SearchAgent::new(Mark::O);

    let mut driver = GameDriver::new();
    let first = driver
        .play_game(&mut board, &mut learner, &mut minimax, true)
        .unwrap();
    assert_eq!(first, GameOutcome::Win(Side::B));
    let lost_position = board.clone();

    board.reset();
    driver
        .play_game(&mut board, &mut learner, &mut minimax, true)
        .unwrap();
    assert_ne!(board, lost_position);
}
