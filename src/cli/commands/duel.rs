//! Duel command - two AI players of any kind against each other

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AppBuilder, LearnerConfig},
    cli::{
        PlayerKind,
        config::{alpha_value, build_agent, epsilon_value},
        output::{print_kv, print_match_result, print_section},
    },
    pipeline::{
        BoardObserver, MatchConfig, MatchRunner, ProgressObserver, Side, StatisticsObserver,
    },
    tictactoe::Mark,
    types::{DEFAULT_ALPHA, DEFAULT_EPSILON},
};

#[derive(Parser, Debug)]
#[command(about = "Play AI against AI")]
pub struct DuelArgs {
    /// Kind of player A (plays 'x')
    #[arg(long = "player-a", short = 'a', value_enum, default_value = "minimax")]
    pub player_a: PlayerKind,

    /// Kind of player B (plays 'o')
    #[arg(long = "player-b", short = 'b', value_enum, default_value = "learner")]
    pub player_b: PlayerKind,

    /// Learning rate of player A (learners only)
    #[arg(long, value_parser = alpha_value, default_value_t = DEFAULT_ALPHA)]
    pub alpha1: f64,

    /// Learning rate of player B (learners only)
    #[arg(long, value_parser = alpha_value, default_value_t = DEFAULT_ALPHA)]
    pub alpha2: f64,

    /// Exploration rate of learners
    #[arg(long, value_parser = epsilon_value, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Number of games to play
    #[arg(long = "num-games", short = 'n', default_value_t = 1)]
    pub num_games: usize,

    /// Switch the first move between players every game
    #[arg(long)]
    pub switch_turn: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn execute(args: DuelArgs) -> Result<()> {
    let mut builder = AppBuilder::new();
    if let Some(seed) = args.seed {
        builder = builder.with_default_seed(seed);
    }
    let app = builder.build();

    // Learners in a duel start from scratch, sharing the board's fresh keys.
    let (data, _) = app.load_learned_data(None);
    let mut board = app.create_board(Mark::X, data.keys);

    let config_for = |alpha: f64| {
        LearnerConfig::new()
            .with_alpha(alpha)
            .with_epsilon(args.epsilon)
            .with_verbosity(args.verbose)
    };
    let config_a = config_for(args.alpha1);
    let config_b = config_for(args.alpha2);
    let mut agent_a = build_agent(&app, args.player_a, Mark::X, &config_a, HashMap::new())?;
    let mut agent_b = build_agent(&app, args.player_b, Mark::O, &config_b, HashMap::new())?;

    print_section("Duel");
    print_kv("Player A", args.player_a.describe());
    print_kv("Player B", args.player_b.describe());

    let config = MatchConfig {
        num_games: args.num_games,
        first_player: Side::A,
        switch_turn: args.switch_turn,
        seed: args.seed,
    };
    let mut runner =
        MatchRunner::new(config).with_observer(Box::new(BoardObserver::stdout(args.verbose)));
    runner = if args.verbose > 0 || args.num_games == 1 {
        runner.with_observer(Box::new(StatisticsObserver::stdout()))
    } else {
        runner.with_observer(Box::new(ProgressObserver::new()))
    };

    let result = runner
        .run(&mut board, agent_a.as_mut(), agent_b.as_mut())
        .context("duel failed")?;
    print_match_result(&result);

    Ok(())
}
