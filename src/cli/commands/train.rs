//! Train command - a learner (player A) against an AI opponent

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::{AppBuilder, LearnerConfig},
    cli::{
        PlayerKind,
        config::{alpha_value, build_agent, epsilon_value},
        output::{format_number, print_kv, print_match_result, print_section},
    },
    learned_data::TrainingMetadata,
    pipeline::{
        BoardObserver, CsvObserver, MatchConfig, MatchRunner, MetricsObserver, MilestoneObserver,
        ProgressObserver, Side, StatisticsObserver,
    },
    tictactoe::Mark,
    types::{DEFAULT_ALPHA, DEFAULT_EPSILON},
};

const LEARNER_MARK: Mark = Mark::X;
const OPPONENT_MARK: Mark = Mark::O;

#[derive(Parser, Debug)]
#[command(about = "Train a learner against an AI opponent")]
pub struct TrainArgs {
    /// Opponent kind
    #[arg(long = "opponent-type", short = 't', value_enum, default_value = "minimax")]
    pub opponent: PlayerKind,

    /// Learning rate of the learner
    #[arg(long, value_parser = alpha_value, default_value_t = DEFAULT_ALPHA)]
    pub alpha1: f64,

    /// Learning rate of the opponent (learner opponents only)
    #[arg(long, value_parser = alpha_value, default_value_t = DEFAULT_ALPHA)]
    pub alpha2: f64,

    /// Exploration rate of the learner
    #[arg(long, value_parser = epsilon_value, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Number of games to play
    #[arg(long = "num-games", short = 'n', default_value_t = 100)]
    pub num_games: usize,

    /// Switch the first move between players every game
    #[arg(long)]
    pub switch_turn: bool,

    /// Load learned data from file
    #[arg(long = "load", short = 'l')]
    pub load: Option<PathBuf>,

    /// Save learned data to file at the end
    #[arg(long = "save", short = 's')]
    pub save: Option<PathBuf>,

    /// Write the learning curve (running outcome percentages) as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write a JSON summary of the match
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut builder = AppBuilder::new();
    if let Some(seed) = args.seed {
        builder = builder.with_default_seed(seed);
    }
    let app = builder.build();

    if let Some(path) = &args.load {
        println!("...loading data from {}", path.display());
    }
    let (data, warning) = app.load_learned_data(args.load.as_deref());
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }
    match &args.save {
        Some(path) => println!("...the learned data will be saved to {}", path.display()),
        None => println!("...the learned data will not be saved"),
    }

    let mut board = app.create_board(LEARNER_MARK, data.keys);
    let learner_config = LearnerConfig::new()
        .with_alpha(args.alpha1)
        .with_epsilon(args.epsilon)
        .with_verbosity(args.verbose);
    let mut learner = app.create_learner(LEARNER_MARK, &learner_config, data.values)?;

    let opponent_config = LearnerConfig::new()
        .with_alpha(args.alpha2)
        .with_epsilon(args.epsilon)
        .with_verbosity(args.verbose);
    let mut opponent = build_agent(
        &app,
        args.opponent,
        OPPONENT_MARK,
        &opponent_config,
        HashMap::new(),
    )?;

    print_section("Training");
    print_kv("Learner", &format!("alpha = {}, epsilon = {}", args.alpha1, args.epsilon));
    print_kv("Opponent", args.opponent.describe());
    print_kv("Games", &args.num_games.to_string());

    let config = MatchConfig {
        num_games: args.num_games,
        first_player: Side::A,
        switch_turn: args.switch_turn,
        seed: args.seed,
    };
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut runner = MatchRunner::new(config).with_observer(Box::new(Arc::clone(&metrics)));
    if args.verbose > 0 {
        runner = runner
            .with_observer(Box::new(BoardObserver::stdout(args.verbose)))
            .with_observer(Box::new(StatisticsObserver::stdout()));
    } else {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.opponent == PlayerKind::Minimax {
        runner = runner.with_observer(Box::new(MilestoneObserver::new(true)));
    }
    if let Some(path) = &args.csv {
        let observer = CsvObserver::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        runner = runner.with_observer(Box::new(observer));
    }

    let result = runner
        .run(&mut board, &mut learner, opponent.as_mut())
        .context("training failed")?;
    print_match_result(&result);
    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();
    print_kv("Avg game length", &format!("{:.2} moves", metrics.avg_game_length));
    print_kv("Exploring games", &format_number(metrics.exploring_games));
    print_kv("Known positions", &learner.value_table().len().to_string());

    if let Some(path) = &args.save {
        let metadata = TrainingMetadata::new(
            data.metadata.games_played + result.total_games,
            args.alpha1,
            args.epsilon,
            args.opponent.describe(),
        );
        app.save_learned_data(&board, &learner, metadata, path)
            .with_context(|| format!("failed to save learned data to {}", path.display()))?;
        print_kv("Learned data saved", &path.display().to_string());
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        print_kv("Summary saved", &path.display().to_string());
    }

    Ok(())
}
