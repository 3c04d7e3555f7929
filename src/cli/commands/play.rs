//! Play command - a human at the console against an AI player

use std::{
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    Error,
    agents::{ConsoleAgent, LearningAgent},
    app::{App, LearnerConfig, SearchConfig},
    cli::{PlayerKind, output::print_kv},
    learned_data::TrainingMetadata,
    pipeline::{BoardObserver, GameDriver, GameOutcome, Side},
    ports::Agent,
    tictactoe::{Board, Mark},
};

const AI_MARK: Mark = Mark::X;
const HUMAN_MARK: Mark = Mark::O;

#[derive(Parser, Debug)]
#[command(about = "Play tic-tac-toe against an AI player")]
pub struct PlayArgs {
    /// AI opponent
    #[arg(value_enum, default_value = "learner")]
    pub opponent: PlayerKind,

    /// Let the AI make the first move of the first game
    #[arg(long)]
    pub second: bool,

    /// Load learned data from file
    #[arg(long = "load", short = 'l')]
    pub load: Option<PathBuf>,

    /// Save learned data to file after every finished game
    #[arg(long = "save", short = 's')]
    pub save: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let app = App::new();
    let (data, warning) = app.load_learned_data(args.load.as_deref());
    if let Some(path) = &args.load {
        println!("...loading data from {}", path.display());
    }
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }

    let mut board = app.create_board(AI_MARK, data.keys);
    let mut human = ConsoleAgent::new(HUMAN_MARK, BufReader::new(io::stdin()), io::stdout());
    println!("You play '{HUMAN_MARK}' against a {}.", args.opponent.describe());
    println!("Type q to quit.");

    match args.opponent {
        PlayerKind::Learner => {
            match &args.save {
                Some(path) => println!(
                    "...the learned data will be saved to {} after every game",
                    path.display()
                ),
                None => println!("...the learned data will not be saved"),
            }
            let config = LearnerConfig::new().with_verbosity(args.verbose);
            let mut learner = app.create_learner(AI_MARK, &config, data.values)?;
            let previous_games = data.metadata.games_played;
            play_session(
                &mut board,
                &mut learner,
                &mut human,
                !args.second,
                args.verbose,
                |board, learner, games| match &args.save {
                    Some(path) => save_learner(&app, board, learner, previous_games + games, path),
                    None => Ok(()),
                },
            )?;
            print_kv("Known positions", &learner.value_table().len().to_string());
        }
        kind => {
            let config = SearchConfig {
                random_mode: kind == PlayerKind::Random,
                verbosity: args.verbose,
                ..SearchConfig::default()
            };
            let mut ai = app.create_search_agent(AI_MARK, &config);
            play_session(
                &mut board,
                &mut ai,
                &mut human,
                !args.second,
                args.verbose,
                |_, _, _| Ok(()),
            )?;
        }
    }

    Ok(())
}

/// Play games until the human quits, switching the first mover each game.
///
/// `after_game` runs after every finished game with the final board, the AI
/// and the number of games played so far. A session cut short by an
/// interrupt or an input error keeps whatever it already persisted.
fn play_session<A, R, W, F>(
    board: &mut Board,
    ai: &mut A,
    human: &mut ConsoleAgent<R, W>,
    human_first: bool,
    verbosity: u8,
    mut after_game: F,
) -> Result<usize>
where
    A: Agent,
    R: BufRead + Send,
    W: Write + Send,
    F: FnMut(&Board, &A, usize) -> Result<()>,
{
    let mut driver =
        GameDriver::new().with_observer(Box::new(BoardObserver::stdout(verbosity.max(2))));
    driver.begin_session(None)?;

    let mut human_first = human_first;
    loop {
        board.reset();

        // Side A is the human.
        match driver.play_game(board, human, ai, human_first) {
            Ok(GameOutcome::Win(Side::A)) => println!("You win!! :-("),
            Ok(GameOutcome::Win(Side::B)) => println!("You lose! :-D"),
            Ok(GameOutcome::Draw) => println!("Draw! ;-)"),
            Err(Error::InputClosed) => break,
            Err(err) => return Err(err).context("game aborted"),
        }
        after_game(&*board, &*ai, driver.games_played())?;
        human_first = !human_first;
    }

    driver.end_session()?;
    println!("\nBye! {} games played.", driver.games_played());
    Ok(driver.games_played())
}

fn save_learner(
    app: &App,
    board: &Board,
    learner: &LearningAgent,
    games: usize,
    path: &Path,
) -> Result<()> {
    let metadata = TrainingMetadata::new(games, learner.alpha(), learner.epsilon(), "human");
    app.save_learned_data(board, learner, metadata, path)
        .with_context(|| format!("failed to save learned data to {}", path.display()))
}
