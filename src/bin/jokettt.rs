//! jokettt CLI - tic-tac-toe with minimax, random and learning players
//!
//! - `play`: a human at the console against an AI
//! - `train`: a learner against an AI opponent, saving what it learned
//! - `duel`: any two AI players against each other

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jokettt")]
#[command(version, about = "Tic-tac-toe with minimax and learning players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against an AI player
    Play(jokettt::cli::commands::play::PlayArgs),

    /// Train a learner and save the learned data
    Train(jokettt::cli::commands::train::TrainArgs),

    /// Watch two AI players
    Duel(jokettt::cli::commands::duel::DuelArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => jokettt::cli::commands::play::execute(args),
        Commands::Train(args) => jokettt::cli::commands::train::execute(args),
        Commands::Duel(args) => jokettt::cli::commands::duel::execute(args),
    }
}
