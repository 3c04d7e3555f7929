//! Game driver and match runner
//!
//! The driver owns the turn order: it asks the agent to move, applies the
//! placement to the shared board and decides when the game is over. Agents
//! never touch the board themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Agent, Observer},
    tictactoe::{Board, PlaceOutcome},
};

/// One of the two seats in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Side),
    Draw,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::Win(side) => Some(side),
            GameOutcome::Draw => None,
        }
    }

    pub fn loser(self) -> Option<Side> {
        self.winner().map(Side::opponent)
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win(side) => write!(f, "Player {side} wins!"),
            GameOutcome::Draw => write!(f, "Draw!"),
        }
    }
}

/// Plays single games between two agents and reports to observers.
pub struct GameDriver {
    observers: Vec<Box<dyn Observer>>,
    games_played: usize,
}

impl GameDriver {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            games_played: 0,
        }
    }

    /// Add an observer to the driver
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Games completed since the driver was created.
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Notify observers that a series of games begins.
    pub fn begin_session(&mut self, total_games: Option<usize>) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_session_start(total_games)?;
        }
        Ok(())
    }

    /// Notify observers that the series is over.
    pub fn end_session(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_session_end()?;
        }
        Ok(())
    }

    /// Play one game on `board` from its current position.
    ///
    /// Agents alternate until a placement completes a line or fills the board.
    /// On a win the losing agent's [`Agent::learn_from_defeat`] hook runs; a
    /// draw triggers no learning at all. The board is left in its final state.
    ///
    /// # Errors
    ///
    /// Propagates agent errors (including [`crate::Error::InputClosed`] from a
    /// human who quit) and illegal placements returned by the board.
    pub fn play_game(
        &mut self,
        board: &mut Board,
        agent_a: &mut dyn Agent,
        agent_b: &mut dyn Agent,
        a_first: bool,
    ) -> Result<GameOutcome> {
        let game_num = self.games_played;
        agent_a.start_game();
        agent_b.start_game();
        for observer in &mut self.observers {
            observer.on_game_start(game_num, board)?;
        }

        let mut to_move = if a_first { Side::A } else { Side::B };
        let outcome = loop {
            let agent: &mut dyn Agent = match to_move {
                Side::A => &mut *agent_a,
                Side::B => &mut *agent_b,
            };
            let mark = agent.mark();
            let square = agent.select_move(board)?;
            let (_, placed) = board.place_at(square, mark)?;

            for observer in &mut self.observers {
                observer.on_move(game_num, mark, square, board)?;
            }

            match placed {
                PlaceOutcome::Win => break GameOutcome::Win(to_move),
                PlaceOutcome::Draw => break GameOutcome::Draw,
                PlaceOutcome::Continue => to_move = to_move.opponent(),
            }
        };

        match outcome.loser() {
            Some(Side::A) => agent_a.learn_from_defeat(board)?,
            Some(Side::B) => agent_b.learn_from_defeat(board)?,
            None => {}
        }

        let exploring = agent_a.exploring_move_flag() || agent_b.exploring_move_flag();
        for observer in &mut self.observers {
            observer.on_game_end(game_num, outcome, exploring)?;
        }

        self.games_played += 1;
        Ok(outcome)
    }
}

impl Default for GameDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: usize,

    /// Which side moves first in the first game
    pub first_player: Side,

    /// Alternate the first mover after every game
    pub switch_turn: bool,

    /// Seed for both agents' random sources (B gets `seed + 1`)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 100,
            first_player: Side::A,
            switch_turn: false,
            seed: None,
        }
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64
    } else {
        0.0
    }
}

/// Aggregate result of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub total_games: usize,
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,

    /// Games containing an exploring move; counted above, excluded below
    pub excluded_exploring: usize,

    pub policy_a_wins: usize,
    pub policy_b_wins: usize,
    pub policy_draws: usize,
}

#[derive(Serialize)]
struct MatchSummary<'a> {
    #[serde(flatten)]
    result: &'a MatchResult,
    draw_rate: f64,
    a_win_rate: f64,
    b_win_rate: f64,
    policy_draw_rate: f64,
}

impl MatchResult {
    /// Tally one finished game.
    pub fn record(&mut self, outcome: GameOutcome, exploring: bool) {
        self.total_games += 1;
        match outcome {
            GameOutcome::Win(Side::A) => self.a_wins += 1,
            GameOutcome::Win(Side::B) => self.b_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if exploring {
            self.excluded_exploring += 1;
            return;
        }
        match outcome {
            GameOutcome::Win(Side::A) => self.policy_a_wins += 1,
            GameOutcome::Win(Side::B) => self.policy_b_wins += 1,
            GameOutcome::Draw => self.policy_draws += 1,
        }
    }

    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.total_games)
    }

    pub fn a_win_rate(&self) -> f64 {
        rate(self.a_wins, self.total_games)
    }

    pub fn b_win_rate(&self) -> f64 {
        rate(self.b_wins, self.total_games)
    }

    /// Games played purely on policy (no exploring move).
    pub fn policy_games(&self) -> usize {
        self.total_games - self.excluded_exploring
    }

    pub fn policy_draw_rate(&self) -> f64 {
        rate(self.policy_draws, self.policy_games())
    }

    /// Save result to JSON file, including the derived rates
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let summary = MatchSummary {
            result: self,
            draw_rate: self.draw_rate(),
            a_win_rate: self.a_win_rate(),
            b_win_rate: self.b_win_rate(),
            policy_draw_rate: self.policy_draw_rate(),
        };
        serde_json::to_writer_pretty(file, &summary)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Plays a fixed number of games between two agents on one board.
pub struct MatchRunner {
    config: MatchConfig,
    driver: GameDriver,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            driver: GameDriver::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.driver.add_observer(observer);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run the whole match. The board is reset after every game, keeping its keys.
    pub fn run(
        &mut self,
        board: &mut Board,
        agent_a: &mut dyn Agent,
        agent_b: &mut dyn Agent,
    ) -> Result<MatchResult> {
        if let Some(seed) = self.config.seed {
            agent_a.set_rng_seed(seed);
            agent_b.set_rng_seed(seed.wrapping_add(1));
        }

        self.driver.begin_session(Some(self.config.num_games))?;

        let mut result = MatchResult::default();
        let mut a_first = self.config.first_player == Side::A;
        for _ in 0..self.config.num_games {
            let outcome = self.driver.play_game(board, agent_a, agent_b, a_first)?;
            let exploring = agent_a.exploring_move_flag() || agent_b.exploring_move_flag();
            result.record(outcome, exploring);

            if self.config.switch_turn {
                a_first = !a_first;
            }
            board.reset();
        }

        self.driver.end_session()?;
        Ok(result)
    }
}
