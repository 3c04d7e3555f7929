//! Observer implementations for game sessions
//!
//! Observers allow composable reporting during a match without coupling the
//! driver to specific output formats.

use std::{
    fs::File,
    io::{self, Stdout, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::driver::{GameOutcome, Side};
use crate::{
    Error, Result,
    ports::Observer,
    tictactoe::{Board, Mark},
    types::Square,
};

/// Running A/B/draw counts shared by several observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub draws: usize,
    pub a_wins: usize,
    pub b_wins: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Side::A) => self.a_wins += 1,
            GameOutcome::Win(Side::B) => self.b_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.draws + self.a_wins + self.b_wins
    }

    /// Fractions of draws, A wins and B wins.
    pub fn fractions(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let total = total as f64;
        (
            self.draws as f64 / total,
            self.a_wins as f64 / total,
            self.b_wins as f64 / total,
        )
    }
}

/// Progress bar observer - Shows match progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    tally: Tally,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            tally: Tally::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "A:{} B:{} D:{}",
            self.tally.a_wins, self.tally.b_wins, self.tally.draws
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, total_games: Option<usize>) -> Result<()> {
        let pb = match total_games {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                        .map_err(|e| Error::ProgressBarTemplate {
                            message: e.to_string(),
                        })?
                        .progress_chars("=>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome, _exploring: bool) -> Result<()> {
        self.tally.record(outcome);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and game lengths
#[derive(Debug, Default)]
pub struct MetricsObserver {
    tally: Tally,
    exploring_games: usize,
    move_counts: Vec<usize>,
}

/// Summary of match metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub a_wins: usize,
    pub b_wins: usize,
    pub draws: usize,
    pub exploring_games: usize,
    pub draw_rate: f64,
    pub avg_game_length: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Get average game length in placements
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_games: self.tally.total(),
            a_wins: self.tally.a_wins,
            b_wins: self.tally.b_wins,
            draws: self.tally.draws,
            exploring_games: self.exploring_games,
            draw_rate: self.tally.fractions().0,
            avg_game_length: self.avg_game_length(),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_game_start(&mut self, _game_num: usize, _board: &Board) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(&mut self, _game_num: usize, _mark: Mark, _square: Square, _board: &Board) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome, exploring: bool) -> Result<()> {
        self.tally.record(outcome);
        if exploring {
            self.exploring_games += 1;
        }
        Ok(())
    }
}

/// A shared observer, so the caller can read its state after the runner
/// that owns the boxed clone has finished.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_session_start(&mut self, total_games: Option<usize>) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_session_start(total_games)
    }

    fn on_game_start(&mut self, game_num: usize, board: &Board) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_game_start(game_num, board)
    }

    fn on_move(&mut self, game_num: usize, mark: Mark, square: Square, board: &Board) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_move(game_num, mark, square, board)
    }

    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome, exploring: bool) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_game_end(game_num, outcome, exploring)
    }

    fn on_session_end(&mut self) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_session_end()
    }
}

/// Statistics observer - one line per game with running counts and fractions
///
/// ```text
/// Player A wins!   --- {draw = 3, A_win = 1, B_win = 0} - {0.750, 0.250, 0.000}
/// ```
pub struct StatisticsObserver<W: Write + Send = Stdout> {
    output: W,
    tally: Tally,
}

impl StatisticsObserver<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> StatisticsObserver<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            tally: Tally::default(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write + Send> Observer for StatisticsObserver<W> {
    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome, _exploring: bool) -> Result<()> {
        self.tally.record(outcome);
        let label = outcome.to_string();
        let (draws, a_wins, b_wins) = self.tally.fractions();
        writeln!(
            self.output,
            "{label:<16} --- {{draw = {}, A_win = {}, B_win = {}}} - {{{draws:.3}, {a_wins:.3}, {b_wins:.3}}}",
            self.tally.draws, self.tally.a_wins, self.tally.b_wins,
        )?;
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }
}

/// Board observer - prints a game banner and, above verbosity 1, the board after every move
pub struct BoardObserver<W: Write + Send = Stdout> {
    output: W,
    verbosity: u8,
}

impl BoardObserver<Stdout> {
    pub fn stdout(verbosity: u8) -> Self {
        Self::new(io::stdout(), verbosity)
    }
}

impl<W: Write + Send> BoardObserver<W> {
    pub fn new(output: W, verbosity: u8) -> Self {
        Self { output, verbosity }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write + Send> Observer for BoardObserver<W> {
    fn on_game_start(&mut self, _game_num: usize, board: &Board) -> Result<()> {
        if self.verbosity > 0 {
            writeln!(self.output, "{}", "-".repeat(52))?;
            writeln!(self.output, "  --- NEW GAME ---")?;
        }
        if self.verbosity > 1 {
            writeln!(self.output, "{}", board.render())?;
        }
        Ok(())
    }

    fn on_move(&mut self, _game_num: usize, mark: Mark, square: Square, board: &Board) -> Result<()> {
        if self.verbosity > 1 {
            writeln!(self.output, "'{mark}' plays {square}")?;
            writeln!(self.output, "{}", board.render())?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CurvePoint {
    num_games: usize,
    percentage_draws: f64,
    percentage_a_wins: f64,
    percentage_b_wins: f64,
}

/// CSV observer - writes the running outcome percentages after every game
///
/// Columns: `num_games,percentage_draws,percentage_a_wins,percentage_b_wins`.
pub struct CsvObserver<W: Write = File> {
    writer: csv::Writer<W>,
    tally: Tally,
}

impl CsvObserver<File> {
    /// Create a CSV observer writing to a new file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create CSV file {path:?}"),
            source,
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvObserver<W> {
    pub fn from_writer(output: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(output),
            tally: Tally::default(),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Io {
            operation: "flush CSV output".to_string(),
            source: e.into_error(),
        })
    }
}

impl<W: Write + Send> Observer for CsvObserver<W> {
    fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome, _exploring: bool) -> Result<()> {
        self.tally.record(outcome);
        let (draws, a_wins, b_wins) = self.tally.fractions();
        self.writer.serialize(CurvePoint {
            num_games: self.tally.total(),
            percentage_draws: draws * 100.0,
            percentage_a_wins: a_wins * 100.0,
            percentage_b_wins: b_wins * 100.0,
        })?;
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Milestone observer - Tracks when side A stops losing
///
/// Records the first draw and the last loss of side A, which shows how long a
/// learner needs before it holds a perfect opponent to a draw.
#[derive(Debug, Default)]
pub struct MilestoneObserver {
    first_draw: Option<usize>,
    last_loss: Option<usize>,
    games: usize,
    verbose: bool,
}

impl MilestoneObserver {
    /// Create a milestone observer; a verbose one prints its summary when the session ends
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn first_draw(&self) -> Option<usize> {
        self.first_draw
    }

    pub fn last_loss(&self) -> Option<usize> {
        self.last_loss
    }

    pub fn games(&self) -> usize {
        self.games
    }

    pub fn summary(&self) -> String {
        let describe = |game: Option<usize>| match game {
            Some(game) => format!("game {}", game + 1),
            None => "never".to_string(),
        };
        format!(
            "first draw: {}, last loss of player A: {} (over {} games)",
            describe(self.first_draw),
            describe(self.last_loss),
            self.games
        )
    }
}

impl Observer for MilestoneObserver {
    fn on_game_end(&mut self, game_num: usize, outcome: GameOutcome, _exploring: bool) -> Result<()> {
        self.games += 1;
        match outcome {
            GameOutcome::Draw => {
                self.first_draw.get_or_insert(game_num);
            }
            GameOutcome::Win(Side::B) => self.last_loss = Some(game_num),
            GameOutcome::Win(Side::A) => {}
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if self.verbose {
            println!("Milestones: {}", self.summary());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        let board = Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(1));
        let square = Square::new(0, 0).unwrap();

        observer.on_game_start(0, &board).unwrap();
        for _ in 0..5 {
            observer.on_move(0, Mark::X, square, &board).unwrap();
        }
        observer.on_game_end(0, GameOutcome::Win(Side::A), false).unwrap();
        observer.on_game_start(1, &board).unwrap();
        for _ in 0..9 {
            observer.on_move(1, Mark::X, square, &board).unwrap();
        }
        observer.on_game_end(1, GameOutcome::Draw, true).unwrap();

        let summary = observer.summary();
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.a_wins, 1);
        assert_eq!(summary.exploring_games, 1);
        assert_eq!(summary.avg_game_length, 7.0);
        assert_eq!(summary.draw_rate, 0.5);
    }

    #[test]
    fn test_shared_metrics_observer_readable_after_match() {
        use crate::{
            agents::SearchAgent,
            pipeline::{MatchConfig, MatchRunner},
        };

        let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
        let mut board = Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(2));
        let mut a = SearchAgent::new(Mark::X);
        let mut b = SearchAgent::new(Mark::O);
        let config = MatchConfig {
            num_games: 3,
            ..MatchConfig::default()
        };

        MatchRunner::new(config)
            .with_observer(Box::new(Arc::clone(&metrics)))
            .run(&mut board, &mut a, &mut b)
            .unwrap();

        let summary = metrics.lock().unwrap().summary();
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.draws, 3);
        assert_eq!(summary.exploring_games, 0);
        assert_eq!(summary.avg_game_length, 9.0);
    }

    #[test]
    fn test_statistics_line_format() {
        let mut observer = StatisticsObserver::new(Vec::new());
        observer.on_game_end(0, GameOutcome::Win(Side::A), false).unwrap();
        observer.on_game_end(1, GameOutcome::Draw, false).unwrap();

        let text = String::from_utf8(observer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Player A wins!   --- {draw = 0, A_win = 1, B_win = 0} - {0.000, 1.000, 0.000}"
        );
        assert_eq!(
            lines[1],
            "Draw!            --- {draw = 1, A_win = 1, B_win = 0} - {0.500, 0.500, 0.000}"
        );
    }

    #[test]
    fn test_csv_observer_writes_learning_curve() {
        let mut observer = CsvObserver::from_writer(Vec::new());
        observer.on_game_end(0, GameOutcome::Win(Side::B), false).unwrap();
        observer.on_game_end(1, GameOutcome::Draw, false).unwrap();
        observer.on_session_end().unwrap();

        let text = String::from_utf8(observer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "num_games,percentage_draws,percentage_a_wins,percentage_b_wins"
        );
        assert_eq!(lines[1], "1,0.0,0.0,100.0");
        assert_eq!(lines[2], "2,50.0,0.0,50.0");
    }

    #[test]
    fn test_board_observer_respects_verbosity() {
        let board = Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(1));
        let square = Square::new(1, 1).unwrap();

        let mut quiet = BoardObserver::new(Vec::new(), 0);
        quiet.on_game_start(0, &board).unwrap();
        quiet.on_move(0, Mark::X, square, &board).unwrap();
        assert!(quiet.into_inner().is_empty());

        let mut chatty = BoardObserver::new(Vec::new(), 2);
        chatty.on_game_start(0, &board).unwrap();
        chatty.on_move(0, Mark::X, square, &board).unwrap();
        let text = String::from_utf8(chatty.into_inner()).unwrap();
        assert!(text.contains("NEW GAME"));
        assert!(text.contains(&board.render()));
    }

    #[test]
    fn test_board_observer_prints_banner_before_empty_board() {
        let board = Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(3));
        let mut observer = BoardObserver::new(Vec::new(), 2);
        observer.on_game_start(0, &board).unwrap();

        let text = String::from_utf8(observer.into_inner()).unwrap();
        let banner = text.find("NEW GAME").unwrap();
        let grid = text.find(&board.render()).unwrap();
        assert!(banner < grid);
    }

    #[test]
    fn test_milestone_observer() {
        let mut observer = MilestoneObserver::new(false);

        observer.on_game_end(0, GameOutcome::Win(Side::B), false).unwrap();
        observer.on_game_end(1, GameOutcome::Win(Side::B), false).unwrap();
        assert_eq!(observer.last_loss(), Some(1));
        assert_eq!(observer.first_draw(), None);

        observer.on_game_end(2, GameOutcome::Draw, false).unwrap();
        observer.on_game_end(3, GameOutcome::Draw, false).unwrap();
        assert_eq!(observer.first_draw(), Some(2));
        assert_eq!(observer.last_loss(), Some(1));
        assert_eq!(observer.games(), 4);
        assert!(observer.summary().contains("first draw: game 3"));
    }
}
