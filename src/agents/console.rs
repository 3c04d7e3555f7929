//! Human player reading moves from a console.

use std::io::{BufRead, Write};

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Board, Mark},
    types::{BOARD_SIZE, Square},
};

/// Parse a move typed by a human.
///
/// Accepts `row,col`, `row col` (both 0-based) or a single keypad digit `1`-`9`
/// numbering the squares row by row from the top left. `q` or `quit` ends input.
///
/// # Errors
///
/// Returns [`Error::InputClosed`] for a quit command and
/// [`Error::InvalidInput`] for anything unparsable or off the board.
pub fn parse_move(input: &str) -> Result<Square> {
    let trimmed = input.trim();
    let invalid = |reason: &str| Error::InvalidInput {
        input: trimmed.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Err(Error::InputClosed);
    }

    let parts: Vec<&str> = trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [digit] => {
            let number: usize = digit
                .parse()
                .map_err(|_| invalid("expected a number 1-9 or 'row,col'"))?;
            if !(1..=BOARD_SIZE).contains(&number) {
                return Err(invalid("square number must be 1-9"));
            }
            Square::from_index(number - 1)
        }
        [row, col] => {
            let row: usize = row.parse().map_err(|_| invalid("row is not a number"))?;
            let col: usize = col.parse().map_err(|_| invalid("column is not a number"))?;
            Square::new(row, col).map_err(|_| invalid("row and column must be 0-2"))
        }
        _ => Err(invalid("expected 'row,col' or a number 1-9")),
    }
}

/// Console player: prompts on `output` and reads moves from `input`.
///
/// Re-prompts until the typed move is well formed and the square is empty.
pub struct ConsoleAgent<R, W> {
    mark: Mark,
    input: R,
    output: W,
    name: String,
}

impl<R: BufRead, W: Write> ConsoleAgent<R, W> {
    pub fn new(mark: Mark, input: R, output: W) -> Self {
        Self {
            mark,
            input,
            output,
            name: "Human".to_string(),
        }
    }

    fn prompt(&mut self) -> Result<()> {
        write!(
            self.output,
            "Your move ('{}'), as row,col or 1-9 (q to quit): ",
            self.mark
        )?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R, W> Agent for ConsoleAgent<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn select_move(&mut self, board: &Board) -> Result<Square> {
        if board.is_full() {
            return Err(Error::NoLegalMove);
        }

        loop {
            self.prompt()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed);
            }

            match parse_move(&line) {
                Ok(square) if board.is_empty_at(square) => return Ok(square),
                Ok(square) => writeln!(self.output, "Square {square} is already taken.")?,
                Err(Error::InputClosed) => return Err(Error::InputClosed),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn mark(&self) -> Mark {
        self.mark
    }

    fn name(&self) -> &str {
        &self.name
    }
}
