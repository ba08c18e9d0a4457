#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the plain-text puzzle format.
//!
//! ```text
//! <bounded> <signed> <width> <height>
//! <c0> <c1> <c2> <c3>
//! ...
//! ```
//!
//! The first line holds four integers; `bounded` and `signed` are true when
//! non-zero. Every further non-blank line holds one piece, colors clockwise
//! from the top.

use crate::puzzle::piece::{Color, Piece};
use crate::puzzle::problem::Problem;
use itertools::Itertools;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a puzzle file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading failed.
    #[error("failed to read puzzle: {0}")]
    Io(#[from] io::Error),

    /// The input has no non-blank line.
    #[error("puzzle input is empty")]
    MissingHeader,

    /// The header is not four integers with a valid size.
    #[error("line {line}: expected `bounded signed width height`, found `{content}`")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// The line as read.
        content: String,
    },

    /// A piece line is not four colors.
    #[error("line {line}: expected four colors, found `{content}`")]
    InvalidPiece {
        /// 1-based line number.
        line: usize,
        /// The line as read.
        content: String,
    },
}

/// Reads the first four integers of `line`, ignoring anything after them.
fn four_ints(line: &str) -> Option<[i64; 4]> {
    let values = line
        .split_whitespace()
        .take(4)
        .map(str::parse)
        .collect::<Result<Vec<i64>, _>>()
        .ok()?;
    values.try_into().ok()
}

/// Parses a puzzle from `reader`.
///
/// The puzzle is returned as read, pieces that fit no cell included; call
/// [`Problem::validate`] to check that it can be encoded.
///
/// # Errors
///
/// Returns [`ParseError`] on I/O failure, a bad header, or a piece line without
/// four integers.
pub fn parse_problem<R: BufRead>(reader: R) -> Result<Problem, ParseError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|l| (index + 1, l)));

    let (header_line, header) = loop {
        match lines.next() {
            None => return Err(ParseError::MissingHeader),
            Some(line) => {
                let (number, content) = line?;
                if !content.trim().is_empty() {
                    break (number, content);
                }
            }
        }
    };

    let invalid_header = || ParseError::InvalidHeader {
        line: header_line,
        content: header.clone(),
    };
    let [bounded, signed, width, height] = four_ints(&header).ok_or_else(invalid_header)?;
    let width = usize::try_from(width).map_err(|_| invalid_header())?;
    let height = usize::try_from(height).map_err(|_| invalid_header())?;
    let mut problem = Problem::new(bounded != 0, signed != 0, width, height);

    for line in lines {
        let (number, content) = line?;
        if content.trim().is_empty() {
            continue;
        }
        let invalid_piece = || ParseError::InvalidPiece {
            line: number,
            content: content.clone(),
        };
        let colors = four_ints(&content).ok_or_else(invalid_piece)?;
        let mut piece = [0 as Color; 4];
        for (slot, value) in piece.iter_mut().zip(colors) {
            *slot = Color::try_from(value).map_err(|_| invalid_piece())?;
        }
        problem.add_piece(Piece::new(piece));
    }

    Ok(problem)
}

/// Parses a puzzle file.
///
/// # Errors
///
/// See [`parse_problem`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Problem, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_problem(io::BufReader::new(file))
}

/// Writes `problem` in the text format read by [`parse_problem`].
///
/// # Errors
///
/// Propagates I/O errors from `writer`.
pub fn write_problem<W: Write>(problem: &Problem, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {} {}",
        u8::from(problem.bounded()),
        u8::from(problem.signed()),
        problem.width(),
        problem.height()
    )?;
    for piece in problem.pieces() {
        writeln!(writer, "{}", piece.colors().iter().join(" "))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures::three_by_three;
    use crate::puzzle::problem::ProblemError;
    use std::io::Cursor;

    #[test]
    fn test_parse_problem() {
        let text = "1 0 2 2\n0 1 2 0\n\n0 0 3 1\n3 0 0 4 extra\n2 4 0 0\n";
        let problem = parse_problem(Cursor::new(text)).unwrap();
        assert!(problem.bounded());
        assert!(!problem.signed());
        assert_eq!((problem.width(), problem.height()), (2, 2));
        assert_eq!(problem.corners().len(), 4);
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            parse_problem(Cursor::new("\n\n")),
            Err(ParseError::MissingHeader)
        ));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            parse_problem(Cursor::new("1 0 2\n")),
            Err(ParseError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_problem(Cursor::new("1 0 -2 2\n")),
            Err(ParseError::InvalidHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_bad_piece_line() {
        assert!(matches!(
            parse_problem(Cursor::new("1 0 2 2\n0 1 x 0\n")),
            Err(ParseError::InvalidPiece { line: 2, .. })
        ));
    }

    #[test]
    fn test_opposite_boundaries_are_left_to_validation() {
        let problem = parse_problem(Cursor::new("1 0 2 2\n0 1 0 2\n")).unwrap();
        assert_eq!(problem.unplaceable().len(), 1);
        assert!(matches!(
            problem.validate(),
            Err(ProblemError::InvalidPiece { zeros: 2, .. })
        ));
    }

    #[test]
    fn test_written_problem_parses_back() {
        let problem = three_by_three();
        let mut buffer = Vec::new();
        write_problem(&problem, &mut buffer).unwrap();
        let parsed = parse_problem(Cursor::new(buffer)).unwrap();
        assert_eq!(parsed, problem);
    }
}
