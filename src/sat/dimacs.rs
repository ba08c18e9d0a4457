#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format includes:
//! - Comment lines starting with `c`. Their text becomes the formula comment.
//! - A problem line `p cnf <num_variables> <num_clauses>`. It is checked for
//!   shape; the counts are derived from the clauses actually read.
//! - Clauses as whitespace-separated literals, each terminated by `0`. A clause
//!   may span several lines.
//! - An optional `%` line marking the end of data.
//!
//! The writer lives on [`CnfFormula`] itself (`to_dimacs`, `write_dimacs`).

use crate::sat::cnf::CnfFormula;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading DIMACS input.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// Reading failed.
    #[error("failed to read DIMACS input: {0}")]
    Io(#[from] io::Error),

    /// A `p` line that is not `p cnf <vars> <clauses>`.
    #[error("line {line}: malformed problem line `{content}`")]
    ProblemLine {
        /// 1-based line number.
        line: usize,
        /// The line as read.
        content: String,
    },

    /// A token that is not an integer literal.
    #[error("line {line}: `{token}` is not a literal")]
    Literal {
        /// 1-based line number.
        line: usize,
        /// The token.
        token: String,
    },

    /// The last clause has no terminating 0.
    #[error("input ends inside a clause (missing terminating 0)")]
    UnterminatedClause,
}

/// Parses DIMACS text from `reader`.
///
/// # Errors
///
/// Returns [`DimacsError`] on I/O failure, on a malformed `p` line, on a token
/// that is not an integer, or when the last clause lacks its terminating `0`.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<CnfFormula, DimacsError> {
    let mut comments = Vec::new();
    let mut clauses: Vec<Vec<Literal>> = Vec::new();
    let mut current = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None => {}
            Some(&"c") => {
                comments.push(line.trim_start()[1..].trim_start().to_string());
            }
            Some(&"p") => {
                let fields = parts.collect_vec();
                let valid = fields.len() == 4
                    && fields[1] == "cnf"
                    && fields[2].parse::<u32>().is_ok()
                    && fields[3].parse::<usize>().is_ok();
                if !valid {
                    return Err(DimacsError::ProblemLine {
                        line: line_no,
                        content: line.clone(),
                    });
                }
            }
            Some(_) => {
                for token in parts {
                    let literal = token.parse::<Literal>().map_err(|_| DimacsError::Literal {
                        line: line_no,
                        token: token.to_string(),
                    })?;
                    if literal == 0 {
                        clauses.push(std::mem::take(&mut current));
                    } else {
                        current.push(literal);
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        return Err(DimacsError::UnterminatedClause);
    }

    let mut cnf = CnfFormula::from_clauses(clauses).map_err(|_| DimacsError::UnterminatedClause)?;
    if !comments.is_empty() {
        cnf.set_comment(comments.join("\n"));
    }
    Ok(cnf)
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// Returns [`DimacsError::Io`] if the file cannot be opened, or any error of
/// [`parse_dimacs`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<CnfFormula, DimacsError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EncodingKind;
    use crate::puzzle::fixtures::three_by_three;
    use crate::puzzle::generator::{GenerateConfig, generate};
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.comment(), Some("This is a comment"));
        assert_eq!(cnf.clauses()[0].literals(), &[1, -2]);
        assert_eq!(cnf.clauses()[1].literals(), &[2, 3]);
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              c this should be ignored";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.comment(), None);
    }

    #[test]
    fn test_clause_spanning_lines() {
        let cnf = parse_dimacs(Cursor::new("p cnf 3 1\n1 2\n3 0\n")).unwrap();
        assert_eq!(cnf.num_clauses(), 1);
        assert_eq!(cnf.clauses()[0].literals(), &[1, 2, 3]);
    }

    #[test]
    fn test_malformed_literal() {
        let err = parse_dimacs(Cursor::new("1 abc 0\n")).unwrap_err();
        assert!(matches!(err, DimacsError::Literal { line: 1, ref token } if token == "abc"));
    }

    #[test]
    fn test_malformed_problem_line() {
        let err = parse_dimacs(Cursor::new("p dnf 1 1\n1 0\n")).unwrap_err();
        assert!(matches!(err, DimacsError::ProblemLine { line: 1, .. }));
    }

    #[test]
    fn test_unterminated_clause() {
        let err = parse_dimacs(Cursor::new("p cnf 2 1\n1 2\n")).unwrap_err();
        assert!(matches!(err, DimacsError::UnterminatedClause));
    }

    #[test]
    fn test_written_dimacs_parses_back() {
        let mut cnf = CnfFormula::with_comment("round trip");
        cnf.extend_clauses(vec![vec![1, -3], vec![2], vec![-1, -2, 3]])
            .unwrap();

        let parsed = parse_dimacs(Cursor::new(cnf.to_dimacs())).unwrap();
        assert_eq!(parsed.clauses(), cnf.clauses());
        assert_eq!(parsed.variables(), cnf.variables());
        assert_eq!(parsed.comment(), Some("round trip"));
        assert_eq!(parsed.to_dimacs(), cnf.to_dimacs());
    }

    #[test]
    fn test_encoder_output_parses_back() {
        let unbounded = GenerateConfig {
            bounded: false,
            width: 2,
            height: 2,
            color_count: 3,
            seed: Some(4),
            ..GenerateConfig::default()
        };
        let problems = [three_by_three(), generate(&unbounded).unwrap().problem];

        for problem in &problems {
            for kind in EncodingKind::ALL {
                let cnf = kind.encoder(problem).unwrap().encode().unwrap();
                let parsed = parse_dimacs(Cursor::new(cnf.to_string())).unwrap();
                assert_eq!(parsed.clauses(), cnf.clauses(), "{kind}");
                assert_eq!(parsed.variables(), cnf.variables(), "{kind}");
                assert_eq!(parsed.num_vars(), cnf.num_vars(), "{kind}");
                assert_eq!(parsed.comment(), cnf.comment(), "{kind}");
            }
        }
    }
}
