#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Driving an external SAT solver process.
//!
//! Two protocols are supported:
//!
//! - [`Protocol::File`] (MiniSat style): the formula is written to a file,
//!   the solver is run as `<binary> <cnf-file> <solution-file>` and the
//!   solution file is read back. Its first line is `SAT` or `UNSAT`; after
//!   `SAT` comes the model, terminated by `0`.
//! - [`Protocol::Pipe`] (PicoSAT style): the formula is written to the
//!   solver's standard input and the answer is read from its standard output,
//!   using the competition format (`c` comments, an `s` status line and `v`
//!   model lines).
//!
//! Process failures are reported as [`SolverError`] and never mistaken for
//! an unsatisfiable formula.

use crate::encoding::{DecodeError, EncodeError, Encoder};
use crate::puzzle::solution::Solution;
use crate::sat::assignment::Model;
use crate::sat::cnf::CnfFormula;
use crate::sat::literal::Literal;
use clap::ValueEnum;
use log::{debug, info};
use std::ffi::OsString;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use tempfile::NamedTempFile;
use thiserror::Error;

/// How a solver receives the formula and reports its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Formula and answer go through files named on the command line.
    File,
    /// Formula on standard input, answer on standard output.
    Pipe,
}

/// The supported solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SolverKind {
    /// MiniSat, file protocol.
    #[default]
    #[value(name = "minisat")]
    MiniSat,
    /// The contrasat build of MiniSat, file protocol.
    #[value(name = "minisat-contrasat")]
    MiniSatContrasat,
    /// CryptoMiniSat, file protocol.
    #[value(name = "cryptominisat")]
    CryptoMiniSat,
    /// PicoSAT, pipe protocol.
    #[value(name = "picosat")]
    PicoSat,
}

impl SolverKind {
    /// Binary looked up on `PATH` when no explicit path is given.
    #[must_use]
    pub const fn default_binary(self) -> &'static str {
        match self {
            Self::MiniSat => "minisat",
            Self::MiniSatContrasat => "minisat-contrasat",
            Self::CryptoMiniSat => "cryptominisat",
            Self::PicoSat => "picosat",
        }
    }

    /// How this solver is driven.
    #[must_use]
    pub const fn protocol(self) -> Protocol {
        match self {
            Self::PicoSat => Protocol::Pipe,
            _ => Protocol::File,
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_binary())
    }
}

/// The answer of one solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The solver found a model.
    Satisfiable(Model),
    /// The solver proved the formula unsatisfiable.
    Unsatisfiable,
}

/// Ways a solver run can fail.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The binary could not be started.
    #[error("could not start solver `{program}`: {source}")]
    Spawn {
        /// The binary that was run.
        program: String,
        /// Why the process did not start.
        #[source]
        source: io::Error,
    },

    /// Reading or writing the formula, the answer or a temporary file failed.
    #[error("solver i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The process exited with a code other than 0, 10 or 20.
    #[error("solver exited with unexpected status {code}")]
    ExitStatus {
        /// The exit code.
        code: i32,
    },

    /// The process was killed by a signal.
    #[error("solver was terminated by a signal")]
    Signal,

    /// A line of the answer could not be read.
    #[error("malformed solver output on line {line}: `{content}`")]
    Malformed {
        /// 1-based line number in the answer.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The answer never said whether the formula is satisfiable.
    #[error("solver output carries no SAT/UNSAT status")]
    MissingStatus,
}

/// A failure anywhere in encode, solve, decode.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The puzzle could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The solver run failed.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The model did not decode to a grid.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Prefix of the temporary files of the file protocol.
pub const TEMP_PREFIX: &str = "mini_sat_";

/// Runs one external solver binary.
///
/// File-protocol runs create a fresh `mini_sat_<random>.cnf` and
/// `mini_sat_<random>.sol` in the work directory for every solve and remove
/// them afterwards, so clones of one adapter may solve concurrently.
#[derive(Debug, Clone)]
pub struct SolverAdapter {
    program: PathBuf,
    args: Vec<OsString>,
    protocol: Protocol,
    work_dir: PathBuf,
}

impl SolverAdapter {
    /// An adapter running the default binary of `kind` with its protocol,
    /// keeping temporary files in the system temp directory.
    #[must_use]
    pub fn new(kind: SolverKind) -> Self {
        Self {
            program: PathBuf::from(kind.default_binary()),
            args: Vec::new(),
            protocol: kind.protocol(),
            work_dir: std::env::temp_dir(),
        }
    }

    /// Runs `program` instead of the default binary.
    #[must_use]
    pub fn with_binary(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments passed before the file names, e.g. a script run through `sh`.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps temporary files in `dir`.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Overrides the protocol implied by the solver kind.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// The binary that is run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The protocol used to talk to the binary.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The directory temporary files are created in.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Creates an empty, uniquely named file in the work directory.
    fn temp_file(&self, suffix: &str) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.work_dir)
    }

    /// Encodes the puzzle, solves it and decodes the model. Returns
    /// `Ok(None)` if the formula is unsatisfiable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] naming the stage that failed.
    pub fn solve(&self, encoder: &dyn Encoder) -> Result<Option<Solution>, PipelineError> {
        info!("encoding problem...");
        let mut cnf = encoder.encode()?;
        match self.solve_formula(&cnf)? {
            SolveOutcome::Satisfiable(model) => {
                cnf.set_solution(model);
                Ok(encoder.decode(&cnf)?)
            }
            SolveOutcome::Unsatisfiable => Ok(None),
        }
    }

    /// Runs the solver once on `cnf`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the process cannot be run, exits with a
    /// status other than 0, 10 or 20, or its answer cannot be read.
    pub fn solve_formula(&self, cnf: &CnfFormula) -> Result<SolveOutcome, SolverError> {
        match self.protocol {
            Protocol::File => self.solve_via_files(cnf),
            Protocol::Pipe => self.solve_via_pipe(cnf),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn spawn_error(&self, source: io::Error) -> SolverError {
        SolverError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }

    fn solve_via_files(&self, cnf: &CnfFormula) -> Result<SolveOutcome, SolverError> {
        info!("writing cnf file...");
        let mut writer = BufWriter::new(self.temp_file(".cnf")?);
        cnf.write_dimacs(&mut writer)?;
        let cnf_path = writer
            .into_inner()
            .map_err(io::IntoInnerError::into_error)?
            .into_temp_path();
        let sol_path = self.temp_file(".sol")?.into_temp_path();

        info!("solving...");
        let output = self
            .command()
            .arg(cnf_path.as_os_str())
            .arg(sol_path.as_os_str())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        forward(&output.stdout[..]);
        forward(&output.stderr[..]);
        check_status(output.status)?;

        info!("reading solution file...");
        parse_minisat_result(BufReader::new(File::open(&*sol_path)?))
    }

    fn solve_via_pipe(&self, cnf: &CnfFormula) -> Result<SolveOutcome, SolverError> {
        info!("solving...");
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(SolverError::Io(io::Error::other("solver pipes unavailable")));
        };

        // the solver may answer before reading all of its input
        let reader = thread::spawn(move || parse_picosat_output(BufReader::new(stdout)));
        let errors = thread::spawn(move || forward(stderr));

        let mut writer = BufWriter::new(stdin);
        let written = cnf.write_dimacs(&mut writer).and_then(|()| writer.flush());
        drop(writer);

        let status = child.wait()?;
        let outcome = reader
            .join()
            .map_err(|_| io::Error::other("solver output reader panicked"))?;
        errors
            .join()
            .map_err(|_| io::Error::other("solver error reader panicked"))?;

        check_status(status)?;
        if let Err(e) = written {
            // a solver that stops reading early closes the pipe
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        outcome
    }
}

/// Logs solver chatter line by line.
fn forward(output: impl Read) {
    for line in BufReader::new(output).lines().map_while(Result::ok) {
        debug!("solver: {line}");
    }
}

fn check_status(status: ExitStatus) -> Result<(), SolverError> {
    match status.code() {
        Some(0 | 10 | 20) => Ok(()),
        Some(code) => Err(SolverError::ExitStatus { code }),
        None => Err(SolverError::Signal),
    }
}

fn literals(line: usize, content: &str) -> Result<Vec<Literal>, SolverError> {
    content
        .split_whitespace()
        .map(|token| {
            token.parse::<Literal>().map_err(|_| SolverError::Malformed {
                line,
                content: content.to_string(),
            })
        })
        .collect()
}

/// Reads a MiniSat result file.
///
/// # Errors
///
/// Returns [`SolverError::MissingStatus`] for an empty file and
/// [`SolverError::Malformed`] for anything that is not `SAT` with a model or
/// `UNSAT`.
pub fn parse_minisat_result<R: BufRead>(reader: R) -> Result<SolveOutcome, SolverError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)));

    let (number, status) = loop {
        match lines.next().transpose()? {
            None => return Err(SolverError::MissingStatus),
            Some((_, line)) if line.trim().is_empty() => {}
            Some((number, line)) => break (number, line),
        }
    };

    match status.trim() {
        "UNSAT" => Ok(SolveOutcome::Unsatisfiable),
        "SAT" => {
            let mut model = Vec::new();
            for line in lines {
                let (number, content) = line?;
                for literal in literals(number, &content)? {
                    if literal == 0 {
                        return Ok(SolveOutcome::Satisfiable(Model::new(model)));
                    }
                    model.push(literal);
                }
            }
            Ok(SolveOutcome::Satisfiable(Model::new(model)))
        }
        _ => Err(SolverError::Malformed {
            line: number,
            content: status,
        }),
    }
}

/// Reads solver output in the competition format PicoSAT uses. The model
/// may be spread over several `v` lines.
///
/// # Errors
///
/// Returns [`SolverError::MissingStatus`] without an `s` line and
/// [`SolverError::Malformed`] for an unknown status or a bad literal.
pub fn parse_picosat_output<R: BufRead>(reader: R) -> Result<SolveOutcome, SolverError> {
    let mut satisfiable = None;
    let mut model = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let number = i + 1;
        match line.split_at_checked(1) {
            Some(("s", status)) => match status.trim() {
                "SATISFIABLE" => satisfiable = Some(true),
                "UNSATISFIABLE" => satisfiable = Some(false),
                _ => {
                    return Err(SolverError::Malformed {
                        line: number,
                        content: line,
                    });
                }
            },
            Some(("v", values)) => {
                model.extend(literals(number, values)?.into_iter().filter(|&l| l != 0));
            }
            _ => debug!("solver: {line}"),
        }
    }

    match satisfiable {
        Some(true) => Ok(SolveOutcome::Satisfiable(Model::new(model))),
        Some(false) => Ok(SolveOutcome::Unsatisfiable),
        None => Err(SolverError::MissingStatus),
    }
}
