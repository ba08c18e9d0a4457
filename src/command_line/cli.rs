#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use edge_matching::encoding::{Encoder, EncodingKind};
use edge_matching::puzzle::generator::{GenerateConfig, generate};
use edge_matching::puzzle::parser::{parse_file, write_problem};
use edge_matching::puzzle::solution::Solution;
use edge_matching::sat::cnf::CnfFormula;
use edge_matching::sat::solver::{SolveOutcome, SolverAdapter, SolverKind};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface of the edge-matching solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "edge-matching",
    version,
    about = "Solves edge-matching puzzles with an external SAT solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as a puzzle file to solve, or a directory whose
    /// `.puzzle` files are all solved.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `encode`, `generate`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

impl Cli {
    /// Whether debug output was requested, globally or for the subcommand.
    pub(crate) fn debug(&self) -> bool {
        self.common.debug
            || match &self.command {
                Some(
                    Commands::Solve { common, .. } | Commands::Encode { common, .. },
                ) => common.debug,
                _ => false,
            }
    }
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file, or every `.puzzle` file in a directory.
    Solve {
        /// Path to the puzzle file or directory.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write the CNF encoding of a puzzle in DIMACS format instead of solving it.
    Encode {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Where to write the DIMACS file. Defaults to standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random solvable puzzle.
    Generate {
        /// Generate a bounded puzzle (boundary color on the outer edges).
        #[arg(short, long, default_value_t = false)]
        bounded: bool,

        /// Generate a signed puzzle.
        #[arg(long, default_value_t = false)]
        signed: bool,

        #[arg(long, default_value_t = 4)]
        width: usize,

        #[arg(long, default_value_t = 4)]
        height: usize,

        /// Number of distinct edge colors.
        #[arg(long = "colors", default_value_t = 9)]
        color_count: u16,

        /// Seed for reproducible puzzles.
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the puzzle. Defaults to standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output: the parsed puzzle and detailed progress logging.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the model against the formula and the decoded grid for mismatched edges.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Enable printing of encoding and solving statistics.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Enable printing of the satisfying assignment (model) if the puzzle is solvable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// The external SAT solver to run.
    #[arg(short, long, value_enum, default_value_t = SolverKind::MiniSat)]
    pub(crate) solver: SolverKind,

    /// The CNF encoding of the puzzle.
    #[arg(short = 'c', long, value_enum, default_value_t = EncodingKind::Simple)]
    pub(crate) encoding: EncodingKind,

    /// Path to the solver binary, if it is not on `PATH` under its usual name.
    #[arg(long)]
    pub(crate) solver_path: Option<PathBuf>,

    /// Directory for the solver's temporary files.
    #[arg(long)]
    pub(crate) work_dir: Option<PathBuf>,
}

impl CommonOptions {
    pub(crate) fn adapter(&self) -> SolverAdapter {
        let mut adapter = SolverAdapter::new(self.solver);
        if let Some(path) = &self.solver_path {
            adapter = adapter.with_binary(path);
        }
        if let Some(dir) = &self.work_dir {
            adapter = adapter.with_work_dir(dir);
        }
        adapter
    }
}

/// Timings of the stages of one solve.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Timings {
    pub(crate) parse: Duration,
    pub(crate) encode: Duration,
    pub(crate) solve: Duration,
    pub(crate) decode: Duration,
}

/// Solves a puzzle file, or every `.puzzle` file below a directory.
///
/// # Errors
///
/// Returns the first failure.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<()> {
    if path.is_dir() {
        solve_dir(path, common)
    } else {
        solve_file(path, common)
    }
}

/// Solves every `.puzzle` file in a directory, in path order.
///
/// # Errors
///
/// Stops at the first puzzle that cannot be read, encoded or solved.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<()> {
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "puzzle") {
            info!("skipping non-puzzle file: {}", file_path.display());
            continue;
        }
        solve_file(file_path, common)?;
    }
    Ok(())
}

/// Parses, encodes, solves and decodes one puzzle and reports the result.
///
/// # Errors
///
/// Fails if the file cannot be read, the puzzle is invalid, the solver cannot
/// be run, or verification fails.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<()> {
    println!("Solving: {}", path.display());
    let mut timings = Timings::default();

    let time = Instant::now();
    let problem = parse_file(path).with_context(|| format!("failed to read {}", path.display()))?;
    timings.parse = time.elapsed();

    if let Err(e) = problem.validate() {
        println!("Not a valid Edge Matching specification!");
        return Err(anyhow!(e).context(format!("invalid puzzle {}", path.display())));
    }
    if common.debug {
        println!("{problem}");
    }

    let encoder = common.encoding.encoder(&problem)?;
    let time = Instant::now();
    info!("encoding problem...");
    let mut cnf = encoder.encode()?;
    timings.encode = time.elapsed();

    let adapter = common.adapter();
    let time = Instant::now();
    let outcome = adapter
        .solve_formula(&cnf)
        .with_context(|| format!("solver `{}` failed", adapter.program().display()))?;
    timings.solve = time.elapsed();

    let time = Instant::now();
    let solution = match outcome {
        SolveOutcome::Satisfiable(model) => {
            cnf.set_solution(model);
            encoder.decode(&cnf)?
        }
        SolveOutcome::Unsatisfiable => None,
    };
    timings.decode = time.elapsed();

    if common.verify {
        verify_solution(&cnf, solution.as_ref())?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(
            &timings,
            &cnf,
            encoder.as_ref(),
            common,
            allocated,
            resident,
        );
    }

    match solution {
        Some(solution) => {
            println!("\nSATISFIABLE");
            println!("{solution}");
        }
        None => println!("\nUNSATISFIABLE"),
    }
    Ok(())
}

/// Verifies the model against the formula and the decoded grid's edges.
///
/// Without a model there is nothing to check; the caller reports the result.
///
/// # Errors
///
/// Fails if either check does not hold.
pub(crate) fn verify_solution(cnf: &CnfFormula, solution: Option<&Solution>) -> Result<()> {
    let (Some(model), Some(solution)) = (cnf.solution(), solution) else {
        return Ok(());
    };
    let ok = cnf.is_satisfied_by(model) && solution.is_consistent();
    println!("Verified: {ok:?}");
    if !ok {
        bail!(
            "solution failed verification ({} mismatched edges)",
            solution.mismatches()
        );
    }
    Ok(())
}

/// Writes the DIMACS encoding of a puzzle.
///
/// # Errors
///
/// Fails if the puzzle cannot be read or encoded, or the output cannot be written.
pub(crate) fn encode_file(path: &Path, output: Option<&Path>, common: &CommonOptions) -> Result<()> {
    let problem = parse_file(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Err(e) = problem.validate() {
        println!("Not a valid Edge Matching specification!");
        return Err(anyhow!(e).context(format!("invalid puzzle {}", path.display())));
    }

    let cnf = common.encoding.encoder(&problem)?.encode()?;
    match output {
        Some(output) => {
            let mut writer = BufWriter::new(
                File::create(output).with_context(|| format!("failed to create {}", output.display()))?,
            );
            cnf.write_dimacs(&mut writer)?;
            writer.flush()?;
            info!(
                "wrote {} variables and {} clauses to {}",
                cnf.num_vars(),
                cnf.num_clauses(),
                output.display()
            );
        }
        None => cnf.write_dimacs(io::stdout().lock())?,
    }
    Ok(())
}

/// Generates a puzzle and writes it in the puzzle text format.
///
/// # Errors
///
/// Fails for unsupported sizes or if the output cannot be written.
pub(crate) fn generate_puzzle(config: &GenerateConfig, output: Option<&Path>) -> Result<()> {
    let generated = generate(config)?;
    info!("generated puzzle with reference solution:\n{}", generated.solution);
    match output {
        Some(output) => {
            let mut writer = BufWriter::new(
                File::create(output).with_context(|| format!("failed to create {}", output.display()))?,
            );
            write_problem(&generated.problem, &mut writer)?;
            writer.flush()?;
        }
        None => write_problem(&generated.problem, io::stdout().lock())?,
    }
    Ok(())
}

/// Prints completion script for `shell` to standard output.
pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
}

/// Prints the usage message and exits with status 1.
pub(crate) fn usage_and_exit() -> ! {
    if let Err(e) = Cli::command().print_help() {
        eprintln!("{e}");
    }
    std::process::exit(1);
}

/// Allocated and resident memory in MiB.
///
/// # Errors
///
/// Fails if jemalloc statistics cannot be read.
pub(crate) fn memory_usage() -> Result<(f64, f64)> {
    let unavailable = |e: tikv_jemalloc_ctl::Error| anyhow!("jemalloc statistics unavailable: {e}");
    epoch::advance().map_err(unavailable)?;
    let allocated = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .map_err(unavailable)?;
    let resident = stats::resident::mib()
        .and_then(|mib| mib.read())
        .map_err(unavailable)?;
    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of problem, encoding and solver statistics.
pub(crate) fn print_stats(
    timings: &Timings,
    cnf: &CnfFormula,
    encoder: &dyn Encoder,
    common: &CommonOptions,
    allocated: f64,
    resident: f64,
) {
    let scheme = encoder.scheme();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", timings.parse.as_secs_f64()));
    stat_line("Grid", format!("{} x {}", scheme.width(), scheme.height()));
    stat_line("Pieces", scheme.pieces().len());
    stat_line("Border colors", scheme.border_colors().len());
    stat_line("Center colors", scheme.center_colors().len());

    println!("=======================[ Encoding Statistics ]========================");
    stat_line("Encoding", encoder.kind());
    stat_line("Encode time (s)", format!("{:.3}", timings.encode.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.num_clauses());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line("Solver", common.solver);
    stat_line("Solve time (s)", format!("{:.3}", timings.solve.as_secs_f64()));
    stat_line("Decode time (s)", format!("{:.3}", timings.decode.as_secs_f64()));
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    println!("=====================================================================");

    if common.print_solution {
        if let Some(model) = cnf.solution() {
            println!("Solutions: {model}");
        }
    }
}
