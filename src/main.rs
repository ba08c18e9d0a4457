//! # edge-matching
//!
//! `edge-matching` solves edge-matching puzzles by encoding them as SAT
//! problems and handing them to an external SAT solver.
//!
//! ## Features
//!
//! -   **Puzzle files**: the text format with a `bounded signed width height`
//!     header followed by one line of four edge colors per piece.
//! -   **Encodings**: `simple`, `redundant`, `order` and `order-redundant`.
//! -   **Solvers**: MiniSat, MiniSat-contrasat and CryptoMiniSat through result
//!     files, PicoSAT through pipes.
//! -   **Verification**: the model is checked against the formula and the
//!     decoded grid is checked for mismatched edges.
//! -   **Statistics**: parse, encode and solve times, formula size and memory
//!     usage from `tikv-jemallocator`.
//! -   **Generation**: random solvable puzzles of any size.
//!
//! ## Usage
//!
//! ```sh
//! edge-matching [OPTIONS] [PATH] [COMMAND]
//!
//! # Solve a puzzle with the default MiniSat binary and simple encoding
//! edge-matching puzzles/4x4.puzzle
//!
//! # Solve every puzzle in a directory with PicoSAT and the order encoding
//! edge-matching solve --path puzzles -s picosat -c order
//!
//! # Write the DIMACS encoding instead of solving
//! edge-matching encode --path puzzles/4x4.puzzle --output 4x4.cnf
//!
//! # Generate a bounded 6x6 puzzle with 5 colors
//! edge-matching generate -b --width 6 --height 6 --colors 5 --output 6x6.puzzle
//! ```
//!
//! Progress is logged through `env_logger`; set `RUST_LOG=info` or pass `-d`.

use crate::command_line::cli::{
    Cli, Commands, encode_file, generate_puzzle, print_completions, solve_path, usage_and_exit,
};
use clap::Parser;
use edge_matching::puzzle::generator::GenerateConfig;

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug() { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Some(Commands::Solve { path, common }) => solve_path(&path, &common),
        Some(Commands::Encode {
            path,
            output,
            common,
        }) => encode_file(&path, output.as_deref(), &common),
        Some(Commands::Generate {
            bounded,
            signed,
            width,
            height,
            color_count,
            seed,
            output,
        }) => {
            let config = GenerateConfig {
                bounded,
                signed,
                width,
                height,
                color_count,
                seed,
            };
            generate_puzzle(&config, output.as_deref())
        }
        Some(Commands::Completions { shell }) => {
            print_completions(shell);
            Ok(())
        }
        None => match cli.path {
            Some(path) => solve_path(&path, &cli.common),
            None => usage_and_exit(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
