//! Argument parsing and the commands of the `edge-matching` binary.

pub(crate) mod cli;
