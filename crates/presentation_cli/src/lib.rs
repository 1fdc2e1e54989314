//! Campus weather command-line interface
//!
//! Argument parsing and terminal formatting for the `weather` binary.

pub mod cli;
pub mod display;
