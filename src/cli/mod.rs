//! CLI module for kindload - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
