//! CLI module for toolscout - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for listing and inspecting
//! the catalog; without a subcommand the terminal browser is launched.

pub mod commands;

pub use commands::Cli;
