//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// shortkey - register URLs over TCP, resolve them over HTTP
#[derive(Parser, Debug)]
#[command(name = "shortkey")]
#[command(version)]
#[command(about = "A tiny URL shortener with a TCP registration port and an HTTP redirect port", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run both listeners (default)
    Serve,

    /// Print a sample configuration file
    GenerateConfig {
        /// Write to this path instead of stdout
        output: Option<String>,
    },
}
