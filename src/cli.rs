use crate::condition::Operator;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build filter conditions against a column catalog, as structured triples or free text
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML profile with the columns and operators to offer
    #[arg(short, long, global = true, env = "CONDITION_EDITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the filterable columns and the operators each one accepts
    Columns,
    /// Parse a condition typed as text into its (column, operator, value) parts
    Decode {
        /// Condition text, e.g. "project.id = 1"
        text: String,
    },
    /// Check whether a condition typed as text is complete and well-typed
    Validate {
        /// Condition text
        text: String,
    },
    /// Show the autocomplete suggestions for partially typed text
    Suggest {
        /// Text typed so far
        #[arg(default_value = "")]
        text: String,

        /// Column already picked from an earlier suggestion
        #[arg(long)]
        column: Option<String>,

        /// Operator already picked from an earlier suggestion (e.g. "IS NULL")
        #[arg(long)]
        operator: Option<Operator>,
    },
    /// Edit a condition list interactively, one command per line
    Session {
        /// Read commands from this file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
