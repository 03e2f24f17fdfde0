//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Inspect bill-of-materials component trees: types, fields and tags
#[derive(Parser, Debug)]
#[command(name = "bomtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Local config file, layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered component types
    Types,

    /// Create a component and print its fields
    Show {
        /// Component type name (case-insensitive)
        tp: String,
        /// Override a field, e.g. --set qty=4 (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Print the increment chain of a tag
    Tag {
        /// Tag string, e.g. "#000-000"
        tag: String,
        /// Level of the starting tag
        #[arg(short, long, default_value_t = 0)]
        level: u32,
        /// Number of increments to apply
        #[arg(short, long, default_value_t = 4)]
        times: usize,
        /// Quantity added per increment
        #[arg(short, long, default_value_t = 1)]
        qty: i64,
    },

    /// Build, retag and print a sample assembly tree
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
}
