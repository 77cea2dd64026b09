//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::traversal::Traversal;

/// Inspect and walk coordinate trees stored as TOML
#[derive(Parser, Debug)]
#[command(name = "gridtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Local config file (layered over the global one)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree
    Show {
        /// Encoded tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Print (x, y) next to every node
        #[arg(long)]
        coordinates: bool,
    },

    /// List elements in traversal order
    Walk {
        /// Encoded tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// breadth-left | breadth-right | depth-left | depth-right
        #[arg(short, long)]
        order: Option<Traversal>,
        /// Child-index path of the subtree to walk, e.g. "0.2"
        #[arg(long)]
        from: Option<String>,
    },

    /// Print the structured one-line dump
    Dump {
        /// Encoded tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the child-index path of the first node holding VALUE
    Find {
        /// Encoded tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Element to look for
        value: String,
        /// breadth-left | breadth-right | depth-left | depth-right
        #[arg(short, long)]
        order: Option<Traversal>,
    },

    /// Remove every subtree headed by VALUE and print the encoded result
    Prune {
        /// Encoded tree file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Element heading the subtrees to remove
        value: String,
    },

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
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Show config paths
    Path,
}
