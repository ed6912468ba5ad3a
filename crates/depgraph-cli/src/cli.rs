//! CLI argument definitions for depgraph.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "depgraph",
    version,
    about = "Inspect, filter and render Maven-style dependency graphs",
    long_about = "depgraph builds the dependency graph of a root artifact with nearest-wins \
                  version resolution and path-scoped exclusions, then prints, lists or renders \
                  it, optionally through the filter trees defined in depgraph.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command, overriding `depgraph.toml`.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Root artifact (group:name:version[:type[:classifier]])
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Repository file
    #[arg(long, global = true)]
    pub repository: Option<PathBuf>,

    /// Skip dependencies whose metadata cannot be loaded
    #[arg(long, global = true)]
    pub tolerate_broken_metadata: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display the dependency tree
    Tree {
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
        /// Show the dependents of a dependency
        #[arg(long, value_name = "KEY")]
        inverted: Option<String>,
        /// Show version conflicts
        #[arg(long)]
        conflicts: bool,
        /// Named filter from depgraph.toml
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List the artifacts of the graph
    List {
        /// Named filter from depgraph.toml
        #[arg(short, long)]
        filter: Option<String>,
        /// Print the backing file of each artifact
        #[arg(long)]
        files: bool,
        /// Print backing files as a classpath
        #[arg(long, conflicts_with_all = ["files", "json"])]
        classpath: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
        /// Include the root artifact
        #[arg(long)]
        include_root: bool,
    },

    /// Render the graph with GraphViz
    Dot {
        /// Output file (.dot writes the source, other extensions run `dot`)
        #[arg(short, long)]
        output: PathBuf,
        /// Named filter from depgraph.toml
        #[arg(short, long)]
        filter: Option<String>,
        /// Paint a named filter's subgraph: NAME=COLOR (repeatable)
        #[arg(long, value_name = "NAME=COLOR")]
        highlight: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
