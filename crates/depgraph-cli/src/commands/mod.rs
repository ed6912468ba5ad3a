//! Command dispatch and handler modules.

mod dot;
mod list;
mod tree;

use miette::Result;

use depgraph_ops::{GlobalOptions, Project};

use crate::cli::{Cli, Command, GlobalArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let project = load(cli.global)?;
    match cli.command {
        Command::Tree {
            depth,
            why,
            inverted,
            conflicts,
            filter,
        } => tree::exec(&project, depth, why, inverted, conflicts, filter),
        Command::List {
            filter,
            files,
            classpath,
            json,
            include_root,
        } => list::exec(&project, filter, files, classpath, json, include_root).await,
        Command::Dot {
            output,
            filter,
            highlight,
        } => dot::exec(&project, output, filter, &highlight),
    }
}

fn load(global: GlobalArgs) -> Result<Project> {
    let cwd = std::env::current_dir().map_err(depgraph_util::errors::DepgraphError::Io)?;
    let opts = GlobalOptions {
        root: global.root,
        repository: global.repository,
        tolerate_broken_metadata: global.tolerate_broken_metadata,
    };
    Project::load(&cwd, &opts)
}
