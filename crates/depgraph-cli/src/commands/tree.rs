//! Handler for `depgraph tree`.

use miette::Result;

use depgraph_ops::ops_tree::{self, TreeOptions};
use depgraph_ops::Project;

pub fn exec(
    project: &Project,
    depth: Option<u32>,
    why: Option<String>,
    inverted: Option<String>,
    conflicts: bool,
    filter: Option<String>,
) -> Result<()> {
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        why,
        inverted,
        conflicts,
        filter,
    };
    ops_tree::tree(project, &opts)
}
