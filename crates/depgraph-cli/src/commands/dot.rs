//! Handler for `depgraph dot`.

use std::path::PathBuf;

use miette::Result;

use depgraph_ops::ops_dot::{self, DotOptions};
use depgraph_ops::Project;

pub fn exec(
    project: &Project,
    output: PathBuf,
    filter: Option<String>,
    highlight: &[String],
) -> Result<()> {
    let highlight = highlight
        .iter()
        .map(|h| ops_dot::parse_highlight(h))
        .collect::<Result<Vec<_>>>()?;
    let opts = DotOptions {
        output,
        filter,
        highlight,
    };
    ops_dot::dot(project, &opts)
}
