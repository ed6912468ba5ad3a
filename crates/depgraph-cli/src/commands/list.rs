//! Handler for `depgraph list`.

use miette::Result;

use depgraph_ops::ops_list::{self, ListOptions};
use depgraph_ops::Project;

pub async fn exec(
    project: &Project,
    filter: Option<String>,
    files: bool,
    classpath: bool,
    json: bool,
    include_root: bool,
) -> Result<()> {
    let opts = ListOptions {
        filter,
        files,
        classpath,
        json,
        include_root,
    };
    ops_list::list(project, &opts).await
}
