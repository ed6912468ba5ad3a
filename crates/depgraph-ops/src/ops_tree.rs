//! Operation: display the dependency tree.

use depgraph_engine::Resolution;

use crate::Project;

/// Options for `depgraph tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from the root to a specific dependency.
    pub why: Option<String>,
    /// Show the dependents of a specific dependency.
    pub inverted: Option<String>,
    /// Show version conflicts.
    pub conflicts: bool,
    /// Named filter from `depgraph.toml` applied before printing.
    pub filter: Option<String>,
}

/// Display the dependency tree of the project.
pub fn tree(project: &Project, opts: &TreeOptions) -> miette::Result<()> {
    let resolution = project.resolve()?;
    print!("{}", render(project, &resolution, opts)?);
    Ok(())
}

fn render(project: &Project, resolution: &Resolution, opts: &TreeOptions) -> miette::Result<String> {
    // Conflicts are a property of the build, not of a filtered view.
    if opts.conflicts {
        return Ok(format!("{}\n", resolution.conflicts.to_string().trim_end()));
    }

    let graph = project.select(&resolution.graph, opts.filter.as_deref())?;

    if let Some(target) = &opts.why {
        let Some(path) = graph.find_path(target) else {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        };
        let mut out = format!("Path to {target}:\n");
        for (i, node) in path.iter().enumerate() {
            out.push_str(&format!("{}{node}\n", "  ".repeat(i)));
        }
        if let Some(node) = path.last() {
            for c in resolution.conflicts.for_artifact(&node.group, &node.name) {
                out.push_str(&format!(
                    "Also requested as {} by {}, {}\n",
                    c.requested, c.requested_by, c.reason
                ));
            }
        }
        return Ok(out);
    }

    if let Some(target) = &opts.inverted {
        let inverted = graph.print_inverted_tree(target);
        if inverted.is_empty() {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        }
        return Ok(inverted);
    }

    Ok(graph.print_tree(opts.depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::project_dir;
    use crate::GlobalOptions;

    fn run(opts: TreeOptions) -> String {
        let tmp = project_dir();
        let project = Project::load(tmp.path(), &GlobalOptions::default()).unwrap();
        let resolution = project.resolve().unwrap();
        render(&project, &resolution, &opts).unwrap()
    }

    #[test]
    fn prints_full_tree() {
        let out = run(TreeOptions::default());
        assert!(out.starts_with("org.demo:app:1.0\n"));
        assert!(out.contains("org.demo:core:1.0"));
        assert!(out.contains("org.lib:util:2.0"));
        assert!(out.contains("[test]"));
    }

    #[test]
    fn explains_why() {
        let out = run(TreeOptions {
            why: Some("util".into()),
            ..Default::default()
        });
        assert_eq!(
            out,
            "Path to util:\norg.demo:app:1.0\n  org.demo:core:1.0\n    org.lib:util:2.0\n\
             Also requested as 1.0 by junit:junit:4.13, nearest wins (depth 2 vs 2)\n"
        );
    }

    #[test]
    fn filter_hides_test_dependencies() {
        let out = run(TreeOptions {
            filter: Some("compile".into()),
            why: Some("junit".into()),
            ..Default::default()
        });
        assert_eq!(out, "Dependency 'junit' not found in the graph.\n");
    }

    #[test]
    fn inverted_lists_dependents() {
        let out = run(TreeOptions {
            inverted: Some("org.lib:util".into()),
            ..Default::default()
        });
        assert!(out.starts_with("org.lib:util:2.0\n"));
        assert!(out.contains("org.demo:core:1.0"));
        assert!(out.contains("junit:junit:4.13"));
    }

    #[test]
    fn reports_conflicts() {
        let out = run(TreeOptions {
            conflicts: true,
            ..Default::default()
        });
        assert!(out.contains("org.lib:util requested 1.0 by junit:junit:4.13 but resolved 2.0"));
    }
}
