pub mod ops_dot;
pub mod ops_list;
pub mod ops_tree;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use depgraph_core::artifact::ArtifactDescriptor;
use depgraph_core::config::{ProjectConfig, CONFIG_FILE};
use depgraph_core::repository::StaticRepository;
use depgraph_core::source::FileResolver;
use depgraph_engine::{filter, resolve_graph, DependencyGraph, Resolution};
use depgraph_util::errors::DepgraphError;
use depgraph_util::fs::find_ancestor_with;
use depgraph_util::progress;

/// Command-line settings that take precedence over `depgraph.toml`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub root: Option<String>,
    pub repository: Option<PathBuf>,
    pub tolerate_broken_metadata: bool,
}

/// A project ready to resolve: configuration, repository and root artifact.
#[derive(Debug)]
pub struct Project {
    /// Directory holding `depgraph.toml`, or the start directory without one.
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub repository: Arc<StaticRepository>,
    pub root: ArtifactDescriptor,
    pub tolerate_broken_metadata: bool,
}

impl Project {
    /// Find `depgraph.toml` from `start` upwards and apply `opts` on top of it.
    ///
    /// Without a configuration file, `--root` and `--repository` must both be given.
    pub fn load(start: &Path, opts: &GlobalOptions) -> miette::Result<Self> {
        let (dir, mut config) = match find_ancestor_with(start, CONFIG_FILE) {
            Some(dir) => {
                let config = ProjectConfig::from_path(&dir.join(CONFIG_FILE))?;
                (dir, config)
            }
            None if opts.root.is_some() && opts.repository.is_some() => {
                (start.to_path_buf(), ProjectConfig::default())
            }
            None => {
                return Err(DepgraphError::Manifest {
                    message: format!(
                        "No {CONFIG_FILE} found in {} or any parent directory",
                        start.display()
                    ),
                }
                .into())
            }
        };
        tracing::debug!("Project directory: {}", dir.display());

        if let Some(root) = &opts.root {
            config.root = Some(root.clone());
        }
        let root = config.root_artifact()?;

        let repository_path = match (&opts.repository, &config.repository) {
            (Some(path), _) => start.join(path),
            (None, Some(path)) => dir.join(path),
            (None, None) => {
                return Err(DepgraphError::Manifest {
                    message: "no repository configured; set `repository` or pass --repository"
                        .to_string(),
                }
                .into())
            }
        };
        let repository = StaticRepository::from_path(&repository_path)?;
        tracing::debug!(
            "Loaded {} artifacts from {}",
            repository.len(),
            repository_path.display()
        );

        Ok(Self {
            dir,
            tolerate_broken_metadata: opts.tolerate_broken_metadata
                || config.tolerate_broken_metadata,
            config,
            repository: Arc::new(repository),
            root,
        })
    }

    /// Build the graph of the root artifact with exclusions applied.
    pub fn resolve(&self) -> miette::Result<Resolution> {
        let files: Arc<dyn FileResolver> = self.repository.clone();
        let resolution = resolve_graph(
            &self.root,
            self.repository.as_ref(),
            Some(files),
            self.tolerate_broken_metadata,
        )?;
        for broken in &resolution.broken {
            progress::status_warn(
                "Skipped",
                &format!("{} ({}): {}", broken.artifact, broken.trail, broken.error),
            );
        }
        progress::status(
            "Resolved",
            &format!("{} artifacts for {}", resolution.graph.len(), self.root),
        );
        Ok(resolution)
    }

    /// Apply the named filter of the configuration, or pass `graph` through.
    pub fn select(&self, graph: &DependencyGraph, name: Option<&str>) -> miette::Result<DependencyGraph> {
        match name {
            Some(name) => Ok(filter::apply(self.config.filter(name)?, graph)?),
            None => Ok(graph.clone()),
        }
    }
}
