use log::info;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

use super::error::{BundleError, BundleResult};
use super::graph::{GraphBuilder, ModuleGraph};
use super::resolver::PathResolver;
use crate::formatters::LuaBundleFormatter;

/// Runs one build: graph, keys, rewrite, assembly.
///
/// Nothing is written to disk here; the caller decides what to do with the
/// returned text.
pub struct Bundler {
    root: PathBuf,
    formatter: LuaBundleFormatter,
}

impl Bundler {
    /// A relative `root` is taken against the current working directory
    pub fn new(root: impl AsRef<Path>) -> BundleResult<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|err| BundleError::io(root, err))?;
        Ok(Self {
            root: absolute.clean(),
            formatter: LuaBundleFormatter::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_graph<S: AsRef<str>>(&self, entries: &[S]) -> BundleResult<ModuleGraph> {
        let mut builder = GraphBuilder::new(PathResolver::new(&self.root));
        for entry in entries {
            builder.add_entry(entry.as_ref())?;
        }
        let graph = builder.build();
        info!(
            "Resolved {} modules ({} require edges) from {} entries",
            graph.module_count(),
            graph.require_count(),
            entries.len()
        );
        Ok(graph)
    }

    pub fn bundle<S: AsRef<str>>(&self, entries: &[S]) -> BundleResult<String> {
        let graph = self.build_graph(entries)?;
        self.formatter.format_graph(&graph)
    }
}

/// Bundle `entries` (paths relative to `root`, or absolute) into one script
pub fn bundle_entries<S: AsRef<str>>(entries: &[S], root: impl AsRef<Path>) -> BundleResult<String> {
    Bundler::new(root)?.bundle(entries)
}
