use log::debug;
use path_clean::PathClean;
use petgraph::{graph::NodeIndex, Directed, Graph};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{BundleError, BundleResult};
use super::keys::{module_key, KeyAssigner, ModuleKeys};
use super::resolver::{is_module_file, PathResolver};
use crate::parsers::RequireParser;

/// A discovered module file. Created once per resolved path and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub path: PathBuf,
    pub source: String,
}

/// A `require` from one module to another. Repeated requires between the
/// same pair of modules collapse into one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireEdge {
    pub request: String,
}

pub type DependencyGraph = Graph<ModuleRecord, RequireEdge, Directed>;

/// A file named directly in the build list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A `.module.lua` file; lives in the graph like any other module
    Module { path: PathBuf },
    /// A runnable script; only its requires are traversed
    Script { path: PathBuf, source: String },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Module { path } | Entry::Script { path, .. } => path,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Entry::Script { .. })
    }
}

/// Every module reachable from the entries, in first-discovery order, with
/// the keys assigned to them.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    root: PathBuf,
    graph: DependencyGraph,
    node_map: HashMap<PathBuf, NodeIndex>,
    entries: Vec<Entry>,
    keys: ModuleKeys,
}

impl ModuleGraph {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Modules in discovery order. Node indices are handed out in insertion
    /// order and nodes are never removed, so index order is discovery order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> + '_ {
        self.graph.node_weights()
    }

    pub fn module(&self, path: &Path) -> Option<&ModuleRecord> {
        self.node_map
            .get(path)
            .and_then(|&index| self.graph.node_weight(index))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_map.contains_key(path)
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn require_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn keys(&self) -> &ModuleKeys {
        &self.keys
    }

    pub fn key_for(&self, path: &Path) -> Option<&str> {
        self.keys.get(path)
    }

    /// Direct dependencies of a module, in discovery order
    pub fn dependencies(&self, path: &Path) -> Vec<&ModuleRecord> {
        let Some(&index) = self.node_map.get(path) else {
            return Vec::new();
        };
        let mut targets: Vec<NodeIndex> = self.graph.neighbors(index).collect();
        targets.sort();
        targets
            .into_iter()
            .filter_map(|target| self.graph.node_weight(target))
            .collect()
    }
}

/// One file being walked: its path, its graph node (scripts have none) and
/// the requests still left to visit.
struct Frame {
    path: PathBuf,
    node: Option<NodeIndex>,
    requests: std::vec::IntoIter<String>,
}

/// Walks requires depth-first from each entry and collects the module set.
///
/// The walk keeps its own stack of frames instead of recursing, so the chain
/// of ancestors is always at hand for cycle reports and deep require chains
/// cannot exhaust the call stack.
pub struct GraphBuilder {
    resolver: PathResolver,
    parser: RequireParser,
    graph: DependencyGraph,
    node_map: HashMap<PathBuf, NodeIndex>,
    entries: Vec<Entry>,
}

impl GraphBuilder {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            parser: RequireParser::new(),
            graph: Graph::new(),
            node_map: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Absolute, cleaned location of an entry as listed in the build
    pub fn entry_path(&self, entry: &str) -> PathBuf {
        self.resolver.root().join(entry).clean()
    }

    /// Add one entry and everything it reaches
    pub fn add_entry(&mut self, entry: &str) -> BundleResult<()> {
        let path = self.entry_path(entry);

        if is_module_file(&path) {
            if !self.node_map.contains_key(&path) {
                let source = read_source(&path)?;
                let requests = self.parser.requests(&source);
                let node = self.add_module(ModuleRecord {
                    path: path.clone(),
                    source,
                });
                self.walk(path.clone(), Some(node), requests)?;
            }
            self.entries.push(Entry::Module { path });
            return Ok(());
        }

        let source = read_source(&path)?;
        let requests = self.parser.requests(&source);
        self.walk(path.clone(), None, requests)?;
        self.entries.push(Entry::Script { path, source });
        Ok(())
    }

    /// Assign keys now that the module set is complete
    pub fn build(self) -> ModuleGraph {
        let root = self.resolver.root().to_path_buf();
        let keys = KeyAssigner::new(&root).assign(
            self.graph
                .node_weights()
                .map(|module| module.path.as_path()),
        );

        ModuleGraph {
            root,
            graph: self.graph,
            node_map: self.node_map,
            entries: self.entries,
            keys,
        }
    }

    fn walk(
        &mut self,
        path: PathBuf,
        node: Option<NodeIndex>,
        requests: Vec<String>,
    ) -> BundleResult<()> {
        let mut stack = vec![Frame {
            path,
            node,
            requests: requests.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(request) = frame.requests.next() else {
                stack.pop();
                continue;
            };
            let from_node = frame.node;
            let from_dir = frame
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.resolver.root().to_path_buf());

            let resolved = self.resolver.resolve(&request, &from_dir)?;

            if stack.iter().any(|ancestor| ancestor.path == resolved) {
                let root = self.resolver.root();
                let chain = stack
                    .iter()
                    .map(|ancestor| ancestor.path.as_path())
                    .chain(std::iter::once(resolved.as_path()))
                    .map(|path| module_key(path, root))
                    .collect();
                return Err(BundleError::CircularDependency { chain });
            }

            if let Some(&existing) = self.node_map.get(&resolved) {
                self.link(from_node, existing, request);
                continue;
            }

            let source = read_source(&resolved)?;
            let requests = self.parser.requests(&source);
            let index = self.add_module(ModuleRecord {
                path: resolved.clone(),
                source,
            });
            self.link(from_node, index, request);

            stack.push(Frame {
                path: resolved,
                node: Some(index),
                requests: requests.into_iter(),
            });
        }

        Ok(())
    }

    fn add_module(&mut self, module: ModuleRecord) -> NodeIndex {
        debug!(
            "discovered module {}",
            module_key(&module.path, self.resolver.root())
        );
        let path = module.path.clone();
        let index = self.graph.add_node(module);
        self.node_map.insert(path, index);
        index
    }

    fn link(&mut self, from: Option<NodeIndex>, to: NodeIndex, request: String) {
        if let Some(from) = from {
            self.graph.update_edge(from, to, RequireEdge { request });
        }
    }
}

fn read_source(path: &Path) -> BundleResult<String> {
    fs::read_to_string(path).map_err(|err| BundleError::io(path, err))
}
