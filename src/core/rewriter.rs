use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::error::{BundleError, BundleResult};
use super::graph::ModuleGraph;
use super::resolver::PathResolver;
use crate::parsers::RequireParser;

/// Name of the shared lookup table declared at the top of every bundle
pub const MODULE_TABLE: &str = "__module_env";

/// `__module_env["<key>"]`
pub fn lookup_expression(key: &str) -> String {
    format!("{MODULE_TABLE}[{}]", lua_string_literal(key))
}

/// Double-quoted Lua string literal
pub fn lua_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}

/// Replaces require calls with lookups into the shared module table.
///
/// Needs a finished [`ModuleGraph`]: every key has to be known before the
/// first file is rewritten. Results are memoized per file.
pub struct ReferenceRewriter<'g> {
    graph: &'g ModuleGraph,
    resolver: PathResolver,
    parser: RequireParser,
    cache: HashMap<PathBuf, String>,
    in_progress: HashSet<PathBuf>,
}

impl<'g> ReferenceRewriter<'g> {
    pub fn new(graph: &'g ModuleGraph) -> Self {
        Self {
            graph,
            resolver: PathResolver::new(graph.root()),
            parser: RequireParser::new(),
            cache: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Rewritten text of the file at `path`, computed at most once
    pub fn rewrite(&mut self, path: &Path, source: &str) -> BundleResult<String> {
        if let Some(cached) = self.cache.get(path) {
            trace!("rewrite cache hit for {}", path.display());
            return Ok(cached.clone());
        }

        // Cycles are rejected while building the graph, so this only trips
        // if the builder and the rewriter disagree.
        if !self.in_progress.insert(path.to_path_buf()) {
            return Err(BundleError::ReentrantRewrite {
                path: path.to_path_buf(),
            });
        }

        let result = self.rewrite_source(path, source);
        self.in_progress.remove(path);

        let rewritten = result?;
        self.cache.insert(path.to_path_buf(), rewritten.clone());
        Ok(rewritten)
    }

    /// Rewrite without touching the cache
    pub fn rewrite_source(&self, path: &Path, source: &str) -> BundleResult<String> {
        let from_dir = path.parent().unwrap_or_else(|| self.graph.root());
        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;

        for occurrence in self.parser.parse(source) {
            let target = self.resolver.resolve(&occurrence.request, from_dir)?;
            let key = self
                .graph
                .key_for(&target)
                .ok_or_else(|| BundleError::MissingModuleEntry {
                    request: occurrence.request.clone(),
                })?;

            output.push_str(&source[cursor..occurrence.span.start]);
            output.push_str(&lookup_expression(key));
            cursor = occurrence.span.end;
        }
        output.push_str(&source[cursor..]);

        debug!("rewrote {}", path.display());
        Ok(output)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}
