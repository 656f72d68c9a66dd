use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

use crate::core::keys::module_key;
use crate::core::rewriter::{lookup_expression, ReferenceRewriter, MODULE_TABLE};
use crate::core::{BundleResult, Entry, ModuleGraph};

/// Largest script Polytoria accepts, in UTF-16 code units
pub const SIZE_LIMIT: usize = 65_535;

pub const MODULE_MARKER: &str = "-- polybundle: module";
pub const BEGIN_MARKER: &str = "-- polybundle: begin";
pub const END_MARKER: &str = "-- polybundle: end";

/// Length as the target runtime counts it
pub fn bundle_length(bundle: &str) -> usize {
    bundle.encode_utf16().count()
}

pub fn exceeds_size_limit(bundle: &str) -> bool {
    bundle_length(bundle) > SIZE_LIMIT
}

/// Exactly one trailing newline
fn normalize_source(source: &str) -> String {
    format!("{}\n", source.trim_end_matches('\n'))
}

/// Assembles a [`ModuleGraph`] into a single Lua script.
///
/// Layout: the module table declaration, then one block per module in
/// discovery order, then one `coroutine.wrap` block per script entry in the
/// order the entries were given. Blocks are separated by blank lines.
pub struct LuaBundleFormatter;

impl LuaBundleFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_graph(&self, graph: &ModuleGraph) -> BundleResult<String> {
        let mut rewriter = ReferenceRewriter::new(graph);
        let mut chunks = Vec::with_capacity(1 + graph.module_count() + graph.entries().len());

        chunks.push(format!("local {MODULE_TABLE} = {{}}\n"));

        for module in graph.modules() {
            let body = rewriter.rewrite(&module.path, &module.source)?;
            let key = graph
                .key_for(&module.path)
                .map(str::to_string)
                .unwrap_or_else(|| module_key(&module.path, graph.root()));
            chunks.push(self.module_block(&key, &body));
        }

        for entry in graph.entries() {
            let Entry::Script { path, source } = entry else {
                continue;
            };
            let body = rewriter.rewrite(path, source)?;
            let label = module_key(path, graph.root());
            chunks.push(self.entry_block(&label, &body));
        }

        debug!(
            "assembled {} modules and {} script entries ({} files rewritten)",
            graph.module_count(),
            graph.entries().iter().filter(|entry| entry.is_script()).count(),
            rewriter.cached_count()
        );

        Ok(chunks.join("\n"))
    }

    pub fn format_to_file(&self, graph: &ModuleGraph, output_path: &Path) -> Result<()> {
        let bundle = self.format_graph(graph)?;
        write_bundle(&bundle, output_path)
    }

    fn module_block(&self, key: &str, body: &str) -> String {
        format!(
            "{MODULE_MARKER} {key}\n{} = (function()\n{}end)()\n",
            lookup_expression(key),
            normalize_source(body)
        )
    }

    fn entry_block(&self, label: &str, body: &str) -> String {
        let wrapped = format!("coroutine.wrap(function()\n{}end)()", normalize_source(body));
        format!(
            "{BEGIN_MARKER} {label}\n{}{END_MARKER} {label}\n",
            normalize_source(&wrapped)
        )
    }
}

impl Default for LuaBundleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the bundle, creating parent directories as needed
pub fn write_bundle(bundle: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(output_path, bundle)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    Ok(())
}
