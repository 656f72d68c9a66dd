pub mod bundler;
pub mod error;
pub mod graph;
pub mod keys;
pub mod resolver;
pub mod rewriter;

pub use bundler::{bundle_entries, Bundler};
pub use error::{BundleError, BundleResult};
pub use graph::{DependencyGraph, Entry, GraphBuilder, ModuleGraph, ModuleRecord, RequireEdge};
pub use keys::{module_key, KeyAssigner, ModuleKeys};
pub use resolver::{is_module_file, PathResolver, MODULE_EXTENSION, SCRIPT_EXTENSION};
pub use rewriter::{lookup_expression, ReferenceRewriter, MODULE_TABLE};
