use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a bundle build. None of them are recoverable, and a
/// failed build never produces partial output.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Module not found for require(\"{request}\")")]
    UnresolvedModule { request: String },
    #[error("Circular require detected: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },
    /// The rewriter needed a key for a path the graph builder never recorded.
    #[error("Missing module entry for require(\"{request}\")")]
    MissingModuleEntry { request: String },
    #[error("Re-entered rewrite of {} while it was still in progress", path.display())]
    ReentrantRewrite { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type BundleResult<T, E = BundleError> = std::result::Result<T, E>;
