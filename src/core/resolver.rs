use log::{debug, trace};
use path_clean::PathClean;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::error::{BundleError, BundleResult};

/// Suffix that marks a file as a dependency-only module
pub const MODULE_EXTENSION: &str = ".module.lua";

/// Plain source extension, shared by scripts and explicitly named modules
pub const SCRIPT_EXTENSION: &str = ".lua";

/// Returns true when the file name carries the module double extension
pub fn is_module_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MODULE_EXTENSION))
}

/// Turns `require` requests into files on disk.
///
/// Requests without an extension are first tried as `<request>.module.lua`
/// and then as `<request>.lua`. Requests that already end in `.lua` (which
/// covers `.module.lua`) are taken literally and never fall back.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` must already be absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().clean(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `request` as written inside a file living in `from_dir`
    pub fn resolve(&self, request: &str, from_dir: &Path) -> BundleResult<PathBuf> {
        let has_extension = request.ends_with(SCRIPT_EXTENSION);
        let with_extension: Cow<'_, str> = if has_extension {
            Cow::Borrowed(request)
        } else {
            Cow::Owned(format!("{request}{MODULE_EXTENSION}"))
        };

        let candidate = self.candidate_path(&with_extension, from_dir);
        trace!("require(\"{request}\") candidate {}", candidate.display());
        if candidate.is_file() {
            debug!("resolved require(\"{request}\") to {}", candidate.display());
            return Ok(candidate);
        }

        if !has_extension {
            if let Some(fallback) = script_fallback(&candidate) {
                if fallback.is_file() {
                    debug!(
                        "resolved require(\"{request}\") to {} via plain extension fallback",
                        fallback.display()
                    );
                    return Ok(fallback);
                }
            }
        }

        Err(BundleError::UnresolvedModule {
            request: request.to_string(),
        })
    }

    fn candidate_path(&self, request: &str, from_dir: &Path) -> PathBuf {
        let as_path = Path::new(request);
        let joined = if as_path.is_absolute() {
            as_path.to_path_buf()
        } else if request.starts_with("./") || request.starts_with("../") {
            from_dir.join(as_path)
        } else if let Some(stripped) = request.strip_prefix('/') {
            self.root.join(stripped)
        } else {
            self.root.join(as_path)
        };
        joined.clean()
    }
}

/// Swap a trailing `.module.lua` for `.lua`
fn script_fallback(candidate: &Path) -> Option<PathBuf> {
    let name = candidate.file_name()?.to_str()?;
    let stem = name.strip_suffix(MODULE_EXTENSION)?;
    Some(candidate.with_file_name(format!("{stem}{SCRIPT_EXTENSION}")))
}
