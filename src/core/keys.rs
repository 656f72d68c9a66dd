use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Root-relative path of `path`, joined with `/` on every platform.
///
/// Used both as the lookup table key and as the label in bundle comments.
/// Files outside the root produce `../`-prefixed keys.
pub fn module_key(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative
        .components()
        .filter_map(|component| match component {
            Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Completed path -> key mapping for a whole module graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleKeys {
    keys: HashMap<PathBuf, String>,
}

impl ModuleKeys {
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.keys.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub struct KeyAssigner<'a> {
    root: &'a Path,
}

impl<'a> KeyAssigner<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Assign a key to every module path. The paths are expected to be
    /// deduplicated already, which makes the keys unique.
    pub fn assign<'p, I>(&self, paths: I) -> ModuleKeys
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let keys: HashMap<PathBuf, String> = paths
            .into_iter()
            .map(|path| (path.to_path_buf(), module_key(path, self.root)))
            .collect();

        debug_assert_eq!(
            keys.values()
                .collect::<std::collections::HashSet<_>>()
                .len(),
            keys.len(),
            "module keys must be unique"
        );

        ModuleKeys { keys }
    }
}
