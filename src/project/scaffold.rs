use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::{EntryManifest, MANIFEST_FILE};

const INIT1_SOURCE: &str = r#"local lib = require("./lib/library1.module.lua")

local addResult = lib.Add(2, 50)

print(addResult)
print("added successfully in init1")
"#;

const INIT2_SOURCE: &str = r#"local addLib = require("./lib/library1.module.lua")

local addResult = addLib.Add(9, 10)

local res = "add result is "

local final = res .. tostring(addResult)

print(final)
"#;

const LIBRARY1_SOURCE: &str = r#"local returnedLib = {}

returnedLib.Add = function(a, b)
    return a + b
end

return returnedLib
"#;

/// What `polybundle init` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub manifest_created: bool,
    pub files_created: Vec<PathBuf>,
}

/// Writes a starter project: the entry manifest plus two scripts sharing one
/// module. Existing files are left alone.
pub struct Scaffold {
    project_dir: PathBuf,
}

impl Scaffold {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(MANIFEST_FILE)
    }

    pub fn init(&self) -> Result<ScaffoldReport> {
        let mut report = ScaffoldReport::default();

        let manifest_path = self.manifest_path();
        if !manifest_path.exists() {
            fs::write(&manifest_path, EntryManifest::example().to_json())
                .with_context(|| format!("failed to write {}", manifest_path.display()))?;
            report.manifest_created = true;
        }

        let dev_dir = self.project_dir.join("dev");
        let lib_dir = dev_dir.join("lib");
        fs::create_dir_all(&lib_dir)
            .with_context(|| format!("failed to create {}", lib_dir.display()))?;

        let files = [
            (dev_dir.join("init1.lua"), INIT1_SOURCE),
            (dev_dir.join("init2.lua"), INIT2_SOURCE),
            (lib_dir.join("library1.module.lua"), LIBRARY1_SOURCE),
        ];
        for (path, contents) in files {
            if write_if_missing(&path, contents)? {
                report.files_created.push(path);
            }
        }

        Ok(report)
    }
}

fn write_if_missing(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        debug!("keeping existing {}", path.display());
        return Ok(false);
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
