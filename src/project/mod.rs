pub mod manifest;
pub mod scaffold;

pub use manifest::{EntryManifest, ManifestError, MANIFEST_FILE};
pub use scaffold::{Scaffold, ScaffoldReport};
