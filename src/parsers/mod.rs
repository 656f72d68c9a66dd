pub mod require;

pub use require::{RequireOccurrence, RequireParser};
