pub mod compose;
pub mod export;
pub mod source;

pub use compose::compose_preview;
pub use export::{export, ExportArtifact};
pub use source::{SourceKind, SourceSet};

#[cfg(test)]
mod tests;
