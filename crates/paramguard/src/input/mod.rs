//! Snapshot loading and representation.

mod parser;
mod source;

pub use parser::{LoaderConfig, SnapshotLoader};
pub use source::{Snapshot, SourceMetadata};
