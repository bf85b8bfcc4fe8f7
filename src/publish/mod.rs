//! Output document and its atomic publication

pub mod document;
pub mod publisher;

pub use document::{OutputDocument, RunMeta, SCHEMA_VERSION};
pub use publisher::{read_published, PublishError, PublishOutcome, Publisher};
