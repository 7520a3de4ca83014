pub mod common;
pub mod concepts;
pub mod error;
pub mod facts;
pub mod sample;

pub use common::{OutputPaths, ensure_parent_dir, prefixed_code};
pub use concepts::{CONCEPTS_HEADER, read_concepts, write_concepts};
pub use error::{OutputError, Result};
pub use facts::{FACTS_HEADER, write_facts};
pub use sample::sample_facts;
