//! Core project item tree for novtree.
//! This crate is the single source of truth for tree structure invariants.

pub mod logging;
pub mod model;
pub mod project;
pub mod storage;
pub mod tree;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::handle::{Handle, HandleError, HandleGenerator, RandomHandleGenerator};
pub use model::item::{ItemClass, ItemLayout, ItemRecord, ItemRecordError, ItemType, ProjectItem};
pub use project::{ChangeSink, ProjectChangeFlag};
pub use storage::ProjectStorage;
pub use tree::{ItemTree, TreeItem, MAX_DEPTH};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
