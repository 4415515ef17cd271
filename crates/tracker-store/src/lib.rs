//! JSON-file record store for tracker entries.
//!
//! One JSON array file per category under a data directory, guarded by a
//! shared/exclusive lock per file and rewritten atomically.

mod lock;
mod sequence;
pub mod store;

pub use store::RecordStore;
