//! Persistent storage for repset routines and session summaries.
//!
//! The session engine and the authoring flow talk to storage only through
//! the async [`WorkoutStore`] trait.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process, for tests and demos; can be switched
//!   offline to exercise failure paths
//! - [`JsonFileStore`] - one versioned JSON document per collection,
//!   written atomically (temp file + rename) on the blocking pool
//!
//! # Architecture
//!
//! - `store.rs` - the trait and lookup helpers
//! - `io/` - document load/save
//! - `error.rs` - error types with user-friendly messages

mod error;
mod file;
mod io;
mod memory;
mod store;

pub use error::{PersistenceError, Result};
pub use file::JsonFileStore;
pub use io::{CURRENT_SCHEMA_VERSION, read_document, write_document};
pub use memory::MemoryStore;
pub use store::{WorkoutStore, find_routine, upsert_routine};
