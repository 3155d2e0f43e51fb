//! Database-style backend implementations
//!
//! These backends implement [`KvBackend`](crate::backend::KvBackend) directly.
//! [`InMemory`] lives inside one process; [`FileStore`] keeps the same state in
//! a data file that several processes can share.
//! A networked store binding lives outside this crate and implements the same
//! trait.

mod file;
mod in_memory;

pub use file::FileStore;
pub use in_memory::InMemory;
