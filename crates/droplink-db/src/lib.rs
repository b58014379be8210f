//! File registry: SQLite-backed mapping from share codes to file groups.
//!
//! All mutations are per-key transactions, so concurrent lookups and deletes
//! on the same code observe either the pre- or post-delete state, never a
//! torn one. The same property would hold against a shared external store.

mod group;
mod pool;

pub use group::GroupRepository;
pub use pool::setup_database;
