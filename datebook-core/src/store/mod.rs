//! CSV-backed record storage.
//!
//! Each store owns one file in the data directory and keeps its records in
//! memory. Writers are serialized through a lock file next to each table, so
//! several handles or processes may share a directory. There is no
//! transaction across stores.

mod events;
mod file;
mod id;
mod rules;
mod table;
mod users;

pub use events::EventStore;
pub use id::IdAllocator;
pub use rules::RuleStore;
pub use users::UserStore;
