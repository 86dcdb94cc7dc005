//! Draftwire Storage Layer
//!
//! Implements the `RowStore` trait over two backends:
//!
//! - [`MemoryRowStore`]: shared in-memory table, used by the server by
//!   default and by tests as a fake
//! - [`SqliteRowStore`]: persistent SQLite table via rusqlite
//!
//! Both keep the fixed column order URL, Tone, Summary, Post, Status
//! and provide the compare-and-set status transition that the approval
//! webhook and the recovery scan rely on.

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::MemoryRowStore;
pub use sqlite::SqliteRowStore;
