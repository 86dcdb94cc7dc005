//! Draftwire Domain Layer
//!
//! This crate contains the core domain model for Draftwire: the row
//! lifecycle that turns a submitted article URL into a reviewed social
//! post draft. It defines the fundamental value objects and the trait
//! interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Row**: One unit of work - a submitted URL plus its generated draft
//! - **Status**: Lifecycle stage (pending → running → sent → approved/rejected)
//! - **Draft**: The generated `{summary, post}` pair
//! - **CallbackToken**: Approve/reject action bound to a row, carried
//!   through the messaging transport
//!
//! ## Architecture
//!
//! - Pure data types and business rules only
//! - Infrastructure implementations (HTTP, storage, messaging) live in
//!   other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod draft;
pub mod row;
pub mod status;
pub mod token;
pub mod traits;

// Re-exports for convenience
pub use draft::Draft;
pub use row::{Row, RowRef};
pub use status::Status;
pub use token::CallbackToken;
