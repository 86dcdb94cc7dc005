//! Draftwire Processing Pipeline
//!
//! The row processing and approval state machine: a sequential
//! pipeline that turns a submitted URL into a delivered draft under an
//! external rate limit, plus the scheduled recovery scan that picks up
//! rows whose submission trigger never ran.
//!
//! # Components
//!
//! - [`RowProcessor`]: fetch → generate → notify for one row,
//!   persisting status and results at each transition
//! - [`BatchScanner`]: sequential recovery of `Pending` rows
//! - [`ScanWorker`]: scheduled scan loop
//! - [`Pacer`]: minimum interval between outbound generation calls
//!
//! # State machine
//!
//! `Pending → Running → {Sent, Error}`; `Sent → {Approved, Rejected}`
//! is applied by the approval webhook (draftwire-server), always as a
//! compare-and-set against `Sent` so concurrent scan and webhook
//! writes cannot clobber each other.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod pacing;
pub mod processor;
pub mod scanner;
pub mod worker;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pacing::{Pacer, Sleeper, TokioSleeper};
pub use processor::RowProcessor;
pub use scanner::{BatchScanner, ScanReport};
pub use worker::ScanWorker;
