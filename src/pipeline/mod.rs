//! Pipeline stages for the watch loop.
//!
//! Raw source text flows through extraction, relevance classification, and
//! identity derivation; the resulting identity set is diffed against the
//! persisted snapshot to find newly appeared listings.

pub mod classify;
pub mod diff;
pub mod extract;
pub mod identity;
pub mod watch;

pub use classify::RelevanceFilter;
pub use diff::{DiffOutcome, detect_new};
pub use extract::extract;
pub use identity::{collapse_whitespace, identity_of};
pub use watch::{CycleReport, process_document, run_cycle, run_watch};
