//! # caseboard-core
//!
//! Core library for caseboard, the TV deadline board of a legal-office case
//! tracker.
//!
//! This library provides:
//! - Typed case records read from the case store
//! - Due-date classification into urgency buckets
//! - Bucket grouping, stable sorting and page slicing for the board
//! - An explicit board state with a pure reducer
//! - Case sources (the store's JSON file, or its read-only HTTP feed)
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use caseboard_core::source::{CaseSource, JsonCaseStore};
//! use caseboard_core::{group_and_sort, Config};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = JsonCaseStore::new(config.store.resolved_path());
//! let cases = store.list_cases().expect("failed to read cases");
//!
//! let today = chrono::Local::now().date_naive();
//! for group in group_and_sort(&cases, today) {
//!     println!("{} ({})", group.bucket.title(), group.count());
//! }
//! ```

// Re-export commonly used items at the crate root
pub use board::{flatten, group_and_sort, BoardGroup, BoardSummary, ClassifiedCase};
pub use config::Config;
pub use error::{Error, Result};
pub use pager::{paginate, Pager};
pub use state::{reduce, AttentionFilter, BoardEvent, BoardFilter, BoardState};
pub use types::*;
pub use urgency::{classify, Bucket, UrgencyInfo};

// Public modules
pub mod board;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod pager;
pub mod source;
pub mod state;
pub mod types;
pub mod urgency;
