//! Ranking session model
//!
//! Everything here is pure and runs without a browser:
//! - Parsing and writing JSONL records
//! - Seeded shuffle of the review order
//! - Reordering, dirty tracking, navigation and export filtering

pub mod record;
pub mod shuffle;
pub mod state;

pub use record::{RankingRecord, parse_jsonl, parse_line, record_line, to_jsonl};
pub use shuffle::{rng_from_seed, shuffle};
pub use state::{
    DropTargetId, ReorderOutcome, Session, export_file_name, move_item, sanitize_query,
};
