//! JSONL Ranker - hand re-ranking of query candidate lists in the browser
//!
//! Core modules:
//! - `session`: Parsing, shuffling, reordering and export of a loaded file
//! - `controller`: Owns the session, serializes loads, keeps the last error
//! - `ui`: View model plus DOM rendering (web only)
//! - `platform`: Browser file reading and downloads
//! - `settings`: User preferences persisted in LocalStorage

pub mod controller;
pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod ui;

pub use controller::{Controller, Export, LoadTicket};
pub use error::{Error, LoadError, Result, SessionError};
pub use session::{RankingRecord, Session};
pub use settings::{LogLevel, Settings};

/// Fixed names and labels
pub mod consts {
    /// Extension the file picker accepts
    pub const SOURCE_EXTENSION: &str = ".jsonl";
    /// Replaces `SOURCE_EXTENSION` in the export name
    pub const RANKED_SUFFIX: &str = "_ranked.jsonl";
    /// MIME type of the exported blob
    pub const EXPORT_MIME: &str = "text/plain;charset=utf-8";

    pub const APP_TITLE: &str = "JSONL candidates ranking";
}
