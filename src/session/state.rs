//! Ranking session state
//!
//! A `Session` is built wholesale from one file and replaced wholesale on the
//! next load. All fields are private so the invariants hold in one place:
//! - `current` and `original` always carry the same queries; only element order diverges
//! - `dirty` only grows
//! - `cursor` never decreases and stays below the query count

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::record::{RankingRecord, parse_jsonl, to_jsonl};
use super::shuffle::{rng_from_seed, shuffle};
use crate::consts::{RANKED_SUFFIX, SOURCE_EXTENSION};
use crate::error::{LoadError, SessionError};

/// Result of a reorder request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Drag ended outside any target; nothing changed
    NoDestination,
    /// Item moved. `dirty` is whether the query is now in the dirty set.
    Moved { dirty: bool },
}

/// Identifier tying a drop surface to its query.
///
/// Resolution only looks at the position, so distinct queries that sanitize to
/// the same text can't collide. The sanitized text is carried for readability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTargetId {
    pub index: usize,
    pub label: String,
}

impl DropTargetId {
    pub fn new(index: usize, query: &str) -> Self {
        Self {
            index,
            label: sanitize_query(query),
        }
    }

    /// Recover the query position from a rendered id (`q{index}-{label}`)
    pub fn parse_index(id: &str) -> Option<usize> {
        let rest = id.strip_prefix('q')?;
        let digits = rest.split('-').next()?;
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for DropTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}-{}", self.index, self.label)
    }
}

/// Strip everything but ASCII letters and digits.
///
/// Lossy: `"a b?"` and `"ab"` both map to `"ab"`.
pub fn sanitize_query(query: &str) -> String {
    query.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Move one item from `from` to `to` (remove, then insert at `to`).
///
/// Both indices must be in range; the caller validates.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Export file name: first `.jsonl` becomes `_ranked.jsonl`, otherwise the suffix is appended
pub fn export_file_name(source_name: &str) -> String {
    if source_name.is_empty() {
        return RANKED_SUFFIX.trim_start_matches('_').to_string();
    }
    if source_name.contains(SOURCE_EXTENSION) {
        source_name.replacen(SOURCE_EXTENSION, RANKED_SUFFIX, 1)
    } else {
        format!("{}{}", source_name, RANKED_SUFFIX)
    }
}

/// Complete in-memory state of one loaded file
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Query keys in display order
    queries: Vec<String>,
    /// Query -> position in `queries`
    positions: HashMap<String, usize>,
    /// User-edited lists, parallel to `queries`
    current: Vec<Vec<String>>,
    /// Lists as loaded, parallel to `queries`
    original: Vec<Vec<String>>,
    /// Positions of queries whose order has been changed
    dirty: BTreeSet<usize>,
    cursor: usize,
    submit_count: usize,
    source_name: String,
    /// Seed used for the display order, if shuffled
    seed: Option<u64>,
}

impl Session {
    /// Parse `text` and build a session. With `seed`, the record order is shuffled.
    ///
    /// Nothing is built unless every line parses.
    pub fn load(text: &str, source_name: &str, seed: Option<u64>) -> Result<Self, LoadError> {
        let mut records = parse_jsonl(text)?;
        if let Some(seed) = seed {
            shuffle(&mut records, &mut rng_from_seed(seed));
        }
        let mut session = Self::from_records(records, source_name);
        session.seed = seed;
        Ok(session)
    }

    /// Build from already-ordered records.
    ///
    /// A repeated query keeps its first position and takes the later candidates.
    pub fn from_records(records: Vec<RankingRecord>, source_name: &str) -> Self {
        let mut session = Self {
            source_name: source_name.to_string(),
            ..Self::default()
        };

        for RankingRecord {
            query,
            ranked_candidates,
        } in records
        {
            match session.positions.get(&query) {
                Some(&pos) => {
                    log::warn!("Duplicate query {:?}; keeping the later candidate list", query);
                    session.current[pos] = ranked_candidates;
                }
                None => {
                    session.positions.insert(query.clone(), session.queries.len());
                    session.queries.push(query);
                    session.current.push(ranked_candidates);
                }
            }
        }

        session.original = session.current.clone();
        session
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Query keys in display order
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    /// Current candidate order for `query`
    pub fn candidates(&self, query: &str) -> Option<&[String]> {
        self.positions.get(query).map(|&i| self.current[i].as_slice())
    }

    /// Candidate order for `query` as loaded
    pub fn original_candidates(&self, query: &str) -> Option<&[String]> {
        self.positions.get(query).map(|&i| self.original[i].as_slice())
    }

    /// Query under the cursor
    pub fn current_query(&self) -> Option<&str> {
        self.queries.get(self.cursor).map(String::as_str)
    }

    pub fn current_candidates(&self) -> Option<&[String]> {
        self.current.get(self.cursor).map(Vec::as_slice)
    }

    /// Drop target for the query at `index`
    pub fn drop_target(&self, index: usize) -> Option<DropTargetId> {
        self.queries.get(index).map(|q| DropTargetId::new(index, q))
    }

    pub fn current_drop_target(&self) -> Option<DropTargetId> {
        self.drop_target(self.cursor)
    }

    /// Resolve a rendered drop-target id to a query position
    pub fn resolve_drop_target(&self, id: &str) -> Result<usize, SessionError> {
        DropTargetId::parse_index(id)
            .filter(|&i| i < self.queries.len())
            .ok_or_else(|| SessionError::UnknownDropTarget(id.to_string()))
    }

    /// Move the candidate at `source` to `destination` in the list behind `target`.
    ///
    /// `None` for `destination` means the drag was released off-target. Out-of-range
    /// indices are rejected and leave the list untouched.
    pub fn reorder(
        &mut self,
        target: &str,
        source: usize,
        destination: Option<usize>,
    ) -> Result<ReorderOutcome, SessionError> {
        let Some(destination) = destination else {
            return Ok(ReorderOutcome::NoDestination);
        };
        let pos = self.resolve_drop_target(target)?;

        let list = &mut self.current[pos];
        let len = list.len();
        for index in [source, destination] {
            if index >= len {
                return Err(SessionError::IndexOutOfRange { index, len });
            }
        }

        move_item(list, source, destination);
        if self.current[pos] != self.original[pos] {
            self.dirty.insert(pos);
        }
        log::debug!(
            "Moved {} -> {} in {:?}",
            source,
            destination,
            self.queries[pos]
        );

        Ok(ReorderOutcome::Moved {
            dirty: self.dirty.contains(&pos),
        })
    }

    /// Record a submit and step to the next query, stopping at the last one.
    ///
    /// Returns the new cursor.
    pub fn advance(&mut self) -> usize {
        self.submit_count += 1;
        if self.cursor + 1 < self.queries.len() {
            self.cursor += 1;
        }
        log::debug!(
            "Advance: cursor {} submits {}",
            self.cursor,
            self.submit_count
        );
        self.cursor
    }

    /// Whether the submit control should still be offered
    pub fn can_advance(&self) -> bool {
        self.submit_count < self.queries.len()
    }

    /// Whether `query` has been marked as reranked. Never cleared once set.
    pub fn is_dirty(&self, query: &str) -> bool {
        self.positions
            .get(query)
            .is_some_and(|pos| self.dirty.contains(pos))
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Dirty queries in display order
    pub fn dirty_queries(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(|&pos| self.queries[pos].as_str())
    }

    /// Structural check against the loaded order, right now
    pub fn differs_from_original(&self, query: &str) -> bool {
        self.positions
            .get(query)
            .is_some_and(|&pos| self.current[pos] != self.original[pos])
    }

    /// JSONL of the dirty queries only, in display order
    pub fn export_jsonl(&self) -> serde_json::Result<String> {
        to_jsonl(
            self.dirty
                .iter()
                .map(|&pos| (self.queries[pos].as_str(), self.current[pos].as_slice())),
        )
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(&self.source_name)
    }
}
