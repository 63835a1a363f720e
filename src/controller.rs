//! Ranking session controller
//!
//! Owns the active `Session` and the user's settings. Loads are asynchronous in the
//! browser, so each file selection takes a ticket and only the newest ticket's
//! completion is applied.

use crate::error::{Error, LoadError, SessionError};
use crate::session::{ReorderOutcome, Session};
use crate::settings::Settings;

/// Handle for one in-flight file load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A finished export, ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
    /// Number of queries written
    pub lines: usize,
}

#[derive(Debug, Default)]
pub struct Controller {
    settings: Settings,
    session: Option<Session>,
    /// Last ticket handed out
    generation: u64,
    /// Message from the most recent failed load
    last_error: Option<String>,
}

impl Controller {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether there is anything to export
    pub fn has_data(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Start a load. Any earlier ticket is now stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a finished read. Returns `Ok(false)` if a newer load superseded this one.
    ///
    /// On error the previous session stays in place.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        file_name: &str,
        text: &str,
        fresh_seed: impl FnOnce() -> u64,
    ) -> Result<bool, LoadError> {
        if !self.is_current(ticket) {
            log::warn!("Dropping stale load of {} (superseded)", file_name);
            return Ok(false);
        }

        let seed = self.settings.shuffle_seed(fresh_seed);
        match Session::load(text, file_name, seed) {
            Ok(session) => {
                log::info!(
                    "Loaded {}: {} queries (seed {:?})",
                    file_name,
                    session.len(),
                    seed
                );
                self.session = Some(session);
                self.last_error = None;
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", file_name, e);
                self.last_error = Some(format!("{}: {}", file_name, e));
                Err(e)
            }
        }
    }

    /// Record a read failure that happened before parsing (e.g. the browser refused the file)
    pub fn fail_load(&mut self, ticket: LoadTicket, file_name: &str, message: &str) {
        if !self.is_current(ticket) {
            return;
        }
        log::error!("Failed to read {}: {}", file_name, message);
        self.last_error = Some(format!("{}: {}", file_name, message));
    }

    pub fn reorder(
        &mut self,
        target: &str,
        source: usize,
        destination: Option<usize>,
    ) -> Result<ReorderOutcome, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        session.reorder(target, source, destination).inspect_err(|e| {
            log::warn!("Reorder rejected: {}", e);
        })
    }

    pub fn advance(&mut self) -> Result<usize, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        Ok(session.advance())
    }

    /// Build the export of reranked queries
    pub fn export(&self) -> Result<Export, Error> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        let export = Export {
            file_name: session.export_file_name(),
            contents: session.export_jsonl()?,
            lines: session.dirty_count(),
        };
        log::info!("Exporting {} reranked queries to {}", export.lines, export.file_name);
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "{\"query\":\"A\",\"ranked_candidates\":[\"a1\",\"a2\"]}\n\
                        {\"query\":\"B\",\"ranked_candidates\":[\"b1\",\"b2\"]}\n\
                        {\"query\":\"C\",\"ranked_candidates\":[\"c1\",\"c2\"]}\n";

    fn unshuffled() -> Controller {
        Controller::new(Settings {
            shuffle_on_load: false,
            ..Settings::default()
        })
    }

    fn loaded() -> Controller {
        let mut c = unshuffled();
        let t = c.begin_load();
        assert!(c.finish_load(t, "set.jsonl", FILE, || 0).unwrap());
        c
    }

    #[test]
    fn test_operations_before_load() {
        let mut c = Controller::default();
        assert!(!c.has_data());
        assert_eq!(c.advance(), Err(SessionError::NoSession));
        assert_eq!(c.reorder("q0-A", 0, Some(1)), Err(SessionError::NoSession));
        assert!(matches!(
            c.export(),
            Err(Error::Session(SessionError::NoSession))
        ));
    }

    #[test]
    fn test_load_keeps_file_order_when_shuffle_off() {
        let c = loaded();
        assert!(c.has_data());
        assert_eq!(c.session().unwrap().queries(), ["A", "B", "C"]);
        assert_eq!(c.session().unwrap().seed(), None);
    }

    #[test]
    fn test_fixed_seed_reproduces_order() {
        let settings = Settings {
            seed: Some(31337),
            ..Settings::default()
        };
        let mut first = Controller::new(settings.clone());
        let mut second = Controller::new(settings);
        let t1 = first.begin_load();
        let t2 = second.begin_load();
        first.finish_load(t1, "set.jsonl", FILE, || 1).unwrap();
        second.finish_load(t2, "set.jsonl", FILE, || 2).unwrap();
        assert_eq!(
            first.session().unwrap().queries(),
            second.session().unwrap().queries()
        );
        assert_eq!(first.session().unwrap().seed(), Some(31337));
    }

    #[test]
    fn test_newest_load_wins() {
        let mut c = unshuffled();
        let older = c.begin_load();
        let newer = c.begin_load();

        let other = "{\"query\":\"Z\",\"ranked_candidates\":[\"z\"]}";
        assert!(c.finish_load(newer, "new.jsonl", other, || 0).unwrap());
        // Older read completes last but must not overwrite
        assert!(!c.finish_load(older, "old.jsonl", FILE, || 0).unwrap());
        assert_eq!(c.session().unwrap().source_name(), "new.jsonl");
        assert_eq!(c.session().unwrap().queries(), ["Z"]);
    }

    #[test]
    fn test_failed_load_keeps_previous_session() {
        let mut c = loaded();
        let t = c.begin_load();
        let err = c
            .finish_load(t, "bad.jsonl", "{\"query\":\"x\",\"ranked_candidates\":[]}\n{oops", || 0)
            .unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(c.session().unwrap().source_name(), "set.jsonl");
        let msg = c.last_error().unwrap();
        assert!(msg.starts_with("bad.jsonl: line 2"), "{}", msg);

        // Next good load clears the error
        let t = c.begin_load();
        c.finish_load(t, "set.jsonl", FILE, || 0).unwrap();
        assert_eq!(c.last_error(), None);
    }

    #[test]
    fn test_stale_read_failure_ignored() {
        let mut c = unshuffled();
        let older = c.begin_load();
        let _newer = c.begin_load();
        c.fail_load(older, "old.jsonl", "NotReadableError");
        assert_eq!(c.last_error(), None);
    }

    #[test]
    fn test_new_load_replaces_progress() {
        let mut c = loaded();
        c.reorder("q0-A", 0, Some(1)).unwrap();
        c.advance().unwrap();

        let t = c.begin_load();
        c.finish_load(t, "set.jsonl", FILE, || 0).unwrap();
        let s = c.session().unwrap();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.submit_count(), 0);
        assert_eq!(s.dirty_count(), 0);
        assert_eq!(s.candidates("A").unwrap(), ["a1", "a2"]);
    }

    #[test]
    fn test_changed_settings_apply_to_next_load() {
        let mut c = loaded();
        let mut settings = c.settings().clone();
        settings.apply_form(true, "99", true, "info");
        c.set_settings(settings);
        assert_eq!(c.settings().seed, Some(99));

        // Current session keeps its order until the next load
        assert_eq!(c.session().unwrap().seed(), None);

        let t = c.begin_load();
        c.finish_load(t, "set.jsonl", FILE, || panic!("fixed seed set"))
            .unwrap();
        assert_eq!(c.session().unwrap().seed(), Some(99));
    }

    #[test]
    fn test_export_round() {
        let mut c = loaded();
        let empty = c.export().unwrap();
        assert_eq!(empty.contents, "");
        assert_eq!(empty.lines, 0);
        assert_eq!(empty.file_name, "set_ranked.jsonl");

        c.reorder("q1-B", 1, Some(0)).unwrap();
        let export = c.export().unwrap();
        assert_eq!(export.lines, 1);
        assert_eq!(
            export.contents,
            r#"{"query":"B","ranked_candidates":["b2","b1"]}"#
        );
    }
}
