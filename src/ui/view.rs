//! View model for the ranking page
//!
//! Derived fresh from the controller after every event; the DOM layer only copies it out.

use crate::consts::APP_TITLE;
use crate::controller::Controller;

/// Dirty marks are never cleared, so a list moved back is still exported
pub const REVERTED_NOTE: &str = "Back in loaded order, but still included in the export";

/// One draggable candidate row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    /// Position in the list (0-based)
    pub index: usize,
    /// Element id, unique within the page
    pub id: String,
    /// "Rank N:" label, if enabled
    pub rank_label: Option<String>,
    pub text: String,
}

/// Everything the page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingView {
    pub title: &'static str,
    /// "Query i of n", hidden when nothing is loaded
    pub counter: Option<String>,
    pub export_enabled: bool,
    pub query: Option<String>,
    /// Drop-target id of the visible list
    pub drop_target: Option<String>,
    pub items: Vec<ItemView>,
    pub submit_visible: bool,
    /// Reranked-so-far summary
    pub progress: Option<String>,
    /// Visible list differs from its loaded order right now
    pub current_changed: bool,
    /// Note shown when the visible list is marked reranked but matches its loaded order
    pub reverted_note: Option<&'static str>,
    /// Load error, shown until the next good load
    pub error: Option<String>,
}

impl RankingView {
    pub fn from_controller(controller: &Controller) -> Self {
        let show_ranks = controller.settings().show_rank_labels;
        let session = controller.session().filter(|s| !s.is_empty());

        let mut view = Self {
            title: APP_TITLE,
            counter: None,
            export_enabled: controller.has_data(),
            query: None,
            drop_target: None,
            items: Vec::new(),
            submit_visible: false,
            progress: None,
            current_changed: false,
            reverted_note: None,
            error: controller.last_error().map(str::to_string),
        };

        let Some(session) = session else {
            return view;
        };

        view.counter = Some(format!(
            "Query {} of {}",
            session.cursor() + 1,
            session.len()
        ));
        view.submit_visible = session.can_advance();
        view.progress = Some(format!("{} reranked", session.dirty_count()));

        if let (Some(query), Some(target), Some(candidates)) = (
            session.current_query(),
            session.current_drop_target(),
            session.current_candidates(),
        ) {
            let target = target.to_string();
            view.items = candidates
                .iter()
                .enumerate()
                .map(|(index, text)| ItemView {
                    index,
                    id: format!("{}-{}", target, index),
                    rank_label: show_ranks.then(|| format!("Rank {}:", index + 1)),
                    text: text.clone(),
                })
                .collect();
            view.current_changed = session.differs_from_original(query);
            if session.is_dirty(query) && !view.current_changed {
                view.reverted_note = Some(REVERTED_NOTE);
            }
            view.query = Some(query.to_string());
            view.drop_target = Some(target);
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    const FILE: &str = "{\"query\":\"what is rust?\",\"ranked_candidates\":[\"a language\",\"a fungus\"]}\n\
                        {\"query\":\"B\",\"ranked_candidates\":[\"b1\"]}\n\
                        {\"query\":\"C\",\"ranked_candidates\":[\"c1\"]}";

    fn controller(settings: Settings) -> Controller {
        let mut c = Controller::new(Settings {
            shuffle_on_load: false,
            ..settings
        });
        let t = c.begin_load();
        c.finish_load(t, "f.jsonl", FILE, || 0).unwrap();
        c
    }

    #[test]
    fn test_empty_view() {
        let view = RankingView::from_controller(&Controller::default());
        assert_eq!(view.title, "JSONL candidates ranking");
        assert_eq!(view.counter, None);
        assert!(!view.export_enabled);
        assert!(!view.submit_visible);
        assert!(view.items.is_empty());
    }

    #[test]
    fn test_first_query_view() {
        let view = RankingView::from_controller(&controller(Settings::default()));
        assert_eq!(view.counter.as_deref(), Some("Query 1 of 3"));
        assert!(view.export_enabled);
        assert!(view.submit_visible);
        assert_eq!(view.query.as_deref(), Some("what is rust?"));
        assert_eq!(view.drop_target.as_deref(), Some("q0-whatisrust"));
        assert_eq!(view.progress.as_deref(), Some("0 reranked"));
        assert_eq!(
            view.items[1],
            ItemView {
                index: 1,
                id: "q0-whatisrust-1".to_string(),
                rank_label: Some("Rank 2:".to_string()),
                text: "a fungus".to_string(),
            }
        );
    }

    #[test]
    fn test_moved_back_list_is_flagged() {
        let mut c = controller(Settings::default());
        let target = "q0-whatisrust";

        c.reorder(target, 0, Some(1)).unwrap();
        let view = RankingView::from_controller(&c);
        assert!(view.current_changed);
        assert_eq!(view.reverted_note, None);

        c.reorder(target, 1, Some(0)).unwrap();
        let view = RankingView::from_controller(&c);
        assert!(!view.current_changed);
        assert_eq!(view.reverted_note, Some(REVERTED_NOTE));
        assert_eq!(view.progress.as_deref(), Some("1 reranked"));
        assert_eq!(view.items[0].text, "a language");

        // Still part of the export
        let export = c.export().unwrap();
        assert_eq!(export.lines, 1);
        assert!(export.contents.contains("what is rust?"));
    }

    #[test]
    fn test_untouched_list_has_no_note() {
        let view = RankingView::from_controller(&controller(Settings::default()));
        assert!(!view.current_changed);
        assert_eq!(view.reverted_note, None);
    }

    #[test]
    fn test_rank_labels_can_be_hidden() {
        let view = RankingView::from_controller(&controller(Settings {
            show_rank_labels: false,
            ..Settings::default()
        }));
        assert!(view.items.iter().all(|i| i.rank_label.is_none()));
    }

    #[test]
    fn test_submit_hidden_after_all_advances() {
        let mut c = controller(Settings::default());
        for _ in 0..2 {
            c.advance().unwrap();
            assert!(RankingView::from_controller(&c).submit_visible);
        }
        c.advance().unwrap();
        let view = RankingView::from_controller(&c);
        assert!(!view.submit_visible);
        assert_eq!(view.counter.as_deref(), Some("Query 3 of 3"));
        assert_eq!(view.query.as_deref(), Some("C"));
    }

    #[test]
    fn test_error_shown_alongside_previous_session() {
        let mut c = controller(Settings::default());
        let t = c.begin_load();
        let _ = c.finish_load(t, "broken.jsonl", "nope", || 0);
        let view = RankingView::from_controller(&c);
        assert!(view.error.as_deref().unwrap().starts_with("broken.jsonl: line 1"));
        assert_eq!(view.counter.as_deref(), Some("Query 1 of 3"));
    }

    #[test]
    fn test_empty_file_disables_export() {
        let mut c = Controller::default();
        let t = c.begin_load();
        c.finish_load(t, "blank.jsonl", "\n\n", || 0).unwrap();
        let view = RankingView::from_controller(&c);
        assert!(!view.export_enabled);
        assert_eq!(view.counter, None);
        assert!(!view.submit_visible);
    }
}
