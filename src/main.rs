//! JSONL Ranker entry point
//!
//! Handles platform-specific initialization and wires page events to the controller.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DragEvent, Element, HtmlInputElement};

    use jsonl_ranker::consts::EXPORT_MIME;
    use jsonl_ranker::platform::{download_text, read_file_text};
    use jsonl_ranker::session::ReorderOutcome;
    use jsonl_ranker::ui::RankingView;
    use jsonl_ranker::ui::dom::{
        self, EXPORT_BTN_ID, FILE_INPUT_ID, INDEX_ATTR, ITEM_CLASS, LIST_ID, PREFS_ID,
        SUBMIT_BTN_ID, TARGET_ATTR,
    };
    use jsonl_ranker::{Controller, Settings};

    /// Drag in progress
    struct DragState {
        target: String,
        source: usize,
    }

    /// App instance holding all state
    struct App {
        controller: Controller,
        drag: Option<DragState>,
    }

    impl App {
        fn new(settings: Settings) -> Self {
            Self {
                controller: Controller::new(settings),
                drag: None,
            }
        }

        /// Re-render the page from current state
        fn render(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let view = RankingView::from_controller(&self.controller);
            if let Err(e) = dom::render(&document, &view) {
                log::error!("Render failed: {:?}", e);
            }
        }

        fn export(&self) {
            match self.controller.export() {
                Ok(export) => {
                    if let Err(e) = download_text(&export.file_name, &export.contents, EXPORT_MIME)
                    {
                        log::error!("Download failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("Export skipped: {}", e),
            }
        }

        fn finish_drag(&mut self, destination: Option<usize>) {
            let Some(drag) = self.drag.take() else {
                return;
            };
            match self.controller.reorder(&drag.target, drag.source, destination) {
                Ok(ReorderOutcome::NoDestination) => log::debug!("Drag released off-target"),
                Ok(ReorderOutcome::Moved { .. }) => self.render(),
                // Already logged by Controller::reorder; list is unchanged
                Err(e) => log::debug!("Drop ignored: {}", e),
            }
        }
    }

    /// Row element under an event target
    fn item_at(event: &web_sys::Event) -> Option<Element> {
        let el: Element = event.target()?.dyn_into().ok()?;
        el.closest(&format!(".{}", ITEM_CLASS)).ok()?
    }

    fn item_index(item: &Element) -> Option<usize> {
        item.get_attribute(INDEX_ATTR)?.parse().ok()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");

        let settings = Settings::load();
        log::set_max_level(settings.log_level.to_level().to_level_filter());
        log::info!("JSONL Ranker starting...");

        let app = Rc::new(RefCell::new(App::new(settings)));

        setup_file_input(app.clone());
        setup_buttons(app.clone());
        setup_drag_and_drop(app.clone());
        setup_preferences(app.clone());

        app.borrow().render();
        log::info!("JSONL Ranker ready");
    }

    fn setup_file_input(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(input) = document
            .get_element_by_id(FILE_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            log::error!("Missing #{}", FILE_INPUT_ID);
            return;
        };

        let input_clone = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(file) = input_clone.files().and_then(|files| files.get(0)) else {
                return;
            };
            let name = file.name();
            let ticket = app.borrow_mut().controller.begin_load();
            let app = app.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let text = read_file_text(&file).await;
                let mut a = app.borrow_mut();
                match text {
                    Ok(text) => {
                        let seed = || js_sys::Date::now() as u64;
                        // Errors are kept on the controller and rendered as status
                        if let Err(e) = a.controller.finish_load(ticket, &name, &text, seed) {
                            log::debug!("Load of {} left previous session in place: {}", name, e);
                        }
                    }
                    Err(msg) => a.controller.fail_load(ticket, &name, &msg),
                }
                a.drag = None;
                a.render();
            });
        });
        let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Export button
        if let Some(btn) = document.get_element_by_id(EXPORT_BTN_ID) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow().export();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Submit button
        if let Some(btn) = document.get_element_by_id(SUBMIT_BTN_ID) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                if a.controller.advance().is_ok() {
                    a.render();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Any change in the preferences form replaces and saves the settings
    fn setup_preferences(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        dom::render_settings(&document, app.borrow().controller.settings());

        let Some(form) = document.get_element_by_id(PREFS_ID) else {
            log::warn!("Missing #{}; preferences fixed for this page", PREFS_ID);
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut a = app.borrow_mut();
            let settings = dom::read_settings(&document, a.controller.settings());
            log::set_max_level(settings.log_level.to_level().to_level_filter());
            settings.save();
            // Reflect anything rejected (e.g. a bad seed) back into the form
            dom::render_settings(&document, &settings);
            a.controller.set_settings(settings);
            a.render();
        });
        let _ = form.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Listeners sit on the list container; rows are rebuilt on every render
    fn setup_drag_and_drop(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(list) = document.get_element_by_id(LIST_ID) else {
            log::error!("Missing #{}", LIST_ID);
            return;
        };

        // Drag start - remember which row and list
        {
            let app = app.clone();
            let list_clone = list.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                let Some(source) = item_at(&event).as_ref().and_then(item_index) else {
                    return;
                };
                let Some(target) = list_clone.get_attribute(TARGET_ATTR) else {
                    return;
                };
                if let Some(dt) = event.data_transfer() {
                    // Firefox won't start a drag without data
                    let _ = dt.set_data("text/plain", &source.to_string());
                }
                app.borrow_mut().drag = Some(DragState { target, source });
            });
            let _ = list
                .add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag over - allow dropping
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
            });
            let _ = list
                .add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop - onto a row takes its slot, onto empty list space goes last
        {
            let app = app.clone();
            let list_clone = list.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                event.prevent_default();
                let destination = item_at(&event)
                    .as_ref()
                    .and_then(item_index)
                    .or_else(|| list_clone.child_element_count().checked_sub(1).map(|n| n as usize));
                app.borrow_mut().finish_drag(destination);
            });
            let _ = list.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag end without a drop - released outside the list
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: DragEvent| {
                app.borrow_mut().finish_drag(None);
            });
            let _ = list
                .add_event_listener_with_callback("dragend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("JSONL Ranker (native) starting...");
    log::info!("The ranking UI runs in the browser - run with `trunk serve` for the web version");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
