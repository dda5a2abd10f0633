use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use providers::roast::RoastConfig;
use ratatui::layout::Rect;
use roast_core::history::SavedHistory;
use roast_core::notice::Notice;
use roast_core::snippets::Language;
use roast_core::submission::SubmissionController;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
    Arc,
};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::persist::JsonFileRepository;
use crate::strings::{NOTHING_TO_SAVE, REQUEST_CANCELED, SAVE_FAILED};
use crate::worker::{self, Outcome};

pub mod input;
pub mod saved;

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    Saved,
}

pub struct DocsState {
    pub language: Language,
    pub scroll: u16,
}

pub struct App {
    pub controller: SubmissionController,
    pub saved: SavedHistory<JsonFileRepository>,
    pub input_cursor: usize,
    pub focus: Focus,
    pub saved_selected: usize,
    // id of the saved entry shown in the response pane
    pub viewing: Option<String>,
    pub response_scroll: u16,
    pub response_viewport: u16,
    pub response_area: Option<Rect>,
    pub docs: Option<DocsState>,
    pub show_help: bool,
    pub dark: bool,
    pub notice: Option<(Notice, Instant)>,
    pub endpoint: String,
    pub should_quit: bool,
    pub dirty: bool,
    pub input_visible_lines: u16,
    pub input_max_lines: u16,
    config: RoastConfig,
    worker_tx: Sender<Outcome>,
    worker_rx: Receiver<Outcome>,
    worker_cancel: Option<Arc<AtomicBool>>,
}

impl App {
    pub fn new(config: RoastConfig) -> Self {
        let path = config
            .history_path
            .clone()
            .or_else(crate::persist::default_history_path)
            .unwrap_or_else(|| PathBuf::from("savedRoasts.json"));
        info!(target: "tui", "saved roasts at {}", path.display());
        Self::with_repository(config, JsonFileRepository::new(path))
    }

    pub fn with_repository(config: RoastConfig, repo: JsonFileRepository) -> Self {
        let endpoint = match config.endpoint() {
            Ok(u) => u.to_string(),
            Err(e) => {
                warn!(target: "tui", "{}", e);
                config.base_url.clone()
            }
        };
        let dark = !matches!(config.theme.as_deref(), Some("light"));
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            controller: SubmissionController::new(),
            saved: SavedHistory::initialize(repo),
            input_cursor: 0,
            focus: Focus::Input,
            saved_selected: 0,
            viewing: None,
            response_scroll: 0,
            response_viewport: 0,
            response_area: None,
            docs: None,
            show_help: false,
            dark,
            notice: None,
            endpoint,
            should_quit: false,
            dirty: true,
            input_visible_lines: 3,
            input_max_lines: 8,
            config,
            worker_tx,
            worker_rx,
            worker_cancel: None,
        }
    }

    pub fn show_notice(&mut self, n: Notice) {
        self.notice = Some((n, Instant::now()));
        self.dirty = true;
    }

    pub fn submit(&mut self) {
        let ticket = match self.controller.begin() {
            Ok(t) => t,
            Err(n) => {
                self.show_notice(n);
                return;
            }
        };
        // a new submission replaces whatever is still running
        if let Some(prev) = self.worker_cancel.take() {
            prev.store(true, Ordering::Relaxed);
        }
        info!(target: "tui", "submit: input_len={} chars", ticket.content().len());
        let cancel = Arc::new(AtomicBool::new(false));
        self.worker_cancel = Some(cancel.clone());
        worker::spawn(self.config.clone(), ticket, self.worker_tx.clone(), cancel);
        self.viewing = None;
        self.response_scroll = 0;
        self.dirty = true;
    }

    pub fn cancel_request(&mut self) {
        if self.controller.cancel() {
            if let Some(cancel) = self.worker_cancel.take() {
                cancel.store(true, Ordering::Relaxed);
            }
            self.show_notice(Notice::error(REQUEST_CANCELED));
        }
    }

    pub fn save_current(&mut self) {
        let Some((content, response)) = self
            .controller
            .saveable()
            .map(|(c, r)| (c.to_string(), r.to_string()))
        else {
            self.show_notice(Notice::error(NOTHING_TO_SAVE));
            return;
        };
        match self.saved.save(&content, &response) {
            Ok(Some(n)) => {
                self.saved_selected = 0;
                self.show_notice(n);
            }
            Ok(None) => {}
            Err(e) => {
                error!(target: "tui", "save failed: {}", e);
                self.show_notice(Notice::error(SAVE_FAILED));
            }
        }
    }

    /// Applies finished requests and expires the notice.
    pub fn on_tick(&mut self) {
        while let Ok((ticket, outcome)) = self.worker_rx.try_recv() {
            if let Some(n) = self.controller.complete(&ticket, outcome) {
                self.worker_cancel = None;
                self.response_scroll = 0;
                self.show_notice(n);
            }
            self.dirty = true;
        }
        if let Some((_, at)) = &self.notice {
            if at.elapsed() >= NOTICE_TTL {
                self.notice = None;
                self.dirty = true;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.dirty = true;

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')
            ) {
                self.show_help = false;
            }
            return;
        }

        if let Some(docs) = &mut self.docs {
            match key.code {
                KeyCode::Esc | KeyCode::F(3) => self.docs = None,
                KeyCode::Right | KeyCode::Tab => {
                    docs.language = docs.language.next();
                    docs.scroll = 0;
                }
                KeyCode::Left | KeyCode::BackTab => {
                    docs.language = docs.language.prev();
                    docs.scroll = 0;
                }
                KeyCode::Up => docs.scroll = docs.scroll.saturating_sub(1),
                KeyCode::Down => docs.scroll = docs.scroll.saturating_add(1),
                KeyCode::PageUp => docs.scroll = docs.scroll.saturating_sub(10),
                KeyCode::PageDown => docs.scroll = docs.scroll.saturating_add(10),
                _ => {}
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                if self.controller.is_pending() {
                    self.cancel_request();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('s') if ctrl => self.save_current(),
            KeyCode::Esc => {
                if self.viewing.is_some() {
                    self.viewing = None;
                    self.response_scroll = 0;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.show_help = true,
            KeyCode::F(2) => self.dark = !self.dark,
            KeyCode::F(3) => {
                self.docs = Some(DocsState {
                    language: Language::Python,
                    scroll: 0,
                })
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Input if !self.saved.is_empty() => Focus::Saved,
                    _ => Focus::Input,
                };
            }
            KeyCode::PageUp => {
                let step = self.response_viewport.max(1);
                self.response_scroll = self.response_scroll.saturating_sub(step);
            }
            KeyCode::PageDown => {
                let step = self.response_viewport.max(1);
                self.response_scroll = self.response_scroll.saturating_add(step);
            }
            _ => match self.focus {
                Focus::Input => self.on_input_key(key),
                Focus::Saved => self.on_saved_key(key),
            },
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.insert_text("\n");
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('a') if ctrl => self.move_cursor_line_start(),
            KeyCode::Char('e') if ctrl => self.move_cursor_line_end(),
            KeyCode::Home => self.move_cursor_line_start(),
            KeyCode::End => self.move_cursor_line_end(),
            KeyCode::Left if ctrl => self.move_cursor_word_left(),
            KeyCode::Right if ctrl => self.move_cursor_word_right(),
            KeyCode::Left => {
                self.input_cursor = self.input_cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let len = self.controller.content().graphemes(true).count();
                if self.input_cursor < len {
                    self.input_cursor += 1;
                }
            }
            KeyCode::Char('?') if self.controller.content().is_empty() => {
                self.show_help = true;
            }
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf));
            }
            _ => {}
        }
    }

    fn on_saved_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.saved_select_up(),
            KeyCode::Down => self.saved_select_down(),
            KeyCode::Enter => self.view_selected(),
            KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.delete_selected()
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roast_core::history::{HistoryRepository, DELETED, SAVED};
    use roast_core::submission::{SubmissionState, EMPTY_INPUT};
    use serde_json::json;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let mut cfg = RoastConfig::default();
        // nothing listens here; tests never let a worker finish
        cfg.base_url = "http://127.0.0.1:9".into();
        App::with_repository(cfg, JsonFileRepository::new(dir.path().join("savedRoasts.json")))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, ch: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    fn complete_with(app: &mut App, text: &str, body: serde_json::Value) {
        app.controller.set_content(text);
        let t = app.controller.begin().unwrap();
        app.controller.complete(&t, Ok(body));
    }

    #[test]
    fn enter_on_blank_input_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.insert_text("   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.state(), SubmissionState::Idle);
        let (n, _) = app.notice.clone().unwrap();
        assert_eq!(n, Notice::error(EMPTY_INPUT));
        assert!(app.worker_cancel.is_none());
    }

    #[test]
    fn typing_updates_controller() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for ch in "hi there".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        ctrl(&mut app, 'w');
        assert_eq!(app.controller.content(), "hi ");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.controller.content(), ">hi ");
    }

    #[test]
    fn ctrl_c_cancels_then_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.controller.set_content("hello");
        let t = app.controller.begin().unwrap();
        ctrl(&mut app, 'c');
        assert_eq!(app.controller.state(), SubmissionState::Idle);
        assert!(!app.should_quit);
        // the abandoned call reports back late and is ignored
        app.worker_tx.send((t, Ok(json!({"roasts": ["late"]})))).unwrap();
        app.on_tick();
        assert_eq!(app.controller.response(), None);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn finished_request_is_applied_on_tick() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.controller.set_content("hello");
        let t = app.controller.begin().unwrap();
        app.worker_tx.send((t, Ok(json!({"roasts": ["x"]})))).unwrap();
        app.on_tick();
        assert_eq!(app.controller.state(), SubmissionState::Succeeded);
        assert!(!app.notice.clone().unwrap().0.is_error());
    }

    #[test]
    fn notices_expire_on_tick() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        app.show_notice(Notice::success(SAVED));
        app.on_tick();
        assert!(app.notice.is_some());

        let shown_at = Instant::now()
            .checked_sub(NOTICE_TTL + Duration::from_millis(10))
            .unwrap();
        app.notice = Some((Notice::success(SAVED), shown_at));
        app.dirty = false;
        app.on_tick();
        assert!(app.notice.is_none());
        assert!(app.dirty);
    }

    #[test]
    fn save_then_delete_through_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        ctrl(&mut app, 's');
        assert_eq!(app.notice.clone().unwrap().0, Notice::error(NOTHING_TO_SAVE));

        complete_with(&mut app, "my code", json!({"roasts": ["ouch"]}));
        ctrl(&mut app, 's');
        assert_eq!(app.notice.clone().unwrap().0, Notice::success(SAVED));
        assert_eq!(app.saved.len(), 1);
        assert_eq!(app.saved.repository().load().unwrap().len(), 1);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Saved);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.viewing.as_deref(), Some(app.saved.entries()[0].id.as_str()));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.notice.clone().unwrap().0, Notice::success(DELETED));
        assert!(app.saved.is_empty());
        assert!(app.viewing.is_none());
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn docs_overlay_cycles_languages() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.docs.as_ref().map(|d| d.language), Some(Language::JavaScript));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.docs.as_ref().map(|d| d.language), Some(Language::Wget));
        press(&mut app, KeyCode::Esc);
        assert!(app.docs.is_none());
        assert!(!app.should_quit);
    }
}
