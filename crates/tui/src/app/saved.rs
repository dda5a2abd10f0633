use roast_core::history::SavedEntry;
use roast_core::notice::Notice;
use tracing::error;

use crate::strings::SAVE_FAILED;

use super::{App, Focus};

impl App {
    pub fn saved_select_up(&mut self) {
        self.saved_selected = self.saved_selected.saturating_sub(1);
    }

    pub fn saved_select_down(&mut self) {
        if self.saved_selected + 1 < self.saved.len() {
            self.saved_selected += 1;
        }
    }

    pub fn selected_entry(&self) -> Option<&SavedEntry> {
        self.saved.entries().get(self.saved_selected)
    }

    pub fn viewed_entry(&self) -> Option<&SavedEntry> {
        self.viewing.as_deref().and_then(|id| self.saved.get(id))
    }

    pub fn view_selected(&mut self) {
        if let Some(id) = self.selected_entry().map(|e| e.id.clone()) {
            self.viewing = Some(id);
            self.response_scroll = 0;
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_entry().map(|e| e.id.clone()) else {
            return;
        };
        match self.saved.delete(&id) {
            Ok(n) => self.show_notice(n),
            Err(e) => {
                error!(target: "tui", "delete failed: {}", e);
                self.show_notice(Notice::error(SAVE_FAILED));
                return;
            }
        }
        if self.viewing.as_deref() == Some(id.as_str()) {
            self.viewing = None;
        }
        if self.saved.is_empty() {
            self.saved_selected = 0;
            self.focus = Focus::Input;
        } else {
            self.saved_selected = self.saved_selected.min(self.saved.len() - 1);
        }
    }
}
