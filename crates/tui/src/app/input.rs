use unicode_segmentation::UnicodeSegmentation;

use super::App;

// The controller owns the text; edits go through `set_content` so a finished
// result drops back to Idle as soon as the user changes the input.
impl App {
    fn edit_input(&mut self, f: impl FnOnce(&mut Vec<String>, &mut usize)) {
        let current = self.controller.content().to_string();
        let mut parts: Vec<String> = current.graphemes(true).map(str::to_string).collect();
        let mut cursor = self.input_cursor.min(parts.len());
        f(&mut parts, &mut cursor);
        let next = parts.concat();
        self.input_cursor = cursor.min(next.graphemes(true).count());
        if next != current {
            self.controller.set_content(next);
        }
    }

    fn input_graphemes(&self) -> Vec<&str> {
        self.controller.content().graphemes(true).collect()
    }

    pub fn insert_text(&mut self, s: &str) {
        self.edit_input(|parts, cursor| {
            let added: Vec<String> = s.graphemes(true).map(str::to_string).collect();
            let n = added.len();
            parts.splice(*cursor..*cursor, added);
            *cursor += n;
        });
    }

    pub fn delete_left_grapheme(&mut self) {
        self.edit_input(|parts, cursor| {
            if *cursor > 0 {
                parts.remove(*cursor - 1);
                *cursor -= 1;
            }
        });
    }

    pub fn delete_right_grapheme(&mut self) {
        self.edit_input(|parts, cursor| {
            if *cursor < parts.len() {
                parts.remove(*cursor);
            }
        });
    }

    pub fn delete_prev_word(&mut self) {
        self.edit_input(|parts, cursor| {
            let start = word_start(parts.as_slice(), *cursor);
            parts.drain(start..*cursor);
            *cursor = start;
        });
    }

    pub fn move_cursor_line_start(&mut self) {
        let parts = self.input_graphemes();
        let mut i = self.input_cursor.min(parts.len());
        while i > 0 && parts[i - 1] != "\n" {
            i -= 1;
        }
        self.input_cursor = i;
    }

    pub fn move_cursor_line_end(&mut self) {
        let parts = self.input_graphemes();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i] != "\n" {
            i += 1;
        }
        self.input_cursor = i;
    }

    pub fn move_cursor_word_left(&mut self) {
        let parts = self.input_graphemes();
        self.input_cursor = word_start(&parts, self.input_cursor.min(parts.len()));
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts = self.input_graphemes();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.input_cursor = i;
    }
}

fn word_start<S: AsRef<str>>(parts: &[S], from: usize) -> usize {
    let mut i = from;
    while i > 0 && parts[i - 1].as_ref().trim().is_empty() {
        i -= 1;
    }
    while i > 0 && !parts[i - 1].as_ref().trim().is_empty() {
        i -= 1;
    }
    i
}
