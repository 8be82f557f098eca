//! Editable text field state
//!
//! The text itself lives in `FormState`; a `TextInput` only owns the cursor
//! (a char index) and edits whatever buffer it is handed. Multi-line inputs
//! accept Enter as a newline and are laid out with hard character wrapping,
//! so the cursor position can be computed exactly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// Result of offering a key to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed
    Yes,
    /// Event was not handled, should bubble up
    No,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    cursor: usize,
    multiline: bool,
}

/// Byte offset of the `index`-th char (or the end of the buffer)
fn byte_offset(buf: &str, index: usize) -> usize {
    buf.char_indices()
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(buf.len())
}

impl TextInput {
    pub fn single_line() -> Self {
        Self::default()
    }

    pub fn multi_line() -> Self {
        Self {
            cursor: 0,
            multiline: true,
        }
    }

    /// Cursor position as a char index
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_to_end(&mut self, buf: &str) {
        self.cursor = buf.chars().count();
    }

    /// Insert pasted text at the cursor
    ///
    /// Single-line inputs drop line breaks, so a URL wrapped by the copy
    /// source pastes back whole.
    pub fn insert_str(&mut self, buf: &mut String, text: &str) {
        let text: String = if self.multiline {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.chars().filter(|&c| c != '\n' && c != '\r').collect()
        };
        let at = byte_offset(buf, self.cursor);
        buf.insert_str(at, &text);
        self.cursor += text.chars().count();
    }

    /// Apply an editing key to `buf`
    pub fn handle_key(&mut self, buf: &mut String, key: KeyEvent) -> Handled {
        let len = buf.chars().count();
        self.cursor = self.cursor.min(len);

        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Handled::No;
        }

        match key.code {
            KeyCode::Char(c) => {
                let at = byte_offset(buf, self.cursor);
                buf.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Enter if self.multiline => {
                let at = byte_offset(buf, self.cursor);
                buf.insert(at, '\n');
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = byte_offset(buf, self.cursor);
                    buf.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < len {
                    let at = byte_offset(buf, self.cursor);
                    buf.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            _ => return Handled::No,
        }
        Handled::Yes
    }
}

/// Split `text` into display rows of at most `width` columns
///
/// Newlines start a new row; long rows break at any character.
pub fn visual_rows(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut row_width = 0;

    for ch in text.chars() {
        if ch == '\n' {
            rows.push(String::new());
            row_width = 0;
            continue;
        }
        let ch_width = ch.width().unwrap_or(0);
        if row_width + ch_width > width && row_width > 0 {
            rows.push(String::new());
            row_width = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        row_width += ch_width;
    }

    rows
}

/// (row, column) of the cursor within [`visual_rows`] output
pub fn cursor_position(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let mut row = 0;
    let mut col = 0;

    for ch in text.chars().take(cursor) {
        if ch == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        let ch_width = ch.width().unwrap_or(0);
        if col + ch_width > width && col > 0 {
            row += 1;
            col = 0;
        }
        col += ch_width;
    }

    // Cursor after a full row sits at the start of the next one
    if col >= width {
        (row + 1, 0)
    } else {
        (row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, buf: &mut String, s: &str) {
        for c in s.chars() {
            input.handle_key(buf, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = TextInput::single_line();
        let mut buf = String::new();
        type_str(&mut input, &mut buf, "helo");

        input.handle_key(&mut buf, key(KeyCode::Left));
        type_str(&mut input, &mut buf, "l");
        assert_eq!(buf, "hello");

        input.handle_key(&mut buf, key(KeyCode::Home));
        input.handle_key(&mut buf, key(KeyCode::Delete));
        assert_eq!(buf, "ello");

        input.handle_key(&mut buf, key(KeyCode::End));
        input.handle_key(&mut buf, key(KeyCode::Backspace));
        assert_eq!(buf, "ell");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = TextInput::single_line();
        let mut buf = String::new();
        type_str(&mut input, &mut buf, "héllo");
        input.handle_key(&mut buf, key(KeyCode::Home));
        input.handle_key(&mut buf, key(KeyCode::Right));
        input.handle_key(&mut buf, key(KeyCode::Delete));
        assert_eq!(buf, "hllo");
    }

    #[test]
    fn test_enter_only_in_multiline() {
        let mut single = TextInput::single_line();
        let mut buf = String::from("a");
        single.move_to_end(&buf);
        assert_eq!(single.handle_key(&mut buf, key(KeyCode::Enter)), Handled::No);

        let mut multi = TextInput::multi_line();
        multi.move_to_end(&buf);
        assert_eq!(multi.handle_key(&mut buf, key(KeyCode::Enter)), Handled::Yes);
        assert_eq!(buf, "a\n");
    }

    #[test]
    fn test_control_keys_bubble_up() {
        let mut input = TextInput::single_line();
        let mut buf = String::new();
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(input.handle_key(&mut buf, ctrl_s), Handled::No);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_paste_into_single_line_drops_line_breaks() {
        let mut input = TextInput::single_line();
        let mut buf = String::new();
        input.insert_str(&mut buf, "https://x.dev/\r\ncv.pdf\n");
        assert_eq!(buf, "https://x.dev/cv.pdf");
        assert_eq!(input.cursor(), buf.chars().count());
    }

    #[test]
    fn test_visual_rows_and_cursor() {
        let text = "abcdef\ngh";
        assert_eq!(visual_rows(text, 4), vec!["abcd", "ef", "gh"]);
        assert_eq!(cursor_position(text, 0, 4), (0, 0));
        assert_eq!(cursor_position(text, 4, 4), (1, 0));
        assert_eq!(cursor_position(text, 5, 4), (1, 1));
        assert_eq!(cursor_position(text, 9, 4), (2, 2));
    }
}
