use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::trace;

/// Single-line editor for the search/filter command line.
///
/// Cursor positions are character offsets; edits translate them to byte
/// offsets so multi-byte input stays intact.
#[derive(Default)]
pub struct Inputter {
    buffer: String,
    cursor: usize,
    finished: bool,
    canceled: bool,
}

/// Snapshot of the editor handed to the model and the UI.
#[derive(Default, Clone, Debug)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub cursor: usize,
}

impl Inputter {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => self.finished = true,
            KeyCode::Esc => {
                self.buffer.clear();
                self.cursor = 0;
                self.canceled = true;
                self.finished = true;
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            code => {
                if let Some(chr) = code.as_char() {
                    self.buffer.insert(self.byte_pos(self.cursor), chr);
                    self.cursor += 1;
                }
            }
        }
        trace!("Input buffer: {:?}, cursor {}", self.buffer, self.cursor);
        self.snapshot()
    }

    pub fn snapshot(&self) -> InputResult {
        InputResult {
            input: self.buffer.clone(),
            finished: self.finished,
            canceled: self.canceled,
            cursor: self.cursor,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.finished = false;
        self.canceled = false;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let pos = self.byte_pos(self.cursor - 1);
            self.buffer.remove(pos);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let pos = self.byte_pos(self.cursor);
            self.buffer.remove(pos);
        }
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.buffer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyCode;

    fn press(inputter: &mut Inputter, code: KeyCode) -> InputResult {
        inputter.read(KeyEvent::from(code))
    }

    fn type_str(inputter: &mut Inputter, s: &str) {
        for c in s.chars() {
            press(inputter, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_and_submit() {
        let mut i = Inputter::default();
        type_str(&mut i, "mumbai");
        let result = press(&mut i, KeyCode::Enter);
        assert!(result.finished);
        assert!(!result.canceled);
        assert_eq!(result.input, "mumbai");
    }

    #[test]
    fn escape_cancels_and_clears() {
        let mut i = Inputter::default();
        type_str(&mut i, "abc");
        let result = press(&mut i, KeyCode::Esc);
        assert!(result.finished);
        assert!(result.canceled);
        assert_eq!(result.input, "");
    }

    #[test]
    fn backspace_respects_cursor() {
        let mut i = Inputter::default();
        type_str(&mut i, "abc");
        press(&mut i, KeyCode::Left);
        let result = press(&mut i, KeyCode::Backspace);
        assert_eq!(result.input, "ac");
        assert_eq!(result.cursor, 1);
    }

    #[test]
    fn insert_mid_string() {
        let mut i = Inputter::default();
        type_str(&mut i, "ac");
        press(&mut i, KeyCode::Left);
        let result = press(&mut i, KeyCode::Char('b'));
        assert_eq!(result.input, "abc");
    }

    #[test]
    fn multibyte_input_is_safe() {
        let mut i = Inputter::default();
        type_str(&mut i, "₹5L");
        press(&mut i, KeyCode::Home);
        press(&mut i, KeyCode::Delete);
        let result = press(&mut i, KeyCode::End);
        assert_eq!(result.input, "5L");
        assert_eq!(result.cursor, 2);
    }

    #[test]
    fn clear_resets_flags() {
        let mut i = Inputter::default();
        type_str(&mut i, "x");
        press(&mut i, KeyCode::Enter);
        i.clear();
        let snap = i.snapshot();
        assert!(!snap.finished);
        assert_eq!(snap.input, "");
    }
}
