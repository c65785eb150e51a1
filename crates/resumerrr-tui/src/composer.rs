//! Multi-line message entry.
//!
//! The draft text itself lives in the [`resumerrr_core::ChatSession`]; the
//! composer only tracks the cursor and the internal scroll offset, and knows
//! how the text wraps inside a box of a given width.

use unicode_width::UnicodeWidthChar;

/// The composer grows with its content up to this many rows, then scrolls
pub const MAX_ROWS: u16 = 6;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// One wrapped row of the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Char index of the first character of this row
    pub start: usize,
    pub len: usize,
    pub text: String,
}

/// Hard-wrap text into rows no wider than `width` columns.
///
/// A logical line that exactly fills its last row gets an empty continuation
/// row so a cursor at its end still has a cell to sit in.
pub fn wrap_rows(text: &str, width: usize) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row = Row { start: line_start, len: 0, text: String::new() };
        let mut row_width = 0;

        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if row_width + w > width && row.len > 0 {
                let next = row.start + row.len;
                rows.push(std::mem::replace(
                    &mut row,
                    Row { start: next, len: 0, text: String::new() },
                ));
                row_width = 0;
            }
            row.text.push(ch);
            row.len += 1;
            row_width += w;
        }

        if row_width >= width {
            let next = row.start + row.len;
            rows.push(std::mem::replace(
                &mut row,
                Row { start: next, len: 0, text: String::new() },
            ));
        }

        // Skip the newline itself
        line_start = row.start + row.len + 1;
        rows.push(row);
    }

    rows
}

#[derive(Debug, Default)]
pub struct Composer {
    cursor: usize,
    scroll: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Forget cursor and scroll, e.g. after the draft was cleared
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.scroll = 0;
    }

    fn clamp(&mut self, text: &str) {
        self.cursor = self.cursor.min(text.chars().count());
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) {
        self.clamp(text);
        let byte_pos = char_to_byte_index(text, self.cursor);
        text.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text, normalising line endings
    pub fn insert_str(&mut self, text: &mut String, pasted: &str) {
        let normalized = pasted.replace("\r\n", "\n").replace('\r', "\n");
        self.clamp(text);
        let byte_pos = char_to_byte_index(text, self.cursor);
        text.insert_str(byte_pos, &normalized);
        self.cursor += normalized.chars().count();
    }

    pub fn backspace(&mut self, text: &mut String) {
        self.clamp(text);
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(text, self.cursor);
            text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self, text: &mut String) {
        self.clamp(text);
        if self.cursor < text.chars().count() {
            let byte_pos = char_to_byte_index(text, self.cursor);
            text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, text: &str) {
        let char_count = text.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self, text: &str) {
        self.cursor = text.chars().count();
    }

    /// Rows needed to show `text` at `width`, capped at [`MAX_ROWS`]
    pub fn desired_height(text: &str, width: u16) -> u16 {
        let rows = u16::try_from(wrap_rows(text, width as usize).len()).unwrap_or(u16::MAX);
        rows.clamp(1, MAX_ROWS)
    }

    /// Row and column of the cursor within the wrapped rows
    fn cursor_position(&self, rows: &[Row]) -> (usize, usize) {
        let row_idx = rows
            .iter()
            .rposition(|r| r.start <= self.cursor)
            .unwrap_or(0);
        let col = rows
            .get(row_idx)
            .map(|row| {
                row.text
                    .chars()
                    .take(self.cursor.saturating_sub(row.start))
                    .map(|c| c.width().unwrap_or(0))
                    .sum::<usize>()
            })
            .unwrap_or(0);
        (row_idx, col)
    }

    /// Rows visible in a box of `width` x `height`, scrolled so the cursor
    /// stays in view. Returns the rows and the cursor offset inside the box.
    pub fn visible_rows(&mut self, text: &str, width: u16, height: u16) -> (Vec<String>, (u16, u16)) {
        self.clamp(text);
        let rows = wrap_rows(text, width as usize);
        let height = usize::from(height.max(1));
        let (cursor_row, cursor_col) = self.cursor_position(&rows);

        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + height {
            self.scroll = cursor_row + 1 - height;
        }
        self.scroll = self.scroll.min(rows.len().saturating_sub(height));

        let visible = rows
            .into_iter()
            .skip(self.scroll)
            .take(height)
            .map(|r| r.text)
            .collect();

        let col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
        let row = u16::try_from(cursor_row.saturating_sub(self.scroll)).unwrap_or(u16::MAX);
        (visible, (col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_utf8() {
        let mut text = String::new();
        let mut composer = Composer::new();
        for c in "héllo".chars() {
            composer.insert_char(&mut text, c);
        }
        composer.move_left();
        composer.backspace(&mut text);
        assert_eq!(text, "hélo");
        assert_eq!(composer.cursor(), 3);
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut text = String::from("ab");
        let mut composer = Composer::new();
        composer.move_right(&text);
        composer.insert_str(&mut text, "1\r\n2");
        assert_eq!(text, "a1\n2b");
        assert_eq!(composer.cursor(), 4);
    }

    #[test]
    fn test_cursor_clamped_after_external_clear() {
        let mut text = String::from("hello");
        let mut composer = Composer::new();
        composer.move_end(&text);
        text.clear();
        composer.insert_char(&mut text, 'x');
        assert_eq!(text, "x");
        assert_eq!(composer.cursor(), 1);
    }

    #[test]
    fn test_wrap_rows_splits_lines_and_width() {
        let rows = wrap_rows("abcdef\ngh", 4);
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "ef", "gh"]);
        assert_eq!(rows[2].start, 7);
    }

    #[test]
    fn test_full_row_gets_continuation() {
        let rows = wrap_rows("abcd", 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].start, 4);
        assert_eq!(rows[1].len, 0);
    }

    #[test]
    fn test_desired_height_grows_then_caps() {
        assert_eq!(Composer::desired_height("", 20), 1);
        assert_eq!(Composer::desired_height("one\ntwo\nthree", 20), 3);
        assert_eq!(Composer::desired_height(&"x".repeat(50), 20), 3);
        assert_eq!(Composer::desired_height(&"line\n".repeat(20), 20), MAX_ROWS);
    }

    #[test]
    fn test_huge_paste_keeps_height_capped() {
        let text = "\n".repeat(70_000);
        assert_eq!(Composer::desired_height(&text, 20), MAX_ROWS);

        let mut composer = Composer::new();
        composer.move_end(&text);
        let (rows, (_, row)) = composer.visible_rows(&text, 20, MAX_ROWS);
        assert_eq!(rows.len(), MAX_ROWS as usize);
        assert_eq!(row, MAX_ROWS - 1);
    }

    #[test]
    fn test_visible_rows_follow_cursor() {
        let text = "1\n2\n3\n4\n5\n6\n7\n8".to_string();
        let mut composer = Composer::new();
        composer.move_end(&text);

        let (rows, (col, row)) = composer.visible_rows(&text, 10, 3);
        assert_eq!(rows, vec!["6", "7", "8"]);
        assert_eq!((col, row), (1, 2));

        composer.move_home();
        let (rows, (col, row)) = composer.visible_rows(&text, 10, 3);
        assert_eq!(rows, vec!["1", "2", "3"]);
        assert_eq!((col, row), (0, 0));
    }
}
