use ropey::Rope;
use std::cmp;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// One editing pane. Each source kind gets its own instance; cursor,
/// viewport and undo history are per-pane state and survive pane switches.
#[derive(Clone)]
pub struct Editor {
    rope: Rope,
    cursor_line: usize,
    cursor_col: usize, // char offset within the line, newline excluded
    viewport_offset: usize,
    viewport_height: usize,
    history: Vec<Snapshot>,
    history_index: usize,
    tab_size: usize,
    use_spaces: bool,
}

#[derive(Clone)]
struct Snapshot {
    content: String,
    cursor_line: usize,
    cursor_col: usize,
}

const HISTORY_LIMIT: usize = 100;

impl Editor {
    pub fn new() -> Self {
        Self::with_content(String::new())
    }

    pub fn with_content(content: String) -> Self {
        let snapshot = Snapshot {
            content: content.clone(),
            cursor_line: 0,
            cursor_col: 0,
        };
        Self {
            rope: Rope::from_str(&content),
            cursor_line: 0,
            cursor_col: 0,
            viewport_offset: 0,
            viewport_height: 24, // Updated on every draw
            history: vec![snapshot],
            history_index: 0,
            tab_size: 4,
            use_spaces: true,
        }
    }

    pub fn set_content(&mut self, content: String) {
        self.rope = Rope::from_str(&content);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.viewport_offset = 0;
        self.history = vec![Snapshot {
            content,
            cursor_line: 0,
            cursor_col: 0,
        }];
        self.history_index = 0;
    }

    pub fn get_content(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    /// Terminal column of the cursor, accounting for wide characters.
    pub fn cursor_display_col(&self) -> usize {
        let line = self.current_line();
        let prefix: String = line.chars().take(self.cursor_col).collect();
        UnicodeWidthStr::width(prefix.as_str())
    }

    pub fn set_tab_config(&mut self, tab_size: usize, use_spaces: bool) {
        self.tab_size = tab_size;
        self.use_spaces = use_spaces;
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    pub fn viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    pub fn viewport_lines(&self) -> Vec<String> {
        let end = cmp::min(
            self.viewport_offset + self.viewport_height,
            self.rope.len_lines(),
        );
        (self.viewport_offset..end)
            .filter_map(|i| self.rope.get_line(i).map(|l| l.to_string()))
            .collect()
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.char_index();
        self.rope.insert_char(idx, c);
        self.cursor_col += 1;
        self.save_state();
    }

    pub fn insert_newline(&mut self) {
        let idx = self.char_index();
        self.rope.insert_char(idx, '\n');
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.adjust_viewport();
        self.save_state();
    }

    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            for _ in 0..self.tab_size {
                self.insert_char(' ');
            }
        } else {
            self.insert_char('\t');
        }
    }

    pub fn delete_backward(&mut self) {
        if self.cursor_col > 0 {
            // Remove the whole grapheme before the cursor.
            let start = self.prev_grapheme_boundary();
            let line_start = self.rope.line_to_char(self.cursor_line);
            self.rope
                .remove(line_start + start..line_start + self.cursor_col);
            self.cursor_col = start;
            self.save_state();
        } else if self.cursor_line > 0 {
            // Join with the previous line.
            let newline_idx = self.rope.line_to_char(self.cursor_line) - 1;
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.rope.remove(newline_idx..newline_idx + 1);
            self.adjust_viewport();
            self.save_state();
        }
    }

    pub fn delete_forward(&mut self) {
        let idx = self.char_index();
        if idx < self.rope.len_chars() {
            let end = if self.cursor_col < self.line_len(self.cursor_line) {
                let line_start = self.rope.line_to_char(self.cursor_line);
                line_start + self.next_grapheme_boundary()
            } else {
                idx + 1 // the newline
            };
            self.rope.remove(idx..end);
            self.save_state();
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_col();
            self.adjust_viewport();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.clamp_col();
            self.adjust_viewport();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col = self.prev_grapheme_boundary();
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.adjust_viewport();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col = self.next_grapheme_boundary();
        } else if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.adjust_viewport();
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn page_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(self.viewport_height);
        self.viewport_offset = self.viewport_offset.saturating_sub(self.viewport_height);
        self.clamp_col();
    }

    pub fn page_down(&mut self) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = cmp::min(self.cursor_line + self.viewport_height, max_line);
        self.viewport_offset = cmp::min(
            self.viewport_offset + self.viewport_height,
            max_line.saturating_sub(self.viewport_height.saturating_sub(1)),
        );
        self.clamp_col();
    }

    pub fn undo(&mut self) -> bool {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.restore(self.history_index);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history_index + 1 < self.history.len() {
            self.history_index += 1;
            self.restore(self.history_index);
            true
        } else {
            false
        }
    }

    fn restore(&mut self, index: usize) {
        let snapshot = &self.history[index];
        self.rope = Rope::from_str(&snapshot.content);
        self.cursor_line = snapshot.cursor_line;
        self.cursor_col = snapshot.cursor_col;
        self.clamp_col();
        self.adjust_viewport();
    }

    fn save_state(&mut self) {
        let current = Snapshot {
            content: self.rope.to_string(),
            cursor_line: self.cursor_line,
            cursor_col: self.cursor_col,
        };
        if let Some(last) = self.history.get(self.history_index) {
            if last.content == current.content {
                return;
            }
        }
        self.history.truncate(self.history_index + 1);
        self.history.push(current);
        self.history_index += 1;
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }

    fn current_line(&self) -> String {
        self.rope
            .get_line(self.cursor_line)
            .map(|l| l.to_string())
            .unwrap_or_default()
    }

    /// Length of a line in chars, trailing newline excluded.
    fn line_len(&self, line: usize) -> usize {
        match self.rope.get_line(line) {
            Some(l) => {
                let len = l.len_chars();
                if len > 0 && l.char(len - 1) == '\n' {
                    len - 1
                } else {
                    len
                }
            }
            None => 0,
        }
    }

    fn char_index(&self) -> usize {
        self.rope.line_to_char(self.cursor_line) + self.cursor_col
    }

    /// Char offset of the grapheme boundary before the cursor column.
    fn prev_grapheme_boundary(&self) -> usize {
        let line = self.current_line();
        let mut prev = 0;
        let mut chars_seen = 0;
        for g in line.graphemes(true) {
            let next = chars_seen + g.chars().count();
            if next >= self.cursor_col {
                return prev;
            }
            prev = next;
            chars_seen = next;
        }
        prev
    }

    /// Char offset of the grapheme boundary after the cursor column.
    fn next_grapheme_boundary(&self) -> usize {
        let line = self.current_line();
        let limit = self.line_len(self.cursor_line);
        let mut chars_seen = 0;
        for g in line.graphemes(true) {
            let next = chars_seen + g.chars().count();
            if chars_seen >= self.cursor_col {
                return cmp::min(next, limit);
            }
            chars_seen = next;
        }
        limit
    }

    fn clamp_col(&mut self) {
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    fn adjust_viewport(&mut self) {
        if self.cursor_line < self.viewport_offset {
            self.viewport_offset = self.cursor_line;
        } else if self.cursor_line >= self.viewport_offset + self.viewport_height {
            self.viewport_offset = self.cursor_line - (self.viewport_height - 1);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
