//! Line index for converting byte offsets to row/column positions.

use super::Position;
use text_size::TextSize;

/// Maps byte offsets in a source text to 0-indexed row/column positions.
///
/// Columns are counted in characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::new((offset + 1) as u32));
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset into a row/column position
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        let start = u32::from(self.line_starts[row]) as usize;
        let end = (u32::from(offset) as usize).min(text.len());
        let column = text.get(start..end).map(|s| s.chars().count()).unwrap_or(0);
        Position::new(row as i32, column as i32)
    }
}
