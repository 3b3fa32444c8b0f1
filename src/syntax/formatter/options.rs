//! Formatting options

/// Options for printing documents back to source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line width before a section's arguments move onto `. ` items
    pub print_width: usize,
    /// Blank lines between top-level groups (at least one is always written)
    pub blank_lines_between_groups: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            blank_lines_between_groups: 1,
        }
    }
}

impl FormatOptions {
    /// Generate indentation string for the given column
    pub fn indent(&self, column: usize) -> String {
        " ".repeat(column)
    }

    /// Separator written between two top-level groups
    pub fn group_separator(&self) -> String {
        "\n".repeat(self.blank_lines_between_groups.max(1) + 1)
    }
}
