/// A location in the source of a single submission.
///
/// Lines and columns both start at 1. Columns count characters, not bytes,
/// so positions stay meaningful for non-ASCII input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// The source line.
    pub line:   usize,
    /// The column within the line.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and a column.
    ///
    /// ## Example
    /// ```
    /// use sprig::util::position::Position;
    ///
    /// let position = Position::new(3, 7);
    /// assert_eq!(position.to_string(), "line 3, column 7");
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Maps byte offsets of a source string to [`Position`]s.
///
/// The index records the byte offset at which every line starts; a lookup is
/// a binary search followed by a character count within the line.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    source:      &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    /// Builds the index for `source`.
    #[must_use]
    pub fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0).chain(source.match_indices('\n')
                                                         .map(|(offset, _)| offset + 1))
                                            .collect();

        Self { source,
               line_starts }
    }

    /// Returns the position of the byte at `offset`.
    ///
    /// Offsets past the end of the source map to the position just after the
    /// last character.
    ///
    /// ## Example
    /// ```
    /// use sprig::util::position::{LineIndex, Position};
    ///
    /// let index = LineIndex::new("let a = 1\nprint a");
    ///
    /// assert_eq!(index.position(0), Position::new(1, 1));
    /// assert_eq!(index.position(16), Position::new(2, 7));
    /// ```
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.source
                         .get(start..offset)
                         .map_or(offset - start, |text| text.chars().count());

        Position::new(line + 1, column + 1)
    }

    /// Returns the position just past the last character of the source.
    #[must_use]
    pub fn end(&self) -> Position {
        self.position(self.source.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_character_is_line_one_column_one() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(0), Position::new(1, 1));
        assert_eq!(index.position(2), Position::new(1, 3));
    }

    #[test]
    fn offsets_after_newlines_start_new_lines() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.position(2), Position::new(2, 1));
        assert_eq!(index.position(3), Position::new(2, 2));
        assert_eq!(index.position(5), Position::new(3, 1));
        assert_eq!(index.position(6), Position::new(4, 1));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let index = LineIndex::new("\"héllo\" x");
        assert_eq!(index.position("\"héllo\" ".len()), Position::new(1, 9));
    }

    #[test]
    fn end_points_past_the_last_character() {
        assert_eq!(LineIndex::new("1 +").end(), Position::new(1, 4));
        assert_eq!(LineIndex::new("").end(), Position::new(1, 1));
        assert_eq!(LineIndex::new("x\n").end(), Position::new(2, 1));
    }
}
