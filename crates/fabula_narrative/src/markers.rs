//! Completion markers embedded in generated paragraphs.
//!
//! The service signals structure in free text: a paragraph that closes a
//! chapter ends with [`CHAPTER_END_MARKER`], one that closes the book ends
//! with [`BOOK_END_MARKER`]. Markers are literal and case-sensitive.

/// Sentinel closing a chapter.
pub const CHAPTER_END_MARKER: &str = "END OF THE CHAPTER";

/// Sentinel closing the whole book.
pub const BOOK_END_MARKER: &str = "END OF THE BOOK";

/// Markers found in a generated paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Markers {
    /// Paragraph closes its chapter
    pub chapter_end: bool,
    /// Paragraph closes the book
    pub book_end: bool,
}

impl Markers {
    /// Scan `text` for both markers.
    ///
    /// ```
    /// use fabula_narrative::Markers;
    ///
    /// let found = Markers::detect("...onward. END OF THE BOOK");
    /// assert!(found.book_end);
    /// assert!(!found.chapter_end);
    /// ```
    pub fn detect(text: &str) -> Self {
        Self {
            chapter_end: text.contains(CHAPTER_END_MARKER),
            book_end: text.contains(BOOK_END_MARKER),
        }
    }
}

/// Remove every marker occurrence and the whitespace it leaves behind.
///
/// Removal repeats until no marker remains, so the result never contains
/// either marker and stripping is idempotent. Runs of spaces and tabs
/// inside a line collapse to one space, line edges are trimmed, and
/// surrounding blank lines are dropped.
///
/// ```
/// use fabula_narrative::strip_markers;
///
/// assert_eq!(
///     strip_markers("They rode on.\nEND OF THE CHAPTER\nEND OF THE BOOK"),
///     "They rode on."
/// );
/// ```
pub fn strip_markers(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = current
            .replace(CHAPTER_END_MARKER, "")
            .replace(BOOK_END_MARKER, "");
        if next == current {
            break;
        }
        current = next;
    }

    tidy_whitespace(&current)
}

fn tidy_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.split([' ', '\t'])
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
