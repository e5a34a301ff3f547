//! Pipeline state and the body-loop state machine.
//!
//! [`PipelineState`] is the only mutable record of a run. Setup stages fill
//! in `world`, `locations`, `characters` and `chapter_outline`; the body
//! loop folds each generated paragraph in through
//! [`PipelineState::apply_paragraph`], which needs no remote call and is
//! tested on its own.

use crate::{Markers, strip_markers};
use derive_getters::Getters;

/// Separator between paragraphs in the assembled book.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Where the body loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BookProgress {
    /// Still writing; `paragraph` counts paragraphs already in `chapter`
    #[display("chapter {}, paragraph {}", chapter, paragraph)]
    InProgress {
        /// Current chapter, starting at 1
        chapter: u32,
        /// Paragraphs written in the current chapter
        paragraph: u32,
    },
    /// The book-end marker has been seen
    #[display("complete")]
    Complete,
}

/// Effect of one generated paragraph on the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Transition {
    /// Paragraph continues the current chapter
    #[display("paragraph")]
    Paragraph,
    /// Paragraph closes the current chapter
    #[display("chapter end")]
    ChapterEnd,
    /// Paragraph closes the book
    #[display("book end")]
    BookEnd,
}

/// Accumulated output of every stage.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PipelineState {
    /// World description
    pub(crate) world: String,
    /// Notable locations
    pub(crate) locations: String,
    /// Main characters
    pub(crate) characters: String,
    /// Chapter-by-chapter outline, used only as prompt context
    pub(crate) chapter_outline: String,
    /// Clean paragraphs in order; only ever appended to
    book_content: Vec<String>,
    /// Running summary of the book so far
    pub(crate) summary: String,
    /// Current chapter, starting at 1
    current_chapter: u32,
    /// Paragraphs written in the current chapter
    paragraph_count_in_chapter: u32,
    /// Set once the book-end marker is seen; never cleared
    book_complete: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    /// Fresh state: nothing generated, chapter 1, paragraph 0.
    pub fn new() -> Self {
        Self {
            world: String::new(),
            locations: String::new(),
            characters: String::new(),
            chapter_outline: String::new(),
            book_content: Vec::new(),
            summary: String::new(),
            current_chapter: 1,
            paragraph_count_in_chapter: 0,
            book_complete: false,
        }
    }

    /// True once the book-end marker has been seen.
    pub fn is_complete(&self) -> bool {
        self.book_complete
    }

    /// Current position of the state machine.
    pub fn progress(&self) -> BookProgress {
        if self.book_complete {
            BookProgress::Complete
        } else {
            BookProgress::InProgress {
                chapter: self.current_chapter,
                paragraph: self.paragraph_count_in_chapter,
            }
        }
    }

    /// Fold one generated paragraph into the state.
    ///
    /// Markers are stripped and the clean paragraph appended (a paragraph
    /// that was nothing but markers appends nothing). Then:
    /// - book-end marker: the book is complete
    /// - chapter-end marker: next chapter, paragraph count back to 0
    /// - neither: paragraph count increments
    ///
    /// Once the book is complete further calls change nothing and report
    /// [`Transition::BookEnd`].
    ///
    /// ```
    /// use fabula_narrative::{BookProgress, PipelineState, Transition};
    ///
    /// let mut state = PipelineState::new();
    /// assert_eq!(state.apply_paragraph("The caravan set out."), Transition::Paragraph);
    /// assert_eq!(
    ///     state.apply_paragraph("Night fell. END OF THE CHAPTER"),
    ///     Transition::ChapterEnd
    /// );
    /// assert_eq!(state.progress(), BookProgress::InProgress { chapter: 2, paragraph: 0 });
    /// ```
    pub fn apply_paragraph(&mut self, raw: &str) -> Transition {
        if self.book_complete {
            tracing::debug!("Ignoring paragraph after book completion");
            return Transition::BookEnd;
        }

        let markers = Markers::detect(raw);
        let paragraph = strip_markers(raw);
        if !paragraph.is_empty() {
            self.book_content.push(paragraph);
        }

        if markers.book_end {
            self.book_complete = true;
            Transition::BookEnd
        } else if markers.chapter_end {
            self.current_chapter += 1;
            self.paragraph_count_in_chapter = 0;
            Transition::ChapterEnd
        } else {
            self.paragraph_count_in_chapter += 1;
            Transition::Paragraph
        }
    }

    /// The book so far, paragraphs separated by a blank line.
    pub fn book_text(&self) -> String {
        self.book_content.join(PARAGRAPH_SEPARATOR)
    }

    /// Most recent paragraph, if any.
    pub fn last_paragraph(&self) -> Option<&str> {
        self.book_content.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = PipelineState::new();
        assert_eq!(
            state.progress(),
            BookProgress::InProgress {
                chapter: 1,
                paragraph: 0
            }
        );
        assert!(state.book_content().is_empty());
        assert!(!state.is_complete());
    }

    #[test]
    fn test_plain_paragraph_increments_count() {
        let mut state = PipelineState::new();
        state.apply_paragraph("One.");
        state.apply_paragraph("Two.");
        assert_eq!(*state.paragraph_count_in_chapter(), 2);
        assert_eq!(*state.current_chapter(), 1);
    }

    #[test]
    fn test_chapter_marker_advances_chapter_once() {
        let mut state = PipelineState::new();
        state.apply_paragraph("One.");
        let transition = state.apply_paragraph("Two. END OF THE CHAPTER");

        assert_eq!(transition, Transition::ChapterEnd);
        assert_eq!(*state.current_chapter(), 2);
        assert_eq!(*state.paragraph_count_in_chapter(), 0);
        assert_eq!(state.book_content(), &vec!["One.".to_string(), "Two.".to_string()]);
    }

    #[test]
    fn test_book_marker_takes_precedence() {
        let mut state = PipelineState::new();
        let transition = state.apply_paragraph("Done. END OF THE CHAPTER END OF THE BOOK");

        assert_eq!(transition, Transition::BookEnd);
        assert!(state.is_complete());
        assert_eq!(*state.current_chapter(), 1);
        assert_eq!(state.progress(), BookProgress::Complete);
        assert_eq!(state.last_paragraph(), Some("Done."));
    }

    #[test]
    fn test_marker_only_paragraph_appends_nothing() {
        let mut state = PipelineState::new();
        state.apply_paragraph("Real text.");
        state.apply_paragraph("END OF THE CHAPTER");

        assert_eq!(state.book_content().len(), 1);
        assert_eq!(*state.current_chapter(), 2);
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut state = PipelineState::new();
        state.apply_paragraph("Fin. END OF THE BOOK");
        let transition = state.apply_paragraph("An epilogue nobody asked for.");

        assert_eq!(transition, Transition::BookEnd);
        assert!(state.is_complete());
        assert_eq!(state.book_content().len(), 1);
    }

    #[test]
    fn test_book_text_joins_with_blank_line() {
        let mut state = PipelineState::new();
        state.apply_paragraph("First.");
        state.apply_paragraph("Second.");
        assert_eq!(state.book_text(), "First.\n\nSecond.");
    }
}
