//! Prompt builders for each pipeline stage.
//!
//! Setup prompts embed the full text of every earlier stage verbatim.
//! The paragraph prompt embeds either the whole book or the running summary
//! plus the previous paragraph, depending on [`ContextMode`].

use crate::{BOOK_END_MARKER, CHAPTER_END_MARKER, ContextMode, PipelineSettings, PipelineState};

/// Stage 1: world from keywords.
pub fn world_prompt(keywords: &str, chapter_count: u32) -> String {
    format!(
        "You are a novelist planning a book of {chapter_count} chapters.\n\
         Invent the world the story takes place in, inspired by these keywords: {keywords}.\n\
         Describe its geography, history, cultures, technology or magic, and the \
         central tension that will drive the plot. Write in prose, without headings."
    )
}

/// Stage 2: locations from the world.
pub fn locations_prompt(world: &str) -> String {
    format!(
        "Here is the world of a novel:\n\n{world}\n\n\
         Describe the key locations where the story will unfold. For each, give its \
         name, its look and atmosphere, and why it matters to the story."
    )
}

/// Stage 3: characters from world and locations.
pub fn characters_prompt(world: &str, locations: &str) -> String {
    format!(
        "Here is the world of a novel:\n\n{world}\n\n\
         Here are its key locations:\n\n{locations}\n\n\
         Create the main characters. For each, give a name, appearance, personality, \
         motivation, and relationships to the other characters."
    )
}

/// Stage 4: chapter outline from everything so far.
pub fn outline_prompt(
    world: &str,
    locations: &str,
    characters: &str,
    chapter_count: u32,
) -> String {
    format!(
        "Here is the world of a novel:\n\n{world}\n\n\
         Here are its key locations:\n\n{locations}\n\n\
         Here are its main characters:\n\n{characters}\n\n\
         Write a chapter-by-chapter outline for a book of exactly {chapter_count} chapters. \
         For each chapter give a title and a short synopsis of its events."
    )
}

/// Stage 5: the next paragraph of the book.
pub fn paragraph_prompt(state: &PipelineState, settings: &PipelineSettings) -> String {
    let mut prompt = format!(
        "You are writing a novel one paragraph at a time.\n\n\
         World:\n\n{}\n\n\
         Locations:\n\n{}\n\n\
         Characters:\n\n{}\n\n\
         Chapter outline:\n\n{}\n\n",
        state.world(),
        state.locations(),
        state.characters(),
        state.chapter_outline(),
    );

    match settings.context_mode() {
        ContextMode::Full => {
            if state.book_content().is_empty() {
                prompt.push_str("Nothing has been written yet.\n\n");
            } else {
                prompt.push_str(&format!("The book so far:\n\n{}\n\n", state.book_text()));
            }
        }
        ContextMode::Summary => match state.last_paragraph() {
            None => prompt.push_str("Nothing has been written yet.\n\n"),
            Some(previous) => {
                prompt.push_str(&format!(
                    "Summary of the story so far:\n\n{}\n\n\
                     The previous paragraph:\n\n{}\n\n",
                    state.summary(),
                    previous
                ));
            }
        },
    }

    prompt.push_str(&format!(
        "You are in chapter {} of {}. {} paragraph(s) of this chapter have been written.\n",
        state.current_chapter(),
        settings.chapter_count(),
        state.paragraph_count_in_chapter(),
    ));
    if let Some(budget) = settings.paragraphs_per_chapter() {
        prompt.push_str(&format!("Aim for about {budget} paragraphs per chapter.\n"));
    }

    prompt.push_str(&format!(
        "\nWrite the next paragraph, following the outline. Output only the paragraph.\n\
         If this paragraph concludes the current chapter, end it with the exact text \
         \"{CHAPTER_END_MARKER}\".\n\
         If this paragraph concludes the entire book, end it with the exact text \
         \"{BOOK_END_MARKER}\"."
    ));
    prompt
}

/// Summary of the book so far, used to keep later prompts bounded.
pub fn summary_prompt(book_text: &str) -> String {
    format!(
        "Summarize the following novel-in-progress in a few paragraphs. Keep every \
         plot point, character development and open thread a writer would need to \
         continue the story consistently.\n\n{book_text}"
    )
}
