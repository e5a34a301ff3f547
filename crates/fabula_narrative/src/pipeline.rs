//! Narrative pipeline controller.
//!
//! Runs five dependent stages strictly in order: world, locations,
//! characters, outline, then the paragraph loop. Every prompt is built from
//! the committed output of the stages before it, so nothing here runs
//! concurrently.

use crate::prompts::{
    characters_prompt, locations_prompt, outline_prompt, paragraph_prompt, summary_prompt,
    world_prompt,
};
use crate::{PipelineSettings, PipelineState, Transition};
use fabula_error::{FabulaResult, NarrativeError, NarrativeErrorKind};
use fabula_interface::{ContentStore, TextGenerator};
use fabula_retry::ResilientCaller;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Storage keys written by the pipeline.
pub mod keys {
    /// World description
    pub const WORLD: &str = "world";
    /// Locations
    pub const LOCATIONS: &str = "locations";
    /// Characters
    pub const CHARACTERS: &str = "characters";
    /// Chapter outline
    pub const OUTLINE: &str = "outline";
    /// Book text so far
    pub const BOOK: &str = "book";
}

/// Drives a [`ResilientCaller`] through every stage of book generation.
///
/// # Example
///
/// ```rust,ignore
/// use fabula_narrative::{NarrativePipeline, PipelineSettingsBuilder};
/// use fabula_retry::{ResilientCaller, RetryPolicy};
///
/// let settings = PipelineSettingsBuilder::default()
///     .keywords("desert, exile, prophecy")
///     .chapter_count(3u32)
///     .build()?;
/// let pipeline = NarrativePipeline::new(ResilientCaller::new(client, RetryPolicy::default()), settings);
/// let state = pipeline.run().await?;
/// println!("{}", state.book_text());
/// ```
pub struct NarrativePipeline<G: TextGenerator> {
    caller: ResilientCaller<G>,
    settings: PipelineSettings,
    store: Option<Arc<dyn ContentStore>>,
    cancel: Option<watch::Receiver<bool>>,
}

impl<G: TextGenerator> NarrativePipeline<G> {
    /// Create a pipeline without persistence or cancellation.
    pub fn new(caller: ResilientCaller<G>, settings: PipelineSettings) -> Self {
        Self {
            caller,
            settings,
            store: None,
            cancel: None,
        }
    }

    /// Persist stage outputs and book progress to `store`.
    ///
    /// Store failures are logged and never abort the run.
    pub fn with_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Stop the body loop once `cancel` reads `true`.
    ///
    /// Checked before each iteration; an in-flight call is not interrupted.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Settings for this pipeline.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run every stage from a fresh state and hand the finished state over.
    ///
    /// # Errors
    ///
    /// Invalid settings, exhausted retries at any stage, the iteration
    /// ceiling or cancellation. There is no partial result; use
    /// [`execute`](Self::execute) to keep the state on failure.
    pub async fn run(&self) -> FabulaResult<PipelineState> {
        let mut state = PipelineState::new();
        self.execute(&mut state).await?;
        Ok(state)
    }

    /// Run every stage, accumulating into `state`.
    ///
    /// On failure `state` holds whatever was committed before the error.
    #[instrument(
        skip(self, state),
        fields(
            keywords = %self.settings.keywords(),
            chapters = *self.settings.chapter_count(),
            context = %self.settings.context_mode(),
        )
    )]
    pub async fn execute(&self, state: &mut PipelineState) -> FabulaResult<()> {
        self.settings.validate()?;
        info!("Starting book generation");

        self.generate_world(state).await?;
        self.generate_locations(state).await?;
        self.generate_characters(state).await?;
        self.generate_outline(state).await?;
        self.write_book(state).await?;

        info!(
            chapters = *state.current_chapter(),
            paragraphs = state.book_content().len(),
            "Book complete"
        );
        Ok(())
    }

    /// Stage 1: world.
    #[instrument(skip(self, state))]
    pub async fn generate_world(&self, state: &mut PipelineState) -> FabulaResult<()> {
        info!(stage = "world", "Generating world");
        let prompt = world_prompt(self.settings.keywords(), *self.settings.chapter_count());
        state.world = self.caller.execute(&prompt).await?;
        self.persist(keys::WORLD, &state.world).await;
        Ok(())
    }

    /// Stage 2: locations, from the world.
    #[instrument(skip(self, state))]
    pub async fn generate_locations(&self, state: &mut PipelineState) -> FabulaResult<()> {
        info!(stage = "locations", "Generating locations");
        let prompt = locations_prompt(&state.world);
        state.locations = self.caller.execute(&prompt).await?;
        self.persist(keys::LOCATIONS, &state.locations).await;
        Ok(())
    }

    /// Stage 3: characters, from world and locations.
    #[instrument(skip(self, state))]
    pub async fn generate_characters(&self, state: &mut PipelineState) -> FabulaResult<()> {
        info!(stage = "characters", "Generating characters");
        let prompt = characters_prompt(&state.world, &state.locations);
        state.characters = self.caller.execute(&prompt).await?;
        self.persist(keys::CHARACTERS, &state.characters).await;
        Ok(())
    }

    /// Stage 4: chapter outline, from all setup stages.
    #[instrument(skip(self, state))]
    pub async fn generate_outline(&self, state: &mut PipelineState) -> FabulaResult<()> {
        info!(stage = "outline", "Generating chapter outline");
        let prompt = outline_prompt(
            &state.world,
            &state.locations,
            &state.characters,
            *self.settings.chapter_count(),
        );
        state.chapter_outline = self.caller.execute(&prompt).await?;
        self.persist(keys::OUTLINE, &state.chapter_outline).await;
        Ok(())
    }

    /// Stage 5: write paragraphs until the service ends the book.
    ///
    /// Termination depends on the service emitting the book-end marker
    /// unless `max_iterations` is set. The book is saved once per completed
    /// iteration. If an iteration fails after its paragraph was folded in,
    /// that partial book is saved before the error is returned.
    #[instrument(skip(self, state))]
    pub async fn write_book(&self, state: &mut PipelineState) -> FabulaResult<()> {
        info!(stage = "body", "Writing book");
        let mut iterations: u32 = 0;
        let mut saved_paragraphs = state.book_content().len();

        while !state.is_complete() {
            if self.is_cancelled() {
                warn!(iterations, "Cancellation requested, stopping");
                return Err(NarrativeError::new(NarrativeErrorKind::Cancelled(iterations)).into());
            }

            if let Some(limit) = self.iteration_limit_reached(iterations) {
                error!(limit, "Book did not end within the iteration limit");
                return Err(NarrativeError::new(NarrativeErrorKind::IterationLimit(limit)).into());
            }

            if let Err(e) = self.step(state).await {
                error!(
                    error = %e,
                    paragraphs = state.book_content().len(),
                    "Book generation failed"
                );
                if state.book_content().len() != saved_paragraphs {
                    self.persist(keys::BOOK, &state.book_text()).await;
                }
                return Err(e);
            }

            self.persist(keys::BOOK, &state.book_text()).await;
            saved_paragraphs = state.book_content().len();
            iterations += 1;
        }

        Ok(())
    }

    /// One body iteration: generate, fold in, re-summarize.
    ///
    /// The summary is not regenerated after the book-end paragraph. Nothing
    /// is persisted here; [`write_book`](Self::write_book) saves the book
    /// after each completed step.
    #[instrument(skip(self, state), fields(progress = %state.progress()))]
    pub async fn step(&self, state: &mut PipelineState) -> FabulaResult<Transition> {
        let prompt = paragraph_prompt(state, &self.settings);
        debug!(prompt_length = prompt.len(), "Requesting next paragraph");
        let generated = self.caller.execute(&prompt).await?;

        let transition = state.apply_paragraph(&generated);
        match transition {
            Transition::BookEnd => info!(chapter = *state.current_chapter(), "Book end reached"),
            Transition::ChapterEnd => info!(
                chapter = *state.current_chapter() - 1,
                "Chapter complete"
            ),
            Transition::Paragraph => info!(
                chapter = *state.current_chapter(),
                paragraph = *state.paragraph_count_in_chapter(),
                "Paragraph written"
            ),
        }

        if transition != Transition::BookEnd {
            state.summary = self
                .caller
                .execute(&summary_prompt(&state.book_text()))
                .await?;
        }

        Ok(transition)
    }

    fn iteration_limit_reached(&self, iterations: u32) -> Option<u32> {
        (*self.settings.max_iterations()).filter(|limit| iterations >= *limit)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    async fn persist(&self, key: &str, content: &str) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(key, content).await {
            warn!(
                key,
                backend = store.backend_name(),
                error = %e,
                "Failed to persist content, continuing"
            );
        }
    }
}
