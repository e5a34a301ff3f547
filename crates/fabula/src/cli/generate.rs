//! `fabula generate` command handler.

use super::commands::GenerateArgs;
use fabula::{
    ContentStore, FabulaConfig, FabulaResult, FileSystemStore, GeminiClient, NarrativePipeline,
    PipelineState, ResilientCaller,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Run the full pipeline with configuration merged from every layer.
///
/// Configuration is validated before the client is built, so an invalid
/// setup fails without touching the network. Ctrl-C stops the body loop
/// after the paragraph in flight; the partial book stays on disk.
pub async fn run_generate(args: GenerateArgs) -> FabulaResult<()> {
    let config = FabulaConfig::load()?.apply(args.into());
    config.validate()?;
    info!(
        keywords = %config.keywords(),
        chapters = *config.chapter_count(),
        model = %config.model(),
        output = %config.output_dir().display(),
        "Configuration loaded"
    );

    let client = GeminiClient::new(config.api_key(), config.model())?;
    let caller = ResilientCaller::new(client, config.retry_policy());
    let mut pipeline = NarrativePipeline::new(caller, config.pipeline_settings()?);

    match FileSystemStore::new(config.output_dir().clone()) {
        Ok(store) => {
            info!(backend = store.backend_name(), path = %store.base_path().display(), "Saving output");
            pipeline = pipeline.with_store(Arc::new(store));
        }
        Err(e) => warn!(error = %e, "Output directory unavailable, continuing without saving"),
    }

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current paragraph");
            let _ = cancel_tx.send(true);
        }
    });
    let pipeline = pipeline.with_cancellation(cancel_rx);

    let mut state = PipelineState::new();
    match pipeline.execute(&mut state).await {
        Ok(()) => {
            report(&state);
            Ok(())
        }
        Err(e) => {
            error!(
                error = %e,
                paragraphs = state.book_content().len(),
                "Generation stopped before the book was finished"
            );
            Err(e)
        }
    }
}

fn report(state: &PipelineState) {
    let words: usize = state
        .book_content()
        .iter()
        .map(|p| p.split_whitespace().count())
        .sum();
    info!(
        chapters = *state.current_chapter(),
        paragraphs = state.book_content().len(),
        words,
        "Book finished"
    );
    println!("{}", state.book_text());
}
