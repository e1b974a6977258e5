//! Batch orchestrator.
//!
//! Fans one state machine out per title, forwards outcomes to the event
//! stream in completion order, and closes the stream with a single `done`
//! summary when every title is terminal or the deadline fires.

use crate::config::PipelineConfig;
use crate::event::BatchEvent;
use crate::item::resolve_title;
use crate::limits::StageLimits;
use crate::validate::validate_batch;
use reelscore_core::{
    BatchRequestError, BatchSummary, CachedMovie, ResolutionOutcome, StoreError, TitleId,
};
use reelscore_providers::{PageFetcher, SlugResolver};
use reelscore_storage::MovieCache;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;

/// Event stream handed to the transport layer. Dropping it cancels
/// outstanding work.
pub type BatchStream = ReceiverStream<BatchEvent>;

/// Buffered events between the orchestrator and a slow consumer.
const EVENT_BUFFER: usize = 64;

/// The resolution pipeline: cache gateway, the two remote stages, their
/// shared concurrency limits, and tuning knobs.
///
/// One instance is built at startup and shared across requests, so the
/// stage budgets are global to the deployment instance.
#[derive(Clone)]
pub struct Pipeline {
    pub(crate) cache: Arc<dyn MovieCache>,
    pub(crate) resolver: Arc<dyn SlugResolver>,
    pub(crate) fetcher: Arc<dyn PageFetcher>,
    pub(crate) limits: Arc<StageLimits>,
    pub(crate) config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        cache: Arc<dyn MovieCache>,
        resolver: Arc<dyn SlugResolver>,
        fetcher: Arc<dyn PageFetcher>,
        limits: Arc<StageLimits>,
        config: PipelineConfig,
    ) -> Self {
        Self { cache, resolver, fetcher, limits, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve a single title (the one-movie endpoint path). Runs the same
    /// state machine as a batch member, including the stage semaphores.
    pub async fn resolve_single(&self, id: &TitleId) -> Result<ResolutionOutcome, StoreError> {
        let cached = self.cache.get(id).await?;
        Ok(resolve_title(self, id.clone(), cached).await)
    }

    /// Run a batch: validate, bulk cache lookup, then stream outcomes as
    /// they complete, ending with exactly one `done` summary.
    ///
    /// # Errors
    /// Request-level failures (oversized batch, malformed id, bulk lookup
    /// failure) reject the whole request before any event is produced.
    pub async fn run_batch(&self, raw_ids: &[String]) -> Result<BatchStream, BatchRequestError> {
        let ids = validate_batch(raw_ids, self.config.max_batch_size)?;
        let cache_hits = self.cache.get_batch(&ids).await?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.drive(ids, cache_hits, tx).await;
        });

        Ok(ReceiverStream::new(rx))
    }

    /// Orchestrator body: one task per title in a `JoinSet`, outcomes
    /// forwarded in completion order, a single absolute deadline over the
    /// whole run.
    async fn drive(
        self,
        ids: Vec<TitleId>,
        cache_hits: HashMap<TitleId, CachedMovie>,
        tx: mpsc::Sender<BatchEvent>,
    ) {
        let deadline = tokio::time::Instant::now() + self.config.deadline;
        let mut tasks = JoinSet::new();

        for id in ids {
            let entry = cache_hits.get(&id).cloned();
            let pipeline = self.clone();
            tasks.spawn(async move { resolve_title(&pipeline, id, entry).await });
        }

        let mut summary = BatchSummary::default();

        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    match joined {
                        // Every title reached a terminal state.
                        None => break,
                        Some(Ok(outcome)) => {
                            summary.record(&outcome);
                            if tx.send(BatchEvent::from_outcome(outcome)).await.is_err() {
                                // Caller disconnected: nobody is reading, so
                                // abandon outstanding work and skip the summary.
                                tracing::debug!("Batch consumer gone, aborting outstanding titles");
                                tasks.abort_all();
                                return;
                            }
                        }
                        Some(Err(join_err)) => {
                            if join_err.is_panic() {
                                tracing::error!(error = %join_err, "Batch title task panicked");
                            }
                            // Aborted or panicked tasks produce no outcome and
                            // therefore no counter.
                        }
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    tracing::warn!(
                        unfinished = tasks.len(),
                        emitted = summary.total,
                        "Batch deadline reached, abandoning in-flight titles"
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        // Terminal summary over whatever actually landed. Send failure just
        // means the consumer left between the last event and now.
        let _ = tx.send(BatchEvent::Done(summary)).await;
    }
}
