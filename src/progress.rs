//! Progress reporting between a running research task and its listener.
//!
//! The pipeline pushes [`ProgressEvent`]s through a [`ProgressReporter`];
//! delivery is best effort and a missing or departed listener never affects
//! the pipeline. [`ProgressChannel`] owns the spawned pipeline task and hands
//! its events, followed by the final outcome, to a single consumer.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::ResearchError;
use crate::models::{ProgressEvent, ResearchResult};

/// Producer side of the progress queue. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A reporter that discards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A reporter paired with the receiver that collects its events.
    pub fn buffered() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: ProgressEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(event) {
            debug!(step = ?e.0.step, "progress listener gone, dropping event");
        }
    }
}

/// What a [`ProgressChannel`] consumer receives, in order: any number of
/// `Progress` items, then exactly one `Complete` or `Failed`.
#[derive(Debug)]
pub enum ChannelEvent {
    Progress(ProgressEvent),
    Complete(ResearchResult),
    Failed(ResearchError),
}

pub struct ProgressChannel {
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    task: Option<JoinHandle<Result<ResearchResult, ResearchError>>>,
    poll_interval: Duration,
}

impl ProgressChannel {
    /// Spawn `run` on the runtime, giving it the reporter for this channel.
    pub fn spawn<F, Fut>(poll_interval: Duration, run: F) -> Self
    where
        F: FnOnce(ProgressReporter) -> Fut,
        Fut: Future<Output = Result<ResearchResult, ResearchError>> + Send + 'static,
    {
        let (reporter, events) = ProgressReporter::buffered();
        let task = tokio::spawn(run(reporter));
        Self {
            events,
            task: Some(task),
            poll_interval,
        }
    }

    /// Next item for the consumer, `None` once the outcome has been delivered.
    ///
    /// While the task runs the queue is polled with a short timeout; after it
    /// finishes the queue is drained before the outcome is read, so events
    /// pushed just before completion are never lost.
    pub async fn next(&mut self) -> Option<ChannelEvent> {
        let task = self.task.as_ref()?;

        while !task.is_finished() {
            match tokio::time::timeout(self.poll_interval, self.events.recv()).await {
                Ok(Some(event)) => return Some(ChannelEvent::Progress(event)),
                // every reporter is gone: the task is returning
                Ok(None) => break,
                Err(_) => continue,
            }
        }

        if let Ok(event) = self.events.try_recv() {
            return Some(ChannelEvent::Progress(event));
        }

        let task = self.task.take()?;
        let outcome = match task.await {
            Ok(Ok(result)) => ChannelEvent::Complete(result),
            Ok(Err(e)) => ChannelEvent::Failed(e),
            Err(e) => {
                error!("research task aborted: {e}");
                ChannelEvent::Failed(ResearchError::Unexpected)
            }
        };
        Some(outcome)
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("progress consumer dropped, cancelling research task");
            task.abort();
        }
    }
}
