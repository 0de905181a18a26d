use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::workflow::{CategorizationRequest, CategorizationWorkflow};
use crate::server::metrics;

/// Runs categorization off the request path.
///
/// `submit` only enqueues. A dispatcher task spawns one task per request, and
/// each run is wrapped so a failure or panic is logged and counted instead of
/// taking anything else down. In-flight runs are never cancelled: on shutdown
/// the dispatcher stops taking work and running workflows finish on their own.
#[derive(Clone)]
pub struct CategorizationQueue {
    sender: mpsc::UnboundedSender<CategorizationRequest>,
}

impl CategorizationQueue {
    pub fn start(
        workflow: Arc<CategorizationWorkflow>,
        shutdown: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<CategorizationRequest>();

        let handle = tokio::spawn(async move {
            info!("Categorization queue started");
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Categorization queue shutting down");
                        break;
                    }
                    request = receiver.recv() => match request {
                        Some(request) => Self::dispatch(workflow.clone(), request),
                        None => break,
                    }
                }
            }
        });

        (Self { sender }, handle)
    }

    /// Enqueues a run. Returns false if the queue has stopped.
    pub fn submit(&self, request: CategorizationRequest) -> bool {
        let job_id = request.job_id.clone();
        match self.sender.send(request) {
            Ok(()) => true,
            Err(_) => {
                warn!("Categorization queue is closed, job {} stays uncategorized", job_id);
                false
            }
        }
    }

    fn dispatch(workflow: Arc<CategorizationWorkflow>, request: CategorizationRequest) {
        tokio::spawn(async move {
            let job_id = request.job_id.clone();
            let start_time = Instant::now();
            let run = tokio::spawn(async move { workflow.run(&request).await });

            match run.await {
                Ok(Ok(outcome)) => {
                    info!(
                        "Categorization of job {} finished in {:?}: {}",
                        job_id,
                        start_time.elapsed(),
                        outcome.category.name
                    );
                }
                Ok(Err(e)) => {
                    warn!(
                        "Categorization of job {} aborted after {:?}, left as is: {}",
                        job_id,
                        start_time.elapsed(),
                        e
                    );
                }
                Err(e) => {
                    error!("Categorization of job {} panicked: {}", job_id, e);
                    metrics::record_categorization_run("automatic", "panicked");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorization::workflow::tests::{fixture, insert_job, TitleClassifier};
    use crate::store::UNCATEGORIZED;
    use std::time::Duration;

    async fn wait_for_category(
        store: &Arc<dyn crate::store::FullStore>,
        job_id: &str,
        expected: &str,
    ) -> bool {
        for _ in 0..100 {
            if store.get_job(job_id).unwrap().unwrap().category == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn submitted_requests_run_in_background() {
        let f = fixture(TitleClassifier::new(&[("Cook", "Hospitality", true)]));
        insert_job(&f.store, "j1", "Cook");
        let token = CancellationToken::new();
        let (queue, _handle) = CategorizationQueue::start(f.workflow.clone(), token.clone());

        assert!(queue.submit(CategorizationRequest::automatic("j1")));
        assert!(wait_for_category(&f.store, "j1", "Hospitality").await);
        token.cancel();
    }

    #[tokio::test]
    async fn failed_run_does_not_stop_the_queue() {
        let f = fixture(TitleClassifier::new(&[("Cook", "Hospitality", true)]));
        insert_job(&f.store, "j0", "Unknown");
        insert_job(&f.store, "j1", "Cook");
        let (queue, _handle) = CategorizationQueue::start(f.workflow.clone(), CancellationToken::new());

        queue.submit(CategorizationRequest::automatic("missing"));
        queue.submit(CategorizationRequest::automatic("j0"));
        queue.submit(CategorizationRequest::automatic("j1"));

        assert!(wait_for_category(&f.store, "j1", "Hospitality").await);
        assert_eq!(f.store.get_job("j0").unwrap().unwrap().category, UNCATEGORIZED);
    }

    #[tokio::test]
    async fn submit_after_shutdown_is_refused() {
        let f = fixture(TitleClassifier::new(&[]));
        let token = CancellationToken::new();
        let (queue, handle) = CategorizationQueue::start(f.workflow.clone(), token.clone());

        token.cancel();
        handle.await.unwrap();
        assert!(!queue.submit(CategorizationRequest::automatic("j1")));
    }
}
