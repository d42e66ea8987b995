//! Concurrent retrieval of index entries into the destination tree
//!
//! A fixed number of workers drain one shared queue. Each task is fetched,
//! optionally unwrapped from its loose-object framing and written to its own
//! path; tasks share nothing but the directory tree, so completion order is
//! irrelevant. Outcomes flow back over a channel to the caller, which is the
//! only place results are printed or counted.

use crate::areas::remote::ObjectFetcher;
use crate::areas::workspace::Workspace;
use crate::artifacts::dump::outcome::{TaskFailure, TaskOutcome};
use crate::artifacts::dump::task::RetrievalTask;
use crate::artifacts::objects::loose_object;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type TaskQueue = Arc<Mutex<mpsc::UnboundedReceiver<RetrievalTask>>>;

pub struct Pipeline<F> {
    fetcher: Arc<F>,
    workspace: Arc<Workspace>,
    workers: usize,
    strip_object_header: bool,
    cancel: CancellationToken,
}

impl<F: ObjectFetcher + 'static> Pipeline<F> {
    pub fn new(fetcher: Arc<F>, workspace: Arc<Workspace>, workers: usize) -> Self {
        Pipeline {
            fetcher,
            workspace,
            workers: workers.max(1),
            strip_object_header: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_strip_object_header(mut self, strip: bool) -> Self {
        self.strip_object_header = strip;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process every task, handing each outcome to `on_outcome` as it arrives.
    ///
    /// Returns how many tasks were left unstarted because of cancellation.
    pub async fn run<C>(&self, tasks: Vec<RetrievalTask>, mut on_outcome: C) -> usize
    where
        C: FnMut(TaskOutcome),
    {
        let worker_count = self.workers.min(tasks.len());
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        for task in tasks {
            // the receiver is alive until the end of this function
            let _ = task_tx.send(task);
        }
        drop(task_tx);

        let queue: TaskQueue = Arc::new(Mutex::new(task_rx));
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();

        debug!(workers = worker_count, "starting pipeline");
        for worker_id in 0..worker_count {
            workers.spawn(Self::worker(
                worker_id,
                queue.clone(),
                self.fetcher.clone(),
                self.workspace.clone(),
                self.strip_object_header,
                self.cancel.clone(),
                outcome_tx.clone(),
            ));
        }
        drop(outcome_tx);

        while let Some(outcome) = outcome_rx.recv().await {
            on_outcome(outcome);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                warn!("pipeline worker terminated abnormally: {err}");
            }
        }

        let mut unstarted = 0;
        let mut queue = queue.lock().await;
        while queue.try_recv().is_ok() {
            unstarted += 1;
        }

        unstarted
    }

    async fn worker(
        worker_id: usize,
        queue: TaskQueue,
        fetcher: Arc<F>,
        workspace: Arc<Workspace>,
        strip_object_header: bool,
        cancel: CancellationToken,
        outcomes: mpsc::UnboundedSender<TaskOutcome>,
    ) {
        loop {
            if cancel.is_cancelled() {
                debug!(worker_id, "worker cancelled");
                break;
            }

            let Some(task) = queue.lock().await.recv().await else {
                break;
            };

            let outcome = Self::process(&*fetcher, &workspace, strip_object_header, task).await;
            if outcomes.send(outcome).is_err() {
                break;
            }
        }
    }

    async fn process(
        fetcher: &F,
        workspace: &Workspace,
        strip_object_header: bool,
        task: RetrievalTask,
    ) -> TaskOutcome {
        let result = match fetcher.fetch(&task.oid).await {
            Ok(data) => {
                let data = match strip_object_header {
                    true => loose_object::strip_header(data),
                    false => data,
                };
                workspace
                    .write_file(&task.path, &data)
                    .await
                    .map(|_| data.len())
                    .map_err(TaskFailure::Write)
            }
            Err(err) => Err(err.into()),
        };

        TaskOutcome::new(task, result)
    }
}
