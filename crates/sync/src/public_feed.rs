//! Public-tier live view: the cardinality-one variant of the fan-out.
//!
//! Same nested-subscription contract as the owner feed, but with exactly
//! one project at the outer level and nothing mutable reachable from it.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use pulseboard_core::progress::completion_percent;
use pulseboard_core::project::{Project, PublicProject};
use pulseboard_core::task::Task;
use pulseboard_core::CoreError;
use pulseboard_store::{DynStore, ProjectFilter, Subscription, SubscriptionHandle, TaskFilter};

use crate::snapshot::{Progress, ProjectDetail};

/// Live read-only view of one shared project.
///
/// Obtain via [`crate::service::open_public_feed`]. The stream ends (the
/// channel closes) when the observed project is deleted; re-resolving the
/// share token then reports `NotFound`.
#[derive(Debug)]
pub struct PublicFeed {
    receiver: mpsc::UnboundedReceiver<ProjectDetail>,
    cancel: CancellationToken,
    driver: JoinHandle<()>,
}

impl PublicFeed {
    pub(crate) async fn open(store: DynStore, project: Project) -> Result<Self, CoreError> {
        let outer = store
            .subscribe_projects(ProjectFilter::Id(project.id.clone()))
            .await
            .map_err(CoreError::store)?;

        let (emitter, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let driver = Driver {
            store,
            outer,
            task_rx: None,
            task_handle: None,
            project,
            tasks: Vec::new(),
            progress: None,
            emitter,
        };
        let driver = tokio::spawn(driver.run(cancel.clone()));

        Ok(Self {
            receiver,
            cancel,
            driver,
        })
    }

    /// Await the next emission. Returns `None` when the feed is shut down
    /// or the observed project has been deleted.
    pub async fn next_update(&mut self) -> Option<ProjectDetail> {
        self.receiver.recv().await
    }

    /// Tear the feed down; both subscriptions are cancelled before this
    /// returns.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.driver.await;
    }
}

struct Driver {
    store: DynStore,
    outer: Subscription<Project>,
    task_rx: Option<mpsc::UnboundedReceiver<Vec<Task>>>,
    task_handle: Option<SubscriptionHandle>,
    project: Project,
    tasks: Vec<Task>,
    /// Task-derived progress; `None` until the first live snapshot.
    progress: Option<Progress>,
    emitter: mpsc::UnboundedSender<ProjectDetail>,
}

impl Driver {
    async fn run(mut self, cancel: CancellationToken) {
        // The nested subscription is opened on the driver task so a failure
        // is reported through the feed (as Unavailable), not at open time.
        self.ensure_task_subscription().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                maybe_projects = self.outer.next_snapshot() => match maybe_projects {
                    Some(projects) => {
                        match projects.into_iter().next() {
                            Some(project) => {
                                self.project = project;
                                // A previously failed task subscription gets
                                // another chance on each outer event.
                                self.ensure_task_subscription().await;
                                self.emit();
                            }
                            // Project deleted: end the stream.
                            None => break,
                        }
                    }
                    None => break,
                },

                maybe_tasks = recv_tasks(&mut self.task_rx), if self.task_rx.is_some() => {
                    match maybe_tasks {
                        Some(tasks) => {
                            self.progress = Some(Progress::Live(completion_percent(&tasks)));
                            self.tasks = tasks;
                            self.emit();
                        }
                        // Channel closed out from under us; drop the dead
                        // subscription and reopen on the next outer event.
                        None => {
                            self.task_rx = None;
                            self.task_handle = None;
                        }
                    }
                }
            }
        }

        if let Some(handle) = self.task_handle.take() {
            handle.cancel();
        }
        self.outer.handle().cancel();
        tracing::debug!(project_id = %self.project.id, "public feed driver stopped");
    }

    async fn ensure_task_subscription(&mut self) {
        if self.task_handle.is_some() {
            return;
        }
        match self
            .store
            .subscribe_tasks(TaskFilter::Project(self.project.id.clone()))
            .await
        {
            Ok(sub) => {
                let (rx, handle) = sub.into_parts();
                self.task_rx = Some(rx);
                self.task_handle = Some(handle);
            }
            Err(err) => {
                tracing::warn!(
                    project_id = %self.project.id,
                    error = %err,
                    "task subscription failed; reporting progress unavailable"
                );
                self.progress = Some(Progress::Unavailable);
                self.emit();
            }
        }
    }

    fn emit(&mut self) {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let detail = ProjectDetail {
            project: PublicProject::from(&self.project),
            tasks,
            progress: self
                .progress
                .unwrap_or(Progress::Persisted(self.project.progress)),
        };
        let _ = self.emitter.send(detail);
    }
}

/// Select-friendly receive on an optional task channel: pending (never
/// ready) while no subscription is open.
async fn recv_tasks(rx: &mut Option<mpsc::UnboundedReceiver<Vec<Task>>>) -> Option<Vec<Task>> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
