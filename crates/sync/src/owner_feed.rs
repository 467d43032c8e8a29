//! The subscription manager: owner-tier fan-out.
//!
//! One outer subscription on the owner's project set drives one nested
//! subscription per visible project's tasks. All reconciliation and
//! progress recomputation runs on a single driver task, so two outer-set
//! changes can never interleave their add/remove work, and the handle map
//! is never touched from outside the driver.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{StreamExt, StreamMap};
use tokio_util::sync::CancellationToken;

use pulseboard_core::progress::completion_percent;
use pulseboard_core::project::Project;
use pulseboard_core::task::Task;
use pulseboard_core::types::EntityId;
use pulseboard_core::CoreError;
use pulseboard_store::{DynStore, SubscriptionHandle, TaskFilter};

use crate::access::OwnerScope;
use crate::snapshot::{Progress, ProjectProgress};

/// Live owner-tier view: a stream of full `(project, progress)` lists,
/// re-emitted after every relevant commit.
///
/// Obtain via [`crate::service::open_owner_feed`]; tear down with
/// [`shutdown`](OwnerFeed::shutdown).
pub struct OwnerFeed {
    receiver: mpsc::UnboundedReceiver<Vec<ProjectProgress>>,
    cancel: CancellationToken,
    driver: JoinHandle<()>,
}

impl OwnerFeed {
    pub(crate) async fn open(store: DynStore, scope: &OwnerScope) -> Result<Self, CoreError> {
        let outer = store
            .subscribe_projects(scope.project_filter())
            .await
            .map_err(CoreError::store)?;
        let (outer_rx, outer_handle) = outer.into_parts();

        let (emitter, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let driver = Driver {
            store,
            outer_rx,
            outer_handle,
            task_streams: StreamMap::new(),
            task_handles: HashMap::new(),
            visible: Vec::new(),
            progress: HashMap::new(),
            emitter,
        };
        let driver = tokio::spawn(driver.run(cancel.clone()));

        Ok(Self {
            receiver,
            cancel,
            driver,
        })
    }

    /// Await the next emission. Returns `None` once the feed has been shut
    /// down and the queue drained.
    pub async fn next_update(&mut self) -> Option<Vec<ProjectProgress>> {
        self.receiver.recv().await
    }

    /// Tear the feed down: every nested task subscription and the outer
    /// project subscription are cancelled before this returns, and nothing
    /// further is emitted.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.driver.await;
    }
}

struct Driver {
    store: DynStore,
    outer_rx: mpsc::UnboundedReceiver<Vec<Project>>,
    outer_handle: SubscriptionHandle,
    /// Nested task snapshot streams, keyed by project id.
    task_streams: StreamMap<EntityId, UnboundedReceiverStream<Vec<Task>>>,
    /// Teardown handles for the nested subscriptions. Owned exclusively by
    /// this driver; reconciliation is the only code that touches it.
    task_handles: HashMap<EntityId, SubscriptionHandle>,
    /// The currently-visible project set, as of the latest outer snapshot.
    visible: Vec<Project>,
    /// Latest task-derived progress per visible project.
    progress: HashMap<EntityId, Progress>,
    emitter: mpsc::UnboundedSender<Vec<ProjectProgress>>,
}

impl Driver {
    async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                maybe_projects = self.outer_rx.recv() => match maybe_projects {
                    Some(projects) => {
                        self.reconcile(projects).await;
                        self.emit();
                    }
                    // Outer subscription gone; nothing left to observe.
                    None => break,
                },

                Some((project_id, tasks)) = self.task_streams.next(),
                    if !self.task_streams.is_empty() =>
                {
                    self.progress
                        .insert(project_id, Progress::Live(completion_percent(&tasks)));
                    self.emit();
                }
            }
        }

        // Teardown: cancel every outstanding handle. After this, no
        // snapshot is queued anywhere on behalf of this feed.
        for (_, handle) in self.task_handles.drain() {
            handle.cancel();
        }
        self.outer_handle.cancel();
        tracing::debug!("owner feed driver stopped");
    }

    /// Diff the new visible set against the nested-subscription map:
    /// open on addition, cancel on removal, leave unchanged entries
    /// untouched (field-only project changes must not churn task
    /// subscriptions). A project whose earlier nested subscribe failed is
    /// retried here on the next outer snapshot.
    async fn reconcile(&mut self, projects: Vec<Project>) {
        let visible_ids: HashSet<&EntityId> = projects.iter().map(|p| &p.id).collect();

        let stale: Vec<EntityId> = self
            .task_handles
            .keys()
            .filter(|id| !visible_ids.contains(id))
            .cloned()
            .collect();
        for project_id in stale {
            if let Some(handle) = self.task_handles.remove(&project_id) {
                handle.cancel();
            }
            self.task_streams.remove(&project_id);
            self.progress.remove(&project_id);
            tracing::debug!(%project_id, "nested task subscription torn down");
        }

        for project in &projects {
            if self.task_handles.contains_key(&project.id) {
                continue;
            }
            match self
                .store
                .subscribe_tasks(TaskFilter::Project(project.id.clone()))
                .await
            {
                Ok(sub) => {
                    let (rx, handle) = sub.into_parts();
                    self.task_handles.insert(project.id.clone(), handle);
                    self.task_streams
                        .insert(project.id.clone(), UnboundedReceiverStream::new(rx));
                    // A leftover failure marker would shadow the persisted
                    // value until the first live snapshot lands.
                    if self.progress.get(&project.id) == Some(&Progress::Unavailable) {
                        self.progress.remove(&project.id);
                    }
                    tracing::debug!(project_id = %project.id, "nested task subscription opened");
                }
                Err(err) => {
                    tracing::warn!(
                        project_id = %project.id,
                        error = %err,
                        "task subscription failed; reporting progress unavailable"
                    );
                    self.progress
                        .insert(project.id.clone(), Progress::Unavailable);
                }
            }
        }

        self.visible = projects;
    }

    /// Emit the full visible list, most recently created first, pairing
    /// each project with its freshest known progress.
    fn emit(&self) {
        let mut items: Vec<ProjectProgress> = self
            .visible
            .iter()
            .map(|project| ProjectProgress {
                progress: self
                    .progress
                    .get(&project.id)
                    .copied()
                    .unwrap_or(Progress::Persisted(project.progress)),
                project: project.clone(),
            })
            .collect();
        items.sort_by(|a, b| b.project.created_at.cmp(&a.project.created_at));
        let _ = self.emitter.send(items);
    }
}
