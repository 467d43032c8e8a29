//! In-process reference implementation of [`EntityStore`].
//!
//! A single mutex guards both collections and the subscriber registries, so
//! a commit and the fan-out of its snapshots are one atomic step. That is
//! what gives every subscription its in-commit-order delivery guarantee.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use pulseboard_core::project::{NewProject, Project, UpdateProject};
use pulseboard_core::task::{NewTask, Task, UpdateTask};
use pulseboard_core::types::EntityId;

use crate::filter::{ProjectFilter, TaskFilter};
use crate::store::{EntityStore, StoreError};
use crate::subscription::{Subscription, SubscriptionHandle};

struct ProjectSubscriber {
    filter: ProjectFilter,
    sender: mpsc::UnboundedSender<Vec<Project>>,
}

struct TaskSubscriber {
    filter: TaskFilter,
    sender: mpsc::UnboundedSender<Vec<Task>>,
}

#[derive(Default)]
struct Inner {
    /// Insertion-ordered; updates happen in place so unaffected records
    /// keep their positions across snapshots.
    projects: Vec<Project>,
    tasks: Vec<Task>,
    project_subs: HashMap<u64, ProjectSubscriber>,
    task_subs: HashMap<u64, TaskSubscriber>,
    next_sub_id: u64,
}

impl Inner {
    /// Push a fresh full snapshot to every project subscriber whose filter
    /// is affected by the commit. Subscribers whose receivers are gone are
    /// pruned on the way.
    fn notify_projects(&mut self, affected: impl Fn(&ProjectFilter) -> bool) {
        let mut dead = Vec::new();
        for (&sub_id, sub) in &self.project_subs {
            if !affected(&sub.filter) {
                continue;
            }
            let snapshot: Vec<Project> = self
                .projects
                .iter()
                .filter(|p| sub.filter.matches(p))
                .cloned()
                .collect();
            if sub.sender.send(snapshot).is_err() {
                dead.push(sub_id);
            }
        }
        for sub_id in dead {
            self.project_subs.remove(&sub_id);
        }
    }

    fn notify_tasks(&mut self, affected: impl Fn(&TaskFilter) -> bool) {
        let mut dead = Vec::new();
        for (&sub_id, sub) in &self.task_subs {
            if !affected(&sub.filter) {
                continue;
            }
            let snapshot: Vec<Task> = self
                .tasks
                .iter()
                .filter(|t| sub.filter.matches(t))
                .cloned()
                .collect();
            if sub.sender.send(snapshot).is_err() {
                dead.push(sub_id);
            }
        }
        for sub_id in dead {
            self.task_subs.remove(&sub_id);
        }
    }
}

/// In-memory document store over the `projects` and `tasks` collections.
///
/// Designed to be wrapped in `Arc` and shared; all operations are
/// internally synchronized.
#[derive(Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    /// Number of live project subscriptions. Test probe for handle-liveness
    /// assertions.
    pub fn project_subscription_count(&self) -> usize {
        self.lock().project_subs.len()
    }

    /// Number of live task subscriptions. Test probe for handle-liveness
    /// assertions.
    pub fn task_subscription_count(&self) -> usize {
        self.lock().task_subs.len()
    }
}

fn apply_project_patch(project: &mut Project, patch: UpdateProject) {
    if let Some(name) = patch.name {
        project.name = name;
    }
    if let Some(description) = patch.description {
        project.description = Some(description);
    }
    if let Some(client_name) = patch.client_name {
        project.client_name = Some(client_name);
    }
    if let Some(client_email) = patch.client_email {
        project.client_email = Some(client_email);
    }
    if let Some(project_url) = patch.project_url {
        project.project_url = Some(project_url);
    }
    if let Some(deadline) = patch.estimated_deadline {
        project.estimated_deadline = Some(deadline);
    }
    if let Some(status) = patch.status {
        project.status = status;
    }
    if let Some(progress) = patch.progress {
        project.progress = progress;
    }
    project.updated_at = Utc::now();
}

fn apply_task_patch(task: &mut Task, patch: UpdateTask) {
    if let Some(title) = patch.title {
        task.title = title;
    }
    if let Some(description) = patch.description {
        task.description = Some(description);
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = Some(due_date);
    }
    task.updated_at = Utc::now();
}

#[async_trait]
impl EntityStore for MemoryStore {
    // --- projects ---

    async fn insert_project(&self, input: NewProject) -> Result<Project, StoreError> {
        let mut inner = self.lock();

        if inner
            .projects
            .iter()
            .any(|p| p.public_id == input.public_id)
        {
            return Err(StoreError::Conflict(format!(
                "public_id {} already in use",
                input.public_id
            )));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            public_id: input.public_id,
            owner_id: input.owner_id,
            name: input.name,
            description: input.description,
            client_name: input.client_name,
            client_email: input.client_email,
            project_url: input.project_url,
            estimated_deadline: input.estimated_deadline,
            status: input.status,
            progress: input.progress,
            created_at: now,
            updated_at: now,
        };
        inner.projects.push(project.clone());
        inner.notify_projects(|f| f.matches(&project));

        Ok(project)
    }

    async fn query_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .projects
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn subscribe_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Subscription<Project>, StoreError> {
        let mut inner = self.lock();

        let (tx, rx) = mpsc::unbounded_channel();
        let initial: Vec<Project> = inner
            .projects
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        // Queue the initial snapshot before the subscription is handed out.
        let _ = tx.send(initial);

        let sub_id = inner.next_sub_id;
        inner.next_sub_id += 1;
        inner
            .project_subs
            .insert(sub_id, ProjectSubscriber { filter, sender: tx });
        tracing::debug!(sub_id, "project subscription opened");

        let registry = Arc::clone(&self.inner);
        let handle = SubscriptionHandle::new(Arc::new(move || {
            registry
                .lock()
                .expect("store mutex poisoned")
                .project_subs
                .remove(&sub_id);
            tracing::debug!(sub_id, "project subscription closed");
        }));

        Ok(Subscription::new(rx, handle))
    }

    async fn update_project(
        &self,
        id: &EntityId,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut inner = self.lock();

        let Some(idx) = inner.projects.iter().position(|p| p.id == *id) else {
            return Ok(None);
        };
        let before = inner.projects[idx].clone();
        apply_project_patch(&mut inner.projects[idx], patch);
        let after = inner.projects[idx].clone();

        inner.notify_projects(|f| f.matches(&before) || f.matches(&after));

        Ok(Some(after))
    }

    async fn delete_project(&self, id: &EntityId) -> Result<bool, StoreError> {
        let mut inner = self.lock();

        let Some(idx) = inner.projects.iter().position(|p| p.id == *id) else {
            return Ok(false);
        };
        let removed = inner.projects.remove(idx);
        inner.notify_projects(|f| f.matches(&removed));

        Ok(true)
    }

    // --- tasks ---

    async fn insert_task(&self, input: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.lock();

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.push(task.clone());
        inner.notify_tasks(|f| f.matches(&task));

        Ok(task)
    }

    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn subscribe_tasks(&self, filter: TaskFilter) -> Result<Subscription<Task>, StoreError> {
        let mut inner = self.lock();

        let (tx, rx) = mpsc::unbounded_channel();
        let initial: Vec<Task> = inner
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        let _ = tx.send(initial);

        let sub_id = inner.next_sub_id;
        inner.next_sub_id += 1;
        inner
            .task_subs
            .insert(sub_id, TaskSubscriber { filter, sender: tx });
        tracing::debug!(sub_id, "task subscription opened");

        let registry = Arc::clone(&self.inner);
        let handle = SubscriptionHandle::new(Arc::new(move || {
            registry
                .lock()
                .expect("store mutex poisoned")
                .task_subs
                .remove(&sub_id);
            tracing::debug!(sub_id, "task subscription closed");
        }));

        Ok(Subscription::new(rx, handle))
    }

    async fn update_task(
        &self,
        id: &EntityId,
        patch: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut inner = self.lock();

        let Some(idx) = inner.tasks.iter().position(|t| t.id == *id) else {
            return Ok(None);
        };
        let before = inner.tasks[idx].clone();
        apply_task_patch(&mut inner.tasks[idx], patch);
        let after = inner.tasks[idx].clone();

        inner.notify_tasks(|f| f.matches(&before) || f.matches(&after));

        Ok(Some(after))
    }

    async fn delete_task(&self, id: &EntityId) -> Result<bool, StoreError> {
        let mut inner = self.lock();

        let Some(idx) = inner.tasks.iter().position(|t| t.id == *id) else {
            return Ok(false);
        };
        let removed = inner.tasks.remove(idx);
        inner.notify_tasks(|f| f.matches(&removed));

        Ok(true)
    }
}
