//! Value types emitted by the live feeds.

use serde::Serialize;

use pulseboard_core::project::{Project, PublicProject};
use pulseboard_core::task::Task;

/// A project's completion percentage as currently known.
///
/// `Unavailable` is deliberately distinct from `Live(0)`: a task
/// subscription that could not be opened must not masquerade as an empty
/// task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "percent", rename_all = "kebab-case")]
pub enum Progress {
    /// Computed from the most recent task snapshot.
    Live(u8),
    /// The stored `project.progress` value; no live task snapshot has
    /// arrived yet. May be stale -- the live value wins once it exists.
    Persisted(u8),
    /// The task subscription for this project could not be opened.
    Unavailable,
}

impl Progress {
    /// The percentage, if one is known.
    pub fn percent(&self) -> Option<u8> {
        match self {
            Progress::Live(pct) | Progress::Persisted(pct) => Some(*pct),
            Progress::Unavailable => None,
        }
    }
}

/// One entry of an owner-feed emission.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectProgress {
    pub project: Project,
    pub progress: Progress,
}

/// One emission of a public feed: the client-safe project view, its task
/// list (newest first), and the current progress.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub project: PublicProject,
    pub tasks: Vec<Task>,
    pub progress: Progress,
}
