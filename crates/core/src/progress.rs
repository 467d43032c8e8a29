//! Completion-percentage aggregation.
//!
//! Progress is always recomputed from a full task snapshot -- there is no
//! incremental counter to drift away from ground truth.

use crate::task::{Task, TaskStatus};

/// Percentage of tasks in the slice with status `completed`, rounded
/// half-up to an integer in `0..=100`. The empty slice reports 0.
///
/// Rounding rule: round-half-up (1 of 3 completed → 33, 1 of 2 → 50,
/// 5 of 6 → 83).
pub fn completion_percent(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    // (200c + n) / 2n == round-half-up of 100c/n in integer arithmetic.
    ((200 * completed + tasks.len()) / (2 * tasks.len())) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskPriority;

    fn task(status: TaskStatus) -> Task {
        let now = chrono::Utc::now();
        Task {
            id: "t".into(),
            project_id: "p".into(),
            title: "task".into(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn tasks(completed: usize, total: usize) -> Vec<Task> {
        (0..total)
            .map(|i| {
                task(if i < completed {
                    TaskStatus::Completed
                } else {
                    TaskStatus::Pending
                })
            })
            .collect()
    }

    #[test]
    fn empty_task_set_is_zero() {
        assert_eq!(completion_percent(&[]), 0);
    }

    #[test]
    fn pinned_rounding_boundaries() {
        // Round-half-up, matching the documented rule.
        assert_eq!(completion_percent(&tasks(1, 3)), 33);
        assert_eq!(completion_percent(&tasks(2, 3)), 67);
        assert_eq!(completion_percent(&tasks(1, 2)), 50);
        assert_eq!(completion_percent(&tasks(5, 6)), 83);
        assert_eq!(completion_percent(&tasks(1, 8)), 13);
    }

    #[test]
    fn all_completed_is_one_hundred() {
        assert_eq!(completion_percent(&tasks(4, 4)), 100);
    }

    #[test]
    fn none_completed_is_zero() {
        assert_eq!(completion_percent(&tasks(0, 5)), 0);
    }

    #[test]
    fn only_completed_status_counts() {
        let set = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::InProgress),
            task(TaskStatus::Blocked),
            task(TaskStatus::Pending),
        ];
        assert_eq!(completion_percent(&set), 25);
    }

    #[test]
    fn monotonic_in_completed_count() {
        for total in 1..=12usize {
            let mut prev = 0;
            for completed in 0..=total {
                let pct = completion_percent(&tasks(completed, total));
                assert!(pct >= prev, "{completed}/{total} regressed: {pct} < {prev}");
                prev = pct;
            }
            assert_eq!(prev, 100);
        }
    }
}
