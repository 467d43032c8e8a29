//! Fan-out correctness for the owner feed.
//!
//! The invariant under test: for every currently-visible project there is
//! exactly one live nested task subscription, and teardown leaves nothing
//! behind. Liveness is asserted through the store's subscription counters,
//! never through timing.

use std::sync::Arc;
use std::time::Duration;

use pulseboard_core::project::CreateProject;
use pulseboard_core::task::CreateTask;
use pulseboard_store::{DynStore, MemoryStore};
use pulseboard_sync::{service, OwnerFeed, OwnerScope, Progress, ProjectProgress};

fn create_input(name: &str) -> CreateProject {
    CreateProject {
        name: name.into(),
        description: None,
        client_name: None,
        client_email: None,
        project_url: None,
        estimated_deadline: None,
        status: None,
    }
}

fn task_input(title: &str) -> CreateTask {
    CreateTask {
        title: title.into(),
        description: None,
        status: None,
        priority: None,
        due_date: None,
    }
}

async fn next(feed: &mut OwnerFeed) -> Vec<ProjectProgress> {
    tokio::time::timeout(Duration::from_secs(5), feed.next_update())
        .await
        .expect("feed emission timed out")
        .expect("feed ended unexpectedly")
}

/// Drain emissions until `cond` holds, panicking after a bounded number of
/// updates. Every mutation in these tests produces an emission, so the
/// bound is generous, not a timing dependence.
async fn wait_until(
    feed: &mut OwnerFeed,
    cond: impl Fn(&[ProjectProgress]) -> bool,
) -> Vec<ProjectProgress> {
    for _ in 0..64 {
        let update = next(feed).await;
        if cond(&update) {
            return update;
        }
    }
    panic!("condition not reached within 64 feed updates");
}

// ---------------------------------------------------------------------------
// Test: N visible projects hold exactly N nested subscriptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn n_projects_yield_n_nested_subscriptions() {
    let mem = Arc::new(MemoryStore::new());
    let store: DynStore = mem.clone();
    let scope = OwnerScope::resolve(Some("owner-a".into())).unwrap();

    for name in ["One", "Two", "Three"] {
        service::create_project(&store, &scope, create_input(name))
            .await
            .expect("create");
    }

    let mut feed = service::open_owner_feed(&store, &scope)
        .await
        .expect("open feed");

    // All three progress entries eventually report live (nested initial
    // snapshots processed), at which point the fan-out is settled.
    wait_until(&mut feed, |items| {
        items.len() == 3 && items.iter().all(|i| i.progress == Progress::Live(0))
    })
    .await;

    assert_eq!(mem.task_subscription_count(), 3);
    assert_eq!(mem.project_subscription_count(), 1);

    feed.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: removing one project tears down exactly its subscription
// ---------------------------------------------------------------------------

#[tokio::test]
async fn removal_tears_down_exactly_one_subscription() {
    let mem = Arc::new(MemoryStore::new());
    let store: DynStore = mem.clone();
    let scope = OwnerScope::resolve(Some("owner-a".into())).unwrap();

    let doomed = service::create_project(&store, &scope, create_input("Doomed"))
        .await
        .expect("create");
    let keeper = service::create_project(&store, &scope, create_input("Keeper"))
        .await
        .expect("create");
    let keeper_task = service::create_task(&store, &scope, &keeper.id, task_input("Keep me"))
        .await
        .expect("create task");

    let mut feed = service::open_owner_feed(&store, &scope)
        .await
        .expect("open feed");
    wait_until(&mut feed, |items| {
        items.len() == 2 && items.iter().all(|i| matches!(i.progress, Progress::Live(_)))
    })
    .await;
    assert_eq!(mem.task_subscription_count(), 2);

    service::delete_project(&store, &scope, &doomed.id)
        .await
        .expect("delete");
    wait_until(&mut feed, |items| items.len() == 1).await;

    // Exactly the doomed project's nested subscription is gone.
    assert_eq!(mem.task_subscription_count(), 1);

    // The survivor's subscription is the untouched original: it still
    // delivers task changes.
    service::update_task(
        &store,
        &scope,
        &keeper_task.id,
        pulseboard_core::task::UpdateTask {
            status: Some(pulseboard_core::task::TaskStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .expect("update task");

    wait_until(&mut feed, |items| {
        items.len() == 1 && items[0].progress == Progress::Live(100)
    })
    .await;

    feed.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: project field changes do not churn nested subscriptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn field_change_does_not_churn_subscriptions() {
    let mem = Arc::new(MemoryStore::new());
    let store: DynStore = mem.clone();
    let scope = OwnerScope::resolve(Some("owner-a".into())).unwrap();

    let project = service::create_project(&store, &scope, create_input("Stable"))
        .await
        .expect("create");

    let mut feed = service::open_owner_feed(&store, &scope)
        .await
        .expect("open feed");
    wait_until(&mut feed, |items| {
        items.len() == 1 && items[0].progress == Progress::Live(0)
    })
    .await;
    assert_eq!(mem.task_subscription_count(), 1);

    service::update_project(
        &store,
        &scope,
        &project.id,
        pulseboard_core::project::UpdateProject {
            name: Some("Stable (renamed)".into()),
            ..Default::default()
        },
    )
    .await
    .expect("update");

    // The rename reaches the feed; the live progress value survives the
    // outer-set change because the nested subscription was left alone.
    let update = wait_until(&mut feed, |items| items[0].project.name == "Stable (renamed)").await;
    assert_eq!(update[0].progress, Progress::Live(0));
    assert_eq!(mem.task_subscription_count(), 1);

    feed.shutdown().await;
}

// ---------------------------------------------------------------------------
// Test: shutdown cancels every subscription and ends the stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_leaves_no_live_subscriptions() {
    let mem = Arc::new(MemoryStore::new());
    let store: DynStore = mem.clone();
    let scope = OwnerScope::resolve(Some("owner-a".into())).unwrap();

    for name in ["One", "Two", "Three", "Four"] {
        service::create_project(&store, &scope, create_input(name))
            .await
            .expect("create");
    }

    let mut feed = service::open_owner_feed(&store, &scope)
        .await
        .expect("open feed");
    wait_until(&mut feed, |items| {
        items.len() == 4 && items.iter().all(|i| i.progress == Progress::Live(0))
    })
    .await;
    assert_eq!(mem.task_subscription_count(), 4);
    assert_eq!(mem.project_subscription_count(), 1);

    feed.shutdown().await;

    // Once shutdown returns, every handle has been cancelled.
    assert_eq!(mem.task_subscription_count(), 0);
    assert_eq!(mem.project_subscription_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: projects created after the feed opens are picked up
// ---------------------------------------------------------------------------

#[tokio::test]
async fn late_project_gains_a_subscription() {
    let mem = Arc::new(MemoryStore::new());
    let store: DynStore = mem.clone();
    let scope = OwnerScope::resolve(Some("owner-a".into())).unwrap();

    let mut feed = service::open_owner_feed(&store, &scope)
        .await
        .expect("open feed");
    let initial = next(&mut feed).await;
    assert!(initial.is_empty());
    assert_eq!(mem.task_subscription_count(), 0);

    service::create_project(&store, &scope, create_input("Latecomer"))
        .await
        .expect("create");

    wait_until(&mut feed, |items| {
        items.len() == 1 && items[0].progress == Progress::Live(0)
    })
    .await;
    assert_eq!(mem.task_subscription_count(), 1);

    feed.shutdown().await;
}
