//! Daily scheduler driving a full cycle through the background task.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeDelta};
use guardian_common::testing::FixedClock;
use guardian_infra::scheduling::{DailyScheduler, SchedulerError};
use support::{
    init_tracing, mount_bloom_ok, mount_presigned_ok, mount_token_ok, requests_to, sync_cycle,
    Workspace, BLOOM_BODY,
};
use wiremock::MockServer;

/// A clock 300ms before local midnight, computed from the real "now" so the
/// scheduler's real-time sleep is short.
fn just_before_midnight() -> FixedClock {
    let now = Local::now();
    let midnight = guardian_common::time::next_midnight(&now);
    FixedClock::new(midnight - TimeDelta::milliseconds(300))
}

async fn wait_for_file(path: &std::path::Path) -> bool {
    for _ in 0..100 {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_scheduler_runs_cycle_at_midnight_and_stops() {
    init_tracing();
    let server = MockServer::start().await;
    mount_token_ok(&server).await;
    mount_presigned_ok(&server).await;
    mount_bloom_ok(&server).await;

    let workspace = Workspace::new();
    let clock = just_before_midnight();
    let mut scheduler = DailyScheduler::new(sync_cycle(&server, workspace.settings(&server)))
        .with_clock(Arc::new(clock.clone()));

    scheduler.start().await.unwrap();
    assert!(scheduler.is_running());

    assert!(wait_for_file(&workspace.bloom_path()).await, "bloom filter never downloaded");
    // Move well past midnight so the loop settles into a long wait.
    clock.advance(TimeDelta::hours(12));

    scheduler.stop().await.unwrap();
    assert!(!scheduler.is_running());
    assert_eq!(std::fs::read_to_string(workspace.bloom_path()).unwrap(), BLOOM_BODY);
    assert!(requests_to(&server, "/oauth/token").await >= 1);
}

#[tokio::test]
async fn test_scheduler_lifecycle_errors() {
    init_tracing();
    let server = MockServer::start().await;
    let workspace = Workspace::new();
    let noon = guardian_common::time::next_midnight(&Local::now()) + TimeDelta::hours(12);
    let mut scheduler = DailyScheduler::new(sync_cycle(&server, workspace.settings(&server)))
        .with_clock(Arc::new(FixedClock::new(noon)));

    assert!(matches!(scheduler.stop().await, Err(SchedulerError::NotRunning)));

    scheduler.start().await.unwrap();
    assert!(matches!(scheduler.start().await, Err(SchedulerError::AlreadyRunning)));
    scheduler.stop().await.unwrap();

    // Nothing should have run: midnight is hours away on the fixed clock.
    assert!(server.received_requests().await.unwrap().is_empty());
}
