use std::sync::Arc;

use super::common::*;
use crate::marketplace::applications::ApplicationController;
use crate::marketplace::domain::{ApplicationStatus, JobId, NotificationKind};
use crate::marketplace::engine::{EngineError, LifecycleEngine};
use crate::marketplace::memory::MemoryStore;
use crate::marketplace::store::MarketplaceStore;

#[test]
fn apply_creates_pending_application_and_bumps_count() {
    let (engine, store) = engine();
    let job = open_job(&engine);

    let application = engine
        .apply(&job.id, &tom(), snapshot())
        .expect("application accepted");

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.job_id, job.id);
    assert!(application.feedback.is_none());

    let reloaded = engine.job(&job.id).expect("job reloads");
    assert_eq!(reloaded.applicants, 1);

    let queued = notifications_of_kind(&store, &provider().id, NotificationKind::NewApplication);
    assert_eq!(queued.len(), 1);
    assert!(queued[0].message.contains("Tom Smith"));
    assert!(queued[0].message.contains(&job.title));
    assert!(!queued[0].read);
}

#[test]
fn duplicate_apply_is_a_conflict_without_double_count() {
    let (engine, _store) = engine();
    let job = open_job(&engine);

    engine
        .apply(&job.id, &tom(), snapshot())
        .expect("first application accepted");
    match engine.apply(&job.id, &tom(), snapshot()) {
        Err(EngineError::Conflict(_)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    assert_eq!(engine.job(&job.id).expect("job reloads").applicants, 1);
}

#[test]
fn apply_on_non_open_job_fails_invalid_state_and_leaves_count() {
    let (engine, _store) = engine();
    let (job, _selected, _rejected) = assigned_job(&engine);

    match engine.apply(&job.id, &seeker("user-david", "David Lee"), snapshot()) {
        Err(EngineError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }

    assert_eq!(engine.job(&job.id).expect("job reloads").applicants, 2);
}

#[test]
fn apply_with_a_stale_open_snapshot_fails_after_selection() {
    let (engine, store) = engine();
    let job = open_job(&engine);
    let tom_app = engine
        .apply(&job.id, &tom(), snapshot())
        .expect("tom applies");

    // Job view read while the posting was still open.
    let stale = engine.job(&job.id).expect("job reloads");
    engine
        .select(&job.id, &tom_app.id, &provider())
        .expect("tom selected");

    // The insert re-checks openness in the store, so the stale view
    // cannot smuggle a pending application onto the assigned job.
    let controller = ApplicationController::new(store.clone());
    match controller.apply(&stale, &sarah(), snapshot()) {
        Err(EngineError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }

    let applications = store
        .applications_for_job(&job.id)
        .expect("applications load");
    assert!(applications
        .iter()
        .all(|application| application.status != ApplicationStatus::Pending));
}

#[test]
fn apply_requires_the_seeker_role() {
    let (engine, _store) = engine();
    let job = open_job(&engine);

    match engine.apply(&job.id, &provider(), snapshot()) {
        Err(EngineError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn apply_to_missing_job_is_not_found() {
    let (engine, _store) = engine();

    match engine.apply(&JobId("job-missing".to_string()), &tom(), snapshot()) {
        Err(EngineError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn notification_write_failure_does_not_fail_apply() {
    let store = Arc::new(FlakyNotificationStore::default());
    let profiles = Arc::new(MemoryStore::default());
    let engine = LifecycleEngine::new(store.clone(), profiles);

    let job = engine
        .create_job(&provider(), posting("Harvest Help Needed", &["farming"]))
        .expect("creation survives notification outage");
    engine
        .apply(&job.id, &tom(), snapshot())
        .expect("application survives notification outage");

    assert_eq!(engine.job(&job.id).expect("job reloads").applicants, 1);
    assert!(store
        .notifications_for(&provider().id)
        .expect("listing works")
        .is_empty());
}
