use chrono::Utc;

use super::common::*;
use crate::marketplace::domain::{
    Actor, ActorRole, ApplicationStatus, Job, JobStatus, NotificationKind, UserId,
};
use crate::marketplace::engine::EngineError;
use crate::marketplace::store::MarketplaceStore;

#[test]
fn provider_completion_records_feedback_and_rates_the_seeker() {
    let (engine, store) = engine();
    let (job, selected, _rejected) = assigned_job(&engine);

    let completed = engine
        .complete(&job.id, &provider(), 5, "great job")
        .expect("completion accepted");

    assert_eq!(completed.status, JobStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.state_consistent());

    let application = store
        .application(&selected.id)
        .expect("application loads")
        .expect("application present");
    let feedback = application.feedback.expect("feedback recorded");
    assert_eq!(feedback.rating, 5);
    assert_eq!(feedback.comment, "great job");

    let queued = notifications_of_kind(&store, &tom().id, NotificationKind::JobFeedback);
    assert_eq!(queued.len(), 1);
    assert!(queued[0].message.contains("5-star"));
    assert!(queued[0].message.contains("great job"));

    assert_eq!(store.rating(&tom().id), Some(5.0));
}

#[test]
fn seeker_completion_notifies_and_rates_the_provider() {
    let (engine, store) = engine();
    let (job, _selected, _rejected) = assigned_job(&engine);

    engine
        .complete(&job.id, &tom(), 4, "clear instructions, fair pay")
        .expect("completion accepted");

    let queued = notifications_of_kind(&store, &provider().id, NotificationKind::JobFeedback);
    assert_eq!(queued.len(), 1);
    assert_eq!(store.rating(&provider().id), Some(4.0));
    assert!(store.rating(&tom().id).is_none());
}

#[test]
fn completing_an_open_job_fails_invalid_state() {
    let (engine, _store) = engine();
    let job = open_job(&engine);

    match engine.complete(&job.id, &provider(), 5, "premature") {
        Err(EngineError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }
}

#[test]
fn completion_by_a_stranger_is_forbidden() {
    let (engine, _store) = engine();
    let (job, _selected, _rejected) = assigned_job(&engine);

    let stranger = Actor {
        id: UserId("user-lisa".to_string()),
        role: ActorRole::Provider,
        name: "Shopkeeper Lisa".to_string(),
    };
    match engine.complete(&job.id, &stranger, 5, "not my job") {
        Err(EngineError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }

    // The rejected applicant is not the assignee either.
    match engine.complete(&job.id, &sarah(), 5, "not mine") {
        Err(EngineError::Forbidden(_)) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn repeat_completion_fails_without_new_side_effects() {
    let (engine, store) = engine();
    let (job, _selected, _rejected) = assigned_job(&engine);

    engine
        .complete(&job.id, &provider(), 5, "great job")
        .expect("first completion accepted");
    match engine.complete(&job.id, &provider(), 1, "changed my mind") {
        Err(EngineError::InvalidState(_)) => {}
        other => panic!("expected invalid state, got {other:?}"),
    }

    let queued = notifications_of_kind(&store, &tom().id, NotificationKind::JobFeedback);
    assert_eq!(queued.len(), 1, "no duplicate feedback notification");
    assert_eq!(store.rating(&tom().id), Some(5.0), "rating unchanged");
}

#[test]
fn completion_without_a_recorded_application_still_completes() {
    let (engine, store) = engine();
    let david = UserId("user-david".to_string());

    // Seeded assignment: the job was assigned outside the engine and has
    // no application records at all.
    let job = Job {
        status: JobStatus::Assigned,
        assigned_to: Some(david.clone()),
        applicants: 0,
        created_at: Utc::now(),
        completed_at: None,
        ..seeded_job("job-animal-caretaker")
    };
    store.insert_job(job.clone()).expect("seeded job inserted");

    let completed = engine
        .complete(&job.id, &provider(), 4, "reliable caretaker")
        .expect("completion accepted");
    assert_eq!(completed.status, JobStatus::Completed);

    let queued = notifications_of_kind(&store, &david, NotificationKind::JobFeedback);
    assert_eq!(queued.len(), 1);
    assert!(
        store.rating(&david).is_none(),
        "no feedback-bearing applications means the rating is untouched"
    );
}

#[test]
fn out_of_range_rating_is_rejected_before_any_write() {
    let (engine, store) = engine();
    let (job, selected, _rejected) = assigned_job(&engine);

    for rating in [0, 6] {
        match engine.complete(&job.id, &provider(), rating, "out of range") {
            Err(EngineError::InvalidRating(_)) => {}
            other => panic!("expected invalid rating, got {other:?}"),
        }
    }

    let reloaded = engine.job(&job.id).expect("job reloads");
    assert_eq!(reloaded.status, JobStatus::Assigned);
    let application = store
        .application(&selected.id)
        .expect("application loads")
        .expect("application present");
    assert_eq!(application.status, ApplicationStatus::Selected);
    assert!(application.feedback.is_none());
}

fn seeded_job(id: &str) -> Job {
    Job {
        id: crate::marketplace::domain::JobId(id.to_string()),
        provider_id: provider().id,
        provider_name: provider().name,
        title: "Animal Caretaker".to_string(),
        description: "Feed and care for farm animals.".to_string(),
        location: "North Village".to_string(),
        category: "Farming".to_string(),
        required_skills: skills(&["animal care", "farming"]),
        payment: "55 coins per day".to_string(),
        duration: "7 days".to_string(),
        status: JobStatus::Open,
        assigned_to: None,
        applicants: 0,
        created_at: Utc::now(),
        completed_at: None,
    }
}
