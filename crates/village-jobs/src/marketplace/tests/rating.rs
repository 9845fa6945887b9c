use std::sync::Arc;

use super::common::*;
use crate::marketplace::domain::ActorRole;
use crate::marketplace::rating::RatingAggregator;
use crate::marketplace::store::ProfileDirectory;

#[test]
fn empty_candidate_set_leaves_the_prior_rating_unchanged() {
    let (_engine, store) = engine();
    store
        .set_rating(&tom().id, 4.4)
        .expect("prior rating stored");

    let aggregator = RatingAggregator::new(store.clone(), store.clone());
    let recomputed = aggregator
        .recompute(&tom().id, ActorRole::Seeker)
        .expect("recompute succeeds");

    assert_eq!(recomputed, None);
    assert_eq!(store.rating(&tom().id), Some(4.4));
}

#[test]
fn seeker_rating_averages_all_received_feedback() {
    let (engine, store) = engine();

    for (title, rating) in [("Harvest Help Needed", 5), ("Animal Caretaker", 4)] {
        let job = engine
            .create_job(&provider(), posting(title, &["farming"]))
            .expect("job created");
        let application = engine
            .apply(&job.id, &tom(), snapshot())
            .expect("application accepted");
        engine
            .select(&job.id, &application.id, &provider())
            .expect("selection accepted");
        engine
            .complete(&job.id, &provider(), rating, "done")
            .expect("completion accepted");
    }

    assert_eq!(store.rating(&tom().id), Some(4.5));
}

#[test]
fn provider_rating_spans_feedback_across_completed_jobs() {
    let (engine, store) = engine();

    for (seeker_actor, rating) in [(tom(), 5), (sarah(), 3)] {
        let job = engine
            .create_job(&provider(), posting("Festival Food Preparation", &["cooking"]))
            .expect("job created");
        let application = engine
            .apply(&job.id, &seeker_actor, snapshot())
            .expect("application accepted");
        engine
            .select(&job.id, &application.id, &provider())
            .expect("selection accepted");
        // The seeker completes, so the provider is the rated party.
        engine
            .complete(&job.id, &seeker_actor, rating, "done")
            .expect("completion accepted");
    }

    assert_eq!(store.rating(&provider().id), Some(4.0));
}

#[test]
fn aggregator_ignores_applications_without_feedback() {
    let (engine, store) = engine();
    let (job, _selected, _rejected) = assigned_job(&engine);
    engine
        .complete(&job.id, &provider(), 5, "great job")
        .expect("completion accepted");

    // Sarah's rejected application never receives feedback and must not
    // drag her average down.
    let aggregator = RatingAggregator::new(store.clone(), Arc::clone(&store));
    let recomputed = aggregator
        .recompute(&sarah().id, ActorRole::Seeker)
        .expect("recompute succeeds");
    assert_eq!(recomputed, None);
    assert!(store.rating(&sarah().id).is_none());
}
