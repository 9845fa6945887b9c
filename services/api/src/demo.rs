use std::collections::BTreeSet;
use std::sync::Arc;

use village_jobs::error::AppError;
use village_jobs::marketplace::{
    Actor, ActorRole, JobPosting, LifecycleEngine, MemoryStore, SeekerRecord, SeekerSnapshot,
    UserId,
};

/// Walks the full lifecycle against a fresh in-memory store and prints
/// each transition: post, two applications, selection, completion, and
/// the resulting rating.
pub(crate) fn run_demo() -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    let engine = LifecycleEngine::new(store.clone(), store.clone());

    let john = Actor {
        id: UserId("user-john".to_string()),
        role: ActorRole::Provider,
        name: "Farmer John".to_string(),
    };
    let tom = Actor {
        id: UserId("user-tom".to_string()),
        role: ActorRole::Seeker,
        name: "Tom Smith".to_string(),
    };
    let sarah = Actor {
        id: UserId("user-sarah".to_string()),
        role: ActorRole::Seeker,
        name: "Sarah Johnson".to_string(),
    };
    store.register_seeker(SeekerRecord {
        id: tom.id.clone(),
        name: tom.name.clone(),
        skills: ["farming".to_string(), "construction".to_string()]
            .into_iter()
            .collect::<BTreeSet<_>>(),
    });

    println!("Village jobs lifecycle demo\n");

    let job = engine.create_job(
        &john,
        JobPosting {
            title: "Harvest Help Needed".to_string(),
            description: "Looking for help with the wheat harvest.".to_string(),
            location: "North Village".to_string(),
            category: "Farming".to_string(),
            required_skills: ["farming".to_string()].into_iter().collect(),
            payment: "50 coins per day".to_string(),
            duration: "3 days".to_string(),
        },
    )?;
    println!("- {} posted \"{}\" ({})", john.name, job.title, job.id.0);
    for notification in engine.notifications(&tom.id)? {
        println!("  > notified {}: {}", tom.name, notification.message);
    }

    let snapshot = SeekerSnapshot {
        skills: vec!["farming".to_string()],
        rating: 4.7,
        experience: "Hard worker with experience in farming.".to_string(),
    };
    let tom_application = engine.apply(&job.id, &tom, snapshot.clone())?;
    engine.apply(&job.id, &sarah, snapshot)?;
    let open = engine.job(&job.id)?;
    println!("- {} applicants on \"{}\"", open.applicants, open.title);
    for application in engine.applications_for_job(&job.id, &john)? {
        println!(
            "  > {} ({}) rated {:.1}",
            application.seeker_name,
            application.status.label(),
            application.seeker_profile.rating
        );
    }

    let selected = engine.select(&job.id, &tom_application.id, &john)?;
    println!("- {} selected {}", john.name, selected.seeker_name);
    for application in engine.applications_for_job(&job.id, &john)? {
        println!(
            "  > {} is now {}",
            application.seeker_name,
            application.status.label()
        );
    }

    let completed = engine.complete(&job.id, &john, 5, "great job")?;
    println!(
        "- \"{}\" completed at {}",
        completed.title,
        completed
            .completed_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    );
    if let Some(rating) = store.rating(&tom.id) {
        println!("  > {} now rated {:.1}", tom.name, rating);
    }

    println!("\nNotifications for {}:", tom.name);
    for notification in engine.notifications(&tom.id)? {
        println!("  [{}] {}", notification.kind.label(), notification.message);
    }

    println!("\nFinal job record:");
    match serde_json::to_string_pretty(&completed) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  payload unavailable: {err}"),
    }

    Ok(())
}
