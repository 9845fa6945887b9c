use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use village_jobs::marketplace::{
    Application, ApplicationId, ApplicationStatus, Feedback, Job, JobId, JobStatus,
    MarketplaceStore, MemoryStore, Notification, NotificationId, NotificationKind,
    ProfileDirectory, SeekerRecord, SeekerSnapshot, StoreError, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

struct SeedJob {
    id: &'static str,
    provider_id: &'static str,
    provider_name: &'static str,
    title: &'static str,
    description: &'static str,
    location: &'static str,
    category: &'static str,
    required_skills: &'static [&'static str],
    payment: &'static str,
    duration: &'static str,
    status: JobStatus,
    assigned_to: Option<&'static str>,
    applicants: u32,
    created_days_ago: i64,
    completed_days_ago: Option<i64>,
}

impl SeedJob {
    fn into_job(self, now: DateTime<Utc>) -> Job {
        Job {
            id: JobId(self.id.to_string()),
            provider_id: UserId(self.provider_id.to_string()),
            provider_name: self.provider_name.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            location: self.location.to_string(),
            category: self.category.to_string(),
            required_skills: skills(self.required_skills),
            payment: self.payment.to_string(),
            duration: self.duration.to_string(),
            status: self.status,
            assigned_to: self.assigned_to.map(|id| UserId(id.to_string())),
            applicants: self.applicants,
            created_at: now - Duration::days(self.created_days_ago),
            completed_at: self
                .completed_days_ago
                .map(|days| now - Duration::days(days)),
        }
    }
}

/// Loads the sample catalog into an empty store: three providers, three
/// seekers, and jobs covering every lifecycle state, so a fresh service
/// has data worth browsing.
pub(crate) fn seed_marketplace(store: &MemoryStore) -> Result<(), StoreError> {
    let now = Utc::now();

    for (id, name, seeker_skills, rating) in [
        (
            "user-tom",
            "Tom Smith",
            &["farming", "construction", "animal care"][..],
            4.7,
        ),
        (
            "user-sarah",
            "Sarah Johnson",
            &["cooking", "childcare", "crafting"][..],
            4.6,
        ),
        (
            "user-david",
            "David Lee",
            &["farming", "animal care", "heavy lifting"][..],
            4.4,
        ),
    ] {
        store.register_seeker(SeekerRecord {
            id: UserId(id.to_string()),
            name: name.to_string(),
            skills: skills(seeker_skills),
        });
        store.set_rating(&UserId(id.to_string()), rating)?;
    }
    for (id, rating) in [("user-john", 4.8), ("user-mike", 4.5), ("user-lisa", 4.9)] {
        store.set_rating(&UserId(id.to_string()), rating)?;
    }

    let jobs = [
        SeedJob {
            id: "job-harvest",
            provider_id: "user-john",
            provider_name: "Farmer John",
            title: "Harvest Help Needed",
            description: "Looking for 2 people to help with wheat harvest. Experience preferred but not required.",
            location: "North Village",
            category: "Farming",
            required_skills: &["farming", "heavy lifting"],
            payment: "50 coins per day",
            duration: "3 days",
            status: JobStatus::Open,
            assigned_to: None,
            applicants: 1,
            created_days_ago: 0,
            completed_days_ago: None,
        },
        SeedJob {
            id: "job-furniture",
            provider_id: "user-mike",
            provider_name: "Carpenter Mike",
            title: "Furniture Repair Assistant",
            description: "Need someone to help repair village furniture. Must have basic woodworking skills.",
            location: "East Village",
            category: "Carpentry",
            required_skills: &["construction", "crafting"],
            payment: "70 coins per day",
            duration: "5 days",
            status: JobStatus::Open,
            assigned_to: None,
            applicants: 2,
            created_days_ago: 0,
            completed_days_ago: None,
        },
        SeedJob {
            id: "job-inventory",
            provider_id: "user-lisa",
            provider_name: "Shopkeeper Lisa",
            title: "Store Inventory Manager",
            description: "Help organize and manage store inventory. Must be detail-oriented and good with numbers.",
            location: "Central Village",
            category: "Retail",
            required_skills: &["organization", "mathematics"],
            payment: "60 coins per day",
            duration: "Ongoing",
            status: JobStatus::Open,
            assigned_to: None,
            applicants: 0,
            created_days_ago: 0,
            completed_days_ago: None,
        },
        SeedJob {
            id: "job-animal",
            provider_id: "user-john",
            provider_name: "Farmer John",
            title: "Animal Caretaker",
            description: "Need someone to feed and care for farm animals while I am away.",
            location: "North Village",
            category: "Farming",
            required_skills: &["animal care", "farming"],
            payment: "55 coins per day",
            duration: "7 days",
            status: JobStatus::Assigned,
            assigned_to: Some("user-david"),
            applicants: 3,
            created_days_ago: 7,
            completed_days_ago: None,
        },
        SeedJob {
            id: "job-festival",
            provider_id: "user-lisa",
            provider_name: "Shopkeeper Lisa",
            title: "Festival Food Preparation",
            description: "Looking for someone to help prepare food for the upcoming village festival.",
            location: "Central Village",
            category: "Cooking",
            required_skills: &["cooking"],
            payment: "65 coins per day",
            duration: "2 days",
            status: JobStatus::Completed,
            assigned_to: Some("user-sarah"),
            applicants: 2,
            created_days_ago: 12,
            completed_days_ago: Some(10),
        },
    ];
    for job in jobs {
        store.insert_job(job.into_job(now))?;
    }

    let festival_feedback = Feedback {
        rating: 5,
        comment: "Sarah did an excellent job with the festival food preparation. Everyone loved it!"
            .to_string(),
    };
    let applications = [
        seed_application(
            "app-harvest-david",
            "job-harvest",
            "user-david",
            "David Lee",
            ApplicationStatus::Pending,
            now - Duration::hours(2),
            None,
        ),
        seed_application(
            "app-furniture-tom",
            "job-furniture",
            "user-tom",
            "Tom Smith",
            ApplicationStatus::Pending,
            now - Duration::hours(1),
            None,
        ),
        seed_application(
            "app-furniture-sarah",
            "job-furniture",
            "user-sarah",
            "Sarah Johnson",
            ApplicationStatus::Pending,
            now - Duration::minutes(30),
            None,
        ),
        seed_application(
            "app-animal-david",
            "job-animal",
            "user-david",
            "David Lee",
            ApplicationStatus::Selected,
            now - Duration::days(8),
            None,
        ),
        seed_application(
            "app-festival-sarah",
            "job-festival",
            "user-sarah",
            "Sarah Johnson",
            ApplicationStatus::Selected,
            now - Duration::days(13),
            Some(festival_feedback.clone()),
        ),
    ];
    // Direct restore: seeded applications belong to jobs that are already
    // assigned or completed, which the trait insert would refuse.
    for application in applications {
        store.restore_application(application);
    }

    let notifications = [
        seed_notification(
            "ntf-harvest-john",
            "user-john",
            NotificationKind::NewApplication,
            "New Application",
            "David Lee has applied for your job: Harvest Help Needed",
            false,
            now - Duration::hours(2),
        ),
        seed_notification(
            "ntf-furniture-mike-1",
            "user-mike",
            NotificationKind::NewApplication,
            "New Application",
            "Tom Smith has applied for your job: Furniture Repair Assistant",
            true,
            now - Duration::hours(1),
        ),
        seed_notification(
            "ntf-furniture-mike-2",
            "user-mike",
            NotificationKind::NewApplication,
            "New Application",
            "Sarah Johnson has applied for your job: Furniture Repair Assistant",
            false,
            now - Duration::minutes(30),
        ),
        seed_notification(
            "ntf-animal-david",
            "user-david",
            NotificationKind::JobSelected,
            "Job Offer",
            "You've been selected for the job: Animal Caretaker",
            true,
            now - Duration::days(7),
        ),
        seed_notification(
            "ntf-festival-sarah",
            "user-sarah",
            NotificationKind::JobFeedback,
            "Job Feedback",
            &format!(
                "You received a 5-star rating for the job: Festival Food Preparation. Feedback: {}",
                festival_feedback.comment
            ),
            false,
            now - Duration::days(10),
        ),
        seed_notification(
            "ntf-harvest-tom",
            "user-tom",
            NotificationKind::NewMatchingJob,
            "New Job Match",
            "A new job matching your skills has been posted: Harvest Help Needed",
            false,
            now - Duration::days(1),
        ),
    ];
    for notification in notifications {
        store.insert_notification(notification)?;
    }

    Ok(())
}

fn seed_application(
    id: &str,
    job_id: &str,
    seeker_id: &str,
    seeker_name: &str,
    status: ApplicationStatus,
    applied_at: DateTime<Utc>,
    feedback: Option<Feedback>,
) -> Application {
    let profile = match seeker_id {
        "user-tom" => SeekerSnapshot {
            skills: vec![
                "farming".to_string(),
                "construction".to_string(),
                "animal care".to_string(),
            ],
            rating: 4.7,
            experience: "Hard worker with experience in farming and construction.".to_string(),
        },
        "user-sarah" => SeekerSnapshot {
            skills: vec![
                "cooking".to_string(),
                "childcare".to_string(),
                "crafting".to_string(),
            ],
            rating: 4.6,
            experience: "Skilled in crafting, cooking, and childcare.".to_string(),
        },
        _ => SeekerSnapshot {
            skills: vec![
                "farming".to_string(),
                "animal care".to_string(),
                "heavy lifting".to_string(),
            ],
            rating: 4.4,
            experience: "Strong and reliable worker, good with animals and farming.".to_string(),
        },
    };

    Application {
        id: ApplicationId(id.to_string()),
        job_id: JobId(job_id.to_string()),
        seeker_id: UserId(seeker_id.to_string()),
        seeker_name: seeker_name.to_string(),
        status,
        applied_at,
        seeker_profile: profile,
        feedback,
    }
}

fn seed_notification(
    id: &str,
    user_id: &str,
    kind: NotificationKind,
    title: &str,
    message: &str,
    read: bool,
    timestamp: DateTime<Utc>,
) -> Notification {
    Notification {
        id: NotificationId(id.to_string()),
        user_id: UserId(user_id.to_string()),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        read,
        timestamp,
    }
}
