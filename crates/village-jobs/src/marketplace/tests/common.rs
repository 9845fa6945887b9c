use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::marketplace::domain::{
    Actor, ActorRole, Application, ApplicationId, Feedback, Job, JobId, JobPosting,
    Notification, NotificationId, NotificationKind, SeekerSnapshot, UserId,
};
use crate::marketplace::engine::LifecycleEngine;
use crate::marketplace::memory::MemoryStore;
use crate::marketplace::store::{MarketplaceStore, StoreError};

pub(super) fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn provider() -> Actor {
    Actor {
        id: UserId("user-john".to_string()),
        role: ActorRole::Provider,
        name: "Farmer John".to_string(),
    }
}

pub(super) fn seeker(id: &str, name: &str) -> Actor {
    Actor {
        id: UserId(id.to_string()),
        role: ActorRole::Seeker,
        name: name.to_string(),
    }
}

pub(super) fn tom() -> Actor {
    seeker("user-tom", "Tom Smith")
}

pub(super) fn sarah() -> Actor {
    seeker("user-sarah", "Sarah Johnson")
}

pub(super) fn snapshot() -> SeekerSnapshot {
    SeekerSnapshot {
        skills: vec!["farming".to_string(), "construction".to_string()],
        rating: 4.7,
        experience: "Hard worker with experience in farming and construction.".to_string(),
    }
}

pub(super) fn posting(title: &str, required: &[&str]) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        description: "Looking for help with the wheat harvest.".to_string(),
        location: "North Village".to_string(),
        category: "Farming".to_string(),
        required_skills: skills(required),
        payment: "50 coins per day".to_string(),
        duration: "3 days".to_string(),
    }
}

pub(super) type MemoryEngine = LifecycleEngine<MemoryStore, MemoryStore>;

pub(super) fn engine() -> (Arc<MemoryEngine>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let engine = Arc::new(LifecycleEngine::new(store.clone(), store.clone()));
    (engine, store)
}

pub(super) fn open_job(engine: &MemoryEngine) -> Job {
    engine
        .create_job(&provider(), posting("Harvest Help Needed", &["farming"]))
        .expect("job created")
}

/// Drives a job to the assigned state: Tom and Sarah apply, Tom wins.
pub(super) fn assigned_job(engine: &MemoryEngine) -> (Job, Application, Application) {
    let job = open_job(engine);
    let tom_app = engine
        .apply(&job.id, &tom(), snapshot())
        .expect("tom applies");
    let sarah_app = engine
        .apply(&job.id, &sarah(), snapshot())
        .expect("sarah applies");
    let selected = engine
        .select(&job.id, &tom_app.id, &provider())
        .expect("tom selected");
    (
        engine.job(&job.id).expect("job reloads"),
        selected,
        sarah_app,
    )
}

pub(super) fn notifications_of_kind(
    store: &MemoryStore,
    user: &UserId,
    kind: NotificationKind,
) -> Vec<Notification> {
    store
        .notifications_for(user)
        .expect("notifications load")
        .into_iter()
        .filter(|notification| notification.kind == kind)
        .collect()
}

/// Store double whose notification writes always fail, for exercising the
/// best-effort emitter path. All other operations delegate to a real
/// in-memory store.
#[derive(Default)]
pub(super) struct FlakyNotificationStore {
    pub(super) inner: MemoryStore,
}

impl MarketplaceStore for FlakyNotificationStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        self.inner.insert_job(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.inner.job(id)
    }

    fn completed_jobs_for_provider(&self, provider: &UserId) -> Result<Vec<Job>, StoreError> {
        self.inner.completed_jobs_for_provider(provider)
    }

    fn increment_applicants(&self, id: &JobId) -> Result<(), StoreError> {
        self.inner.increment_applicants(id)
    }

    fn select_applicant(
        &self,
        job: &JobId,
        selected: &ApplicationId,
        seeker: &UserId,
    ) -> Result<Option<Job>, StoreError> {
        self.inner.select_applicant(job, selected, seeker)
    }

    fn complete_job_if_assigned(
        &self,
        job: &JobId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError> {
        self.inner.complete_job_if_assigned(job, at)
    }

    fn insert_application_if_open(
        &self,
        application: Application,
    ) -> Result<Option<Application>, StoreError> {
        self.inner.insert_application_if_open(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.inner.application(id)
    }

    fn application_by_seeker(
        &self,
        job: &JobId,
        seeker: &UserId,
    ) -> Result<Option<Application>, StoreError> {
        self.inner.application_by_seeker(job, seeker)
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError> {
        self.inner.applications_for_job(job)
    }

    fn applications_by_seeker(&self, seeker: &UserId) -> Result<Vec<Application>, StoreError> {
        self.inner.applications_by_seeker(seeker)
    }

    fn selected_application(&self, job: &JobId) -> Result<Option<Application>, StoreError> {
        self.inner.selected_application(job)
    }

    fn set_feedback_if_absent(
        &self,
        id: &ApplicationId,
        feedback: Feedback,
    ) -> Result<bool, StoreError> {
        self.inner.set_feedback_if_absent(id, feedback)
    }

    fn insert_notification(&self, _notification: Notification) -> Result<Notification, StoreError> {
        Err(StoreError::Unavailable("notification shard down".to_string()))
    }

    fn notification(&self, id: &NotificationId) -> Result<Option<Notification>, StoreError> {
        self.inner.notification(id)
    }

    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError> {
        self.inner.notifications_for(user)
    }

    fn mark_notification_read(&self, id: &NotificationId) -> Result<(), StoreError> {
        self.inner.mark_notification_read(id)
    }

    fn mark_all_notifications_read(&self, user: &UserId) -> Result<(), StoreError> {
        self.inner.mark_all_notifications_read(user)
    }
}
