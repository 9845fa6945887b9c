use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::domain::{
    Application, ApplicationId, Feedback, Job, JobId, Notification, NotificationId, UserId,
};

/// Document-store collaborator backing the lifecycle engine.
///
/// Every method is a single atomic unit from the engine's point of view:
/// conditional updates check and write in one step, the applicant counter
/// increments without a read-modify-write cycle, and [`select_applicant`]
/// applies its multi-document write inside one per-job critical section.
/// Transient connectivity faults are retried behind this boundary; the
/// engine only ever sees [`StoreError`].
///
/// [`select_applicant`]: MarketplaceStore::select_applicant
pub trait MarketplaceStore: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn completed_jobs_for_provider(&self, provider: &UserId) -> Result<Vec<Job>, StoreError>;

    /// Atomically bumps the applicant counter for a job.
    fn increment_applicants(&self, id: &JobId) -> Result<(), StoreError>;

    /// Assigns the job to `seeker` iff it is still open, marking `selected`
    /// as the chosen application and every sibling rejected in the same
    /// critical section. Returns the updated job, or `None` when the job
    /// was no longer open (a concurrent selection won).
    fn select_applicant(
        &self,
        job: &JobId,
        selected: &ApplicationId,
        seeker: &UserId,
    ) -> Result<Option<Job>, StoreError>;

    /// Marks the job completed iff it is currently assigned. Returns the
    /// updated job, or `None` when the conditional write did not apply.
    fn complete_job_if_assigned(
        &self,
        job: &JobId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError>;

    /// Inserts an application iff its job is still open, enforcing at
    /// most one application per (job, seeker) pair. Returns `None` when
    /// the job had left the open state (a concurrent selection landed
    /// between the caller's job read and this insert).
    fn insert_application_if_open(
        &self,
        application: Application,
    ) -> Result<Option<Application>, StoreError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn application_by_seeker(
        &self,
        job: &JobId,
        seeker: &UserId,
    ) -> Result<Option<Application>, StoreError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError>;
    fn applications_by_seeker(&self, seeker: &UserId) -> Result<Vec<Application>, StoreError>;
    fn selected_application(&self, job: &JobId) -> Result<Option<Application>, StoreError>;

    /// Writes feedback exactly once; returns `false` when feedback was
    /// already present.
    fn set_feedback_if_absent(
        &self,
        id: &ApplicationId,
        feedback: Feedback,
    ) -> Result<bool, StoreError>;

    fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError>;
    fn notification(&self, id: &NotificationId) -> Result<Option<Notification>, StoreError>;
    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError>;
    fn mark_notification_read(&self, id: &NotificationId) -> Result<(), StoreError>;
    fn mark_all_notifications_read(&self, user: &UserId) -> Result<(), StoreError>;
}

/// Identity/profile collaborator. The engine only reads skill rosters for
/// job-match fan-out and writes the derived rating field it owns; the
/// profiles themselves belong to the external profile service.
pub trait ProfileDirectory: Send + Sync {
    /// Seekers whose skill set intersects `skills`.
    fn matching_seekers(&self, skills: &BTreeSet<String>) -> Result<Vec<SeekerContact>, StoreError>;

    /// Persists the recomputed average rating for a party.
    fn set_rating(&self, user: &UserId, rating: f64) -> Result<(), StoreError>;
}

/// Minimal slice of a profile needed for job-match fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekerContact {
    pub id: UserId,
    pub name: String,
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
