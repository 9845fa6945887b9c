use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Feedback, Job, JobId, JobStatus, Notification,
    NotificationId, UserId,
};
use super::store::{MarketplaceStore, ProfileDirectory, SeekerContact, StoreError};

/// Directory entry for a registered seeker, used to answer skill-match
/// queries during job-creation fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekerRecord {
    pub id: UserId,
    pub name: String,
    pub skills: BTreeSet<String>,
}

#[derive(Default)]
struct Collections {
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    notifications: HashMap<NotificationId, Notification>,
    seekers: Vec<SeekerRecord>,
    ratings: HashMap<UserId, f64>,
}

/// In-memory document store used by the api service and the test suites.
///
/// A single mutex guards all collections, so each trait method behaves
/// like one atomic document-store operation; `select_applicant` in
/// particular gets the per-job critical section the engine relies on. A
/// production deployment would swap in a backend with multi-document
/// transactions behind the same traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    /// Adds a seeker to the profile directory.
    pub fn register_seeker(&self, record: SeekerRecord) {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.seekers.push(record);
    }

    /// The derived rating last written for a party, if any.
    pub fn rating(&self, user: &UserId) -> Option<f64> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        guard.ratings.get(user).copied()
    }

    /// Loads a historical application record directly, bypassing the
    /// open-job guard of the trait insert. Used when seeding catalogs
    /// whose jobs are already assigned or completed; the caller owns id
    /// uniqueness.
    pub fn restore_application(&self, application: Application) {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .applications
            .insert(application.id.clone(), application);
    }
}

impl MarketplaceStore for MemoryStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if guard.jobs.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.jobs.get(id).cloned())
    }

    fn completed_jobs_for_provider(&self, provider: &UserId) -> Result<Vec<Job>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .jobs
            .values()
            .filter(|job| job.provider_id == *provider && job.status == JobStatus::Completed)
            .cloned()
            .collect())
    }

    fn increment_applicants(&self, id: &JobId) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let job = guard.jobs.get_mut(id).ok_or(StoreError::NotFound)?;
        job.applicants = job.applicants.saturating_add(1);
        Ok(())
    }

    fn select_applicant(
        &self,
        job: &JobId,
        selected: &ApplicationId,
        seeker: &UserId,
    ) -> Result<Option<Job>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        {
            let record = guard.jobs.get_mut(job).ok_or(StoreError::NotFound)?;
            if record.status != JobStatus::Open {
                return Ok(None);
            }
            record.status = JobStatus::Assigned;
            record.assigned_to = Some(seeker.clone());
        }
        for application in guard.applications.values_mut() {
            if application.job_id != *job {
                continue;
            }
            application.status = if application.id == *selected {
                ApplicationStatus::Selected
            } else {
                ApplicationStatus::Rejected
            };
        }
        Ok(guard.jobs.get(job).cloned())
    }

    fn complete_job_if_assigned(
        &self,
        job: &JobId,
        at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let record = guard.jobs.get_mut(job).ok_or(StoreError::NotFound)?;
        if record.status != JobStatus::Assigned {
            return Ok(None);
        }
        record.status = JobStatus::Completed;
        record.completed_at = Some(at);
        Ok(Some(record.clone()))
    }

    fn insert_application_if_open(
        &self,
        application: Application,
    ) -> Result<Option<Application>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let job = guard
            .jobs
            .get(&application.job_id)
            .ok_or(StoreError::NotFound)?;
        if !job.status.accepts_applications() {
            return Ok(None);
        }
        if guard.applications.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        // Unique-index semantics on (job, seeker).
        let duplicate = guard.applications.values().any(|existing| {
            existing.job_id == application.job_id && existing.seeker_id == application.seeker_id
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(Some(application))
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.applications.get(id).cloned())
    }

    fn application_by_seeker(
        &self,
        job: &JobId,
        seeker: &UserId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .applications
            .values()
            .find(|application| application.job_id == *job && application.seeker_id == *seeker)
            .cloned())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut applications: Vec<Application> = guard
            .applications
            .values()
            .filter(|application| application.job_id == *job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        Ok(applications)
    }

    fn applications_by_seeker(&self, seeker: &UserId) -> Result<Vec<Application>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut applications: Vec<Application> = guard
            .applications
            .values()
            .filter(|application| application.seeker_id == *seeker)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.applied_at.cmp(&b.applied_at));
        Ok(applications)
    }

    fn selected_application(&self, job: &JobId) -> Result<Option<Application>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .applications
            .values()
            .find(|application| {
                application.job_id == *job && application.status == ApplicationStatus::Selected
            })
            .cloned())
    }

    fn set_feedback_if_absent(
        &self,
        id: &ApplicationId,
        feedback: Feedback,
    ) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let application = guard.applications.get_mut(id).ok_or(StoreError::NotFound)?;
        if application.feedback.is_some() {
            return Ok(false);
        }
        application.feedback = Some(feedback);
        Ok(true)
    }

    fn insert_notification(&self, notification: Notification) -> Result<Notification, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if guard.notifications.contains_key(&notification.id) {
            return Err(StoreError::Conflict);
        }
        guard
            .notifications
            .insert(notification.id.clone(), notification.clone());
        Ok(notification)
    }

    fn notification(&self, id: &NotificationId) -> Result<Option<Notification>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.notifications.get(id).cloned())
    }

    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        let mut notifications: Vec<Notification> = guard
            .notifications
            .values()
            .filter(|notification| notification.user_id == *user)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notifications)
    }

    fn mark_notification_read(&self, id: &NotificationId) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let notification = guard.notifications.get_mut(id).ok_or(StoreError::NotFound)?;
        notification.read = true;
        Ok(())
    }

    fn mark_all_notifications_read(&self, user: &UserId) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        for notification in guard.notifications.values_mut() {
            if notification.user_id == *user {
                notification.read = true;
            }
        }
        Ok(())
    }
}

impl ProfileDirectory for MemoryStore {
    fn matching_seekers(&self, skills: &BTreeSet<String>) -> Result<Vec<SeekerContact>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .seekers
            .iter()
            .filter(|seeker| !seeker.skills.is_disjoint(skills))
            .map(|seeker| SeekerContact {
                id: seeker.id.clone(),
                name: seeker.name.clone(),
            })
            .collect())
    }

    fn set_rating(&self, user: &UserId, rating: f64) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.ratings.insert(user.clone(), rating);
        Ok(())
    }
}
