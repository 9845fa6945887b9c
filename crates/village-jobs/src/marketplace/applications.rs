use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{
    Actor, Application, ApplicationId, ApplicationStatus, Feedback, Job, JobId, SeekerSnapshot,
};
use super::engine::EngineError;
use super::notify::NotificationDraft;
use super::store::{MarketplaceStore, StoreError};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Governs creation, selection validation, and feedback recording for
/// applications. The only writer of an application's `status` and
/// `feedback` fields.
pub struct ApplicationController<S> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> ApplicationController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a pending application for an open job and queues the
    /// provider's `new-application` notification.
    ///
    /// Duplicate applications by the same seeker are rejected both by the
    /// explicit lookup and by the store's unique (job, seeker) insert, so
    /// a racing duplicate cannot slip through between the two. The insert
    /// itself re-checks job openness inside the store's critical section,
    /// so a selection landing after the caller's job read cannot leave a
    /// pending straggler behind.
    pub(crate) fn apply(
        &self,
        job: &Job,
        actor: &Actor,
        snapshot: SeekerSnapshot,
    ) -> Result<(Application, NotificationDraft), EngineError> {
        if !job.status.accepts_applications() {
            return Err(EngineError::InvalidState("job is not open for applications"));
        }
        if self
            .store
            .application_by_seeker(&job.id, &actor.id)?
            .is_some()
        {
            return Err(EngineError::Conflict("seeker has already applied for this job"));
        }

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            seeker_id: actor.id.clone(),
            seeker_name: actor.name.clone(),
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
            seeker_profile: snapshot,
            feedback: None,
        };
        let stored = match self.store.insert_application_if_open(application) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                return Err(EngineError::InvalidState("job is not open for applications"))
            }
            Err(StoreError::Conflict) => {
                return Err(EngineError::Conflict("seeker has already applied for this job"))
            }
            Err(other) => return Err(EngineError::Store(other)),
        };

        let draft = NotificationDraft::new_application(
            job.provider_id.clone(),
            &stored.seeker_name,
            &job.title,
        );
        Ok((stored, draft))
    }

    /// Resolves the application a provider wants to select and confirms
    /// it belongs to the job in question.
    pub(crate) fn resolve_for_selection(
        &self,
        job: &Job,
        id: &ApplicationId,
    ) -> Result<Application, EngineError> {
        let application = self
            .store
            .application(id)?
            .ok_or(EngineError::NotFound("application"))?;
        if application.job_id != job.id {
            return Err(EngineError::NotFound("application"));
        }
        Ok(application)
    }

    /// Records completion feedback on the job's selected application,
    /// exactly once. A job without a recorded application (seeded or
    /// manually assigned) completes without feedback; the miss is logged
    /// and ignored.
    pub(crate) fn record_feedback(
        &self,
        job: &JobId,
        feedback: Feedback,
    ) -> Result<Option<Application>, EngineError> {
        let Some(mut application) = self.store.selected_application(job)? else {
            warn!(job = %job.0, "no selected application to receive feedback");
            return Ok(None);
        };
        if application.feedback.is_some()
            || !self.store.set_feedback_if_absent(&application.id, feedback.clone())?
        {
            return Err(EngineError::Conflict("feedback has already been recorded"));
        }
        application.feedback = Some(feedback);
        Ok(Some(application))
    }
}
