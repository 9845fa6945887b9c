use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{
    Actor, Application, Job, JobId, JobPosting, JobStatus, JobTransition,
};
use super::engine::EngineError;
use super::notify::NotificationDraft;
use super::store::{MarketplaceStore, ProfileDirectory};

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Governs job status transitions. The only writer of a job's `status`,
/// `assigned_to`, `applicants`, and `completed_at` fields.
pub struct JobController<S, P> {
    store: Arc<S>,
    profiles: Arc<P>,
}

impl<S: MarketplaceStore, P: ProfileDirectory> JobController<S, P> {
    pub fn new(store: Arc<S>, profiles: Arc<P>) -> Self {
        Self { store, profiles }
    }

    /// Opens a new posting and queues a `new-matching-job` draft for every
    /// seeker whose skill set intersects the requirements. The fan-out is
    /// best-effort: a directory failure skips the matching step without
    /// failing the creation.
    pub(crate) fn create(
        &self,
        actor: &Actor,
        posting: JobPosting,
    ) -> Result<(Job, Vec<NotificationDraft>), EngineError> {
        let job = Job {
            id: next_job_id(),
            provider_id: actor.id.clone(),
            provider_name: actor.name.clone(),
            title: posting.title,
            description: posting.description,
            location: posting.location,
            category: posting.category,
            required_skills: posting.required_skills,
            payment: posting.payment,
            duration: posting.duration,
            status: JobStatus::Open,
            assigned_to: None,
            applicants: 0,
            created_at: Utc::now(),
            completed_at: None,
        };
        let stored = self.store.insert_job(job)?;

        let drafts = match self.profiles.matching_seekers(&stored.required_skills) {
            Ok(seekers) => seekers
                .into_iter()
                .map(|seeker| NotificationDraft::new_matching_job(seeker.id, &stored.title))
                .collect(),
            Err(err) => {
                warn!(job = %stored.id.0, %err, "skill-match lookup failed, skipping job-match fan-out");
                Vec::new()
            }
        };
        Ok((stored, drafts))
    }

    /// Atomic applicant-count bump after a successful application insert.
    pub(crate) fn note_applicant(&self, job: &JobId) -> Result<(), EngineError> {
        self.store.increment_applicants(job).map_err(Into::into)
    }

    /// Commits the `open -> assigned` transition for the chosen
    /// application, rejecting every sibling in the same store-level
    /// critical section. Exactly one of several racing selections wins;
    /// losers observe the job as no longer open.
    pub(crate) fn assign(
        &self,
        job: &Job,
        application: &Application,
        actor: &Actor,
    ) -> Result<(Job, NotificationDraft), EngineError> {
        if job.provider_id != actor.id {
            return Err(EngineError::Forbidden(
                "you can only select applicants for your own jobs",
            ));
        }
        if !job.status.permits(JobTransition::Select) {
            return Err(EngineError::InvalidState("only open jobs can accept a selection"));
        }

        let Some(assigned) =
            self.store
                .select_applicant(&job.id, &application.id, &application.seeker_id)?
        else {
            return Err(EngineError::InvalidState("only open jobs can accept a selection"));
        };

        let draft = NotificationDraft::job_selected(application.seeker_id.clone(), &assigned.title);
        Ok((assigned, draft))
    }

    /// Precondition checks for completion: the actor must be the provider
    /// or the assigned seeker, and the job must be assigned.
    pub(crate) fn authorize_completion(&self, job: &Job, actor: &Actor) -> Result<(), EngineError> {
        let is_provider = job.provider_id == actor.id;
        let is_assignee = job.assigned_to.as_ref() == Some(&actor.id);
        if !is_provider && !is_assignee {
            return Err(EngineError::Forbidden(
                "you can only complete your own jobs or jobs assigned to you",
            ));
        }
        if !job.status.permits(JobTransition::Complete) {
            return Err(EngineError::InvalidState("only assigned jobs can be completed"));
        }
        Ok(())
    }

    /// Conditional `assigned -> completed` commit. This is deliberately
    /// the last primary-state write of a completion, so an interrupted
    /// call leaves the job recoverable in its pre-transition state.
    pub(crate) fn commit_completion(&self, job: &JobId) -> Result<Job, EngineError> {
        self.store
            .complete_job_if_assigned(job, Utc::now())?
            .ok_or(EngineError::InvalidState("only assigned jobs can be completed"))
    }
}
