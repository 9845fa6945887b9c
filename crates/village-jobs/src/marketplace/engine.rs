use std::sync::Arc;

use tracing::{info, warn};

use super::applications::ApplicationController;
use super::domain::{
    Actor, ActorRole, Application, ApplicationId, Feedback, InvalidRating, Job, JobId, JobPosting,
    Notification, NotificationId, SeekerSnapshot, UserId,
};
use super::jobs::JobController;
use super::notify::{NotificationDraft, NotificationEmitter};
use super::rating::RatingAggregator;
use super::store::{MarketplaceStore, ProfileDirectory, StoreError};

/// Failure taxonomy surfaced to the API layer. These are business-rule
/// violations, never retried; transient storage faults surface through
/// the `Store` passthrough.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    InvalidRating(#[from] InvalidRating),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Entry point the API layer drives with a verified actor and an intent.
///
/// Each public operation is one logical transaction: the facade loads the
/// aggregates, enforces the role preconditions shared by all operations,
/// sequences the controllers, and flushes queued notification drafts only
/// after the primary state transition has committed. It never returns
/// partial state.
pub struct LifecycleEngine<S, P> {
    store: Arc<S>,
    jobs: JobController<S, P>,
    applications: ApplicationController<S>,
    notifier: NotificationEmitter<S>,
    ratings: RatingAggregator<S, P>,
}

impl<S: MarketplaceStore, P: ProfileDirectory> LifecycleEngine<S, P> {
    pub fn new(store: Arc<S>, profiles: Arc<P>) -> Self {
        Self {
            jobs: JobController::new(store.clone(), profiles.clone()),
            applications: ApplicationController::new(store.clone()),
            notifier: NotificationEmitter::new(store.clone()),
            ratings: RatingAggregator::new(store.clone(), profiles),
            store,
        }
    }

    /// Posts a new job and fans out match notifications to seekers with
    /// overlapping skills.
    pub fn create_job(&self, actor: &Actor, posting: JobPosting) -> Result<Job, EngineError> {
        if actor.role != ActorRole::Provider {
            return Err(EngineError::Forbidden("only job providers can create jobs"));
        }
        let (job, drafts) = self.jobs.create(actor, posting)?;
        info!(job = %job.id.0, provider = %job.provider_id.0, "job posted");
        self.notifier.flush(drafts);
        Ok(job)
    }

    /// Submits an application for an open job.
    pub fn apply(
        &self,
        job_id: &JobId,
        actor: &Actor,
        snapshot: SeekerSnapshot,
    ) -> Result<Application, EngineError> {
        if actor.role != ActorRole::Seeker {
            return Err(EngineError::Forbidden("only job seekers can apply for jobs"));
        }
        let job = self.load_job(job_id)?;
        let (application, draft) = self.applications.apply(&job, actor, snapshot)?;
        self.jobs.note_applicant(job_id)?;
        info!(job = %job_id.0, application = %application.id.0, "application submitted");
        self.notifier.flush(vec![draft]);
        Ok(application)
    }

    /// Selects one applicant, rejecting all siblings and assigning the
    /// job, as a single visible transition.
    pub fn select(
        &self,
        job_id: &JobId,
        application_id: &ApplicationId,
        actor: &Actor,
    ) -> Result<Application, EngineError> {
        if actor.role != ActorRole::Provider {
            return Err(EngineError::Forbidden("only job providers can select applicants"));
        }
        let job = self.load_job(job_id)?;
        let application = self.applications.resolve_for_selection(&job, application_id)?;
        let (assigned, draft) = self.jobs.assign(&job, &application, actor)?;
        info!(job = %assigned.id.0, seeker = %application.seeker_id.0, "applicant selected");
        self.notifier.flush(vec![draft]);

        self.store
            .application(application_id)?
            .ok_or(EngineError::NotFound("application"))
    }

    /// Completes an assigned job: records write-once feedback on the
    /// selected application, commits the transition, notifies the rated
    /// party, and recomputes their average rating.
    pub fn complete(
        &self,
        job_id: &JobId,
        actor: &Actor,
        rating: u8,
        comment: &str,
    ) -> Result<Job, EngineError> {
        let job = self.load_job(job_id)?;
        self.jobs.authorize_completion(&job, actor)?;
        let feedback = Feedback::new(rating, comment)?;

        self.applications.record_feedback(job_id, feedback)?;
        let completed = self.jobs.commit_completion(job_id)?;
        info!(job = %completed.id.0, "job completed");

        // The actor rates the other party.
        let rated = if actor.id == completed.provider_id {
            completed
                .assigned_to
                .clone()
                .map(|seeker| (seeker, ActorRole::Seeker))
        } else {
            Some((completed.provider_id.clone(), ActorRole::Provider))
        };
        match rated {
            Some((party, role)) => {
                self.notifier.flush(vec![NotificationDraft::job_feedback(
                    party.clone(),
                    &completed.title,
                    rating,
                    comment,
                )]);
                self.ratings.recompute(&party, role)?;
            }
            None => {
                warn!(job = %completed.id.0, "completed job has no assignee to rate");
            }
        }
        Ok(completed)
    }

    /// Point lookup for the API layer.
    pub fn job(&self, id: &JobId) -> Result<Job, EngineError> {
        self.load_job(id)
    }

    /// Provider-only listing of a job's applications.
    pub fn applications_for_job(
        &self,
        job_id: &JobId,
        actor: &Actor,
    ) -> Result<Vec<Application>, EngineError> {
        let job = self.load_job(job_id)?;
        if job.provider_id != actor.id {
            return Err(EngineError::Forbidden(
                "you can only view applications for your own jobs",
            ));
        }
        self.store.applications_for_job(job_id).map_err(Into::into)
    }

    /// Notifications queued for a user, newest first.
    pub fn notifications(&self, user: &UserId) -> Result<Vec<Notification>, EngineError> {
        self.store.notifications_for(user).map_err(Into::into)
    }

    /// Marks one notification read; only the recipient may do so.
    pub fn mark_notification_read(
        &self,
        id: &NotificationId,
        actor: &Actor,
    ) -> Result<(), EngineError> {
        let notification = self
            .store
            .notification(id)?
            .ok_or(EngineError::NotFound("notification"))?;
        if notification.user_id != actor.id {
            return Err(EngineError::Forbidden(
                "you can only mark your own notifications as read",
            ));
        }
        self.store.mark_notification_read(id).map_err(Into::into)
    }

    /// Marks every notification for the actor as read.
    pub fn mark_all_notifications_read(&self, actor: &Actor) -> Result<(), EngineError> {
        self.store
            .mark_all_notifications_read(&actor.id)
            .map_err(Into::into)
    }

    fn load_job(&self, id: &JobId) -> Result<Job, EngineError> {
        self.store.job(id)?.ok_or(EngineError::NotFound("job"))
    }
}
