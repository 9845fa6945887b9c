//! Job/application lifecycle engine for the village jobs marketplace.
//!
//! Providers post jobs, seekers apply, a provider selects one applicant,
//! either party completes the job, and ratings update. The module is laid
//! out along the ownership boundaries of those transitions: the
//! [`jobs::JobController`] is the only writer of job status fields, the
//! [`applications::ApplicationController`] the only writer of application
//! status and feedback, and the [`engine::LifecycleEngine`] facade
//! sequences them per operation, flushing notification side effects only
//! after the primary state commit.

pub mod applications;
pub mod domain;
pub mod engine;
pub mod jobs;
pub mod memory;
pub mod notify;
pub mod rating;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use applications::ApplicationController;
pub use domain::{
    Actor, ActorRole, Application, ApplicationId, ApplicationStatus, Feedback, InvalidRating, Job,
    JobId, JobPosting, JobStatus, JobTransition, Notification, NotificationId, NotificationKind,
    SeekerSnapshot, UserId,
};
pub use engine::{EngineError, LifecycleEngine};
pub use jobs::JobController;
pub use memory::{MemoryStore, SeekerRecord};
pub use notify::{NotificationDraft, NotificationEmitter};
pub use rating::RatingAggregator;
pub use router::{
    marketplace_router, ActorPayload, ApplyRequest, CompleteJobRequest, CreateJobRequest,
};
pub use store::{MarketplaceStore, ProfileDirectory, SeekerContact, StoreError};
