use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier for marketplace participants, issued by the external
/// identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for queued notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

/// Role attached to a verified actor by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Provider,
    Seeker,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Seeker => "seeker",
        }
    }

    /// The party on the other side of a job.
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Provider => Self::Seeker,
            Self::Seeker => Self::Provider,
        }
    }
}

/// Verified identity the API layer hands to the engine with every call.
/// Authentication and role verification happen upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: ActorRole,
    pub name: String,
}

/// Lifecycle states a job moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Assigned,
    Completed,
}

/// Guarded transitions on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTransition {
    Select,
    Complete,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
        }
    }

    /// Central transition table: `open --select--> assigned
    /// --complete--> completed`. Anything not listed is rejected, and
    /// nothing leaves `completed`.
    pub const fn permits(self, transition: JobTransition) -> bool {
        matches!(
            (self, transition),
            (Self::Open, JobTransition::Select) | (Self::Assigned, JobTransition::Complete)
        )
    }

    /// `open` is the only state from which an application is accepted.
    pub const fn accepts_applications(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Lifecycle states of a single application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }
}

/// Provider-authored fields for a new posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub required_skills: BTreeSet<String>,
    pub payment: String,
    pub duration: String,
}

/// A posted job together with its lifecycle bookkeeping.
///
/// `assigned_to` is set iff the status is `assigned` or `completed`;
/// `completed_at` is set iff the status is `completed`; `applicants`
/// never decreases. The job controller is the only writer of these
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub provider_id: UserId,
    pub provider_name: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub required_skills: BTreeSet<String>,
    pub payment: String,
    pub duration: String,
    pub status: JobStatus,
    pub assigned_to: Option<UserId>,
    pub applicants: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Whether the per-job invariants hold. Used by property tests over
    /// random transition sequences.
    pub fn state_consistent(&self) -> bool {
        let assignment_ok = match self.status {
            JobStatus::Open => self.assigned_to.is_none(),
            JobStatus::Assigned | JobStatus::Completed => self.assigned_to.is_some(),
        };
        let completion_ok = (self.status == JobStatus::Completed) == self.completed_at.is_some();
        assignment_ok && completion_ok
    }
}

/// Profile snapshot captured at application time so providers see the
/// seeker as they applied, not as they later edited their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekerSnapshot {
    pub skills: Vec<String>,
    pub rating: f64,
    pub experience: String,
}

/// Completion feedback left for the other party. Write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: u8,
    pub comment: String,
}

/// Raised when a feedback rating falls outside the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub u8);

impl Feedback {
    pub fn new(rating: u8, comment: impl Into<String>) -> Result<Self, InvalidRating> {
        if !(1..=5).contains(&rating) {
            return Err(InvalidRating(rating));
        }
        Ok(Self {
            rating,
            comment: comment.into(),
        })
    }
}

/// A seeker's bid on a job. The application controller is the only
/// writer of `status` and `feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub seeker_id: UserId,
    pub seeker_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub seeker_profile: SeekerSnapshot,
    pub feedback: Option<Feedback>,
}

/// Event tags carried on notification records, matching the wire tags
/// consumed by downstream delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    NewApplication,
    JobSelected,
    JobFeedback,
    NewMatchingJob,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewApplication => "new-application",
            Self::JobSelected => "job-selected",
            Self::JobFeedback => "job-feedback",
            Self::NewMatchingJob => "new-matching-job",
        }
    }
}

/// Durably queued notification record. Created by the engine as a side
/// effect of a lifecycle transition; only the recipient flips `read`;
/// never deleted. Delivery transport is a downstream concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_only_permits_the_two_legal_edges() {
        assert!(JobStatus::Open.permits(JobTransition::Select));
        assert!(JobStatus::Assigned.permits(JobTransition::Complete));

        assert!(!JobStatus::Open.permits(JobTransition::Complete));
        assert!(!JobStatus::Assigned.permits(JobTransition::Select));
        assert!(!JobStatus::Completed.permits(JobTransition::Select));
        assert!(!JobStatus::Completed.permits(JobTransition::Complete));
    }

    #[test]
    fn only_open_jobs_accept_applications() {
        assert!(JobStatus::Open.accepts_applications());
        assert!(!JobStatus::Assigned.accepts_applications());
        assert!(!JobStatus::Completed.accepts_applications());
    }

    #[test]
    fn feedback_rating_is_bounded() {
        assert!(Feedback::new(0, "too low").is_err());
        assert!(Feedback::new(6, "too high").is_err());
        for rating in 1..=5 {
            assert!(Feedback::new(rating, "ok").is_ok());
        }
    }

    #[test]
    fn notification_kinds_use_the_wire_tags() {
        let tag = serde_json::to_string(&NotificationKind::NewMatchingJob).expect("serializes");
        assert_eq!(tag, "\"new-matching-job\"");
        assert_eq!(NotificationKind::JobFeedback.label(), "job-feedback");
    }
}
