use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{Notification, NotificationId, NotificationKind, UserId};
use super::store::MarketplaceStore;

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

/// Notification queued by a controller during a transition and flushed by
/// the facade once the primary state commit has succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl NotificationDraft {
    pub fn new_application(provider: UserId, seeker_name: &str, job_title: &str) -> Self {
        Self {
            user_id: provider,
            kind: NotificationKind::NewApplication,
            title: "New Application".to_string(),
            message: format!("{seeker_name} has applied for your job: {job_title}"),
        }
    }

    pub fn job_selected(seeker: UserId, job_title: &str) -> Self {
        Self {
            user_id: seeker,
            kind: NotificationKind::JobSelected,
            title: "Job Offer".to_string(),
            message: format!("You've been selected for the job: {job_title}"),
        }
    }

    pub fn job_feedback(user: UserId, job_title: &str, rating: u8, comment: &str) -> Self {
        Self {
            user_id: user,
            kind: NotificationKind::JobFeedback,
            title: "Job Feedback".to_string(),
            message: format!(
                "You received a {rating}-star rating for the job: {job_title}. Feedback: {comment}"
            ),
        }
    }

    pub fn new_matching_job(seeker: UserId, job_title: &str) -> Self {
        Self {
            user_id: seeker,
            kind: NotificationKind::NewMatchingJob,
            title: "New Job Match".to_string(),
            message: format!("A new job matching your skills has been posted: {job_title}"),
        }
    }
}

/// Appends notification records for lifecycle events. Best-effort and
/// at-least-once: a failed durable write never fails the caller's primary
/// transition, it is logged and dropped.
pub struct NotificationEmitter<S> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> NotificationEmitter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Durably queues one notification. Delivery (push, email) is an
    /// external collaborator's job.
    pub fn emit(&self, draft: NotificationDraft) -> Option<Notification> {
        let kind = draft.kind;
        let notification = Notification {
            id: next_notification_id(),
            user_id: draft.user_id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            read: false,
            timestamp: Utc::now(),
        };
        match self.store.insert_notification(notification) {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!(kind = kind.label(), %err, "failed to queue notification");
                None
            }
        }
    }

    /// Flushes a queued side-effect list. One failed write does not stop
    /// the remaining drafts.
    pub fn flush(&self, drafts: Vec<NotificationDraft>) {
        for draft in drafts {
            self.emit(draft);
        }
    }
}
