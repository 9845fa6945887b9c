use std::sync::Arc;

use super::domain::{ActorRole, UserId};
use super::store::{MarketplaceStore, ProfileDirectory, StoreError};

/// Recomputes the derived average rating stored on a participant's
/// profile. The engine is the sole writer of this field.
pub struct RatingAggregator<S, P> {
    store: Arc<S>,
    profiles: Arc<P>,
}

impl<S: MarketplaceStore, P: ProfileDirectory> RatingAggregator<S, P> {
    pub fn new(store: Arc<S>, profiles: Arc<P>) -> Self {
        Self { store, profiles }
    }

    /// Arithmetic mean of feedback ratings received by `party` in `role`:
    /// seekers over the feedback on their own applications, providers
    /// over the feedback recorded across their completed jobs.
    ///
    /// An empty candidate set leaves the stored rating untouched and
    /// returns `None`, never a reset to zero or a NaN. The mean is
    /// persisted as `f64` without rounding.
    pub fn recompute(&self, party: &UserId, role: ActorRole) -> Result<Option<f64>, StoreError> {
        let ratings = match role {
            ActorRole::Seeker => self
                .store
                .applications_by_seeker(party)?
                .into_iter()
                .filter_map(|application| application.feedback.map(|f| f.rating))
                .collect::<Vec<u8>>(),
            ActorRole::Provider => {
                let mut ratings = Vec::new();
                for job in self.store.completed_jobs_for_provider(party)? {
                    for application in self.store.applications_for_job(&job.id)? {
                        if let Some(feedback) = application.feedback {
                            ratings.push(feedback.rating);
                        }
                    }
                }
                ratings
            }
        };

        if ratings.is_empty() {
            return Ok(None);
        }

        let mean = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
        self.profiles.set_rating(party, mean)?;
        Ok(Some(mean))
    }
}
