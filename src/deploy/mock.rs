use std::cell::RefCell;

use super::{DeployPlatform, PromotionRequest};
use crate::error::{ReleasePilotError, Result};

/// Mock deployment platform for testing without network access
///
/// Promotion statuses are served from a queue so tests can script a
/// pending-then-terminal sequence; the last status repeats once the queue
/// drains.
#[derive(Default)]
pub struct MockPlatform {
    promotion_id: String,
    promotion_statuses: RefCell<Vec<String>>,
    release_status: Option<String>,
}

impl MockPlatform {
    /// Create a mock that hands out the given promotion id
    pub fn new(promotion_id: impl Into<String>) -> Self {
        MockPlatform {
            promotion_id: promotion_id.into(),
            ..Default::default()
        }
    }

    /// Queue a promotion status observation
    pub fn push_promotion_status(&mut self, status: impl Into<String>) {
        self.promotion_statuses.borrow_mut().push(status.into());
    }

    /// Set the status of the most recent release
    pub fn set_release_status(&mut self, status: impl Into<String>) {
        self.release_status = Some(status.into());
    }
}

impl DeployPlatform for MockPlatform {
    async fn create_promotion(&self, _request: &PromotionRequest) -> Result<String> {
        Ok(self.promotion_id.clone())
    }

    async fn promotion_status(&self, _promotion_id: &str) -> Result<String> {
        let mut statuses = self.promotion_statuses.borrow_mut();
        if statuses.is_empty() {
            return Err(ReleasePilotError::api(
                "check promotion status",
                None,
                "mock has no statuses queued",
            ));
        }
        if statuses.len() == 1 {
            return Ok(statuses[0].clone());
        }
        Ok(statuses.remove(0))
    }

    async fn latest_release_status(&self, _app_id: &str) -> Result<Option<String>> {
        Ok(self.release_status.clone())
    }
}
