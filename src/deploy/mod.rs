//! Deployment-platform abstraction layer
//!
//! Trait-based seam over the deployment platform API (pipeline promotions
//! and release status), mirroring the source-hosting seam: a real HTTP
//! implementation plus a mock for tests, with narrow records at the
//! boundary.

pub mod heroku;
pub mod mock;

pub use heroku::HerokuClient;
pub use mock::MockPlatform;

use crate::error::Result;

/// Everything needed to promote a build between two pipeline apps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRequest {
    pub pipeline_id: String,
    pub source_app_id: String,
    pub target_app_id: String,
}

/// Deployment-platform operations the promotion and status-check commands
/// depend on
///
/// Status values cross this seam as plain strings; the poller decides
/// which of them are terminal.
#[allow(async_fn_in_trait)]
pub trait DeployPlatform {
    /// Create a pipeline promotion and return its id
    async fn create_promotion(&self, request: &PromotionRequest) -> Result<String>;

    /// Current status of a promotion
    async fn promotion_status(&self, promotion_id: &str) -> Result<String>;

    /// Status of an application's most recent release, or `None` for an
    /// app that has never been released
    async fn latest_release_status(&self, app_id: &str) -> Result<Option<String>>;
}
