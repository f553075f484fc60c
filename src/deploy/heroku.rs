use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RANGE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ReleasePilotError, Result};

use super::{DeployPlatform, PromotionRequest};

const HEROKU_API_BASE_URL: &str = "https://api.heroku.com";
const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Most-recent-first, single release; the platform pages by the `Range`
/// header rather than query parameters.
const LATEST_RELEASE_RANGE: &str = "version ..; order=desc,max=1;";

/// Deployment-platform implementation against the Heroku Platform API
pub struct HerokuClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct PromotionPayload {
    pipeline: IdRef,
    source: AppRef,
    targets: Vec<AppRef>,
}

#[derive(Serialize)]
struct IdRef {
    id: String,
}

#[derive(Serialize)]
struct AppRef {
    app: IdRef,
}

#[derive(Deserialize)]
struct PromotionResponse {
    id: String,
}

#[derive(Deserialize)]
struct PromotionStatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct ReleaseStatusResponse {
    status: String,
}

impl HerokuClient {
    /// Create a client authenticating with the given platform API key
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, HEROKU_API_BASE_URL)
    }

    /// Create a client against a non-default API base URL
    pub fn with_base_url(api_key: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HEROKU_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ReleasePilotError::config("platform API key is not a valid header value"))?;
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(HerokuClient {
            client,
            base_url: base_url.into(),
        })
    }
}

impl DeployPlatform for HerokuClient {
    async fn create_promotion(&self, request: &PromotionRequest) -> Result<String> {
        let url = format!("{}/pipeline-promotions", self.base_url);
        let payload = PromotionPayload {
            pipeline: IdRef {
                id: request.pipeline_id.clone(),
            },
            source: AppRef {
                app: IdRef {
                    id: request.source_app_id.clone(),
                },
            },
            targets: vec![AppRef {
                app: IdRef {
                    id: request.target_app_id.clone(),
                },
            }],
        };

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(ReleasePilotError::api(
                "create pipeline promotion",
                Some(status.as_u16()),
                reason,
            ));
        }

        let promotion: PromotionResponse = response.json().await?;
        Ok(promotion.id)
    }

    async fn promotion_status(&self, promotion_id: &str) -> Result<String> {
        let url = format!("{}/pipeline-promotions/{}", self.base_url, promotion_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(ReleasePilotError::api(
                "check promotion status",
                Some(status.as_u16()),
                reason,
            ));
        }

        let promotion: PromotionStatusResponse = response.json().await?;
        Ok(promotion.status)
    }

    async fn latest_release_status(&self, app_id: &str) -> Result<Option<String>> {
        let url = format!("{}/apps/{}/releases", self.base_url, app_id);
        let response = self
            .client
            .get(&url)
            .header(RANGE, LATEST_RELEASE_RANGE)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(ReleasePilotError::api(
                "check release status",
                Some(status.as_u16()),
                reason,
            ));
        }

        let releases: Vec<ReleaseStatusResponse> = response.json().await?;
        Ok(releases.into_iter().next().map(|r| r.status))
    }
}
