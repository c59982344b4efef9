pub mod incidents;
pub mod types;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use types::ErrorBody;

pub use incidents::IncidentsApi;

#[derive(Clone, Debug)]
pub struct IncidentsClient {
    pub(crate) client: Client,
    pub(crate) config: ApiConfig,
}

impl IncidentsClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: &str| ApiError::InvalidUrl {
            url: self.config.base_url.clone(),
            reason: reason.to_string(),
        };
        let mut url = Url::parse(&self.config.base_url).map_err(|e| invalid(&e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and returns the body of a 2xx response.
    ///
    /// A 404 becomes `NotFound(id)` when `missing_id` is given.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        path: &str,
        missing_id: Option<&str>,
    ) -> Result<String> {
        let response = request.send().await.inspect_err(|e| {
            warn!(path, error = %e, "incidents api request failed");
        })?;

        let status = response.status();
        let text = response.text().await?;
        debug!(path, status = status.as_u16(), bytes = text.len(), "incidents api response");

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = missing_id {
                return Err(ApiError::NotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!(path, status = status.as_u16(), %message, "incidents api error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        missing_id: Option<&str>,
    ) -> Result<T> {
        let text = self.execute(request, path, missing_id).await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

/// Prefers the `{error}` payload, then the raw body, then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
