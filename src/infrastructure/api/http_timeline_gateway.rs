use crate::application::ports::TimelineGateway;
use crate::domain::entities::{EntryDetails, TimelineEntry};
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TIMELINE_PATH: &str = "/api/nhat-ky";
const HEALTH_PATH: &str = "/api/health";

/// Either `{"data": ...}` or the bare value.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiPayload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ApiPayload<T> {
    fn into_inner(self) -> T {
        match self {
            ApiPayload::Wrapped { data } => data,
            ApiPayload::Bare(value) => value,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEntryRequest<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    details: &'a EntryDetails,
}

/// Client for the farm timeline REST API.
#[derive(Clone)]
pub struct HttpTimelineGateway {
    client: Client,
    base_url: String,
}

impl HttpTimelineGateway {
    /// Only the connect phase has a deadline; a slow response is awaited.
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when the health endpoint answers with a success status.
    pub async fn probe(&self) -> bool {
        match self
            .client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health probe failed");
                false
            }
        }
    }

    fn entries_url(&self) -> String {
        format!("{}{TIMELINE_PATH}", self.base_url)
    }

    fn entry_url(&self, id: &EntryId) -> String {
        format!("{}{TIMELINE_PATH}/{}", self.base_url, id)
    }
}

#[async_trait]
impl TimelineGateway for HttpTimelineGateway {
    async fn list_entries(&self, owner_id: &str) -> Result<Vec<TimelineEntry>, AppError> {
        let response = self
            .client
            .get(self.entries_url())
            .query(&[("userId", owner_id)])
            .send()
            .await?;
        let entries: Vec<TimelineEntry> = read_payload(response).await?;
        tracing::debug!(count = entries.len(), "Fetched timeline entries");
        Ok(entries)
    }

    async fn create_entry(
        &self,
        owner_id: &str,
        details: &EntryDetails,
    ) -> Result<TimelineEntry, AppError> {
        let response = self
            .client
            .post(self.entries_url())
            .json(&CreateEntryRequest {
                user_id: owner_id,
                details,
            })
            .send()
            .await?;
        read_payload(response).await
    }

    async fn update_entry(&self, entry: &TimelineEntry) -> Result<TimelineEntry, AppError> {
        let response = self
            .client
            .put(self.entry_url(&entry.id))
            .json(entry)
            .send()
            .await?;
        read_payload(response).await
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<(), AppError> {
        let response = self.client.delete(self.entry_url(id)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, path = %url, "Timeline API returned an error");
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!("{url}: {body}")));
    }
    Err(AppError::Network(format!("{status}: {body}")))
}

async fn read_payload<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let response = ensure_success(response).await?;
    let payload: ApiPayload<T> = response.json().await?;
    Ok(payload.into_inner())
}
