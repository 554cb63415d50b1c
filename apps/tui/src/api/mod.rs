//! HTTP contract with the orphanage API.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::Orphanage;
use crate::error::ApiClientError;
use crate::form::payload::SubmissionPayload;

#[async_trait]
pub trait OrphanageApi: Send + Sync {
    async fn list_orphanages(&self) -> Result<Vec<Orphanage>, ApiClientError>;

    async fn get_orphanage(&self, id: i64) -> Result<Orphanage, ApiClientError>;

    /// Any 2xx counts as created; the body is decoded when it is an orphanage.
    async fn create_orphanage(
        &self,
        payload: SubmissionPayload,
    ) -> Result<Option<Orphanage>, ApiClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpOrphanageApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrphanageApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "request rejected");
        Err(ApiClientError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OrphanageApi for HttpOrphanageApi {
    async fn list_orphanages(&self) -> Result<Vec<Orphanage>, ApiClientError> {
        let response = self.client.get(self.url("/orphanages")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_orphanage(&self, id: i64) -> Result<Orphanage, ApiClientError> {
        let response = self
            .client
            .get(self.url(&format!("/orphanages/{id}")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_orphanage(
        &self,
        payload: SubmissionPayload,
    ) -> Result<Option<Orphanage>, ApiClientError> {
        let form = payload.into_multipart().await?;
        let response = self
            .client
            .post(self.url("/orphanages"))
            .multipart(form)
            .send()
            .await?;

        let body = Self::check(response).await?.bytes().await?;
        let created = serde_json::from_slice::<Orphanage>(&body).ok();
        tracing::debug!(decoded = created.is_some(), "orphanage created");
        Ok(created)
    }
}
