//! # Crop Store
//!
//! The persistence collaborator: a document store behind four CRUD calls.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           CropStore                                     │
//! │                                                                         │
//! │   fetch_crops ──────────► Vec<CropRecord>   (normalized, zero-filled)   │
//! │   create_crop(payload) ─► ()                store assigns _id           │
//! │   update_crop(id, p) ───► ()                last write wins             │
//! │   delete_crop(id) ──────► ()                                            │
//! │                                                                         │
//! │   HttpCropStore      reqwest against the REST service                   │
//! │   InMemoryCropStore  tests and --offline                                │
//! │   Retrying<S>        bounded backoff around fetch_crops                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use harvest_core::{CropPayload, CropRecord};
use reqwest::{RequestBuilder, Response, Url};
use tracing::{debug, info};

use crate::api::{self, CropsResponse, ErrorBody, MutationResponse};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// CRUD access to crop records.
pub trait CropStore: Send + Sync {
    /// Every stored record.
    fn fetch_crops(&self) -> impl Future<Output = ClientResult<Vec<CropRecord>>> + Send;

    fn create_crop(&self, payload: &CropPayload) -> impl Future<Output = ClientResult<()>> + Send;

    fn update_crop(
        &self,
        id: &str,
        payload: &CropPayload,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn delete_crop(&self, id: &str) -> impl Future<Output = ClientResult<()>> + Send;
}

// =============================================================================
// HTTP Store
// =============================================================================

/// Crop store backed by the REST service.
#[derive(Clone)]
pub struct HttpCropStore {
    inner: Arc<HttpCropStoreInner>,
}

struct HttpCropStoreInner {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpCropStore {
    /// Builds an HTTP client from validated configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(HttpCropStoreInner {
                client,
                base_url: config.base_url().to_string(),
                timeout_secs: config.api.request_timeout_secs,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Url::parse(&format!("{}{}", self.inner.base_url, path))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.inner.base_url)))
    }

    /// `path/{id}` with the id as one percent-encoded segment.
    fn record_url(&self, path: &str, id: &str) -> ClientResult<Url> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.inner.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    /// Sends a request; non-2xx statuses become errors.
    async fn send(&self, request: RequestBuilder, path: &str) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, self.inner.timeout_secs))?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(self.parse_error(response, path).await)
    }

    async fn parse_error(&self, response: Response, path: &str) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = ErrorBody::message_from(&body);

        debug!(status, path, ?message, "Crop service returned an error");

        if status == 404 {
            return ClientError::NotFound(message.unwrap_or_else(|| path.to_string()));
        }
        ClientError::Server { status, message }
    }

    async fn mutation_body(&self, response: Response) -> ClientResult<MutationResponse> {
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_transport(e, self.inner.timeout_secs))?;
        MutationResponse::parse(&body)
    }
}

impl CropStore for HttpCropStore {
    async fn fetch_crops(&self) -> ClientResult<Vec<CropRecord>> {
        let path = api::GET_CROPS;
        let response = self.send(self.inner.client.get(self.url(path)?), path).await?;
        let body: CropsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::from_transport(e, self.inner.timeout_secs))?;

        debug!(count = body.crops.len(), "Fetched crops");
        Ok(body.crops)
    }

    async fn create_crop(&self, payload: &CropPayload) -> ClientResult<()> {
        let path = api::CREATE_CROP;
        let request = self.inner.client.post(self.url(path)?).json(payload);
        let response = self.send(request, path).await?;
        self.mutation_body(response).await?.require_success()?;

        info!(crop = %payload.crop.name, "Crop created");
        Ok(())
    }

    async fn update_crop(&self, id: &str, payload: &CropPayload) -> ClientResult<()> {
        let url = self.record_url(api::UPDATE_CROP, id)?;
        let path = url.path().to_string();
        let request = self.inner.client.put(url).json(payload);
        let response = self.send(request, &path).await?;
        self.mutation_body(response).await?.require_success()?;

        info!(id, crop = %payload.crop.name, "Crop updated");
        Ok(())
    }

    async fn delete_crop(&self, id: &str) -> ClientResult<()> {
        let url = self.record_url(api::DELETE_CROP, id)?;
        let path = url.path().to_string();
        let response = self.send(self.inner.client.delete(url), &path).await?;
        self.mutation_body(response).await?.reject_failure()?;

        info!(id, "Crop deleted");
        Ok(())
    }
}

impl std::fmt::Debug for HttpCropStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCropStore")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
