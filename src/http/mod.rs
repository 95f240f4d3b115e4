pub mod model;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    controller::{error::ClientError, traits::Api},
    http::model::{
        ErrorBody, GenerateRequest, GenerateResponse, GenerationPage, GenerationResult, Track,
    },
};

const TRACK_ERROR: &str = "Failed to get random track";
const GALLERY_ERROR: &str = "Failed to load gallery";

pub struct ApiService {
    client: Client,
    base_url: Url,
}

impl ApiService {
    pub fn new(config: &ClientConfig) -> color_eyre::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Resolves absolute and root-relative urls against the API base.
    pub fn resolve(&self, url: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(url)
            .map_err(|e| ClientError::Network(format!("Invalid url {url}: {e}")))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.resolve(path)
    }

    pub fn generations_url(
        &self,
        track_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Url, ClientError> {
        let mut url = self.endpoint("api/generations")?;
        url.query_pairs_mut()
            .append_pair("trackId", track_id)
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }
}

#[async_trait]
impl Api for ApiService {
    async fn random_track(&self) -> Result<Track, ClientError> {
        let fail = |e: reqwest::Error| {
            warn!(error = %e, "random_track_failed");
            ClientError::Network(TRACK_ERROR.into())
        };

        let res = self
            .client
            .get(self.endpoint("api/tracks/random")?)
            .send()
            .await
            .map_err(fail)?;
        if !res.status().is_success() {
            warn!(status = res.status().as_u16(), "random_track_failed");
            return Err(ClientError::Network(TRACK_ERROR.into()));
        }
        res.json().await.map_err(fail)
    }

    async fn generations(
        &self,
        track_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<GenerationPage, ClientError> {
        let fail = |e: reqwest::Error| {
            warn!(error = %e, track_id, "gallery_fetch_failed");
            ClientError::Network(GALLERY_ERROR.into())
        };

        let url = self.generations_url(track_id, limit, offset)?;
        let res = self.client.get(url).send().await.map_err(fail)?;
        if !res.status().is_success() {
            warn!(status = res.status().as_u16(), track_id, "gallery_fetch_failed");
            return Err(ClientError::Network(GALLERY_ERROR.into()));
        }
        res.json().await.map_err(fail)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ClientError> {
        let res = self
            .client
            .post(self.endpoint("api/generate")?)
            .json(request)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.bytes().await.unwrap_or_default();
            return Err(generate_error(status, &body));
        }
        let response: GenerateResponse = res.json().await?;
        debug!(
            generation_id = response.generation_id.as_deref().unwrap_or(""),
            "generation_received"
        );
        Ok(GenerationResult::new(response, request.prompt.clone()))
    }

    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let res = self.client.get(self.resolve(url)?).send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Network(format!(
                "Failed to load audio ({})",
                res.status()
            )));
        }
        Ok(res.bytes().await?.to_vec())
    }

    async fn probe_image(&self, url: &str) -> Result<(), ClientError> {
        let res = self.client.get(self.resolve(url)?).send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Network(format!(
                "Failed to load image ({})",
                res.status()
            )));
        }
        let is_image = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(ClientError::Network("Result is not an image".into()));
        }
        Ok(())
    }
}

/// Maps a non-2xx generate response onto the error shown in the status line.
pub fn generate_error(status: StatusCode, body: &[u8]) -> ClientError {
    if status == StatusCode::NOT_IMPLEMENTED {
        return ClientError::NotImplemented;
    }
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty());
    match detail {
        Some(detail) => ClientError::Server {
            status: status.as_u16(),
            detail,
        },
        None => ClientError::Network("Generation failed".into()),
    }
}
