use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Artist, ArtistDetails, SearchFilters, SearchResponse, Suggestion};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Thin client over the artist backend (`/api/artist`, `/api/suggestions`, `/api/search`).
#[derive(Clone)]
pub struct GroupieClient {
    http: Client,
    base_url: Url,
}

impl GroupieClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Client-Id",
            header::HeaderValue::from_str(config.client_id())
                .context("invalid client identifier header value")?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("unable to construct http client")?;

        // Trailing slash so relative joins append to any base path.
        let base_url = Url::parse(&format!("{}/", config.api_base_url()))
            .with_context(|| format!("invalid api base url: {}", config.api_base_url()))?;

        Ok(Self { http, base_url })
    }

    pub async fn artist_details(&self, artist_id: &str) -> Result<ArtistDetails, ApiError> {
        let url = self.endpoint(&format!("api/artist/{artist_id}"), &[])?;
        tracing::debug!(%url, "fetching artist details");

        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;

        response
            .json::<ArtistDetails>()
            .await
            .map_err(|err| ApiError::Parse(err.to_string()))
    }

    pub async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        let url = self.endpoint("api/suggestions", &[("q", query)])?;
        tracing::debug!(%url, "fetching suggestions");

        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;

        let suggestions: Option<Vec<Suggestion>> = response
            .json()
            .await
            .map_err(|err| ApiError::Parse(err.to_string()))?;

        Ok(suggestions.unwrap_or_default())
    }

    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Artist>, ApiError> {
        let url = self.endpoint("api/search", &[("q", query)])?;
        tracing::debug!(%url, ?filters, "searching artists");

        let response = self.http.post(url).json(filters).send().await?;
        let response = check_status(response)?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Parse(err.to_string()))?;

        Ok(body.artists)
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::Parse(err.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}
