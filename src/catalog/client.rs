use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use super::map::{self, ImageResolver, RawMovie, RawSearchPage, RawSeasonDetail, RawShow};
use super::retry::{run_with_retry, AttemptFailure, RetryPolicy};
use super::CatalogError;
use crate::config::Settings;
use crate::models::{Episode, Movie, SearchKind, SearchResponse, TvShow};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the movie/TV catalog.
///
/// Owns its connection pool exclusively. Call [`CatalogClient::close`] once
/// the last operation is done; dropping the client releases it as well.
#[derive(Debug)]
pub struct CatalogClient {
    client: Client,
    api_key: String,
    base_url: String,
    images: ImageResolver,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        let user_agent = format!("reelfetch/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(CatalogError::Build)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            images: ImageResolver::new(DEFAULT_IMAGE_BASE_URL),
            retry: RetryPolicy::default(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CatalogError> {
        Ok(Self::new(settings.tmdb_api_key.clone())?
            .with_base_url(&settings.tmdb_base_url)
            .with_image_base_url(&settings.tmdb_image_base_url))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: &str) -> Self {
        self.images = ImageResolver::new(image_base_url);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Release the connection pool. Consumes the client so no call can
    /// follow the release.
    pub fn close(self) {
        debug!(base_url = %self.base_url, "Releasing catalog client");
        drop(self.client);
    }

    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<SearchResponse, CatalogError> {
        let endpoint = format!("/search/{}", kind.as_str());
        let raw: RawSearchPage = self.get_json(&endpoint, &[("query", query)]).await?;
        let response = map::map_search(raw, kind, &self.images);
        info!(
            query,
            kind = kind.as_str(),
            hits = response.results.len(),
            "Catalog search finished"
        );
        Ok(response)
    }

    pub async fn get_movie(&self, id: i64) -> Result<Movie, CatalogError> {
        let raw: RawMovie = self
            .get_json(
                &format!("/movie/{id}"),
                &[("append_to_response", "credits,videos")],
            )
            .await?;
        let movie = map::map_movie(raw, &self.images);
        info!("Fetched movie '{}' (catalog id {})", movie.title, movie.id);
        Ok(movie)
    }

    pub async fn get_tv_show(&self, id: i64, include_episodes: bool) -> Result<TvShow, CatalogError> {
        let raw: RawShow = self
            .get_json(
                &format!("/tv/{id}"),
                &[("append_to_response", "credits,videos")],
            )
            .await?;
        let mut show = map::map_show(raw, &self.images);

        if include_episodes {
            // One request in flight at a time; the retry policy assumes it.
            for season_number in map::regular_season_numbers(&show.seasons) {
                let episodes = self.get_season_episodes(id, season_number).await?;
                show.episodes.extend(episodes);
            }
        }

        info!(
            "Fetched show '{}' (catalog id {}): {} seasons, {} episodes",
            show.name,
            show.id,
            show.seasons.len(),
            show.episodes.len()
        );
        Ok(show)
    }

    pub async fn get_season_episodes(
        &self,
        id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError> {
        let raw: RawSeasonDetail = self
            .get_json(&format!("/tv/{id}/season/{season_number}"), &[])
            .await?;
        let episodes = map::map_season_episodes(raw, season_number, &self.images);
        debug!(
            show_id = id,
            season_number,
            episodes = episodes.len(),
            "Fetched season episodes"
        );
        Ok(episodes)
    }

    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{endpoint}?api_key={}", self.base_url, self.api_key);
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.url(endpoint, params);
        debug!(endpoint, "Catalog request");

        let body = run_with_retry(&self.retry, endpoint, |_| {
            let request = self.client.get(url.as_str());
            async move {
                let res = request
                    .send()
                    .await
                    .map_err(|e| AttemptFailure::Network(e.without_url().to_string()))?;
                let status = res.status();
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(AttemptFailure::RateLimited);
                }
                let bytes = res
                    .bytes()
                    .await
                    .map_err(|e| AttemptFailure::Network(e.without_url().to_string()))?;
                if !status.is_success() {
                    return Err(AttemptFailure::Fatal(CatalogError::Status {
                        status,
                        message: status_message(&bytes),
                    }));
                }
                Ok(bytes)
            }
        })
        .await?;

        serde_json::from_slice(&body).map_err(|source| CatalogError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Pull `status_message` out of a catalog error body, else the raw text.
fn status_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}
