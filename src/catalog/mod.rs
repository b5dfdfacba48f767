use async_trait::async_trait;

mod client;
mod error;
mod map;
pub mod retry;

pub use client::{CatalogClient, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
pub use error::CatalogError;
pub use map::{ImageResolver, SizeTier};

use crate::models::{Episode, Movie, SearchKind, SearchResponse, TvShow};

/// The catalog operations the HTTP layer and batch runner depend on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResponse, CatalogError>;
    async fn get_movie(&self, id: i64) -> Result<Movie, CatalogError>;
    async fn get_tv_show(&self, id: i64, include_episodes: bool) -> Result<TvShow, CatalogError>;
    async fn get_season_episodes(
        &self,
        id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError>;
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResponse, CatalogError> {
        CatalogClient::search(self, query, kind).await
    }

    async fn get_movie(&self, id: i64) -> Result<Movie, CatalogError> {
        CatalogClient::get_movie(self, id).await
    }

    async fn get_tv_show(&self, id: i64, include_episodes: bool) -> Result<TvShow, CatalogError> {
        CatalogClient::get_tv_show(self, id, include_episodes).await
    }

    async fn get_season_episodes(
        &self,
        id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError> {
        CatalogClient::get_season_episodes(self, id, season_number).await
    }
}
