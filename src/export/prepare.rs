//! Field suppression applied before any encoder runs.
//!
//! Each prepared record copies only what the [`ExportConfig`] allows. Fields
//! that can be suppressed are `Option`s skipped on serialization, so a
//! suppressed field is absent from the output rather than `null`.

use serde::{Deserialize, Serialize};

use super::ExportConfig;
use crate::models::{
    CastMember, ContentKind, CrewMember, Episode, Genre, Movie, Network, ProductionCompany,
    Season, TvShow, Video,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedMovie {
    pub id: i64,
    pub title: String,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i64>,
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<CastMember>>,
    pub crew: Vec<CrewMember>,
    pub tagline: Option<String>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub status: Option<String>,
    pub imdb_id: Option<String>,
    pub homepage: Option<String>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
    pub videos: Vec<Video>,
}

/// Season summary with its poster subject to the image toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeason {
    pub id: i64,
    pub season_number: i64,
    pub name: String,
    pub episode_count: i64,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedEpisode {
    pub id: i64,
    pub episode_number: i64,
    pub season_number: i64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<i64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub still_path: Option<String>,
    pub guest_stars: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub production_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedShow {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_episodes: Option<i64>,
    pub number_of_seasons: Option<i64>,
    pub episode_run_time: Vec<i64>,
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<CastMember>>,
    pub crew: Vec<CrewMember>,
    pub seasons: Vec<PreparedSeason>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub in_production: Option<bool>,
    pub networks: Vec<Network>,
    pub production_companies: Vec<ProductionCompany>,
    pub origin_country: Vec<String>,
    pub spoken_languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<PreparedEpisode>>,
    pub videos: Vec<Video>,
    pub created_by: Vec<String>,
}

/// A prepared record, serialized without a tag so the output carries only the
/// record's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prepared {
    Movie(PreparedMovie),
    Show(PreparedShow),
}

pub fn prepare(item: &ContentKind, config: &ExportConfig) -> Prepared {
    match item {
        ContentKind::Movie(movie) => Prepared::Movie(PreparedMovie::build(movie, config)),
        ContentKind::Show(show) => Prepared::Show(PreparedShow::build(show, config)),
    }
}

impl PreparedMovie {
    pub fn build(movie: &Movie, config: &ExportConfig) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            original_title: movie.original_title.clone(),
            original_language: movie.original_language.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            runtime: movie.runtime,
            genres: movie.genres.clone(),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            poster_path: image(&movie.poster_path, config),
            backdrop_path: image(&movie.backdrop_path, config),
            cast: select_cast(&movie.cast, config),
            crew: movie.crew.clone(),
            tagline: movie.tagline.clone(),
            budget: movie.budget,
            revenue: movie.revenue,
            status: movie.status.clone(),
            imdb_id: movie.imdb_id.clone(),
            homepage: movie.homepage.clone(),
            production_companies: movie.production_companies.clone(),
            production_countries: movie.production_countries.clone(),
            spoken_languages: movie.spoken_languages.clone(),
            videos: movie.videos.clone(),
        }
    }
}

impl PreparedSeason {
    pub fn build(season: &Season, config: &ExportConfig) -> Self {
        Self {
            id: season.id,
            season_number: season.season_number,
            name: season.name.clone(),
            episode_count: season.episode_count,
            air_date: season.air_date.clone(),
            overview: season.overview.clone(),
            poster_path: image(&season.poster_path, config),
            vote_average: season.vote_average,
        }
    }
}

impl PreparedEpisode {
    pub fn build(episode: &Episode, config: &ExportConfig) -> Self {
        Self {
            id: episode.id,
            episode_number: episode.episode_number,
            season_number: episode.season_number,
            name: episode.name.clone(),
            overview: episode.overview.clone(),
            air_date: episode.air_date.clone(),
            runtime: episode.runtime,
            vote_average: episode.vote_average,
            vote_count: episode.vote_count,
            still_path: image(&episode.still_path, config),
            guest_stars: episode.guest_stars.clone(),
            crew: episode.crew.clone(),
            production_code: episode.production_code.clone(),
        }
    }
}

impl PreparedShow {
    pub fn build(show: &TvShow, config: &ExportConfig) -> Self {
        let seasons = show
            .seasons
            .iter()
            .map(|s| PreparedSeason::build(s, config))
            .collect();
        let episodes = config.include_episodes.then(|| {
            show.episodes
                .iter()
                .map(|ep| PreparedEpisode::build(ep, config))
                .collect()
        });

        Self {
            id: show.id,
            name: show.name.clone(),
            original_name: show.original_name.clone(),
            original_language: show.original_language.clone(),
            overview: show.overview.clone(),
            first_air_date: show.first_air_date.clone(),
            last_air_date: show.last_air_date.clone(),
            number_of_episodes: show.number_of_episodes,
            number_of_seasons: show.number_of_seasons,
            episode_run_time: show.episode_run_time.clone(),
            genres: show.genres.clone(),
            vote_average: show.vote_average,
            vote_count: show.vote_count,
            popularity: show.popularity,
            poster_path: image(&show.poster_path, config),
            backdrop_path: image(&show.backdrop_path, config),
            cast: select_cast(&show.cast, config),
            crew: show.crew.clone(),
            seasons,
            status: show.status.clone(),
            show_type: show.show_type.clone(),
            tagline: show.tagline.clone(),
            homepage: show.homepage.clone(),
            in_production: show.in_production,
            networks: show.networks.clone(),
            production_companies: show.production_companies.clone(),
            origin_country: show.origin_country.clone(),
            spoken_languages: show.spoken_languages.clone(),
            episodes,
            videos: show.videos.clone(),
            created_by: show.created_by.clone(),
        }
    }

    /// Episodes that survived preparation, empty when suppressed.
    pub fn episode_list(&self) -> &[PreparedEpisode] {
        self.episodes.as_deref().unwrap_or_default()
    }
}

fn select_cast(cast: &[CastMember], config: &ExportConfig) -> Option<Vec<CastMember>> {
    if !config.include_cast {
        return None;
    }
    let keep = match config.max_cast {
        Some(max) if max > 0 => max,
        _ => cast.len(),
    };
    Some(cast.iter().take(keep).cloned().collect())
}

fn image(path: &Option<String>, config: &ExportConfig) -> Option<String> {
    if config.include_images {
        path.clone()
    } else {
        None
    }
}
