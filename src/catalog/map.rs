use serde::{Deserialize, Deserializer};

use crate::models::{
    CastMember, CrewMember, Episode, Genre, MediaType, Movie, Network, ProductionCompany,
    SearchKind, SearchResponse, SearchResult, Season, TvShow, Video,
};

const MAX_SEARCH_RESULTS: usize = 20;
const MAX_CAST: usize = 15;
const MAX_CREW: usize = 10;
const MAX_VIDEOS: usize = 5;
const MAX_GUEST_STARS: usize = 8;
const MAX_EPISODE_CREW: usize = 5;

const MOVIE_CREW_JOBS: &[&str] = &["Director", "Writer", "Screenplay", "Producer"];
const SHOW_CREW_JOBS: &[&str] = &["Executive Producer", "Creator"];
const EPISODE_CREW_JOBS: &[&str] = &["Director", "Writer"];

const UNKNOWN: &str = "Unknown";

/// Named image-resolution bucket on the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Poster,
    Profile,
    Backdrop,
    Still,
    Logo,
}

impl SizeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Poster | SizeTier::Profile => "w500",
            SizeTier::Backdrop => "w1280",
            SizeTier::Still => "w300",
            SizeTier::Logo => "w200",
        }
    }
}

/// Turns the catalog's relative image paths into absolute CDN URLs.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base: String,
}

impl ImageResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `None` (or an empty path) stays `None`; never yields a dangling URL.
    pub fn resolve(&self, path: Option<&str>, tier: SizeTier) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        Some(format!(
            "{}/{}/{}",
            self.base,
            tier.as_str(),
            path.trim_start_matches('/')
        ))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<RawSearchItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    total_results: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    total_pages: i64,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    id: i64,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawCredits {
    #[serde(default, deserialize_with = "null_as_default")]
    cast: Vec<RawCast>,
    #[serde(default, deserialize_with = "null_as_default")]
    crew: Vec<RawCrew>,
}

#[derive(Debug, Deserialize)]
struct RawCast {
    id: Option<i64>,
    name: Option<String>,
    character: Option<String>,
    profile_path: Option<String>,
    order: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawCrew {
    id: Option<i64>,
    name: Option<String>,
    job: Option<String>,
    department: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCompany {
    id: i64,
    name: String,
    logo_path: Option<String>,
    origin_country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLanguage {
    english_name: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVideos {
    #[serde(default, deserialize_with = "null_as_default")]
    results: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: Option<String>,
    key: Option<String>,
    name: Option<String>,
    site: Option<String>,
    #[serde(rename = "type")]
    video_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMovie {
    id: i64,
    title: String,
    original_title: Option<String>,
    original_language: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    runtime: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    genres: Vec<RawGenre>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    credits: RawCredits,
    tagline: Option<String>,
    budget: Option<i64>,
    revenue: Option<i64>,
    status: Option<String>,
    imdb_id: Option<String>,
    homepage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    production_companies: Vec<RawCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    production_countries: Vec<RawNamed>,
    #[serde(default, deserialize_with = "null_as_default")]
    spoken_languages: Vec<RawLanguage>,
    #[serde(default, deserialize_with = "null_as_default")]
    videos: RawVideos,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawShow {
    id: i64,
    name: String,
    original_name: Option<String>,
    original_language: Option<String>,
    overview: Option<String>,
    first_air_date: Option<String>,
    last_air_date: Option<String>,
    number_of_episodes: Option<i64>,
    number_of_seasons: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    episode_run_time: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    genres: Vec<RawGenre>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    popularity: Option<f64>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    credits: RawCredits,
    #[serde(default, deserialize_with = "null_as_default")]
    seasons: Vec<RawSeason>,
    status: Option<String>,
    #[serde(rename = "type")]
    show_type: Option<String>,
    tagline: Option<String>,
    homepage: Option<String>,
    in_production: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    networks: Vec<RawCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    production_companies: Vec<RawCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    origin_country: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    spoken_languages: Vec<RawLanguage>,
    #[serde(default, deserialize_with = "null_as_default")]
    videos: RawVideos,
    #[serde(default, deserialize_with = "null_as_default")]
    created_by: Vec<RawNamed>,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    id: i64,
    season_number: i64,
    name: Option<String>,
    episode_count: Option<i64>,
    air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSeasonDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    episodes: Vec<RawEpisode>,
}

#[derive(Debug, Deserialize)]
struct RawEpisode {
    id: i64,
    episode_number: i64,
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    runtime: Option<i64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    still_path: Option<String>,
    production_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    guest_stars: Vec<RawCast>,
    #[serde(default, deserialize_with = "null_as_default")]
    crew: Vec<RawCrew>,
}

pub(crate) fn map_search(
    raw: RawSearchPage,
    kind: SearchKind,
    images: &ImageResolver,
) -> SearchResponse {
    let results = raw
        .results
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .filter_map(|item| {
            let media_type = match item.media_type.as_deref() {
                Some("movie") => MediaType::Movie,
                Some("tv") => MediaType::Tv,
                Some(_) => return None,
                None => kind.implied_media_type()?,
            };
            Some(SearchResult {
                id: item.id,
                title: non_empty(item.title)
                    .or(item.name)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                media_type,
                release_date: non_empty(item.release_date).or(non_empty(item.first_air_date)),
                poster_path: images.resolve(item.poster_path.as_deref(), SizeTier::Poster),
                backdrop_path: images.resolve(item.backdrop_path.as_deref(), SizeTier::Backdrop),
                overview: item.overview,
                vote_average: item.vote_average,
            })
        })
        .collect();

    SearchResponse {
        results,
        total_results: raw.total_results,
        total_pages: raw.total_pages,
    }
}

pub(crate) fn map_movie(raw: RawMovie, images: &ImageResolver) -> Movie {
    Movie {
        id: raw.id,
        title: raw.title,
        original_title: raw.original_title,
        original_language: raw.original_language,
        overview: raw.overview,
        release_date: raw.release_date,
        runtime: raw.runtime,
        genres: genres(raw.genres),
        vote_average: raw.vote_average,
        vote_count: raw.vote_count,
        popularity: raw.popularity,
        poster_path: images.resolve(raw.poster_path.as_deref(), SizeTier::Poster),
        backdrop_path: images.resolve(raw.backdrop_path.as_deref(), SizeTier::Backdrop),
        cast: cast(raw.credits.cast, MAX_CAST, images),
        crew: crew(raw.credits.crew, MOVIE_CREW_JOBS, MAX_CREW, images),
        tagline: raw.tagline,
        budget: raw.budget,
        revenue: raw.revenue,
        status: raw.status,
        imdb_id: raw.imdb_id,
        homepage: raw.homepage,
        production_companies: companies(raw.production_companies, images),
        production_countries: raw
            .production_countries
            .into_iter()
            .filter_map(|c| c.name)
            .collect(),
        spoken_languages: languages(raw.spoken_languages),
        videos: youtube_videos(raw.videos),
    }
}

/// Maps show detail. Episodes are attached afterwards by the client, which
/// fetches them season by season.
pub(crate) fn map_show(raw: RawShow, images: &ImageResolver) -> TvShow {
    let seasons = raw
        .seasons
        .into_iter()
        .map(|s| Season {
            id: s.id,
            season_number: s.season_number,
            name: s
                .name
                .unwrap_or_else(|| format!("Season {}", s.season_number)),
            episode_count: s.episode_count.unwrap_or(0),
            air_date: s.air_date,
            overview: s.overview,
            poster_path: images.resolve(s.poster_path.as_deref(), SizeTier::Poster),
            vote_average: s.vote_average,
        })
        .collect();

    TvShow {
        id: raw.id,
        name: raw.name,
        original_name: raw.original_name,
        original_language: raw.original_language,
        overview: raw.overview,
        first_air_date: raw.first_air_date,
        last_air_date: raw.last_air_date,
        number_of_episodes: raw.number_of_episodes,
        number_of_seasons: raw.number_of_seasons,
        episode_run_time: raw.episode_run_time,
        genres: genres(raw.genres),
        vote_average: raw.vote_average,
        vote_count: raw.vote_count,
        popularity: raw.popularity,
        poster_path: images.resolve(raw.poster_path.as_deref(), SizeTier::Poster),
        backdrop_path: images.resolve(raw.backdrop_path.as_deref(), SizeTier::Backdrop),
        cast: cast(raw.credits.cast, MAX_CAST, images),
        crew: crew(raw.credits.crew, SHOW_CREW_JOBS, MAX_CREW, images),
        seasons,
        status: raw.status,
        show_type: raw.show_type,
        tagline: raw.tagline,
        homepage: raw.homepage,
        in_production: raw.in_production,
        networks: raw
            .networks
            .into_iter()
            .map(|n| Network {
                id: n.id,
                name: n.name,
                logo_path: images.resolve(n.logo_path.as_deref(), SizeTier::Logo),
                origin_country: n.origin_country,
            })
            .collect(),
        production_companies: companies(raw.production_companies, images),
        origin_country: raw.origin_country,
        spoken_languages: languages(raw.spoken_languages),
        episodes: Vec::new(),
        videos: youtube_videos(raw.videos),
        created_by: raw.created_by.into_iter().filter_map(|c| c.name).collect(),
    }
}

pub(crate) fn map_season_episodes(
    raw: RawSeasonDetail,
    season_number: i64,
    images: &ImageResolver,
) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = raw
        .episodes
        .into_iter()
        .map(|ep| Episode {
            id: ep.id,
            episode_number: ep.episode_number,
            season_number,
            name: ep.name.unwrap_or_else(|| UNKNOWN.to_string()),
            overview: ep.overview,
            air_date: ep.air_date,
            runtime: ep.runtime,
            vote_average: ep.vote_average,
            vote_count: ep.vote_count,
            still_path: images.resolve(ep.still_path.as_deref(), SizeTier::Still),
            guest_stars: cast(ep.guest_stars, MAX_GUEST_STARS, images),
            crew: crew(ep.crew, EPISODE_CREW_JOBS, MAX_EPISODE_CREW, images),
            production_code: ep.production_code,
        })
        .collect();
    episodes.sort_by_key(|ep| ep.episode_number);
    episodes
}

/// Season numbers worth fetching episodes for: specials (season 0) are
/// skipped, the rest come back in ascending order.
pub(crate) fn regular_season_numbers(seasons: &[Season]) -> Vec<i64> {
    let mut numbers: Vec<i64> = seasons
        .iter()
        .map(|s| s.season_number)
        .filter(|n| *n > 0)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

fn genres(raw: Vec<RawGenre>) -> Vec<Genre> {
    raw.into_iter()
        .map(|g| Genre {
            id: g.id,
            name: g.name,
        })
        .collect()
}

fn cast(raw: Vec<RawCast>, max: usize, images: &ImageResolver) -> Vec<CastMember> {
    raw.into_iter()
        .take(max)
        .map(|c| CastMember {
            id: c.id,
            name: c.name.unwrap_or_else(|| UNKNOWN.to_string()),
            character: c.character.unwrap_or_else(|| UNKNOWN.to_string()),
            profile_path: images.resolve(c.profile_path.as_deref(), SizeTier::Profile),
            order: c.order,
        })
        .collect()
}

fn crew(raw: Vec<RawCrew>, jobs: &[&str], max: usize, images: &ImageResolver) -> Vec<CrewMember> {
    raw.into_iter()
        .filter(|c| c.job.as_deref().is_some_and(|job| jobs.contains(&job)))
        .take(max)
        .map(|c| CrewMember {
            id: c.id,
            name: c.name.unwrap_or_else(|| UNKNOWN.to_string()),
            job: c.job.unwrap_or_else(|| UNKNOWN.to_string()),
            department: c.department.unwrap_or_else(|| UNKNOWN.to_string()),
            profile_path: images.resolve(c.profile_path.as_deref(), SizeTier::Profile),
        })
        .collect()
}

fn companies(raw: Vec<RawCompany>, images: &ImageResolver) -> Vec<ProductionCompany> {
    raw.into_iter()
        .map(|c| ProductionCompany {
            id: c.id,
            name: c.name,
            logo_path: images.resolve(c.logo_path.as_deref(), SizeTier::Logo),
            origin_country: c.origin_country,
        })
        .collect()
}

fn languages(raw: Vec<RawLanguage>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|l| non_empty(l.english_name).or(l.name))
        .collect()
}

fn youtube_videos(raw: RawVideos) -> Vec<Video> {
    raw.results
        .into_iter()
        .filter(|v| v.site.as_deref() == Some("YouTube"))
        .filter_map(|v| {
            Some(Video {
                id: v.id?,
                key: v.key?,
                name: v.name.unwrap_or_default(),
                site: v.site?,
                video_type: v.video_type.unwrap_or_default(),
            })
        })
        .take(MAX_VIDEOS)
        .collect()
}
