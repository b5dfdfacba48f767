use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which detail endpoint a search hit resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search endpoint selector. `Multi` searches movies, shows and people at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Movie,
    Tv,
    #[default]
    Multi,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Movie => "movie",
            SearchKind::Tv => "tv",
            SearchKind::Multi => "multi",
        }
    }

    /// Media type assumed for hits that carry no `media_type` of their own.
    pub fn implied_media_type(&self) -> Option<MediaType> {
        match self {
            SearchKind::Movie => Some(MediaType::Movie),
            SearchKind::Tv => Some(MediaType::Tv),
            SearchKind::Multi => None,
        }
    }
}

impl FromStr for SearchKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(SearchKind::Movie),
            "tv" => Ok(SearchKind::Tv),
            "multi" => Ok(SearchKind::Multi),
            _ => Err(anyhow::anyhow!("search kind must be 'movie', 'tv' or 'multi'")),
        }
    }
}

impl From<MediaType> for SearchKind {
    fn from(media: MediaType) -> Self {
        match media {
            MediaType::Movie => SearchKind::Movie,
            MediaType::Tv => SearchKind::Tv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: Option<i64>,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: Option<i64>,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

/// Studio behind a movie or show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

/// Broadcaster of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

/// Season summary as listed on a show. Season 0 holds specials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub season_number: i64,
    pub name: String,
    pub episode_count: i64,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub episode_number: i64,
    pub season_number: i64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub runtime: Option<i64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub still_path: Option<String>,
    pub guest_stars: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub production_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
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
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub cast: Vec<CastMember>,
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

/// Full show record. `episodes` is flattened across every regular season and
/// stays empty unless episodes were requested at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
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
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub seasons: Vec<Season>,
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
    pub episodes: Vec<Episode>,
    pub videos: Vec<Video>,
    pub created_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub media_type: MediaType,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: i64,
    pub total_pages: i64,
}

/// A fetched title, tagged by kind so exporters match on it instead of
/// probing for a `title` or `name` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    Movie(Movie),
    Show(TvShow),
}

impl ContentKind {
    pub fn id(&self) -> i64 {
        match self {
            ContentKind::Movie(m) => m.id,
            ContentKind::Show(s) => s.id,
        }
    }

    /// Display title: a movie's `title` or a show's `name`.
    pub fn display_title(&self) -> &str {
        match self {
            ContentKind::Movie(m) => &m.title,
            ContentKind::Show(s) => &s.name,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            ContentKind::Movie(_) => MediaType::Movie,
            ContentKind::Show(_) => MediaType::Tv,
        }
    }
}

impl From<Movie> for ContentKind {
    fn from(movie: Movie) -> Self {
        ContentKind::Movie(movie)
    }
}

impl From<TvShow> for ContentKind {
    fn from(show: TvShow) -> Self {
        ContentKind::Show(show)
    }
}
