//! Fixed column sets shared by the delimited-text and relational-insert
//! encoders.

use super::prepare::{PreparedEpisode, PreparedMovie, PreparedShow};
use crate::models::{CastMember, Genre};

/// Column name and the SQL type it is declared with.
pub(crate) type Column = (&'static str, &'static str);

pub(crate) const MOVIE_COLUMNS: &[Column] = &[
    ("id", "INTEGER PRIMARY KEY"),
    ("title", "TEXT NOT NULL"),
    ("original_title", "TEXT"),
    ("release_date", "TEXT"),
    ("runtime", "INTEGER"),
    ("genres", "TEXT"),
    ("vote_average", "REAL"),
    ("vote_count", "INTEGER"),
    ("popularity", "REAL"),
    ("overview", "TEXT"),
    ("tagline", "TEXT"),
    ("status", "TEXT"),
    ("budget", "INTEGER"),
    ("revenue", "INTEGER"),
    ("poster_path", "TEXT"),
    ("cast", "TEXT"),
];

pub(crate) const SHOW_COLUMNS: &[Column] = &[
    ("id", "INTEGER PRIMARY KEY"),
    ("name", "TEXT NOT NULL"),
    ("original_name", "TEXT"),
    ("first_air_date", "TEXT"),
    ("last_air_date", "TEXT"),
    ("number_of_seasons", "INTEGER"),
    ("number_of_episodes", "INTEGER"),
    ("genres", "TEXT"),
    ("vote_average", "REAL"),
    ("vote_count", "INTEGER"),
    ("popularity", "REAL"),
    ("overview", "TEXT"),
    ("tagline", "TEXT"),
    ("status", "TEXT"),
    ("poster_path", "TEXT"),
    ("cast", "TEXT"),
];

pub(crate) const EPISODE_COLUMNS: &[Column] = &[
    ("tv_id", "INTEGER NOT NULL"),
    ("tv_name", "TEXT"),
    ("season_number", "INTEGER NOT NULL"),
    ("episode_number", "INTEGER NOT NULL"),
    ("name", "TEXT"),
    ("air_date", "TEXT"),
    ("runtime", "INTEGER"),
    ("vote_average", "REAL"),
    ("overview", "TEXT"),
];

/// One typed cell; each encoder decides how absent values and text render.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<Option<i64>> for Cell {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Cell::Null, Cell::Int)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Null, Cell::Real)
    }
}

impl From<Option<&String>> for Cell {
    fn from(v: Option<&String>) -> Self {
        v.map_or(Cell::Null, |s| Cell::Text(s.clone()))
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

/// Float text that keeps a trailing `.0` on whole values, matching the JSON
/// and XML encoders.
pub(crate) fn real_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

pub(crate) fn genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn cast_names(cast: Option<&Vec<CastMember>>) -> String {
    cast.map(|c| {
        c.iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    })
    .unwrap_or_default()
}

pub(crate) fn movie_row(m: &PreparedMovie) -> Vec<Cell> {
    vec![
        Cell::Int(m.id),
        m.title.as_str().into(),
        m.original_title.as_ref().into(),
        m.release_date.as_ref().into(),
        m.runtime.into(),
        genre_names(&m.genres).as_str().into(),
        m.vote_average.into(),
        m.vote_count.into(),
        m.popularity.into(),
        m.overview.as_ref().into(),
        m.tagline.as_ref().into(),
        m.status.as_ref().into(),
        m.budget.into(),
        m.revenue.into(),
        m.poster_path.as_ref().into(),
        cast_names(m.cast.as_ref()).as_str().into(),
    ]
}

pub(crate) fn show_row(s: &PreparedShow) -> Vec<Cell> {
    vec![
        Cell::Int(s.id),
        s.name.as_str().into(),
        s.original_name.as_ref().into(),
        s.first_air_date.as_ref().into(),
        s.last_air_date.as_ref().into(),
        s.number_of_seasons.into(),
        s.number_of_episodes.into(),
        genre_names(&s.genres).as_str().into(),
        s.vote_average.into(),
        s.vote_count.into(),
        s.popularity.into(),
        s.overview.as_ref().into(),
        s.tagline.as_ref().into(),
        s.status.as_ref().into(),
        s.poster_path.as_ref().into(),
        cast_names(s.cast.as_ref()).as_str().into(),
    ]
}

pub(crate) fn episode_row(show: &PreparedShow, ep: &PreparedEpisode) -> Vec<Cell> {
    vec![
        Cell::Int(show.id),
        show.name.as_str().into(),
        Cell::Int(ep.season_number),
        Cell::Int(ep.episode_number),
        ep.name.as_str().into(),
        ep.air_date.as_ref().into(),
        ep.runtime.into(),
        ep.vote_average.into(),
        ep.overview.as_ref().into(),
    ]
}

pub(crate) fn column_names(columns: &[Column]) -> impl Iterator<Item = &'static str> + '_ {
    columns.iter().map(|(name, _)| *name)
}
