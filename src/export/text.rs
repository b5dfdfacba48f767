use std::fmt::Display;

use super::prepare::{PreparedMovie, PreparedShow};
use super::rows::real_text;
use super::{prepare, ExportConfig, ExportData, ExportError, Exporter, Prepared};
use crate::models::CastMember;
use crate::utils::thousands;

const RULE_WIDTH: usize = 60;
const NA: &str = "N/A";

/// Human-readable report, one section per title, separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError> {
        let parts: Vec<String> = data
            .items()
            .iter()
            .map(|item| match prepare(item, config) {
                Prepared::Movie(movie) => format_movie(&movie),
                Prepared::Show(show) => format_show(&show),
            })
            .collect();
        Ok(parts.join("\n\n"))
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

fn banner(lines: &mut Vec<String>, heading: String) {
    let rule = "=".repeat(RULE_WIDTH);
    lines.push(rule.clone());
    lines.push(heading);
    lines.push(rule);
    lines.push(String::new());
}

fn cast_block(lines: &mut Vec<String>, cast: Option<&Vec<CastMember>>) {
    let Some(cast) = cast.filter(|c| !c.is_empty()) else {
        return;
    };
    lines.push("Cast:".to_string());
    for member in cast {
        lines.push(format!("  - {} as {}", member.name, member.character));
    }
    lines.push(String::new());
}

fn common_tail(
    lines: &mut Vec<String>,
    genres: String,
    tagline: Option<&String>,
    overview: Option<&String>,
) {
    lines.push(format!("Genres: {genres}"));
    lines.push(String::new());
    lines.push(format!("Tagline: {}", or_na(tagline)));
    lines.push(String::new());
    lines.push("Overview:".to_string());
    lines.push(
        overview
            .cloned()
            .unwrap_or_else(|| "No overview available.".to_string()),
    );
    lines.push(String::new());
}

fn format_movie(movie: &PreparedMovie) -> String {
    let mut lines = Vec::new();
    banner(&mut lines, format!("MOVIE: {}", movie.title));
    lines.push(format!("Original Title: {}", or_na(movie.original_title.as_ref())));
    lines.push(format!("Release Date: {}", or_na(movie.release_date.as_ref())));
    lines.push(format!("Runtime: {} minutes", or_na(movie.runtime)));
    lines.push(format!("Status: {}", or_na(movie.status.as_ref())));
    lines.push(String::new());
    lines.push(format!(
        "Rating: {}/10 ({} votes)",
        or_na(movie.vote_average.map(real_text)),
        movie.vote_count.unwrap_or(0)
    ));
    lines.push(format!("Popularity: {}", or_na(movie.popularity.map(real_text))));
    lines.push(String::new());
    common_tail(
        &mut lines,
        super::rows::genre_names(&movie.genres),
        movie.tagline.as_ref(),
        movie.overview.as_ref(),
    );
    cast_block(&mut lines, movie.cast.as_ref());

    if let Some(budget) = movie.budget.filter(|b| *b > 0) {
        lines.push(format!("Budget: ${}", thousands(budget)));
    }
    if let Some(revenue) = movie.revenue.filter(|r| *r > 0) {
        lines.push(format!("Revenue: ${}", thousands(revenue)));
    }
    if let Some(poster) = &movie.poster_path {
        lines.push(format!("\nPoster: {poster}"));
    }
    lines.join("\n")
}

fn format_show(show: &PreparedShow) -> String {
    let mut lines = Vec::new();
    banner(&mut lines, format!("TV SHOW: {}", show.name));
    lines.push(format!("Original Name: {}", or_na(show.original_name.as_ref())));
    lines.push(format!("First Air Date: {}", or_na(show.first_air_date.as_ref())));
    lines.push(format!("Last Air Date: {}", or_na(show.last_air_date.as_ref())));
    lines.push(format!("Status: {}", or_na(show.status.as_ref())));
    lines.push(format!("Seasons: {}", or_na(show.number_of_seasons)));
    lines.push(format!("Episodes: {}", or_na(show.number_of_episodes)));
    lines.push(String::new());
    lines.push(format!(
        "Rating: {}/10 ({} votes)",
        or_na(show.vote_average.map(real_text)),
        show.vote_count.unwrap_or(0)
    ));
    lines.push(format!("Popularity: {}", or_na(show.popularity.map(real_text))));
    lines.push(String::new());
    common_tail(
        &mut lines,
        super::rows::genre_names(&show.genres),
        show.tagline.as_ref(),
        show.overview.as_ref(),
    );
    cast_block(&mut lines, show.cast.as_ref());

    if !show.seasons.is_empty() {
        lines.push("Seasons:".to_string());
        for season in &show.seasons {
            lines.push(format!(
                "  Season {}: {} ({} episodes)",
                season.season_number, season.name, season.episode_count
            ));
        }
        lines.push(String::new());
    }

    let episodes = show.episode_list();
    if !episodes.is_empty() {
        lines.push("Episodes:".to_string());
        let mut current_season = None;
        for ep in episodes {
            if current_season != Some(ep.season_number) {
                current_season = Some(ep.season_number);
                lines.push(format!("\n  Season {}:", ep.season_number));
            }
            lines.push(format!(
                "    S{:02}E{:02} - {} ({})",
                ep.season_number,
                ep.episode_number,
                ep.name,
                or_na(ep.air_date.as_ref())
            ));
        }
    }

    if let Some(poster) = &show.poster_path {
        lines.push(format!("\nPoster: {poster}"));
    }
    lines.join("\n")
}
