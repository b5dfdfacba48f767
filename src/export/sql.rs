use super::rows::{self, Cell, Column};
use super::{prepare, ExportConfig, ExportData, ExportError, Exporter, Prepared};

const MOVIES_TABLE: &str = "movies";
const SHOWS_TABLE: &str = "tv_shows";
const EPISODES_TABLE: &str = "episodes";

/// SQL script: table definitions for the tables touched, then one `INSERT`
/// per title (plus one per prepared episode of a show). Column sets match the
/// delimited-text export.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlExporter;

impl Exporter for SqlExporter {
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError> {
        if data.is_empty() {
            return Ok(String::new());
        }

        let prepared: Vec<Prepared> = data
            .items()
            .iter()
            .map(|item| prepare(item, config))
            .collect();

        let has_movies = prepared.iter().any(|p| matches!(p, Prepared::Movie(_)));
        let has_shows = prepared.iter().any(|p| matches!(p, Prepared::Show(_)));
        let has_episodes = prepared
            .iter()
            .any(|p| matches!(p, Prepared::Show(s) if !s.episode_list().is_empty()));

        let mut out = String::new();
        out.push_str(&format!("-- Generated by {}\n", env!("CARGO_PKG_NAME")));
        out.push_str(&format!("-- {} record(s)\n\n", prepared.len()));

        if has_movies {
            create_table(&mut out, MOVIES_TABLE, rows::MOVIE_COLUMNS);
        }
        if has_shows {
            create_table(&mut out, SHOWS_TABLE, rows::SHOW_COLUMNS);
        }
        if has_episodes {
            create_table(&mut out, EPISODES_TABLE, rows::EPISODE_COLUMNS);
        }

        for item in &prepared {
            match item {
                Prepared::Movie(movie) => insert(
                    &mut out,
                    MOVIES_TABLE,
                    rows::MOVIE_COLUMNS,
                    &rows::movie_row(movie),
                ),
                Prepared::Show(show) => {
                    insert(&mut out, SHOWS_TABLE, rows::SHOW_COLUMNS, &rows::show_row(show));
                    for ep in show.episode_list() {
                        insert(
                            &mut out,
                            EPISODES_TABLE,
                            rows::EPISODE_COLUMNS,
                            &rows::episode_row(show, ep),
                        );
                    }
                }
            }
        }
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "sql"
    }

    fn content_type(&self) -> &'static str {
        "application/sql"
    }
}

fn create_table(out: &mut String, table: &str, columns: &[Column]) {
    let defs: Vec<String> = columns
        .iter()
        .map(|(name, ty)| format!("  {} {ty}", quote_ident(name)))
        .collect();
    out.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n{}\n);\n\n",
        defs.join(",\n")
    ));
}

fn insert(out: &mut String, table: &str, columns: &[Column], cells: &[Cell]) {
    let names: Vec<String> = rows::column_names(columns).map(quote_ident).collect();
    let values: Vec<String> = cells.iter().map(literal).collect();
    out.push_str(&format!(
        "INSERT INTO {table} ({}) VALUES ({});\n",
        names.join(", "),
        values.join(", ")
    ));
}

/// `cast` is a reserved word in most dialects, so every identifier is quoted.
fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

fn literal(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NULL".to_string(),
        Cell::Int(v) => v.to_string(),
        Cell::Real(v) if v.is_finite() => rows::real_text(*v),
        Cell::Real(_) => "NULL".to_string(),
        Cell::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}
