use super::prepare::PreparedShow;
use super::rows::{self, Cell, Column};
use super::{prepare, ExportConfig, ExportData, ExportError, ExportFormat, Exporter, Prepared};
use crate::models::ContentKind;

const EPISODES_SEPARATOR: &str = "\n\n--- EPISODES ---\n";

/// Comma-separated rows under a fixed header. Movies and shows use different
/// column sets, so one list must hold a single kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError> {
        let items = data.items();
        let Some(first) = items.first() else {
            return Ok(String::new());
        };
        let is_movie = matches!(first, ContentKind::Movie(_));
        if items
            .iter()
            .any(|item| matches!(item, ContentKind::Movie(_)) != is_movie)
        {
            return Err(ExportError::MixedKinds(ExportFormat::Csv));
        }

        let mut out = String::new();
        write_header(
            &mut out,
            if is_movie {
                rows::MOVIE_COLUMNS
            } else {
                rows::SHOW_COLUMNS
            },
        );

        let mut single_show: Option<PreparedShow> = None;
        for item in items {
            match prepare(item, config) {
                Prepared::Movie(movie) => write_row(&mut out, &rows::movie_row(&movie)),
                Prepared::Show(show) => {
                    write_row(&mut out, &rows::show_row(&show));
                    if matches!(data, ExportData::Single(_)) {
                        single_show = Some(show);
                    }
                }
            }
        }

        // Only a lone show gets its episodes appended as a second block.
        if let Some(show) = single_show.filter(|s| !s.episode_list().is_empty()) {
            out.push_str(EPISODES_SEPARATOR);
            write_header(&mut out, rows::EPISODE_COLUMNS);
            for ep in show.episode_list() {
                write_row(&mut out, &rows::episode_row(&show, ep));
            }
        }
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }
}

fn write_header(out: &mut String, columns: &[Column]) {
    let header: Vec<&str> = rows::column_names(columns).collect();
    out.push_str(&header.join(","));
    out.push('\n');
}

fn write_row(out: &mut String, cells: &[Cell]) {
    let fields: Vec<String> = cells.iter().map(render).collect();
    out.push_str(&fields.join(","));
    out.push('\n');
}

fn render(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::Int(v) => v.to_string(),
        Cell::Real(v) => rows::real_text(*v),
        Cell::Text(s) => quote(s),
    }
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
