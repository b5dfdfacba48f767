//! Encoders that turn fetched titles into downloadable documents.
//!
//! Every encoder runs the prepare step first, so field toggles in
//! [`ExportConfig`] behave the same across formats.

mod config;
mod csv;
mod json;
pub mod prepare;
mod rows;
mod sql;
mod text;
mod xml;

pub use self::config::{ExportConfig, ExportFormat};
pub use self::csv::CsvExporter;
pub use self::json::JsonExporter;
pub use self::prepare::{
    prepare, Prepared, PreparedEpisode, PreparedMovie, PreparedSeason, PreparedShow,
};
pub use self::sql::SqlExporter;
pub use self::text::TextExporter;
pub use self::xml::XmlExporter;

use crate::models::ContentKind;

/// What to encode: one title, or an ordered list of titles.
#[derive(Debug, Clone, Copy)]
pub enum ExportData<'a> {
    Single(&'a ContentKind),
    Many(&'a [ContentKind]),
}

impl<'a> ExportData<'a> {
    pub fn items(&self) -> &'a [ContentKind] {
        match *self {
            ExportData::Single(item) => std::slice::from_ref(item),
            ExportData::Many(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl<'a> From<&'a ContentKind> for ExportData<'a> {
    fn from(item: &'a ContentKind) -> Self {
        ExportData::Single(item)
    }
}

impl<'a> From<&'a [ContentKind]> for ExportData<'a> {
    fn from(items: &'a [ContentKind]) -> Self {
        ExportData::Many(items)
    }
}

impl<'a> From<&'a Vec<ContentKind>> for ExportData<'a> {
    fn from(items: &'a Vec<ContentKind>) -> Self {
        ExportData::Many(items.as_slice())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot export movies and shows together as {0}")]
    MixedKinds(ExportFormat),

    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write markup: {0}")]
    Markup(String),
}

pub trait Exporter: Send + Sync {
    /// Encode `data`. An empty list encodes to an empty string.
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError>;
    fn file_extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
}

pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Txt => Box::new(TextExporter),
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Xml => Box::new(XmlExporter),
        ExportFormat::Sql => Box::new(SqlExporter),
    }
}
