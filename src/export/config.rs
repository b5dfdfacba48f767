use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::sanitize_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Txt,
    Csv,
    Xml,
    Sql,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Sql => "sql",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            "sql" => Ok(ExportFormat::Sql),
            _ => Err(anyhow::anyhow!(
                "export format must be one of json, txt, csv, xml, sql"
            )),
        }
    }
}

/// Which optional data ends up in an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub include_cast: bool,
    pub include_episodes: bool,
    pub include_images: bool,
    /// Cast entries kept when cast is included. `None` or `Some(0)` keeps all.
    pub max_cast: Option<usize>,
    /// Download name template; `{title}` and `{date}` are substituted.
    pub filename_pattern: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            include_cast: true,
            include_episodes: true,
            include_images: true,
            max_cast: Some(10),
            filename_pattern: "{title}_{date}".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn with_format(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// File name (without extension) for an export of `title` made on `date`.
    pub fn file_stem(&self, title: &str, date: &str) -> String {
        let rendered = self
            .filename_pattern
            .replace("{title}", title)
            .replace("{date}", date);
        sanitize_filename(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_everything_with_ten_cast() {
        let config = ExportConfig::default();
        assert!(config.include_cast && config.include_episodes && config.include_images);
        assert_eq!(config.max_cast, Some(10));
        assert_eq!(config.format, ExportFormat::Json);
    }

    #[test]
    fn file_stem_renders_pattern_and_sanitises() {
        let config = ExportConfig::default();
        assert_eq!(
            config.file_stem("Mission: Impossible", "20240101"),
            "Mission_ Impossible_20240101"
        );
    }

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("yaml".parse::<ExportFormat>().is_err());
    }
}
