use super::{prepare, ExportConfig, ExportData, ExportError, Exporter, Prepared};

/// Field-for-field JSON of the prepared record(s), two-space indented,
/// non-ASCII kept literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError> {
        let out = match data {
            ExportData::Single(item) => serde_json::to_string_pretty(&prepare(item, config))?,
            ExportData::Many([]) => String::new(),
            ExportData::Many(items) => {
                let prepared: Vec<Prepared> =
                    items.iter().map(|item| prepare(item, config)).collect();
                serde_json::to_string_pretty(&prepared)?
            }
        };
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
