use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use super::{prepare, ExportConfig, ExportData, ExportError, Exporter, Prepared};

const GENERATOR: &str = "reelfetch";

/// XML tree under `<data generator="reelfetch">`, one `movie` or `tv_show`
/// element per title. Lists become a wrapper element holding one child per
/// entry; absent fields are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn export(&self, data: ExportData<'_>, config: &ExportConfig) -> Result<String, ExportError> {
        if data.is_empty() {
            return Ok(String::new());
        }

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(markup)?;
        writer
            .write_event(Event::Start(
                BytesStart::new("data").with_attributes([("generator", GENERATOR)]),
            ))
            .map_err(markup)?;

        for item in data.items() {
            let prepared = prepare(item, config);
            let tag = match prepared {
                Prepared::Movie(_) => "movie",
                Prepared::Show(_) => "tv_show",
            };
            let Value::Object(fields) = serde_json::to_value(&prepared)? else {
                return Err(ExportError::Markup(format!("{tag} did not serialize to an object")));
            };
            write_object(&mut writer, tag, &fields)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("data")))
            .map_err(markup)?;

        let mut out = String::from_utf8(writer.into_inner())
            .map_err(|e| ExportError::Markup(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }

    fn content_type(&self) -> &'static str {
        "application/xml"
    }
}

fn markup(err: impl std::fmt::Display) -> ExportError {
    ExportError::Markup(err.to_string())
}

/// Child tag for entries of list `key`: the name without its trailing `s`,
/// or `item` when there is none to strip.
fn item_tag(key: &str) -> &str {
    key.strip_suffix('s')
        .filter(|stem| !stem.is_empty())
        .unwrap_or("item")
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_object<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    fields: &Map<String, Value>,
) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(markup)?;
    for (key, value) in fields {
        write_field(writer, key, value)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(markup)?;
    Ok(())
}

fn write_field<W: Write>(writer: &mut Writer<W>, key: &str, value: &Value) -> Result<(), ExportError> {
    match value {
        Value::Null => Ok(()),
        Value::Object(fields) => write_object(writer, key, fields),
        Value::Array(entries) if entries.is_empty() => writer
            .write_event(Event::Empty(BytesStart::new(key)))
            .map_err(markup),
        Value::Array(entries) => {
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(markup)?;
            let child = item_tag(key);
            for entry in entries {
                match entry {
                    Value::Object(fields) => write_object(writer, child, fields)?,
                    Value::Null => writer
                        .write_event(Event::Empty(BytesStart::new(child)))
                        .map_err(markup)?,
                    scalar => write_leaf(writer, child, &scalar_text(scalar))?,
                }
            }
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(markup)
        }
        scalar => write_leaf(writer, key, &scalar_text(scalar)),
    }
}

fn write_leaf<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(markup)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(markup)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(markup)
}
