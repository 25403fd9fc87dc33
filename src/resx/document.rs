/*!
 * Structured resource document model.
 *
 * A resource document is an XML file with a `<root>` element holding schema
 * metadata, `resheader` entries and an ordered list of `data` entries:
 *
 * ```xml
 * <data name="okButton.Text" xml:space="preserve">
 *   <value>OK</value>
 *   <comment>optional</comment>
 * </data>
 * ```
 *
 * The model keeps the loaded text so that saving only splices newly
 * appended entries in before `</root>` and leaves the rest untouched.
 */

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::splice::splice_before_end;
use super::template::RESX_TEMPLATE;
use crate::errors::ResxError;

const BOM: char = '\u{feff}';

/// One `data` entry of a resource document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResxEntry {
    /// Value of the `name` attribute
    pub name: String,
    /// Text of the `value` child, if present
    pub value: Option<String>,
    /// Text of the `comment` child, if present
    pub comment: Option<String>,
}

impl ResxEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            comment: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Value,
    Comment,
}

/// A parsed resource document with pending additions
#[derive(Debug, Clone)]
pub struct ResxDocument {
    /// Document text as loaded (without a byte order mark)
    source: String,
    /// Whether the loaded text started with a byte order mark
    bom: bool,
    /// Entries present in `source`, in document order
    entries: Vec<ResxEntry>,
    /// Entries appended since loading
    pending: Vec<ResxEntry>,
}

impl ResxDocument {
    /// An empty document built from the standard template
    pub fn from_template() -> Self {
        Self {
            source: RESX_TEMPLATE.to_string(),
            bom: false,
            entries: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Parse a resource document
    pub fn parse(content: &str) -> Result<Self, ResxError> {
        let (content, bom) = match content.strip_prefix(BOM) {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let mut reader = Reader::from_str(content);

        let mut entries = Vec::new();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut saw_root = false;
        let mut current: Option<ResxEntry> = None;
        let mut field: Option<Field> = None;
        let mut text = String::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                ResxError::Parse(format!("at position {}: {}", reader.buffer_position(), e))
            })?;

            match event {
                Event::Start(start) => {
                    let name = start.name().as_ref().to_vec();
                    match stack.len() {
                        0 => {
                            check_root(&name, saw_root)?;
                            saw_root = true;
                        }
                        1 if name == b"data" => {
                            current = Some(ResxEntry {
                                name: data_name(&start)?,
                                value: None,
                                comment: None,
                            });
                        }
                        2 if current.is_some() => {
                            field = match name.as_slice() {
                                b"value" => Some(Field::Value),
                                b"comment" => Some(Field::Comment),
                                _ => None,
                            };
                            text.clear();
                        }
                        _ => {}
                    }
                    stack.push(name);
                }
                Event::Empty(start) => {
                    let name = start.name().as_ref().to_vec();
                    match stack.len() {
                        0 => {
                            check_root(&name, saw_root)?;
                            saw_root = true;
                        }
                        1 if name == b"data" => entries.push(ResxEntry {
                            name: data_name(&start)?,
                            value: None,
                            comment: None,
                        }),
                        2 => {
                            if let Some(entry) = current.as_mut() {
                                match name.as_slice() {
                                    b"value" => entry.value = Some(String::new()),
                                    b"comment" => entry.comment = Some(String::new()),
                                    _ => {}
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(content) if field.is_some() => {
                    let unescaped = content
                        .unescape()
                        .map_err(|e| ResxError::Parse(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(cdata) if field.is_some() => {
                    let raw = std::str::from_utf8(&cdata).map_err(|e| ResxError::Parse(e.to_string()))?;
                    text.push_str(raw);
                }
                Event::End(_) => {
                    stack.pop();
                    match stack.len() {
                        2 => {
                            if let (Some(kind), Some(entry)) = (field.take(), current.as_mut()) {
                                let value = std::mem::take(&mut text);
                                match kind {
                                    Field::Value => entry.value = Some(value),
                                    Field::Comment => entry.comment = Some(value),
                                }
                            }
                        }
                        1 => {
                            if let Some(entry) = current.take() {
                                entries.push(entry);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ResxError::Parse(format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        if !saw_root {
            return Err(ResxError::Parse("missing <root> element".to_string()));
        }

        Ok(Self {
            source: content.to_string(),
            bom,
            entries,
            pending: Vec::new(),
        })
    }

    /// All entries, loaded ones first, then the ones appended since
    pub fn entries(&self) -> impl Iterator<Item = &ResxEntry> {
        self.entries.iter().chain(self.pending.iter())
    }

    /// First entry with the given name
    pub fn get(&self, name: &str) -> Option<&ResxEntry> {
        self.entries().find(|entry| entry.name == name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Value of the first entry with the given name
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|entry| entry.value.as_deref())
    }

    /// Append an entry unless one with the same name already exists.
    /// Existing values are never replaced. Returns whether the entry was added.
    pub fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.contains_key(name) {
            return false;
        }
        self.pending.push(ResxEntry::new(name, value));
        true
    }

    /// Whether entries were appended since the document was loaded
    pub fn is_modified(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Serialize the document, splicing appended entries before `</root>`.
    /// A byte order mark present on load is written back.
    pub fn to_xml(&self) -> Result<String, ResxError> {
        let body = if self.pending.is_empty() {
            self.source.clone()
        } else {
            let fragment = render_entries(&self.pending)?;
            splice_before_end(&self.source, |depth, _| depth == 0, &fragment)?
                .ok_or_else(|| ResxError::Write("document has no root element".to_string()))?
        };

        Ok(if self.bom { format!("{}{}", BOM, body) } else { body })
    }
}

fn check_root(name: &[u8], saw_root: bool) -> Result<(), ResxError> {
    if saw_root {
        return Err(ResxError::Parse("more than one document element".to_string()));
    }
    if name != b"root" {
        return Err(ResxError::Parse(format!(
            "expected <root> document element, found <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

fn data_name(start: &BytesStart<'_>) -> Result<String, ResxError> {
    let attribute = start
        .try_get_attribute("name")
        .map_err(|e| ResxError::Parse(e.to_string()))?
        .ok_or_else(|| ResxError::Parse("<data> element without a name attribute".to_string()))?;
    let value = attribute
        .unescape_value()
        .map_err(|e| ResxError::Parse(e.to_string()))?;
    Ok(value.into_owned())
}

fn render_entries(entries: &[ResxEntry]) -> Result<Vec<u8>, ResxError> {
    let mut writer = Writer::new(Vec::new());

    for entry in entries {
        writer.get_mut().extend_from_slice(b"\n  ");
        let start = BytesStart::new("data")
            .with_attributes([("name", entry.name.as_str()), ("xml:space", "preserve")]);
        write(&mut writer, Event::Start(start))?;

        if let Some(value) = &entry.value {
            writer.get_mut().extend_from_slice(b"\n    ");
            write_text_element(&mut writer, "value", value)?;
        }
        if let Some(comment) = &entry.comment {
            writer.get_mut().extend_from_slice(b"\n    ");
            write_text_element(&mut writer, "comment", comment)?;
        }

        writer.get_mut().extend_from_slice(b"\n  ");
        write(&mut writer, Event::End(BytesEnd::new("data")))?;
    }

    Ok(writer.into_inner())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), ResxError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ResxError> {
    writer
        .write_event(event)
        .map_err(|e| ResxError::Write(e.to_string()))
}
