use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::ResxError;

/// Copy `source` event by event and insert the pre-rendered `fragment` just
/// before the closing tag of the first element accepted by `is_target`.
///
/// `is_target` receives the depth of the element (the document element is at
/// depth 0) and its qualified name. Everything outside the insertion point is
/// written back unchanged, including whitespace, comments and entity escapes.
/// A self-closing target is expanded into a start/end pair around the fragment.
///
/// Returns `Ok(None)` when no element matched.
pub(crate) fn splice_before_end<F>(source: &str, mut is_target: F, fragment: &[u8]) -> Result<Option<String>, ResxError>
where
    F: FnMut(usize, &[u8]) -> bool,
{
    let mut reader = Reader::from_str(source);
    let mut writer = Writer::new(Vec::with_capacity(source.len() + fragment.len()));
    let mut depth = 0usize;
    let mut held: Option<BytesText<'_>> = None;
    let mut spliced = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ResxError::Parse(format!("at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Eof => break,
            // Whitespace is held back so the fragment lands before the
            // indentation of the closing tag rather than after it.
            Event::Text(text) if !spliced && text.iter().all(|b| b.is_ascii_whitespace()) => {
                flush_held(&mut writer, held.take())?;
                held = Some(text);
            }
            Event::Start(start) => {
                depth += 1;
                flush_held(&mut writer, held.take())?;
                write(&mut writer, Event::Start(start))?;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if !spliced && is_target(depth, end.name().as_ref()) {
                    writer.get_mut().extend_from_slice(fragment);
                    spliced = true;
                }
                flush_held(&mut writer, held.take())?;
                write(&mut writer, Event::End(end))?;
            }
            Event::Empty(start) => {
                flush_held(&mut writer, held.take())?;
                if !spliced && is_target(depth, start.name().as_ref()) {
                    write(&mut writer, Event::Start(start.borrow()))?;
                    writer.get_mut().extend_from_slice(fragment);
                    write(&mut writer, Event::End(start.to_end()))?;
                    spliced = true;
                } else {
                    write(&mut writer, Event::Empty(start))?;
                }
            }
            other => {
                flush_held(&mut writer, held.take())?;
                write(&mut writer, other)?;
            }
        }
    }
    flush_held(&mut writer, held.take())?;

    if depth != 0 {
        return Err(ResxError::Parse("unexpected end of document".to_string()));
    }
    if !spliced {
        return Ok(None);
    }

    String::from_utf8(writer.into_inner())
        .map(Some)
        .map_err(|e| ResxError::Write(e.to_string()))
}

fn flush_held(writer: &mut Writer<Vec<u8>>, held: Option<BytesText<'_>>) -> Result<(), ResxError> {
    match held {
        Some(text) => write(writer, Event::Text(text)),
        None => Ok(()),
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ResxError> {
    writer
        .write_event(event)
        .map_err(|e| ResxError::Write(e.to_string()))
}
