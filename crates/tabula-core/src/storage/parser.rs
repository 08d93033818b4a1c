//! Parser for the XML sheet format

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

use super::{CellEntry, SheetDocument};
use crate::error::{Result, TabulaError};

const ROOT_ELEMENT: &[u8] = b"spreadsheet";
const CELL_ELEMENT: &[u8] = b"cell";

/// Read and parse a sheet file
pub fn parse_sheet(path: &Path) -> Result<SheetDocument> {
    let content = fs::read_to_string(path).map_err(|e| {
        TabulaError::read_write_caused_by(format!("cannot read {}", path.display()), e)
    })?;
    parse_sheet_content(&content)
}

/// Parse sheet XML from a string
pub fn parse_sheet_content(content: &str) -> Result<SheetDocument> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut version: Option<String> = None;
    let mut cells = Vec::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            TabulaError::read_write(format!(
                "malformed XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                match depth {
                    0 => {
                        if version.is_some() {
                            return Err(TabulaError::read_write("more than one root element"));
                        }
                        expect_element(e, ROOT_ELEMENT)?;
                        version = Some(required_attribute(e, b"version")?);
                    }
                    1 => {
                        expect_element(e, CELL_ELEMENT)?;
                        cells.push(CellEntry {
                            name: required_attribute(e, b"name")?,
                            contents: required_attribute(e, b"contents")?,
                        });
                    }
                    _ => {
                        return Err(TabulaError::read_write(format!(
                            "unexpected element <{}> inside <cell>",
                            element_name(e)
                        )));
                    }
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            // Text, comments, declarations and processing instructions carry no data.
            _ => {}
        }
    }

    if depth != 0 {
        return Err(TabulaError::read_write("unexpected end of document"));
    }
    let version =
        version.ok_or_else(|| TabulaError::read_write("missing <spreadsheet> root element"))?;

    Ok(SheetDocument { version, cells })
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn expect_element(e: &BytesStart, expected: &[u8]) -> Result<()> {
    if e.name().as_ref() == expected {
        Ok(())
    } else {
        Err(TabulaError::read_write(format!(
            "expected <{}>, found <{}>",
            String::from_utf8_lossy(expected),
            element_name(e)
        )))
    }
}

/// Unescaped value of attribute `key`, which must be present.
fn required_attribute(e: &BytesStart, key: &[u8]) -> Result<String> {
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| {
            TabulaError::read_write(format!("invalid attribute on <{}>: {}", element_name(e), err))
        })?;
        if attr.key.as_ref() != key {
            continue;
        }
        let raw = String::from_utf8(attr.value.to_vec())
            .map_err(|_| TabulaError::read_write("attribute value is not valid UTF-8"))?;
        return unescape(&raw).map(|value| value.into_owned()).map_err(|err| {
            TabulaError::read_write(format!("invalid escape in attribute value: {}", err))
        });
    }

    Err(TabulaError::read_write(format!(
        "<{}> is missing the '{}' attribute",
        element_name(e),
        String::from_utf8_lossy(key)
    )))
}
