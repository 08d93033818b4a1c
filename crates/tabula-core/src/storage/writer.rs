//! Writer for the XML sheet format

use quick_xml::escape::escape;
use std::fs;
use std::path::Path;

use crate::error::{Result, TabulaError};

/// Write a sheet file. `cells` are written in the order given.
pub fn write_sheet<I, N, C>(path: &Path, version: &str, cells: I) -> Result<()>
where
    I: IntoIterator<Item = (N, C)>,
    N: AsRef<str>,
    C: AsRef<str>,
{
    let content = write_sheet_content(version, cells);
    fs::write(path, content).map_err(|e| {
        TabulaError::read_write_caused_by(format!("cannot write {}", path.display()), e)
    })
}

/// Render a sheet as an XML string
pub fn write_sheet_content<I, N, C>(version: &str, cells: I) -> String
where
    I: IntoIterator<Item = (N, C)>,
    N: AsRef<str>,
    C: AsRef<str>,
{
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str(&format!("<spreadsheet version=\"{}\">\n", escape_attribute(version)));
    for (name, contents) in cells {
        out.push_str(&format!(
            "  <cell name=\"{}\" contents=\"{}\"/>\n",
            escape_attribute(name.as_ref()),
            escape_attribute(contents.as_ref())
        ));
    }
    out.push_str("</spreadsheet>\n");
    out
}

/// Escape markup characters plus the whitespace XML would otherwise
/// normalize inside attribute values.
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped.into_owned();
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        match ch {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CellEntry, parse_sheet, parse_sheet_content};

    #[test]
    fn test_write_layout() {
        let content = write_sheet_content("v1", [("A1", "10"), ("B1", "=A1 * 2")]);
        assert_eq!(
            content,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <spreadsheet version=\"v1\">\n  \
             <cell name=\"A1\" contents=\"10\"/>\n  \
             <cell name=\"B1\" contents=\"=A1 * 2\"/>\n\
             </spreadsheet>\n"
        );
    }

    #[test]
    fn test_write_escapes_awkward_text() {
        let text = "a<b & \"c\" 'd'\nline\ttab";
        let content = write_sheet_content("x\"y", [("A1", text)]);
        assert!(!content.contains("a<b"));
        assert!(content.contains("&#10;"));

        let doc = parse_sheet_content(&content).unwrap();
        assert_eq!(doc.version, "x\"y");
        assert_eq!(
            doc.cells,
            vec![CellEntry {
                name: "A1".to_string(),
                contents: text.to_string()
            }]
        );
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.xml");
        write_sheet(&path, "default", Vec::<(String, String)>::new()).unwrap();
        let doc = parse_sheet(&path).unwrap();
        assert_eq!(doc.version, "default");
        assert!(doc.cells.is_empty());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sheet.xml");
        assert!(matches!(
            write_sheet(&path, "default", [("A1", "1")]),
            Err(TabulaError::ReadWrite { .. })
        ));
    }
}
