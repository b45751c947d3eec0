//! Sheet list from `xl/workbook.xml` and its relationships.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::WorkbookError;

/// A sheet declared by the workbook, with its archive member path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub part: String,
}

/// Sheets in workbook order.
///
/// Without a relationships part, sheets map to `xl/worksheets/sheet<N>.xml`
/// by position.
pub fn parse_sheets(
    workbook_xml: &str,
    rels_xml: Option<&str>,
) -> Result<Vec<SheetEntry>, WorkbookError> {
    let declared = parse_declared(workbook_xml)?;
    let targets = match rels_xml {
        Some(xml) => parse_relationships(xml)?,
        None => HashMap::new(),
    };

    Ok(declared
        .into_iter()
        .enumerate()
        .map(|(idx, (name, rel_id))| {
            let part = rel_id
                .and_then(|id| targets.get(&id))
                .map(|target| resolve_target(target))
                .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", idx + 1));
            SheetEntry { name, part }
        })
        .collect())
}

/// `(name, r:id)` of every `<sheet>` element.
fn parse_declared(xml: &str) -> Result<Vec<(String, Option<String>)>, WorkbookError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
                        continue;
                    };
                    // `r:id` is namespaced; `name` is not
                    match (attr.key.prefix().is_some(), attr.key.local_name().as_ref()) {
                        (false, b"name") => name = Some(value.into_owned()),
                        (true, b"id") => rel_id = Some(value.into_owned()),
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    sheets.push((name, rel_id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(WorkbookError::xml("xl/workbook.xml", e)),
            _ => {}
        }
    }

    Ok(sheets)
}

/// Relationship id → target.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, WorkbookError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
                        continue;
                    };
                    match attr.key.local_name().as_ref() {
                        b"Id" => id = Some(value.into_owned()),
                        b"Target" => target = Some(value.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(WorkbookError::xml("xl/_rels/workbook.xml.rels", e)),
            _ => {}
        }
    }

    Ok(targets)
}

/// Targets are relative to `xl/` unless absolute within the package.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}
