//! Rows and cells of a worksheet part.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use super::{SharedStrings, Styles, WorkbookError};
use crate::domain::{column_index, Cell, SheetRow};

/// Where text events inside a `<c>` element go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Value,
    InlineText,
}

/// Cell under construction.
#[derive(Debug, Default)]
struct PendingCell {
    column: usize,
    kind: Option<String>,
    style: usize,
    value: String,
    inline: String,
}

impl PendingCell {
    fn resolve(self, shared: &SharedStrings, styles: &Styles) -> Cell {
        let text = match self.kind.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared.get(idx))
                .unwrap_or_default()
                .to_string(),
            Some("inlineStr") => self.inline,
            Some("b") => match self.value.trim() {
                "1" => "TRUE".to_string(),
                "0" => "FALSE".to_string(),
                other => other.to_string(),
            },
            _ => self.value,
        };
        Cell::new(text, styles.format(self.style))
    }
}

/// Parse `<sheetData>` into rows, cells placed at the column of their `r` reference.
///
/// Cells without text are not stored, so a row is only as wide as its last
/// non-empty cell.
pub fn parse_rows(
    xml: &str,
    part: &str,
    shared: &SharedStrings,
    styles: &Styles,
) -> Result<Vec<SheetRow>, WorkbookError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut row: Option<SheetRow> = None;
    let mut cell: Option<PendingCell> = None;
    let mut capture = Capture::None;
    let mut phonetic_depth = 0usize;
    let mut next_column = 0usize;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = Some(start_row(&reader, &e, rows.last()));
                    next_column = 0;
                }
                b"c" => {
                    let pending = start_cell(&reader, &e, next_column);
                    next_column = pending.column + 1;
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => capture = Capture::Value,
                b"t" if cell.is_some() => capture = Capture::InlineText,
                b"rPh" => phonetic_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => rows.push(start_row(&reader, &e, rows.last())),
                b"c" => {
                    let pending = start_cell(&reader, &e, next_column);
                    next_column = pending.column + 1;
                    if let Some(row) = row.as_mut() {
                        place(row, pending, shared, styles);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) if capture != Capture::None && phonetic_depth == 0 => {
                let unescaped = text.unescape().map_err(|e| WorkbookError::xml(part, e))?;
                if let Some(cell) = cell.as_mut() {
                    match capture {
                        Capture::Value => cell.value.push_str(&unescaped),
                        Capture::InlineText => cell.inline.push_str(&unescaped),
                        Capture::None => {}
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => capture = Capture::None,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"c" => {
                    if let (Some(pending), Some(row)) = (cell.take(), row.as_mut()) {
                        place(row, pending, shared, styles);
                    }
                }
                b"row" => {
                    if let Some(done) = row.take() {
                        trace!(row = done.number, cells = done.cells.len(), "row parsed");
                        rows.push(done);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(WorkbookError::xml(part, e)),
            _ => {}
        }
    }

    Ok(rows)
}

fn attribute(reader: &Reader<&[u8]>, element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| {
            attr.decode_and_unescape_value(reader.decoder())
                .ok()
                .map(|value| value.into_owned())
        })
}

/// Row numbered by its `r` attribute, or the one after `previous`.
fn start_row(reader: &Reader<&[u8]>, element: &BytesStart<'_>, previous: Option<&SheetRow>) -> SheetRow {
    let number = attribute(reader, element, b"r")
        .and_then(|r| r.parse().ok())
        .unwrap_or_else(|| previous.map_or(1, |p| p.number + 1));
    SheetRow::new(number, Vec::new())
}

/// Cell placed at its `r` column, or at `next_column` when the reference is missing.
fn start_cell(reader: &Reader<&[u8]>, element: &BytesStart<'_>, next_column: usize) -> PendingCell {
    let column = attribute(reader, element, b"r")
        .and_then(|r| column_index(&r).ok())
        .unwrap_or(next_column);
    PendingCell {
        column,
        kind: attribute(reader, element, b"t"),
        style: attribute(reader, element, b"s")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        ..PendingCell::default()
    }
}

fn place(row: &mut SheetRow, pending: PendingCell, shared: &SharedStrings, styles: &Styles) {
    let column = pending.column;
    let cell = pending.resolve(shared, styles);
    if !cell.is_empty() {
        row.set(column, cell);
    }
}
