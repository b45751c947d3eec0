//! Shared fixtures: sheet rows and generated `.xlsx` workbooks.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use budget_tree::domain::{Cell, CellFormat, SheetRow, TreeNode};

/// Column K, where the default layout reads amounts.
pub const AMOUNT_COLUMN: usize = 10;

/// Title row at `column`, no amount.
pub fn entry(number: usize, column: usize, title: &str) -> SheetRow {
    SheetRow::with_cell_at(number, column, Cell::plain(title))
}

/// Title row at `column` with `amount` in column K.
pub fn entry_with_amount(number: usize, column: usize, title: &str, amount: &str) -> SheetRow {
    let mut row = entry(number, column, title);
    row.set(AMOUNT_COLUMN, Cell::plain(amount));
    row
}

/// Bullet marker at `column`, title in the next cell.
pub fn bullet(number: usize, column: usize, marker: &str, title: &str) -> SheetRow {
    let mut row = SheetRow::with_cell_at(number, column, Cell::plain(marker));
    row.set(column + 1, Cell::plain(title));
    row
}

/// Italic description row at `column`.
pub fn description(number: usize, column: usize, text: &str) -> SheetRow {
    SheetRow::with_cell_at(number, column, Cell::new(text, CellFormat::ITALIC))
}

pub fn blank(number: usize) -> SheetRow {
    SheetRow::new(number, vec![Cell::empty(); AMOUNT_COLUMN + 1])
}

/// Titles of the direct children of `node`.
pub fn child_titles(node: &TreeNode) -> Vec<&str> {
    node.children.iter().map(|c| c.title.as_str()).collect()
}

/// The A/B/C example: `A(B(C 100, D 200), E 50)`.
pub fn sample_tree() -> TreeNode {
    TreeNode::synthetic_root(vec![TreeNode::new("A").with_children(vec![
        TreeNode::new("B").with_children(vec![
            TreeNode::new("C").with_amount(100.0),
            TreeNode::new("D").with_amount(200.0),
        ]),
        TreeNode::new("E").with_amount(50.0),
    ])])
}

// ============================================================
// XLSX FIXTURES
// ============================================================

/// Cell style in the generated stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain = 0,
    Section = 1,
    Italic = 2,
}

#[derive(Debug, Clone)]
pub enum Value {
    /// Written through the shared strings table
    Shared(String, Style),
    /// Written as an inline string
    Inline(String),
    Number(f64),
}

pub fn text(value: &str) -> Value {
    Value::Shared(value.to_string(), Style::Plain)
}

pub fn styled(value: &str, style: Style) -> Value {
    Value::Shared(value.to_string(), style)
}

pub fn inline(value: &str) -> Value {
    Value::Inline(value.to_string())
}

pub fn number(value: f64) -> Value {
    Value::Number(value)
}

/// One worksheet: rows of `(cell reference, value)` pairs, numbered from 1.
#[derive(Debug, Clone)]
pub struct FixtureSheet {
    pub name: String,
    pub rows: Vec<Vec<(String, Value)>>,
}

impl FixtureSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    /// Append a row; `cells` hold column letters, the row number is added.
    pub fn row(mut self, cells: Vec<(&str, Value)>) -> Self {
        let number = self.rows.len() + 1;
        self.rows.push(
            cells
                .into_iter()
                .map(|(column, value)| (format!("{column}{number}"), value))
                .collect(),
        );
        self
    }

    pub fn empty_row(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }
}

/// A small budget laid out the way the source sheets are:
/// `Infrastructure(Roads(Bridges 100, Drainage 200), Buildings 50)`.
pub fn budget_sheet() -> FixtureSheet {
    FixtureSheet::new("Budget")
        .row(vec![("B", styled("Infrastructure", Style::Section))])
        .row(vec![("C", text("a.")), ("D", text("Roads"))])
        .row(vec![("D", text("1.")), ("E", text("Bridges")), ("K", number(100.0))])
        .row(vec![("E", styled("Concrete works", Style::Italic))])
        .row(vec![("D", text("2.")), ("E", text("Drainage")), ("K", text("200.00"))])
        .empty_row()
        .row(vec![("C", text("b.")), ("D", inline("Buildings")), ("K", number(50.0))])
}

/// Write a minimal but well-formed workbook with the given sheets.
pub fn write_xlsx(path: &Path, sheets: &[FixtureSheet]) {
    let file = File::create(path).expect("create xlsx");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut shared: Vec<String> = Vec::new();
    let sheet_parts: Vec<String> = sheets
        .iter()
        .map(|sheet| sheet_xml(sheet, &mut shared))
        .collect();

    let mut put = |name: &str, content: &str| {
        zip.start_file(name, options).expect("start part");
        zip.write_all(content.as_bytes()).expect("write part");
    };

    put("[Content_Types].xml", &content_types(sheets.len()));
    put("_rels/.rels", ROOT_RELS);
    put("xl/workbook.xml", &workbook_xml(sheets));
    put("xl/_rels/workbook.xml.rels", &workbook_rels(sheets.len()));
    put("xl/styles.xml", STYLES);
    put("xl/sharedStrings.xml", &shared_strings_xml(&shared));
    for (idx, part) in sheet_parts.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", idx + 1), part);
    }

    zip.finish().expect("finish xlsx");
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(sheet: &FixtureSheet, shared: &mut Vec<String>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (idx, row) in sheet.rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        xml.push_str(&format!(r#"<row r="{}">"#, idx + 1));
        for (reference, value) in row {
            match value {
                Value::Shared(text, style) => {
                    let index = shared.iter().position(|s| s == text).unwrap_or_else(|| {
                        shared.push(text.clone());
                        shared.len() - 1
                    });
                    xml.push_str(&format!(
                        r#"<c r="{reference}" s="{}" t="s"><v>{index}</v></c>"#,
                        *style as usize
                    ));
                }
                Value::Inline(text) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                )),
                Value::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{n}</v></c>"#))
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn shared_strings_xml(shared: &[String]) -> String {
    let items: String = shared
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
        shared.len(),
        items
    )
}

fn workbook_xml(sheets: &[FixtureSheet]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(idx, sheet)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&sheet.name),
                idx + 1,
                idx + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels(count: usize) -> String {
    let mut rels: String = (1..=count)
        .map(|idx| {
            format!(
                r#"<Relationship Id="rId{idx}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{idx}.xml"/>"#
            )
        })
        .collect();
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        count + 1
    ));
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        count + 2
    ));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

fn content_types(count: usize) -> String {
    let overrides: String = (1..=count)
        .map(|idx| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{idx}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Fonts: 0 plain, 1 bold+underline, 2 italic; style N uses font N.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="3"><font><sz val="11"/></font><font><b/><u/><sz val="11"/></font><font><i/><sz val="11"/></font></fonts>
<cellXfs count="3"><xf numFmtId="0" fontId="0"/><xf numFmtId="0" fontId="1"/><xf numFmtId="0" fontId="2"/></cellXfs>
</styleSheet>"#;
