//! Workbook reader for `.xlsx` files
//!
//! Reads one worksheet's cell text and font flags straight from the OOXML
//! parts with `zip` + `quick-xml`. Formulas, merged cells and number formats
//! are ignored; cached values are used as-is.

mod shared_strings;
mod styles;
mod workbook;
mod worksheet;

use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::domain::SheetRow;
use crate::infrastructure::traits::RowSource;

pub use shared_strings::SharedStrings;
pub use styles::Styles;
pub use workbook::SheetEntry;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const STYLES_PART: &str = "xl/styles.xml";

/// Failures while reading a workbook archive.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("cannot read workbook: {0}")]
    Io(#[from] io::Error),

    #[error("invalid workbook archive: {0}")]
    Zip(#[from] ZipError),

    #[error("missing workbook part: {0}")]
    MissingPart(String),

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("workbook contains no sheets")]
    NoSheets,
}

impl WorkbookError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<WorkbookError> for io::Error {
    fn from(err: WorkbookError) -> Self {
        match err {
            WorkbookError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// One worksheet's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

/// Row source backed by a worksheet of an `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
    sheet: Option<String>,
    min_width: usize,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            min_width: 0,
        }
    }

    /// Read the named sheet instead of the first one.
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Pad every row to at least `width` cells; wider rows keep their length.
    pub fn with_min_width(mut self, width: usize) -> Self {
        self.min_width = width;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the target sheet; the archive is closed when this returns.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn read_sheet(&self) -> Result<Sheet, WorkbookError> {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| WorkbookError::MissingPart(WORKBOOK_PART.to_string()))?;
        let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PART)?;
        let sheets = workbook::parse_sheets(&workbook_xml, rels_xml.as_deref())?;
        let entry = self.select(&sheets)?;
        debug!(sheet = %entry.name, part = %entry.part, "selected sheet");

        let shared = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => SharedStrings::default(),
        };
        let styles = match read_part(&mut archive, STYLES_PART)? {
            Some(xml) => Styles::parse(&xml)?,
            None => Styles::default(),
        };

        let sheet_xml = read_part(&mut archive, &entry.part)?
            .ok_or_else(|| WorkbookError::MissingPart(entry.part.clone()))?;
        let mut rows = worksheet::parse_rows(&sheet_xml, &entry.part, &shared, &styles)?;

        for row in &mut rows {
            row.pad_to(self.min_width);
        }
        debug!(rows = rows.len(), min_width = self.min_width, "sheet read");

        Ok(Sheet {
            name: entry.name.clone(),
            rows,
        })
    }

    fn select<'a>(&self, sheets: &'a [SheetEntry]) -> Result<&'a SheetEntry, WorkbookError> {
        match &self.sheet {
            Some(name) => sheets
                .iter()
                .find(|s| s.name == *name)
                .ok_or_else(|| WorkbookError::SheetNotFound(name.clone())),
            None => sheets.first().ok_or(WorkbookError::NoSheets),
        }
    }
}

impl RowSource for XlsxSource {
    fn describe(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{} [{}]", self.path.display(), sheet),
            None => self.path.display().to_string(),
        }
    }

    fn read_rows(&self) -> io::Result<Vec<SheetRow>> {
        Ok(self.read_sheet()?.rows)
    }
}

/// Contents of an archive member, `None` when the member does not exist.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, WorkbookError> {
    match archive.by_name(name) {
        Ok(mut part) => {
            let mut content = String::new();
            part.read_to_string(&mut content)?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
