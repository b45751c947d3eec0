//! Row classification: what a spreadsheet row contributes to the hierarchy.

use serde::{Deserialize, Serialize};

use crate::domain::amount::parse_amount;
use crate::domain::entities::{CellFormat, SheetRow};
use crate::domain::error::{DomainError, DomainResult};

/// Column positions of the targeted spreadsheet layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Layout {
    /// First column scanned for content (0-based; 1 is column B)
    pub start_column: usize,
    /// Column holding the amount (0-based; 10 is column K)
    pub amount_column: usize,
    /// Longest text still recognized as a bullet marker
    pub bullet_max_len: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            start_column: 1,
            amount_column: 10,
            bullet_max_len: 4,
        }
    }
}

/// What a single row contributes to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind<'a> {
    /// Nothing in any tracked column
    Blank,
    /// Content present but no usable title (e.g. a bullet with nothing after it)
    Untitled,
    /// Italic text without an amount: extends the latest node's description
    Description { text: &'a str },
    /// A title/value row opening a node at `level`
    Entry {
        level: usize,
        title: &'a str,
        amount: Option<f64>,
        format: CellFormat,
    },
}

/// Classify a row against `layout`.
///
/// The level of an entry is the column of its first non-empty cell, plus one
/// when that cell is a bullet marker; the title then sits in the next cell.
/// A bare letter or digit is only a marker when a title follows it before the
/// amount column; on its own it is the title.
pub fn classify<'a>(row: &'a SheetRow, layout: &Layout) -> RowKind<'a> {
    let Some(first) = row.first_non_empty(layout.start_column) else {
        return RowKind::Blank;
    };

    let (title_column, bullet_bonus) = if is_marker_cell(row, first, layout) {
        (first + 1, 1)
    } else {
        (first, 0)
    };

    let title = row.text(title_column);
    if title.is_empty() {
        return RowKind::Untitled;
    }

    let format = row
        .cell(title_column)
        .map(|cell| cell.format)
        .unwrap_or_default();
    let amount = parse_amount(row.text(layout.amount_column));

    if format.italic && amount.is_none() {
        return RowKind::Description { text: title };
    }

    RowKind::Entry {
        level: first + bullet_bonus,
        title,
        amount,
        format,
    }
}

fn is_marker_cell(row: &SheetRow, column: usize, layout: &Layout) -> bool {
    let text = row.text(column);
    if !is_bullet(text, layout.bullet_max_len) {
        return false;
    }
    if !is_bare_marker(text) {
        return true;
    }
    let next = column + 1;
    next < layout.amount_column && !row.text(next).is_empty()
}

/// A single letter or digit without punctuation.
fn is_bare_marker(value: &str) -> bool {
    let mut chars = value.trim().chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphanumeric())
}

/// Recognize short list markers such as `a.`, `12.`, `1.0`, `a` or `3`.
pub fn is_bullet(value: &str, max_len: usize) -> bool {
    let value = value.trim();
    let len = value.chars().count();
    if len == 0 || len > max_len {
        return false;
    }

    if let Some(head) = value.strip_suffix('.') {
        let mut chars = head.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_alphabetic() {
                return true;
            }
        }
        if is_digits(head) {
            return true;
        }
    }

    if let Some((major, minor)) = value.split_once('.') {
        if is_digits(major) && is_digits(minor) {
            return true;
        }
    }

    len == 1 && value.chars().all(char::is_alphanumeric)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// 0-based index of a spreadsheet column reference: `"A"` → 0, `"K"` → 10, `"AB"` → 27.
///
/// Also accepts a full cell reference (`"K12"`); the row digits are ignored.
/// References past `XFD`, the last xlsx column, are rejected.
pub fn column_index(reference: &str) -> DomainResult<usize> {
    let letters: Vec<char> = reference
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS {
        return Err(DomainError::InvalidColumn(reference.to_string()));
    }

    let index = letters.iter().fold(0usize, |acc, c| {
        acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1)
    });
    if index > MAX_COLUMNS {
        return Err(DomainError::InvalidColumn(reference.to_string()));
    }
    Ok(index - 1)
}

const MAX_COLUMN_LETTERS: usize = 3;
const MAX_COLUMNS: usize = 16_384;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Cell;
    use rstest::rstest;

    #[rstest]
    #[case("a.", true)]
    #[case("B.", true)]
    #[case("1.", true)]
    #[case("10.", true)]
    #[case("1.0", true)]
    #[case("2.5", true)]
    #[case("a", true)]
    #[case("7", true)]
    #[case("ab.", false)]
    #[case("Roads", false)]
    #[case("18371150000.0", false)]
    #[case("1.2.3", false)]
    #[case("-", false)]
    #[case("", false)]
    fn given_cell_text_when_checking_bullet_then_matches_marker_shapes(
        #[case] value: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_bullet(value, 4), expected);
    }

    #[rstest]
    #[case("A", 0)]
    #[case("K", 10)]
    #[case("Z", 25)]
    #[case("AA", 26)]
    #[case("ab", 27)]
    #[case("K12", 10)]
    #[case("XFD1", 16_383)]
    fn given_column_reference_when_resolving_then_returns_zero_based_index(
        #[case] reference: &str,
        #[case] expected: usize,
    ) {
        assert_eq!(column_index(reference).unwrap(), expected);
    }

    #[rstest]
    #[case("12")]
    #[case("XFE1")]
    #[case("ZZZZ")]
    #[case("ZZZZZZZZZZZZZZZ1")]
    fn given_reference_outside_sheet_columns_when_resolving_then_errors(#[case] reference: &str) {
        assert!(column_index(reference).is_err());
    }

    fn row_with(cells: &[(usize, &str)]) -> SheetRow {
        let mut row = SheetRow::new(1, Vec::new());
        for (column, text) in cells {
            row.set(*column, Cell::plain(*text));
        }
        row
    }

    #[test]
    fn given_lone_letter_when_classifying_then_it_is_the_title() {
        let row = row_with(&[(2, "A")]);
        match classify(&row, &Layout::default()) {
            RowKind::Entry { level, title, .. } => {
                assert_eq!(level, 2);
                assert_eq!(title, "A");
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn given_letter_followed_by_text_when_classifying_then_letter_is_marker() {
        let row = row_with(&[(2, "a"), (3, "Roads")]);
        match classify(&row, &Layout::default()) {
            RowKind::Entry { level, title, .. } => {
                assert_eq!(level, 3);
                assert_eq!(title, "Roads");
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn given_punctuated_marker_alone_when_classifying_then_row_is_untitled() {
        let row = row_with(&[(2, "a.")]);
        assert_eq!(classify(&row, &Layout::default()), RowKind::Untitled);
    }
}
