//! Font flags per cell style (`xl/styles.xml`).

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::WorkbookError;
use crate::domain::CellFormat;

const PART: &str = "xl/styles.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    Fonts,
    CellXfs,
}

/// Fonts and the `cellXfs` table mapping a cell's `s` index to a font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Styles {
    fonts: Vec<CellFormat>,
    /// Font id of each cell format, indexed by style id
    cell_xfs: Vec<usize>,
}

impl Styles {
    pub fn parse(xml: &str) -> Result<Self, WorkbookError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut styles = Styles::default();
        let mut section = Section::Other;
        let mut font: Option<CellFormat> = None;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match (section, e.local_name().as_ref()) {
                    (_, b"fonts") => section = Section::Fonts,
                    (_, b"cellXfs") => section = Section::CellXfs,
                    (Section::Fonts, b"font") => font = Some(CellFormat::default()),
                    (Section::Fonts, _) => apply_font_flag(&reader, &e, font.as_mut()),
                    (Section::CellXfs, b"xf") => styles.cell_xfs.push(font_id(&reader, &e)),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match (section, e.local_name().as_ref()) {
                    (Section::Fonts, b"font") => styles.fonts.push(CellFormat::default()),
                    (Section::Fonts, _) => apply_font_flag(&reader, &e, font.as_mut()),
                    (Section::CellXfs, b"xf") => styles.cell_xfs.push(font_id(&reader, &e)),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"fonts" | b"cellXfs" => section = Section::Other,
                    b"font" if section == Section::Fonts => styles.fonts.extend(font.take()),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(WorkbookError::xml(PART, e)),
                _ => {}
            }
        }

        Ok(styles)
    }

    /// Font flags of style `index`; unknown styles are plain.
    pub fn format(&self, index: usize) -> CellFormat {
        self.cell_xfs
            .get(index)
            .and_then(|font| self.fonts.get(*font))
            .copied()
            .unwrap_or_default()
    }
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

/// `<b/>`, `<i/>` and `<u/>` switch a flag on unless `val` turns it off.
fn apply_font_flag(reader: &Reader<&[u8]>, element: &BytesStart<'_>, font: Option<&mut CellFormat>) {
    let Some(font) = font else {
        return;
    };
    let val = attribute(reader, element, b"val");
    let enabled = !matches!(val.as_deref(), Some("0") | Some("false") | Some("none"));
    match element.local_name().as_ref() {
        b"b" => font.bold = enabled,
        b"i" => font.italic = enabled,
        b"u" => font.underline = enabled,
        _ => {}
    }
}

fn font_id(reader: &Reader<&[u8]>, element: &BytesStart<'_>) -> usize {
    attribute(reader, element, b"fontId")
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fonts_and_cell_formats_when_parsing_then_maps_style_to_flags() {
        let xml = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="4">
    <font><sz val="11"/><name val="Calibri"/></font>
    <font><b/><u/><sz val="11"/></font>
    <font><i/></font>
    <font><b val="0"/><u val="none"/></font>
  </fonts>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="2"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" xfId="0" applyFont="1"/>
    <xf numFmtId="0" fontId="2" xfId="0" applyFont="1"><alignment wrapText="1"/></xf>
    <xf numFmtId="0" fontId="3" xfId="0"/>
  </cellXfs>
</styleSheet>"#;

        let styles = Styles::parse(xml).unwrap();

        assert_eq!(styles.format(0), CellFormat::PLAIN);
        assert_eq!(styles.format(1), CellFormat::SECTION_TITLE);
        assert_eq!(styles.format(2), CellFormat::ITALIC);
        assert_eq!(styles.format(3), CellFormat::PLAIN);
        assert_eq!(styles.format(99), CellFormat::PLAIN);
    }
}
