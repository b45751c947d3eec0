//! Shared strings table (`xl/sharedStrings.xml`).

use quick_xml::events::Event;
use quick_xml::Reader;

use super::WorkbookError;

const PART: &str = "xl/sharedStrings.xml";

/// Strings referenced by index from `t="s"` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse every `<si>` entry; rich-text runs are concatenated and
    /// phonetic hints (`<rPh>`) are skipped.
    pub fn parse(xml: &str) -> Result<Self, WorkbookError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current: Option<String> = None;
        let mut in_text = false;
        let mut phonetic_depth = 0usize;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => phonetic_depth += 1,
                    b"t" => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(text)) if in_text && phonetic_depth == 0 => {
                    if let Some(current) = current.as_mut() {
                        let unescaped = text.unescape().map_err(|e| WorkbookError::xml(PART, e))?;
                        current.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(data)) if in_text && phonetic_depth == 0 => {
                    if let Some(current) = current.as_mut() {
                        current.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => strings.extend(current.take()),
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(WorkbookError::xml(PART, e)),
                _ => {}
            }
        }

        Ok(Self { strings })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
