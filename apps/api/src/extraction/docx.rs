//! WordprocessingML paragraph reader.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml`.
//! Paragraph text is the concatenation of its `<w:t>` runs, with `<w:tab/>`
//! as a tab and `<w:br/>`/`<w:cr/>` as a newline.

use std::io::{Read, Seek};

use once_cell::sync::Lazy;
use regex::Regex;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)w:(p|t|tab|br|cr)(?:\s[^>]*?)?(/?)>").expect("valid WordprocessingML tag regex")
});

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-z]+);").expect("valid entity regex"));

/// True when the archive opens and contains the main document part.
pub fn is_word_document<R: Read + Seek>(reader: R) -> bool {
    let Ok(mut archive) = ZipArchive::new(reader) else {
        return false;
    };
    let found = archive.by_name(DOCUMENT_PART).is_ok();
    found
}

/// Returns the text of every paragraph in document order.
pub fn paragraphs<R: Read + Seek>(reader: R) -> Result<Vec<String>, ExtractError> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| ExtractError::Docx(format!("not a ZIP archive: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    Ok(paragraphs_from_xml(&xml))
}

fn paragraphs_from_xml(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut text_start: Option<usize> = None;

    for caps in TAG_RE.captures_iter(xml) {
        let Some(whole) = caps.get(0) else { continue };
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();

        match (&caps[2], closing, self_closing) {
            ("t", false, false) => text_start = Some(whole.end()),
            ("t", true, _) => {
                if let Some(start) = text_start.take() {
                    current.push_str(&decode_entities(&xml[start..whole.start()]));
                }
            }
            ("tab", false, _) => current.push('\t'),
            ("br" | "cr", false, _) => current.push('\n'),
            ("p", true, _) | ("p", false, true) => paragraphs.push(std::mem::take(&mut current)),
            _ => {}
        }
    }

    paragraphs
}

fn decode_entities(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") => u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
