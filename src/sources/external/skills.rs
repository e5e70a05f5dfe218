//! Skills markup extraction
//!
//! The external API embeds skills as a markup fragment such as
//! `<skills><skill>AWS</skill><skill>Docker</skill></skills>`. Any fragment
//! that is not a single well-formed element yields no skills at all: there is
//! no partial extraction.
//!
//! DOCTYPE declarations are rejected outright and only the predefined and
//! numeric character references are decoded, so a hostile fragment can
//! neither trigger resource fetches nor entity expansion.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeSet;
use thiserror::Error;

const SKILL_TAG: &[u8] = b"skill";

#[derive(Debug, Error)]
enum FragmentError {
    #[error("malformed markup: {0}")]
    Malformed(String),

    #[error("DOCTYPE declarations are not accepted")]
    Doctype,

    #[error("fragment is not a single root element: {0}")]
    Structure(&'static str),
}

/// Extracts skill names from the embedded markup fragment
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillsParser;

impl SkillsParser {
    pub fn new() -> Self {
        Self
    }

    /// Trimmed, non-empty text of every `skill` element.
    ///
    /// `None`, blank and invalid markup all return an empty set.
    pub fn parse(&self, fragment: Option<&str>) -> BTreeSet<String> {
        let Some(fragment) = fragment.filter(|f| !f.trim().is_empty()) else {
            tracing::debug!("Skills fragment is absent or blank");
            return BTreeSet::new();
        };

        match extract(fragment) {
            Ok(skills) => {
                tracing::debug!(count = skills.len(), "Parsed skills from markup");
                skills
            }
            Err(e) => {
                tracing::warn!(error = %e, input = %fragment, "Failed to parse skills markup");
                BTreeSet::new()
            }
        }
    }
}

fn extract(fragment: &str) -> Result<BTreeSet<String>, FragmentError> {
    let mut reader = Reader::from_str(fragment);
    let mut skills = BTreeSet::new();
    // One text buffer per currently open <skill>; nested text counts for every
    // enclosing skill element.
    let mut open_skills: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FragmentError::Malformed(e.to_string()))?;

        match event {
            Event::DocType(_) => return Err(FragmentError::Doctype),
            Event::Start(start) => {
                check_element(&start)?;
                if depth == 0 {
                    if seen_root {
                        return Err(FragmentError::Structure("multiple root elements"));
                    }
                    seen_root = true;
                }
                depth += 1;
                if start.name().as_ref() == SKILL_TAG {
                    open_skills.push(String::new());
                }
            }
            Event::Empty(empty) => {
                check_element(&empty)?;
                if depth == 0 {
                    if seen_root {
                        return Err(FragmentError::Structure("multiple root elements"));
                    }
                    seen_root = true;
                }
            }
            Event::End(end) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FragmentError::Structure("unbalanced end tag"))?;
                if end.name().as_ref() == SKILL_TAG {
                    if let Some(text) = open_skills.pop() {
                        let skill = text.trim();
                        if !skill.is_empty() {
                            skills.insert(skill.to_string());
                        }
                    }
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| FragmentError::Malformed(e.to_string()))?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(FragmentError::Structure("text outside the root element"));
                    }
                    continue;
                }
                for buffer in open_skills.iter_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::CData(cdata) => {
                if depth == 0 {
                    return Err(FragmentError::Structure("text outside the root element"));
                }
                let raw = cdata.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|e| FragmentError::Malformed(e.to_string()))?;
                for buffer in open_skills.iter_mut() {
                    buffer.push_str(text);
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no skills
            _ => {}
        }
    }

    if !seen_root {
        return Err(FragmentError::Structure("no root element"));
    }
    if depth != 0 {
        return Err(FragmentError::Structure("unclosed element"));
    }
    Ok(skills)
}

/// quick-xml leaves names and attributes unchecked until they are read
fn check_element(element: &BytesStart<'_>) -> Result<(), FragmentError> {
    if !is_xml_name(element.name().as_ref()) {
        return Err(FragmentError::Malformed(format!(
            "invalid element name '{}'",
            String::from_utf8_lossy(element.name().as_ref())
        )));
    }

    let mut attributes = element.attributes();
    attributes.with_checks(true);
    for attribute in attributes {
        let attribute = attribute.map_err(|e| FragmentError::Malformed(e.to_string()))?;
        if !is_xml_name(attribute.key.as_ref()) {
            return Err(FragmentError::Malformed(format!(
                "invalid attribute name '{}'",
                String::from_utf8_lossy(attribute.key.as_ref())
            )));
        }
    }
    Ok(())
}

/// XML `Name` production; bytes >= 0x80 belong to multi-byte UTF-8 name chars
fn is_xml_name(name: &[u8]) -> bool {
    let Some((&first, rest)) = name.split_first() else {
        return false;
    };
    let starts_name = |b: u8| b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80;
    starts_name(first)
        && rest
            .iter()
            .all(|&b| starts_name(b) || b.is_ascii_digit() || b == b'-' || b == b'.')
}
