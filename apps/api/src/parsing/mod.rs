//! Resume field extraction.
//!
//! One pass of the NLP pipeline plus two regexes turns raw resume text into a
//! [`ResumeRecord`]. Missing fields are `None` or empty; only unreadable input
//! is an error.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::extraction::{self, ExtractError};
use crate::models::resume::{Experience, ResumeRecord};
use crate::nlp::entities::EntityLabel;
use crate::nlp::{Doc, Pipeline, Sentence};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("valid phone regex")
});

const DEGREE_KEYWORDS: &[&str] = &["bachelor", "master", "phd", "doctorate", "bs", "ms", "mba"];

pub struct ResumeParser {
    pipeline: Pipeline,
}

impl ResumeParser {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Extracts the document's text and parses it.
    pub fn parse(&self, path: &Path) -> Result<ResumeRecord, ExtractError> {
        let text = extraction::extract_text(path)?;
        let record = self.parse_text(&text);
        info!(
            "Parsed {}: {} skills, {} education lines, {} organizations",
            path.display(),
            record.skills.len(),
            record.education.len(),
            record.experience.len()
        );
        Ok(record)
    }

    pub fn parse_text(&self, text: &str) -> ResumeRecord {
        let doc = self.pipeline.process(text);
        debug!(
            "Pipeline produced {} tokens, {} sentences, {} entities",
            doc.tokens.len(),
            doc.sentences.len(),
            doc.entities.len()
        );

        ResumeRecord {
            name: extract_name(&doc),
            email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
            phone: PHONE_RE.find(text).map(|m| m.as_str().to_string()),
            skills: extract_skills(&doc),
            education: extract_education(&doc),
            experience: extract_experience(&doc),
            raw_text: text.to_string(),
        }
    }
}

/// First PERSON entity in the document, whoever it refers to.
fn extract_name(doc: &Doc) -> Option<String> {
    doc.entities
        .iter()
        .find(|e| e.label == EntityLabel::Person)
        .map(|e| e.text.clone())
}

/// Matched phrases, deduplicated case-insensitively. The first surface form wins.
fn extract_skills(doc: &Doc) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut skills = BTreeSet::new();
    for m in &doc.skill_matches {
        if seen.insert(m.text.to_lowercase()) {
            skills.insert(m.text.clone());
        }
    }
    skills
}

/// The enclosing sentence of every degree keyword, once per keyword.
fn extract_education(doc: &Doc) -> Vec<String> {
    doc.tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| DEGREE_KEYWORDS.contains(&t.lower.as_str()))
        .filter_map(|(i, _)| doc.sentence_of(i))
        .map(|s| doc.sentence_text(s).to_string())
        .collect()
}

fn extract_experience(doc: &Doc) -> Vec<Experience> {
    doc.entities
        .iter()
        .filter(|e| e.label == EntityLabel::Org)
        .map(|e| {
            let mut experience = Experience::new(e.text.clone());
            experience.duration = doc
                .sentences
                .get(e.sentence)
                .and_then(|s| duration_in(doc, s));
            experience
        })
        .collect()
}

/// Last number in the sentence directly followed by a `year`/`month` word.
fn duration_in(doc: &Doc, sentence: &Sentence) -> Option<String> {
    let tokens = &doc.tokens[sentence.start..sentence.end];
    tokens
        .windows(2)
        .filter(|pair| {
            pair[0].like_num() && (pair[1].lower.contains("year") || pair[1].lower.contains("month"))
        })
        .last()
        .map(|pair| pair[0].text.clone())
}
