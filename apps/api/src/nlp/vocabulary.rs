//! Skill vocabulary: the phrase list the skill matcher recognizes.
//!
//! Loaded once at startup from a JSONL pattern file, one pattern per line:
//!
//! ```text
//! {"label": "SKILL", "pattern": "Machine Learning"}
//! {"label": "SKILL", "pattern": [{"LOWER": "power"}, {"LOWER": "bi"}]}
//! ```
//!
//! Lines with a label other than `SKILL` are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const SKILL_LABEL: &str = "SKILL";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read skill patterns from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid skill pattern at {path}:{line}: {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Skill pattern at {path}:{line} has no usable text")]
    EmptyPattern { path: String, line: usize },

    #[error("No skill patterns found in {path}")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct PatternLine {
    label: String,
    pattern: PatternSpec,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternSpec {
    Phrase(String),
    Tokens(Vec<BTreeMap<String, String>>),
}

impl PatternSpec {
    fn into_phrase(self) -> String {
        match self {
            PatternSpec::Phrase(s) => s.trim().to_string(),
            PatternSpec::Tokens(attrs) => attrs
                .iter()
                .filter_map(|a| {
                    a.get("LOWER")
                        .or_else(|| a.get("TEXT"))
                        .or_else(|| a.get("ORTH"))
                })
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Ordered, case-insensitively unique list of skill phrases.
#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl SkillVocabulary {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::default();
        for term in terms {
            vocabulary.push(term.into());
        }
        vocabulary
    }

    pub fn from_jsonl_path(path: &Path) -> Result<Self, VocabularyError> {
        let origin = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: origin.clone(),
            source,
        })?;
        let vocabulary = Self::from_jsonl(&contents, &origin)?;
        info!("Loaded {} skill patterns from {origin}", vocabulary.len());
        Ok(vocabulary)
    }

    /// Parses JSONL pattern content. `origin` is only used in error messages.
    pub fn from_jsonl(contents: &str, origin: &str) -> Result<Self, VocabularyError> {
        let mut vocabulary = Self::default();

        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let parsed: PatternLine =
                serde_json::from_str(raw).map_err(|source| VocabularyError::Parse {
                    path: origin.to_string(),
                    line,
                    source,
                })?;
            if parsed.label != SKILL_LABEL {
                debug!("Skipping pattern with label {} at line {line}", parsed.label);
                continue;
            }
            let phrase = parsed.pattern.into_phrase();
            if phrase.is_empty() {
                return Err(VocabularyError::EmptyPattern {
                    path: origin.to_string(),
                    line,
                });
            }
            vocabulary.push(phrase);
        }

        if vocabulary.is_empty() {
            return Err(VocabularyError::Empty {
                path: origin.to_string(),
            });
        }
        Ok(vocabulary)
    }

    fn push(&mut self, term: String) {
        let lower = term.to_lowercase();
        if !self.terms.iter().any(|t| t.to_lowercase() == lower) {
            self.terms.push(term);
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_phrase_and_token_patterns() {
        let jsonl = r#"{"label": "SKILL", "pattern": "Machine Learning"}

{"label": "SKILL", "pattern": [{"LOWER": "power"}, {"LOWER": "bi"}]}
{"label": "ORG", "pattern": "Acme"}
"#;
        let vocab = SkillVocabulary::from_jsonl(jsonl, "inline").unwrap();
        assert_eq!(vocab.terms(), &["Machine Learning".to_string(), "power bi".to_string()]);
    }

    #[test]
    fn test_duplicates_are_case_insensitive() {
        let vocab = SkillVocabulary::from_terms(["Python", "python", "SQL"]);
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let jsonl = "{\"label\": \"SKILL\", \"pattern\": \"Git\"}\nnot json\n";
        match SkillVocabulary::from_jsonl(jsonl, "skills.jsonl") {
            Err(VocabularyError::Parse { line, path, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(path, "skills.jsonl");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_skill_lines_is_an_error() {
        let jsonl = r#"{"label": "ORG", "pattern": "Acme"}"#;
        assert!(matches!(
            SkillVocabulary::from_jsonl(jsonl, "x"),
            Err(VocabularyError::Empty { .. })
        ));
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"label": "SKILL", "pattern": "Docker"}}"#).unwrap();
        let vocab = SkillVocabulary::from_jsonl_path(file.path()).unwrap();
        assert_eq!(vocab.terms(), &["Docker".to_string()]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SkillVocabulary::from_jsonl_path(Path::new("/nonexistent/skills.jsonl")).unwrap_err();
        assert!(matches!(err, VocabularyError::Io { .. }));
    }
}
