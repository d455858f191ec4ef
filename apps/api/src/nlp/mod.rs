//! Rule-based NLP pipeline: tokenizer, sentence splitter, entity recognizer
//! and skill phrase matcher.
//!
//! The pipeline is built once at startup from a [`SkillVocabulary`] and shared
//! read-only. `process` is pure and can run on any thread.

pub mod entities;
pub mod stop_words;
pub mod tokenizer;
pub mod vocabulary;

use std::collections::HashSet;

use entities::{Entity, Gazetteer};
use tokenizer::Token;
use vocabulary::SkillVocabulary;

/// Token range `[start, end)` of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
}

/// A vocabulary phrase found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMatch {
    /// Token range `[start, end)`.
    pub start: usize,
    pub end: usize,
    /// The phrase as it appears in the text.
    pub text: String,
}

/// Result of running the pipeline over one text.
#[derive(Debug, Clone)]
pub struct Doc {
    pub text: String,
    pub tokens: Vec<Token>,
    pub sentences: Vec<Sentence>,
    pub entities: Vec<Entity>,
    pub skill_matches: Vec<SkillMatch>,
}

impl Doc {
    /// Source text covered by the token range `[start, end)`.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        if start >= end || end > self.tokens.len() {
            return "";
        }
        &self.text[self.tokens[start].start..self.tokens[end - 1].end]
    }

    pub fn sentence_of(&self, token: usize) -> Option<usize> {
        self.sentences
            .iter()
            .position(|s| s.start <= token && token < s.end)
    }

    pub fn sentence_text(&self, idx: usize) -> &str {
        self.sentences
            .get(idx)
            .map(|s| self.span_text(s.start, s.end))
            .unwrap_or("")
    }
}

pub struct Pipeline {
    vocabulary: SkillVocabulary,
    /// Lowercase token sequence of each vocabulary term, same order as the terms.
    patterns: Vec<Vec<String>>,
    gazetteer: Gazetteer,
}

impl Pipeline {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        let patterns: Vec<Vec<String>> = vocabulary
            .terms()
            .iter()
            .map(|term| tokenizer::tokenize(term).into_iter().map(|t| t.lower).collect())
            .collect();

        let skill_phrases: HashSet<String> = patterns.iter().map(|p| p.join(" ")).collect();
        let skill_tokens: HashSet<String> = patterns.iter().flatten().cloned().collect();

        Self {
            vocabulary,
            patterns,
            gazetteer: Gazetteer::new(skill_phrases, skill_tokens),
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn process(&self, text: &str) -> Doc {
        let tokens = tokenizer::tokenize(text);
        let sentences = segment(&tokens);
        let entities = entities::recognize(text, &tokens, &sentences, &self.gazetteer);
        let skill_matches = self.match_phrases(text, &tokens);

        Doc {
            text: text.to_string(),
            tokens,
            sentences,
            entities,
            skill_matches,
        }
    }

    /// Every occurrence of every pattern, overlaps included, ordered by start token.
    fn match_phrases(&self, text: &str, tokens: &[Token]) -> Vec<SkillMatch> {
        let mut matches = Vec::new();
        for start in 0..tokens.len() {
            for pattern in &self.patterns {
                let end = start + pattern.len();
                if pattern.is_empty() || end > tokens.len() {
                    continue;
                }
                let hit = tokens[start..end]
                    .iter()
                    .zip(pattern)
                    .all(|(tok, lower)| tok.lower == *lower);
                if hit {
                    matches.push(SkillMatch {
                        start,
                        end,
                        text: text[tokens[start].start..tokens[end - 1].end].to_string(),
                    });
                }
            }
        }
        matches
    }
}

/// Breaks after `.`/`!`/`?` tokens and before any token that starts a line.
fn segment(tokens: &[Token]) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, tok) in tokens.iter().enumerate() {
        if tok.line_start && i > start {
            sentences.push(Sentence { start, end: i });
            start = i;
        }
        if tok.is_sentence_terminal() {
            sentences.push(Sentence { start, end: i + 1 });
            start = i + 1;
        }
    }
    if start < tokens.len() {
        sentences.push(Sentence {
            start,
            end: tokens.len(),
        });
    }

    sentences
}
