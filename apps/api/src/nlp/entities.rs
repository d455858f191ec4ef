//! Rule-based entity recognizer for PERSON and ORG spans.
//!
//! Candidates are runs of capitalized tokens inside one sentence, optionally
//! joined by `&`, `of`, `and` or `for`. A run is an ORG when it carries an
//! organization word (`Acme Corp`, `University of Iowa`) or directly follows
//! `at`/`@`. A PERSON is a run of two or three title-case name tokens. On the
//! first line of the document all-caps tokens (`JOHN SMITH`) also count.

use std::collections::HashSet;

use super::tokenizer::Token;
use super::Sentence;

/// Organization words that close a name (`Acme Corp`, `Initech Labs`).
const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "llc", "llp", "ltd", "limited", "co", "company", "group",
    "technologies", "technology", "systems", "solutions", "labs", "laboratories", "partners",
    "consulting", "foundation", "agency", "studios", "software", "services", "associates",
    "holdings", "industries", "enterprises", "ventures", "networks", "analytics", "gmbh", "plc",
    "bank", "hospital",
];

/// Organization words that may appear anywhere (`University of Iowa`, `Bank of America`).
const ORG_HEADS: &[&str] = &[
    "university", "college", "institute", "school", "academy", "bank",
];

const CONNECTORS: &[&str] = &["&", "of", "and", "for"];

/// Capitalized words that start resume lines without naming anything.
const LEADING_VERBS: &[&str] = &[
    "led", "managed", "worked", "developed", "built", "designed", "joined", "created",
    "implemented", "founded", "served", "graduated", "studied", "completed", "received",
    "earned", "interned", "delivered", "maintained", "launched",
];

/// Words that never form part of a personal name.
const NON_NAME_WORDS: &[&str] = &[
    // section headings
    "resume", "curriculum", "vitae", "summary", "objective", "profile", "experience",
    "education", "skills", "projects", "certifications", "contact", "references", "work",
    "history", "employment", "languages", "interests", "awards", "publications", "volunteer",
    "technical", "professional", "personal", "information", "address", "phone", "email",
    // job titles
    "engineer", "developer", "manager", "analyst", "scientist", "designer", "consultant",
    "intern", "director", "lead", "senior", "junior", "architect", "specialist",
    "administrator", "officer", "assistant", "coordinator", "associate", "head", "chief",
    "software", "data", "web", "product", "project", "research", "staff", "principal",
    // months and days
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday", "present", "current",
    // places and misc
    "street", "avenue", "road", "remote", "usa", "united", "states",
    // degrees
    "bachelor", "master", "phd", "doctorate", "bs", "ms", "mba", "degree", "science", "arts",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Org,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    /// Token range `[start, end)`.
    pub start: usize,
    pub end: usize,
    /// Index of the enclosing sentence.
    pub sentence: usize,
}

/// Lookup tables the recognizer consults. Built once with the pipeline.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    org_suffixes: HashSet<&'static str>,
    org_heads: HashSet<&'static str>,
    non_name_words: HashSet<&'static str>,
    stop_words: HashSet<&'static str>,
    /// Lowercase skill phrases, whole (`machine learning`).
    skill_phrases: HashSet<String>,
    /// Lowercase tokens of every skill phrase (`machine`, `learning`).
    skill_tokens: HashSet<String>,
}

impl Gazetteer {
    pub fn new(skill_phrases: HashSet<String>, skill_tokens: HashSet<String>) -> Self {
        Self {
            org_suffixes: ORG_SUFFIXES.iter().copied().collect(),
            org_heads: ORG_HEADS.iter().copied().collect(),
            non_name_words: NON_NAME_WORDS.iter().copied().collect(),
            stop_words: super::stop_words::ENGLISH_STOP_WORDS
                .iter()
                .copied()
                .collect(),
            skill_phrases,
            skill_tokens,
        }
    }

    fn is_org_word(&self, lower: &str, set: &HashSet<&'static str>) -> bool {
        set.contains(lower.trim_end_matches('.'))
    }
}

/// Finds PERSON and ORG entities in document order.
pub fn recognize(
    text: &str,
    tokens: &[Token],
    sentences: &[Sentence],
    gazetteer: &Gazetteer,
) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let first_line_end = tokens
        .iter()
        .skip(1)
        .position(|t| t.line_start)
        .map_or(tokens.len(), |p| p + 1);

    for (sent_idx, sent) in sentences.iter().enumerate() {
        let mut i = sent.start;
        while i < sent.end {
            if !is_capitalized(&tokens[i]) {
                i += 1;
                continue;
            }
            let run_end = capitalized_run_end(tokens, i, sent.end);
            let mut start = i;

            // Sentence-initial stop words and verbs are not part of a name.
            while start < run_end
                && i == sent.start
                && (gazetteer.stop_words.contains(tokens[start].lower.as_str())
                    || LEADING_VERBS.contains(&tokens[start].lower.as_str()))
            {
                start += 1;
            }
            while start < run_end && is_connector(&tokens[start]) {
                start += 1;
            }

            if start < run_end {
                let context = Context {
                    sentence: sent_idx,
                    first_line_end,
                    after_org_list: follows_org_on_line(tokens, start, &entities),
                };
                if let Some(entity) = classify(text, tokens, start, run_end, &context, gazetteer) {
                    entities.push(entity);
                }
            }
            i = run_end.max(i + 1);
        }
    }

    entities
}

/// Where a candidate run sits in the document.
struct Context {
    sentence: usize,
    /// Token index where the second line of the document begins.
    first_line_end: usize,
    /// The run follows `, ` after an ORG on the same line (`Google, Mountain View`).
    after_org_list: bool,
}

fn follows_org_on_line(tokens: &[Token], start: usize, entities: &[Entity]) -> bool {
    if start == 0 || tokens[start - 1].text != "," {
        return false;
    }
    entities.last().is_some_and(|e| {
        e.label == EntityLabel::Org
            && e.end <= start
            && !tokens[e.end..=start].iter().any(|t| t.line_start)
    })
}

fn classify(
    text: &str,
    tokens: &[Token],
    start: usize,
    end: usize,
    context: &Context,
    gazetteer: &Gazetteer,
) -> Option<Entity> {
    let span = &tokens[start..end];
    let make = |label, s: usize, e: usize| Entity {
        label,
        text: text[tokens[s].start..tokens[e - 1].end].to_string(),
        start: s,
        end: e,
        sentence: context.sentence,
    };

    let last = &span[span.len() - 1];
    let has_suffix = span.len() > 1 && gazetteer.is_org_word(&last.lower, &gazetteer.org_suffixes);
    let has_head = span
        .iter()
        .any(|t| gazetteer.is_org_word(&t.lower, &gazetteer.org_heads));
    if has_suffix || has_head {
        return Some(make(EntityLabel::Org, start, end));
    }

    let after_at = start > 0 && matches!(tokens[start - 1].lower.as_str(), "at" | "@");
    if after_at && !is_excluded_org(span, gazetteer) {
        return Some(make(EntityLabel::Org, start, end));
    }

    if context.after_org_list {
        return None;
    }

    let name_len = span
        .iter()
        .enumerate()
        .take_while(|(k, t)| is_name_token(t, start + k < context.first_line_end, gazetteer))
        .count();
    if (2..=3).contains(&name_len) {
        return Some(make(EntityLabel::Person, start, start + name_len));
    }

    None
}

fn is_excluded_org(span: &[Token], gazetteer: &Gazetteer) -> bool {
    let phrase = span
        .iter()
        .map(|t| t.lower.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    gazetteer.skill_phrases.contains(&phrase)
        || (span.len() == 1
            && (MONTHS.contains(&phrase.as_str())
                || gazetteer.non_name_words.contains(phrase.as_str())))
}

fn capitalized_run_end(tokens: &[Token], start: usize, limit: usize) -> usize {
    let mut end = start + 1;
    while end < limit {
        // `Corp.` closes a run, `J.` does not.
        let prev = &tokens[end - 1].text;
        if prev.ends_with('.') && prev.chars().count() > 2 {
            break;
        }
        if is_capitalized(&tokens[end]) && !tokens[end].line_start {
            end += 1;
        } else if is_connector(&tokens[end])
            && end + 1 < limit
            && is_capitalized(&tokens[end + 1])
            && !tokens[end + 1].line_start
        {
            end += 2;
        } else {
            break;
        }
    }
    end
}

fn is_capitalized(token: &Token) -> bool {
    token
        .text
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

fn is_connector(token: &Token) -> bool {
    CONNECTORS.contains(&token.lower.as_str())
}

/// `Jane`, `O'Neil`, `Mary-Jane` or an initial like `J.`. With `allow_caps`,
/// also `JANE`.
fn is_name_token(token: &Token, allow_caps: bool, gazetteer: &Gazetteer) -> bool {
    let text = token.text.as_str();
    let mut chars = text.chars();
    let Some(first) = chars.next() else { return false };
    if !first.is_uppercase() {
        return false;
    }

    let rest: Vec<char> = chars.collect();
    let is_initial = rest == ['.'];
    let is_word = !rest.is_empty()
        && rest
            .iter()
            .all(|c| c.is_lowercase() || *c == '\'' || *c == '-' || c.is_uppercase())
        && rest.iter().any(|c| c.is_lowercase());
    let is_caps = allow_caps
        && !rest.is_empty()
        && rest.iter().all(|c| c.is_uppercase() || *c == '\'' || *c == '-');
    if !(is_initial || is_word || is_caps) {
        return false;
    }

    let lower = token.lower.as_str();
    !gazetteer.non_name_words.contains(lower)
        && !gazetteer.stop_words.contains(lower)
        && !gazetteer.skill_tokens.contains(lower)
        && !gazetteer.is_org_word(lower, &gazetteer.org_suffixes)
        && !gazetteer.is_org_word(lower, &gazetteer.org_heads)
}
