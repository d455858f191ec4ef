//! Whitespace-and-punctuation tokenizer.
//!
//! Each whitespace-delimited chunk is split into a core word plus any leading
//! or trailing punctuation, which become their own tokens. `+` and `#` are
//! not punctuation here, so `C++`, `C#` and `5+` survive as single tokens.

/// Characters peeled off the front of a chunk.
const PREFIXES: &[char] = &[
    '(', '[', '{', '"', '\'', '“', '‘', '«', '<', '*', '•', '·', '▪', '●', '–', '—',
];

/// Characters peeled off the back of a chunk. `.` is handled separately.
const SUFFIXES: &[char] = &[
    ')', ']', '}', '"', '\'', '”', '’', '»', '>', ',', ';', ':', '!', '?', '…', '–', '—',
];

/// Characters that split a core word in two (`Python/Django`, `SQL,Excel`).
const INFIXES: &[char] = &['/', ',', '|', ';'];

/// Words that keep their trailing period.
const ABBREVIATIONS: &[&str] = &[
    "inc.", "corp.", "ltd.", "co.", "dr.", "mr.", "mrs.", "jr.", "sr.", "st.", "vs.",
    "etc.", "no.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    /// Byte offset of the first character in the source text.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// True for the first token of the text and any token preceded by a newline.
    pub line_start: bool,
}

impl Token {
    fn new(source: &str, start: usize, end: usize, line_start: bool) -> Self {
        let text = source[start..end].to_string();
        let lower = text.to_lowercase();
        Self {
            text,
            lower,
            start,
            end,
            line_start,
        }
    }

    /// Ends a sentence: `.`, `!`, `?` or a run of them.
    pub fn is_sentence_terminal(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| matches!(c, '.' | '!' | '?'))
    }

    /// Digits with optional grouping/decimal separators and a trailing `+`,
    /// or a spelled-out number.
    pub fn like_num(&self) -> bool {
        let core = self.text.trim_end_matches('+');
        let numeric = !core.is_empty()
            && core.chars().any(|c| c.is_ascii_digit())
            && core.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.');
        numeric || NUMBER_WORDS.contains(&self.lower.as_str())
    }
}

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand",
];

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chunk_start: Option<usize> = None;
    let mut newline_pending = true;
    let mut line_start_for_chunk = true;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = chunk_start.take() {
                split_chunk(text, start, idx, line_start_for_chunk, &mut tokens);
            }
            if ch == '\n' {
                newline_pending = true;
            }
        } else if chunk_start.is_none() {
            chunk_start = Some(idx);
            line_start_for_chunk = newline_pending;
            newline_pending = false;
        }
    }
    if let Some(start) = chunk_start {
        split_chunk(text, start, text.len(), line_start_for_chunk, &mut tokens);
    }

    tokens
}

fn split_chunk(source: &str, start: usize, end: usize, line_start: bool, out: &mut Vec<Token>) {
    let mut lo = start;
    let mut hi = end;
    let mut first = true;
    let mut trailing: Vec<Token> = Vec::new();

    // Prefixes
    while lo < hi {
        let Some(ch) = source[lo..hi].chars().next() else { break };
        if !PREFIXES.contains(&ch) || lo + ch.len_utf8() == hi {
            break;
        }
        out.push(Token::new(source, lo, lo + ch.len_utf8(), line_start && first));
        first = false;
        lo += ch.len_utf8();
    }

    // Suffixes, peeled from the right and re-reversed afterwards.
    loop {
        if lo >= hi {
            break;
        }
        let word = &source[lo..hi];
        let Some(last) = word.chars().next_back() else { break };
        let last_len = last.len_utf8();

        if word.len() == last_len {
            break;
        }
        if SUFFIXES.contains(&last) {
            trailing.push(Token::new(source, hi - last_len, hi, false));
            hi -= last_len;
            continue;
        }
        if last == '.' && !keeps_period(word) {
            trailing.push(Token::new(source, hi - 1, hi, false));
            hi -= 1;
            continue;
        }
        let lower = word.to_lowercase();
        if lower.ends_with("'s") || lower.ends_with("’s") {
            let suffix_len = if lower.ends_with("'s") { 2 } else { "’s".len() };
            if word.len() > suffix_len {
                trailing.push(Token::new(source, hi - suffix_len, hi, false));
                hi -= suffix_len;
                continue;
            }
        }
        break;
    }

    // Infixes split the core word.
    let mut piece_start = lo;
    for (offset, ch) in source[lo..hi].char_indices() {
        let at = lo + offset;
        if INFIXES.contains(&ch)
            && at > piece_start
            && at + ch.len_utf8() < hi
            && !is_digit_separator(source, at, ch)
        {
            out.push(Token::new(source, piece_start, at, line_start && first));
            first = false;
            out.push(Token::new(source, at, at + ch.len_utf8(), false));
            piece_start = at + ch.len_utf8();
        }
    }
    if piece_start < hi {
        out.push(Token::new(source, piece_start, hi, line_start && first));
        first = false;
    }

    for (i, mut tok) in trailing.into_iter().rev().enumerate() {
        tok.line_start = line_start && first && i == 0;
        out.push(tok);
    }
}

/// A comma between two digits is a thousands separator, not an infix.
fn is_digit_separator(source: &str, at: usize, ch: char) -> bool {
    if ch != ',' {
        return false;
    }
    let before = source[..at].chars().next_back();
    let after = source[at + 1..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

/// `Inc.`, single initials (`J.`) and dotted acronyms (`B.S.`, `e.g.`) keep their period.
fn keeps_period(word: &str) -> bool {
    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }
    let body = &word[..word.len() - 1];
    let mut chars = body.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c.is_alphabetic();
    }
    body.contains('.') && body.chars().all(|c| c.is_alphabetic() || c == '.')
}
