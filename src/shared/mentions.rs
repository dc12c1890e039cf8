//! Mention Extraction
//!
//! Free text such as a creation's "chef" and "eaten with" fields, or a
//! comment body, can reference other users in two ways:
//!
//! - explicit `@name` tokens, matched by the regex `@(\w+)`
//! - bare words ("dinner with Bob, Carol"), which are tokenized on whitespace
//!   and commas, stripped of punctuation, and filtered against a stop-word
//!   list and a minimum length
//!
//! Each resulting term is matched against user names: an exact
//! case-insensitive match wins over a substring match, and a term that
//! matches nothing is skipped. This module holds the pure half of that logic;
//! `backend::mentions` runs the same rules against the users table.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern for explicit mentions
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("mention pattern is valid"));

/// Shortest bare word considered a name
pub const MIN_TOKEN_LEN: usize = 2;

/// Words that never resolve to a user
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "also", "at", "by", "cooked", "dinner", "everyone", "family", "for",
    "friend", "friends", "from", "i", "in", "lunch", "me", "my", "myself", "of", "on", "or",
    "our", "plus", "the", "thanks", "thank", "to", "us", "we", "with", "you",
];

/// A term extracted from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionTerm {
    /// The word to look up
    pub text: String,
    /// `true` when written as `@name`
    pub explicit: bool,
}

/// How a term matched a user name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NameMatch {
    Exact,
    Substring,
}

/// Extract `@name` tokens in first-seen order, without duplicates.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    for capture in MENTION_RE.captures_iter(text) {
        let name = &capture[1];
        if !mentions.iter().any(|m| m.eq_ignore_ascii_case(name)) {
            mentions.push(name.to_string());
        }
    }
    mentions
}

/// Split the non-mention part of `text` into candidate name words.
pub fn candidate_tokens(text: &str) -> Vec<String> {
    let mentions = extract_mentions(text);
    let remainder = MENTION_RE.replace_all(text, " ");

    let mut tokens: Vec<String> = Vec::new();
    for raw in remainder.split(|c: char| c.is_whitespace() || c == ',') {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() < MIN_TOKEN_LEN {
            continue;
        }
        let lowered = word.to_lowercase();
        if STOP_WORDS.contains(&lowered.as_str()) {
            continue;
        }
        if mentions.iter().any(|m| m.to_lowercase() == lowered)
            || tokens.iter().any(|t| t.to_lowercase() == lowered)
        {
            continue;
        }
        tokens.push(word.to_string());
    }
    tokens
}

/// Every term worth resolving: explicit mentions first, then bare words.
pub fn mention_terms(text: &str) -> Vec<MentionTerm> {
    let explicit = extract_mentions(text).into_iter().map(|text| MentionTerm {
        text,
        explicit: true,
    });
    let bare = candidate_tokens(text).into_iter().map(|text| MentionTerm {
        text,
        explicit: false,
    });
    explicit.chain(bare).collect()
}

/// Compare a term against a user name.
pub fn match_name(term: &str, name: &str) -> Option<NameMatch> {
    let term = term.trim().to_lowercase();
    let name = name.trim().to_lowercase();
    if term.is_empty() || name.is_empty() {
        return None;
    }
    if term == name {
        Some(NameMatch::Exact)
    } else if name.contains(&term) {
        Some(NameMatch::Substring)
    } else {
        None
    }
}

/// Pick the best candidate for `term`: the first exact match, else the first
/// substring match.
pub fn match_user<'a, T>(
    term: &str,
    candidates: &'a [T],
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let mut substring: Option<&'a T> = None;
    for candidate in candidates {
        match match_name(term, name_of(candidate)) {
            Some(NameMatch::Exact) => return Some(candidate),
            Some(NameMatch::Substring) if substring.is_none() => substring = Some(candidate),
            _ => {}
        }
    }
    substring
}
