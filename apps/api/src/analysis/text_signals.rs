//! Pattern-based signals pulled out of free text: numbers, capitalized phrases,
//! technology tokens and keyword sets. Stateless.
//!
//! All term lookups go through [`contains_term`] / [`count_term`], which only
//! match whole terms. Letters, digits, `_`, `+` and `#` are term characters, so
//! "api" never matches inside "rapid" and "go" never matches inside "good".

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::lexicon::{KNOWN_FRAMEWORKS, TECH_TERMS};

static NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // percentages: 20%, 3.5%
        r"\d+\.?\d*%",
        // currency with magnitude: $5m, $100k
        r"\$\d+\.?\d*[kmb]?",
        // multipliers: 3x
        r"\d+x\b",
        // plus-bounded counts: 100+
        r"\d+\+",
        r"\d+\.?\d*\s*(?:million|billion|thousand|k|m|b)\b",
        r"\d+\s*(?:users|customers|clients|employees|hours|days|weeks|months|years)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("number pattern must compile"))
    .collect()
});

static CAPITALIZED_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("capitalized pattern must compile")
});

static ACRONYM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\b").expect("acronym pattern must compile"));

static CAMEL_TECH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+[A-Z]?(?:JS|QL|DB)\b").expect("camel tech pattern must compile")
});

/// Letters, digits, `_`, `+` and `#` belong to a term; everything else separates terms.
pub fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '#')
}

/// Byte offsets of whole-term occurrences of `needle` in `haystack`.
/// Both arguments must already be lowercased.
fn term_positions<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack
        .match_indices(needle)
        .map(|(start, _)| start)
        .filter(move |&start| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + needle.len()..].chars().next();
            !before.is_some_and(is_term_char) && !after.is_some_and(is_term_char)
        })
}

/// Case-insensitive count of whole-term occurrences.
pub fn count_term(text: &str, term: &str) -> usize {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let haystack = text.to_lowercase();
    term_positions(&haystack, &needle).count()
}

/// Case-insensitive whole-term containment.
pub fn contains_term(text: &str, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let haystack = text.to_lowercase();
    let mut positions = term_positions(&haystack, &needle);
    positions.next().is_some()
}

/// Percentages, currency amounts, multipliers, `N+` counts and number-plus-unit
/// phrases, in pattern order. Matching is on the lowercased text.
pub fn extract_numbers(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    NUMBER_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(&lower).map(|m| m.as_str().to_string()))
        .collect()
}

/// Greedy runs of capitalized words. Callers filter false positives.
pub fn extract_capitalized_phrases(text: &str) -> Vec<String> {
    CAPITALIZED_PHRASE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Acronyms, CamelCase names ending in JS/QL/DB and known frameworks.
/// Deduplicated; order is not significant.
pub fn extract_technology_tokens(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tokens = Vec::new();
    let mut push = |token: &str| {
        if seen.insert(token.to_string()) {
            tokens.push(token.to_string());
        }
    };

    for m in ACRONYM.find_iter(text) {
        push(m.as_str());
    }
    for m in CAMEL_TECH.find_iter(text) {
        push(m.as_str());
    }
    for framework in KNOWN_FRAMEWORKS {
        if count_case_sensitive(text, framework) > 0 {
            push(*framework);
        }
    }
    tokens
}

fn count_case_sensitive(text: &str, term: &str) -> usize {
    term_positions(text, term).count()
}

/// Listed technical terms present in `text`, lowercased.
pub fn extract_tech_terms(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    TECH_TERMS
        .iter()
        .filter(|term| term_positions(&lower, term).next().is_some())
        .map(|term| term.to_string())
        .collect()
}

/// Lowercased tokens of length >= 3 that are neither stopwords nor purely
/// numeric, first-seen order, deduplicated. `+`, `#` and `.` survive
/// normalisation so "c++", "c#" and ".net" stay intact.
pub fn extract_keywords(text: &str, stopwords: &HashSet<&'static str>) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '.') {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();
    for raw in normalized.split_whitespace() {
        let word = raw.trim_end_matches('.');
        if word.len() < 3
            || stopwords.contains(word)
            || word.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            continue;
        }
        if seen.insert(word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

/// Known phrases found as whole terms in `text`.
pub fn extract_phrases(text: &str, phrases: &[&str]) -> Vec<String> {
    let lower = text.to_lowercase();
    phrases
        .iter()
        .filter(|phrase| term_positions(&lower, phrase).next().is_some())
        .map(|phrase| phrase.to_string())
        .collect()
}

/// Keywords followed by any known phrases not already present.
pub fn extract_keywords_with_phrases(
    text: &str,
    stopwords: &HashSet<&'static str>,
    phrases: &[&str],
) -> Vec<String> {
    let mut keywords = extract_keywords(text, stopwords);
    for phrase in extract_phrases(text, phrases) {
        if !keywords.contains(&phrase) {
            keywords.push(phrase);
        }
    }
    keywords
}

/// Lowercased alphabetic words of at least `min_len` letters, minus stopwords.
pub fn alpha_words(text: &str, min_len: usize, stopwords: &HashSet<&'static str>) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() >= min_len && !stopwords.contains(w))
        .map(str::to_string)
        .collect()
}

/// Count of `\w+` words.
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .count()
}
