//! Plain-text helpers shared by the document tools

use std::collections::HashMap;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "for", "from", "had",
    "has", "have", "in", "into", "is", "it", "its", "may", "more", "not", "of", "on", "or",
    "than", "that", "the", "their", "these", "this", "those", "to", "was", "we", "were", "which",
    "while", "with", "would",
];

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &["e.g", "i.e", "al", "fig", "vs", "approx", "dr", "cf"];

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        let at_terminator = matches!(c, '.' | '!' | '?');
        let at_boundary = chars.peek().map_or(true, |n| n.is_whitespace());

        if at_terminator && at_boundary && !ends_with_abbreviation(&current) {
            push_sentence(&mut sentences, &current);
            current.clear();
        } else if c == '\n' && chars.peek() == Some(&'\n') {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        sentences.push(normalized);
    }
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let last = fragment
        .trim_end_matches('.')
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str())
}

/// Lowercased alphanumeric words, stopwords removed
pub fn content_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .map(|w| w.trim_matches('-').to_lowercase())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Frequency of each content word across the text
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for word in content_words(text) {
        *frequencies.entry(word).or_insert(0) += 1;
    }
    frequencies
}
