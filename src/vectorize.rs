//! Bag-of-words vectorization.
//!
//! Documents are tokenized the way a default count vectorizer does it:
//! lowercase, split into maximal runs of word characters (alphanumerics and
//! `_`), and drop single-character tokens. No stop words are removed.
//!
//! The vocabulary is shared by every document in a batch and ordered
//! lexicographically, so the same input always yields the same vectors.

use std::collections::{BTreeSet, HashMap};

/// Shortest token kept, in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Splits `text` into lowercase tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let buffer = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars_in_token = 0usize;

    for (i, c) in buffer.char_indices() {
        if is_word_char(c) {
            if start.is_none() {
                start = Some(i);
                chars_in_token = 0;
            }
            chars_in_token += 1;
        } else if let Some(s) = start.take() {
            if chars_in_token >= MIN_TOKEN_CHARS {
                tokens.push(buffer[s..i].to_string());
            }
        }
    }
    if let Some(s) = start {
        if chars_in_token >= MIN_TOKEN_CHARS {
            tokens.push(buffer[s..].to_string());
        }
    }

    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Term-frequency vectors for a batch of documents over one vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    /// Vocabulary terms; column `i` of every row counts `vocabulary[i]`.
    pub vocabulary: Vec<String>,
    /// One count vector per input document, in input order.
    pub rows: Vec<Vec<u32>>,
}

impl TermMatrix {
    /// Builds the shared vocabulary from `documents` and counts every term.
    pub fn fit_transform(documents: &[&str]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0u32; vocabulary.len()];
                for token in tokens {
                    if let Some(&i) = index.get(token.as_str()) {
                        row[i] += 1;
                    }
                }
                row
            })
            .collect();

        Self { vocabulary, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
