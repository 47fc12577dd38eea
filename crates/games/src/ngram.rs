//! N-gram overlap scoring for sentences.
//!
//! Known bigrams and trigrams are collected from a corpus of sentences. A
//! candidate sentence is judged by the fraction of its own n-grams that were
//! seen in the corpus.

use crate::sentence::SentenceScorer;
use std::collections::HashSet;

/// Padding token placed before the first word.
pub const SENTENCE_START: &str = "@>";

/// Padding token placed after the last word.
pub const SENTENCE_END: &str = "<@";

/// Characters deleted from corpus text.
const STRIPPED_CHARS: &[char] = &[
    '`', '~', '$', '%', '^', '&', '*', '_', '-', '+', '=', '|', '\\', '"', '\'', '<', ',', '>',
    '/', '#',
];

/// Characters treated as word separators in corpus text.
const SEPARATOR_CHARS: &[char] = &[
    '.', ';', ':', '?', '!', '{', '[', '}', ']', '(', ')', '\u{201d}', '\u{2013}',
];

/// Normalize a raw corpus sentence: drop links, strip punctuation, collapse
/// whitespace and lowercase.
pub fn clean_sentence(sentence: &str) -> String {
    let without_links: Vec<&str> = sentence
        .split_whitespace()
        .filter(|w| !w.starts_with("http") && !w.starts_with("www."))
        .collect();

    let spaced: String = without_links
        .join(" ")
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .map(|c| if SEPARATOR_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn padded<S: AsRef<str>>(words: &[S]) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(words.len() + 2);
    tokens.push(SENTENCE_START);
    tokens.extend(words.iter().map(|w| w.as_ref()));
    tokens.push(SENTENCE_END);
    tokens
}

fn bigrams<'a>(tokens: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    tokens.windows(2).map(|w| (w[0], w[1])).collect()
}

fn trigrams<'a>(tokens: &[&'a str]) -> Vec<(&'a str, &'a str, &'a str)> {
    tokens.windows(3).map(|w| (w[0], w[1], w[2])).collect()
}

/// Share of a sentence's n-grams found in the corpus, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    pub bigram: f64,
    pub trigram: f64,
}

/// Accepts a sentence as human-like when
/// `bigram_overlap + trigram_weight * trigram_overlap >= acceptance_threshold`.
#[derive(Clone, Debug)]
pub struct NgramOverlapScorer {
    known_bigrams: HashSet<(String, String)>,
    known_trigrams: HashSet<(String, String, String)>,
    trigram_weight: f64,
    acceptance_threshold: f64,
}

impl Default for NgramOverlapScorer {
    fn default() -> Self {
        Self {
            known_bigrams: HashSet::new(),
            known_trigrams: HashSet::new(),
            trigram_weight: 5.0,
            acceptance_threshold: 1.5,
        }
    }
}

impl NgramOverlapScorer {
    /// Scorer with an empty corpus and default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn n-grams from every sentence in `corpus`. Sentences are cleaned
    /// first; empty ones are ignored.
    pub fn from_corpus<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scorer = Self::new();
        for sentence in corpus {
            scorer.add_sentence(sentence.as_ref());
        }
        scorer
    }

    /// Builder pattern: set the weight of the trigram overlap.
    pub fn with_trigram_weight(mut self, weight: f64) -> Self {
        self.trigram_weight = weight;
        self
    }

    /// Builder pattern: set the acceptance threshold.
    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Add the n-grams of one raw sentence.
    pub fn add_sentence(&mut self, sentence: &str) {
        let cleaned = clean_sentence(sentence);
        let words: Vec<&str> = cleaned.split_whitespace().collect();
        if words.is_empty() {
            return;
        }

        let tokens = padded(&words);
        for (a, b) in bigrams(&tokens) {
            self.known_bigrams.insert((a.to_string(), b.to_string()));
        }
        for (a, b, c) in trigrams(&tokens) {
            self.known_trigrams
                .insert((a.to_string(), b.to_string(), c.to_string()));
        }
    }

    pub fn known_bigram_count(&self) -> usize {
        self.known_bigrams.len()
    }

    pub fn known_trigram_count(&self) -> usize {
        self.known_trigrams.len()
    }

    /// Fraction of the sentence's padded bigrams and trigrams that are known.
    pub fn overlap<S: AsRef<str>>(&self, words: &[S]) -> Overlap {
        let tokens = padded(words);

        let bi = bigrams(&tokens);
        let known_bi = bi
            .iter()
            .filter(|(a, b)| self.known_bigrams.contains(&(a.to_string(), b.to_string())))
            .count();

        let tri = trigrams(&tokens);
        let known_tri = tri
            .iter()
            .filter(|(a, b, c)| {
                self.known_trigrams
                    .contains(&(a.to_string(), b.to_string(), c.to_string()))
            })
            .count();

        Overlap {
            bigram: fraction(known_bi, bi.len()),
            trigram: fraction(known_tri, tri.len()),
        }
    }

    /// Whether the weighted overlap reaches the acceptance threshold.
    pub fn is_human<S: AsRef<str>>(&self, words: &[S]) -> bool {
        let overlap = self.overlap(words);
        overlap.bigram + self.trigram_weight * overlap.trigram >= self.acceptance_threshold
    }
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

impl SentenceScorer for NgramOverlapScorer {
    /// 1.0 for a human-like sentence, 0.0 otherwise.
    fn score(&self, words: &[String]) -> f64 {
        if self.is_human(words) {
            1.0
        } else {
            0.0
        }
    }
}
