//! Sequential word-choice game.
//!
//! A sentence starts with a fixed word and grows one vocabulary word at a
//! time until it reaches the target length. The finished sentence is scored
//! by a [`SentenceScorer`].

use montecarlo_core::{Game, MctsError, Result};
use std::collections::HashSet;
use std::fmt;

/// Number of words in a finished sentence unless configured otherwise.
pub const DEFAULT_SENTENCE_LENGTH: usize = 4;

/// Judges how plausible a finished word sequence is. Higher is better.
pub trait SentenceScorer {
    fn score(&self, words: &[String]) -> f64;
}

/// Words chosen so far, starting word first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sentence {
    words: Vec<String>,
}

impl Sentence {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.join(" "))
    }
}

/// Sentence building rules with a pluggable scorer.
#[derive(Clone, Debug)]
pub struct SentenceGame<S> {
    vocabulary: Vec<String>,
    starting_word: String,
    sentence_length: usize,
    scorer: S,
}

impl<S: SentenceScorer + Clone> SentenceGame<S> {
    /// Create the game.
    ///
    /// # Errors
    /// Returns `MctsError::GameInitiation` if the vocabulary contains
    /// duplicates or the starting word is empty.
    pub fn new(vocabulary: &[&str], starting_word: &str, scorer: S) -> Result<Self> {
        let mut seen = HashSet::new();
        let duplicates: Vec<&str> = vocabulary
            .iter()
            .copied()
            .filter(|w| !seen.insert(*w))
            .collect();
        if !duplicates.is_empty() {
            return Err(MctsError::GameInitiation(format!(
                "found the following duplicates in the vocabulary: {:?}",
                duplicates
            )));
        }

        if starting_word.is_empty() {
            return Err(MctsError::GameInitiation(
                "starting word needs at least one character".to_string(),
            ));
        }

        Ok(Self {
            vocabulary: vocabulary.iter().map(|w| w.to_string()).collect(),
            starting_word: starting_word.to_string(),
            sentence_length: DEFAULT_SENTENCE_LENGTH,
            scorer,
        })
    }

    /// Builder pattern: set the number of words in a finished sentence.
    pub fn with_sentence_length(mut self, sentence_length: usize) -> Self {
        self.sentence_length = sentence_length;
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn starting_word(&self) -> &str {
        &self.starting_word
    }

    pub fn sentence_length(&self) -> usize {
        self.sentence_length
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// A sentence holding only the starting word.
    pub fn initial_state(&self) -> Sentence {
        Sentence {
            words: vec![self.starting_word.clone()],
        }
    }

    /// Resume from an existing word sequence.
    ///
    /// # Errors
    /// Returns `MctsError::GameInitiation` if `words` is empty or does not
    /// begin with the starting word.
    pub fn sentence(&self, words: &[&str]) -> Result<Sentence> {
        match words.first() {
            None => Err(MctsError::GameInitiation(
                "need to start with at least the starting word".to_string(),
            )),
            Some(first) if *first != self.starting_word => Err(MctsError::GameInitiation(
                format!("first word needs to be '{}'", self.starting_word),
            )),
            Some(_) => Ok(Sentence {
                words: words.iter().map(|w| w.to_string()).collect(),
            }),
        }
    }

    /// Whether `word` may be appended to `sentence`.
    pub fn is_legal(&self, sentence: &Sentence, word: &str) -> bool {
        !self.is_terminal(sentence) && self.vocabulary.iter().any(|w| w == word)
    }
}

impl<S: SentenceScorer + Clone> Game for SentenceGame<S> {
    type State = Sentence;
    type Move = String;

    fn root(&self, _state: &Sentence) -> String {
        self.starting_word.clone()
    }

    fn is_terminal(&self, state: &Sentence) -> bool {
        state.words.len() >= self.sentence_length
    }

    fn legal_moves(&self, state: &Sentence) -> Vec<String> {
        if self.is_terminal(state) {
            Vec::new()
        } else {
            self.vocabulary.clone()
        }
    }

    fn apply(&self, state: &Sentence, mv: &String) -> Result<Sentence> {
        if !self.is_legal(state, mv) {
            return Err(MctsError::IllegalMove(format!(
                "cannot append '{}' to '{}'",
                mv, state
            )));
        }

        let mut next = state.clone();
        next.words.push(mv.clone());
        Ok(next)
    }

    fn evaluate(&self, state: &Sentence) -> Result<f64> {
        if !self.is_terminal(state) {
            return Err(MctsError::NotTerminal);
        }
        Ok(self.scorer.score(&state.words))
    }
}
