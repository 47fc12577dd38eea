//! Montecarlo Games - Concrete decision problems for the tree search
//!
//! Both games implement `montecarlo_core::Game` and know nothing about the
//! search engine.
//!
//! - [`TravelingTourist`] - visit every planned city once and return home;
//!   shorter closed tours score higher
//! - [`SentenceGame`] - choose words one at a time; the finished sentence is
//!   scored by a pluggable [`SentenceScorer`] such as [`NgramOverlapScorer`]

mod geo;
mod ngram;
mod sentence;
mod tourist;

pub use geo::{coordinates, distance_km, known_cities, EARTH_RADIUS_KM};
pub use ngram::{clean_sentence, NgramOverlapScorer, Overlap, SENTENCE_END, SENTENCE_START};
pub use sentence::{Sentence, SentenceGame, SentenceScorer, DEFAULT_SENTENCE_LENGTH};
pub use tourist::{Tour, TravelingTourist, TOUR_SCORE_SCALE};
