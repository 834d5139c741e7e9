//! Knowledge base: question answering over a small fact list
//!
//! Two interchangeable scoring functions share one decision rule: score
//! every entry, keep the best (first wins on ties), answer only when the
//! best score is strictly above the threshold.
//!
//! - [`ScoringMethod::Overlap`]: `|q ∩ e| / |q|` over distinct words.
//! - [`ScoringMethod::TfIdf`]: cosine similarity of TF-IDF vectors, with
//!   smoothed idf `ln((1 + n) / (1 + df)) + 1`.
//!
//! The two do not produce identical scores, so a store tuned for one may
//! answer differently under the other.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::engine::normalizer::words;
use crate::engine::phrases::DEFAULT_KNOWLEDGE;
use crate::errors::{ChatError, Result};

/// Minimum score (exclusive) for an answer to be returned
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// A single {question, answer} fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Relevance scoring function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    /// Share of query words present in the stored question
    Overlap,
    /// Cosine similarity over TF-IDF weighted terms
    TfIdf,
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMethod::Overlap => write!(f, "overlap"),
            ScoringMethod::TfIdf => write!(f, "tfidf"),
        }
    }
}

impl FromStr for ScoringMethod {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overlap" | "keyword" => Ok(ScoringMethod::Overlap),
            "tfidf" | "tf-idf" => Ok(ScoringMethod::TfIdf),
            other => Err(ChatError::ConfigError(format!(
                "Unknown scoring method '{}' (expected 'overlap' or 'tfidf')",
                other
            ))),
        }
    }
}

/// Best-scoring entry for a query
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeMatch<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: f64,
}

/// Ordered fact store with configurable scoring
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    method: ScoringMethod,
    threshold: f64,
    /// Present only for [`ScoringMethod::TfIdf`]; rebuilt whenever entries change
    tfidf: Option<TfIdfIndex>,
}

impl KnowledgeBase {
    /// Create a knowledge base, dropping entries with blank questions
    pub fn new(entries: Vec<KnowledgeEntry>, method: ScoringMethod, threshold: f64) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !e.question.trim().is_empty())
            .collect();
        let mut kb = Self {
            entries,
            method,
            threshold,
            tfidf: None,
        };
        kb.reindex();
        kb
    }

    /// Knowledge base seeded with the built-in trivia set
    pub fn with_defaults(method: ScoringMethod, threshold: f64) -> Self {
        Self::new(default_entries(), method, threshold)
    }

    /// Add a fact, replacing the answer if the question is already known
    pub fn add(&mut self, question: &str, answer: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::KnowledgeError(
                "question text must not be empty".to_string(),
            ));
        }

        let key = question.to_lowercase();
        match self
            .entries
            .iter_mut()
            .find(|e| e.question.trim().to_lowercase() == key)
        {
            Some(existing) => existing.answer = answer.trim().to_string(),
            None => {
                self.entries
                    .push(KnowledgeEntry::new(question, answer.trim()));
                self.reindex();
            }
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.tfidf = match self.method {
            ScoringMethod::TfIdf => Some(TfIdfIndex::build(&self.entries)),
            ScoringMethod::Overlap => None,
        };
    }

    /// Best entry whose score exceeds the threshold
    pub fn lookup(&self, question: &str) -> Option<KnowledgeMatch<'_>> {
        let (index, score) = self.best_match(question)?;
        if score > self.threshold {
            Some(KnowledgeMatch {
                entry: &self.entries[index],
                score,
            })
        } else {
            None
        }
    }

    /// Answer text for `question`, if one is confident enough
    pub fn answer(&self, question: &str) -> Option<&str> {
        self.lookup(question).map(|m| m.entry.answer.as_str())
    }

    /// Highest score regardless of threshold; first entry wins ties
    fn best_match(&self, question: &str) -> Option<(usize, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let scores = match &self.tfidf {
            Some(index) => index.scores(question),
            None => self.overlap_scores(question),
        };

        let mut best: Option<(usize, f64)> = None;
        for (i, score) in scores.into_iter().enumerate() {
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best
    }

    fn overlap_scores(&self, question: &str) -> Vec<f64> {
        let query: HashSet<String> = words(question).into_iter().collect();
        self.entries
            .iter()
            .map(|entry| {
                let stored: HashSet<String> = words(&entry.question).into_iter().collect();
                overlap_score(&query, &stored)
            })
            .collect()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn method(&self) -> ScoringMethod {
        self.method
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in trivia entries
pub fn default_entries() -> Vec<KnowledgeEntry> {
    DEFAULT_KNOWLEDGE
        .iter()
        .map(|(q, a)| KnowledgeEntry::new(*q, *a))
        .collect()
}

/// `|query ∩ stored| / |query|`, 0 for an empty query
pub fn overlap_score(query: &HashSet<String>, stored: &HashSet<String>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    query.intersection(stored).count() as f64 / query.len() as f64
}

/// TF-IDF vectors for every stored question
#[derive(Debug, Clone)]
struct TfIdfIndex {
    doc_count: usize,
    document_frequency: HashMap<String, usize>,
    vectors: Vec<HashMap<String, f64>>,
}

impl TfIdfIndex {
    fn build(entries: &[KnowledgeEntry]) -> Self {
        let docs: Vec<Vec<String>> = entries.iter().map(|e| words(&e.question)).collect();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            let unique: HashSet<&String> = doc.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let mut index = TfIdfIndex {
            doc_count: docs.len(),
            document_frequency,
            vectors: Vec::with_capacity(docs.len()),
        };
        index.vectors = docs.iter().map(|doc| index.vectorize(doc)).collect();
        index
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency.get(term).copied().unwrap_or(0);
        ((1 + self.doc_count) as f64 / (1 + df) as f64).ln() + 1.0
    }

    fn vectorize(&self, terms: &[String]) -> HashMap<String, f64> {
        let mut tf: HashMap<String, f64> = HashMap::new();
        for term in terms {
            *tf.entry(term.clone()).or_insert(0.0) += 1.0;
        }
        tf.into_iter()
            .map(|(term, count)| {
                let weight = count * self.idf(&term);
                (term, weight)
            })
            .collect()
    }

    fn scores(&self, question: &str) -> Vec<f64> {
        let query = self.vectorize(&words(question));
        self.vectors
            .iter()
            .map(|doc| cosine_similarity(&query, doc))
            .collect()
    }
}

/// Cosine similarity of two sparse vectors, 0 if either is empty
fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn sample(method: ScoringMethod) -> KnowledgeBase {
        KnowledgeBase::new(
            vec![
                KnowledgeEntry::new("What is the capital of France?", "Paris."),
                KnowledgeEntry::new("What is the capital of Spain?", "Madrid."),
                KnowledgeEntry::new("Who painted the Mona Lisa?", "Leonardo da Vinci."),
            ],
            method,
            DEFAULT_THRESHOLD,
        )
    }

    #[test]
    fn test_exact_question_overlap() {
        let kb = sample(ScoringMethod::Overlap);
        assert_eq!(kb.answer("What is the capital of France?"), Some("Paris."));
    }

    #[test]
    fn test_exact_question_tfidf() {
        let kb = sample(ScoringMethod::TfIdf);
        let m = kb.lookup("What is the capital of France?").unwrap();
        assert_eq!(m.entry.answer, "Paris.");
        assert!((m.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_overlap_returns_none() {
        for method in [ScoringMethod::Overlap, ScoringMethod::TfIdf] {
            let kb = sample(method);
            assert!(kb.answer("bananas taste nice").is_none());
        }
    }

    #[test]
    fn test_empty_store_never_answers() {
        let kb = KnowledgeBase::new(vec![], ScoringMethod::Overlap, DEFAULT_THRESHOLD);
        assert!(kb.answer("What is the capital of France?").is_none());
    }

    #[test]
    fn test_tie_broken_by_store_order() {
        // "what is the capital" overlaps France and Spain equally
        let kb = sample(ScoringMethod::Overlap);
        assert_eq!(kb.answer("what is the capital"), Some("Paris."));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let kb = KnowledgeBase::new(
            vec![KnowledgeEntry::new("alpha beta gamma", "yes")],
            ScoringMethod::Overlap,
            0.5,
        );
        // 1 of 2 query words -> exactly 0.5, not above
        assert!(kb.answer("alpha omega").is_none());
        assert_eq!(kb.answer("alpha beta omega"), Some("yes"));
    }

    #[test]
    fn test_blank_questions_are_dropped() {
        let kb = KnowledgeBase::new(
            vec![KnowledgeEntry::new("  ", "orphan"), KnowledgeEntry::new("q", "a")],
            ScoringMethod::Overlap,
            DEFAULT_THRESHOLD,
        );
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn test_add_upserts() {
        let mut kb = sample(ScoringMethod::Overlap);
        kb.add("what is the capital of france?", "Paris, of course.").unwrap();
        assert_eq!(kb.len(), 3);
        assert_eq!(kb.answer("capital of France"), Some("Paris, of course."));

        kb.add("What is the tallest mountain?", "Everest.").unwrap();
        assert_eq!(kb.len(), 4);
        assert!(kb.add("   ", "nothing").is_err());
    }

    #[test]
    fn test_tfidf_index_follows_additions() {
        let mut kb = sample(ScoringMethod::TfIdf);
        assert_eq!(kb.tfidf.as_ref().map(|i| i.vectors.len()), Some(3));
        assert!(kb.answer("tallest mountain on earth").is_none());

        kb.add("What is the tallest mountain on Earth?", "Everest.").unwrap();
        assert_eq!(kb.tfidf.as_ref().map(|i| i.vectors.len()), Some(4));
        assert_eq!(kb.answer("tallest mountain on earth"), Some("Everest."));

        // Upserting an answer leaves the question vectors alone
        kb.add("what is the tallest mountain on earth?", "Mount Everest.").unwrap();
        assert_eq!(kb.answer("tallest mountain on earth"), Some("Mount Everest."));

        assert!(sample(ScoringMethod::Overlap).tfidf.is_none());
    }

    #[test]
    fn test_scoring_method_parse() {
        assert_eq!("TF-IDF".parse::<ScoringMethod>().unwrap(), ScoringMethod::TfIdf);
        assert_eq!("overlap".parse::<ScoringMethod>().unwrap(), ScoringMethod::Overlap);
        assert!("magic".parse::<ScoringMethod>().is_err());
    }

    #[test]
    fn test_defaults_answer_their_own_questions() {
        for method in [ScoringMethod::Overlap, ScoringMethod::TfIdf] {
            let kb = KnowledgeBase::with_defaults(method, DEFAULT_THRESHOLD);
            for entry in default_entries() {
                assert_eq!(kb.answer(&entry.question), Some(entry.answer.as_str()));
            }
        }
    }

    #[quickcheck]
    fn prop_overlap_score_bounded(query: Vec<String>, stored: Vec<String>) -> bool {
        let q: HashSet<String> = query.into_iter().collect();
        let s: HashSet<String> = stored.into_iter().collect();
        let score = overlap_score(&q, &s);
        (0.0..=1.0).contains(&score)
    }
}
