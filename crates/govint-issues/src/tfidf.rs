//! TF-IDF (Term Frequency - Inverse Document Frequency) implementation.
//!
//! Pure Rust implementation for keyword extraction without external dependencies.

use std::collections::{HashMap, HashSet};

/// TF-IDF calculator for keyword extraction.
///
/// Computes term importance based on frequency within documents and rarity
/// across the document corpus.
pub struct TfIdf {
    /// Term -> document count (how many documents contain this term)
    doc_frequencies: HashMap<String, usize>,
    /// Term -> total frequency across all documents
    term_frequencies: HashMap<String, usize>,
    /// Number of documents
    doc_count: usize,
}

impl TfIdf {
    /// Create a new TF-IDF calculator from a corpus of documents.
    pub fn new(documents: &[&str]) -> Self {
        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let mut term_frequencies: HashMap<String, usize> = HashMap::new();
        let doc_count = documents.len();

        for doc in documents {
            let terms = tokenize(doc);
            let unique_terms: HashSet<&String> = terms.iter().collect();

            // Count document frequency (each term counted once per doc)
            for term in unique_terms {
                *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            }

            // Count total term frequency
            for term in terms {
                *term_frequencies.entry(term).or_insert(0) += 1;
            }
        }

        Self {
            doc_frequencies,
            term_frequencies,
            doc_count,
        }
    }

    /// Calculate TF-IDF score for a term.
    ///
    /// TF-IDF = TF * IDF
    /// - TF (Term Frequency) = count of term / total terms
    /// - IDF (Inverse Document Frequency) = log(N / df) where N = doc count, df = doc frequency
    pub fn score(&self, term: &str) -> f32 {
        let tf = self.term_frequency(term);
        let idf = self.inverse_document_frequency(term);
        tf * idf
    }

    /// Calculate term frequency (normalized by total terms).
    fn term_frequency(&self, term: &str) -> f32 {
        let count = *self.term_frequencies.get(term).unwrap_or(&0) as f32;
        let total: usize = self.term_frequencies.values().sum();
        if total == 0 {
            return 0.0;
        }
        count / total as f32
    }

    /// Calculate inverse document frequency.
    ///
    /// Uses smoothed IDF: log((N + 1) / (df + 1)) + 1
    fn inverse_document_frequency(&self, term: &str) -> f32 {
        let df = *self.doc_frequencies.get(term).unwrap_or(&0) as f32;
        let n = self.doc_count as f32;

        if df == 0.0 {
            return 0.0;
        }

        // Smoothed IDF to avoid division by zero and extreme values
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    }

    /// Get top N terms by TF-IDF score.
    ///
    /// Returns terms sorted by score (highest first).
    pub fn top_terms(&self, n: usize) -> Vec<(String, f32)> {
        let mut scores: Vec<(String, f32)> = self
            .term_frequencies
            .keys()
            .map(|term| (term.clone(), self.score(term)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Sort by score descending
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scores.truncate(n);
        scores
    }

    /// Get all terms with their TF-IDF scores.
    pub fn all_scores(&self) -> HashMap<String, f32> {
        self.term_frequencies
            .keys()
            .map(|term| (term.clone(), self.score(term)))
            .collect()
    }

    /// Get document count.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Get unique term count.
    pub fn term_count(&self) -> usize {
        self.term_frequencies.len()
    }
}

/// Tokenize text into lowercase words.
///
/// Filters out:
/// - Stop words (common English words)
/// - Single character tokens
/// - Numbers
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .filter(|s| s.len() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect()
}

/// Check if a word is a stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this",
        "they", "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all",
        "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor",
        "not", "only", "own", "same", "so", "than", "too", "very", "can", "just", "should", "now",
        "also", "been", "being", "do", "does", "did", "doing", "would", "could", "might", "must",
        "shall", "about", "above", "after", "again", "against", "am", "any", "before", "below",
        "between", "into", "through", "during", "out", "over", "under", "up", "down", "then",
        "once", "here", "there", "if", "else", "while", "because", "until", "we", "you", "your",
        "our", "their", "him", "her", "them", "me", "my", "myself", "itself", "those", "these",
        "his",
    ];

    STOP_WORDS.contains(&word)
}
