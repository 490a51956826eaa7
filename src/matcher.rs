use crate::corpus::Corpus;
use crate::tfidf::{cosine_similarity, TfidfVectorizer};
use ndarray::Array2;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Best corpus row for a query, produced fresh per lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub best_index: usize,
    pub similarity: f32,
}

/// Matches queries against the corpus questions by cosine similarity over
/// the fitted tf-idf space.
///
/// The threshold is deliberately high: only near-exact paraphrases are
/// answered from the corpus, everything else falls through to the later
/// tiers of the resolver chain.
pub struct DatasetMatcher {
    vectorizer: TfidfVectorizer,
    question_matrix: Array2<f32>,
    threshold: f32,
}

impl DatasetMatcher {
    pub fn new(corpus: &Corpus, threshold: f32) -> Self {
        let vectorizer = TfidfVectorizer::fit(corpus.questions());
        let question_matrix = vectorizer.transform_batch(corpus.questions());
        DatasetMatcher {
            vectorizer,
            question_matrix,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Scans every corpus row and returns the maximum-similarity match.
    /// Ties resolve to the lowest index, i.e. first occurrence in corpus
    /// order.
    pub fn best_match(&self, query: &str) -> Option<MatchResult> {
        if self.question_matrix.nrows() == 0 {
            return None;
        }
        let query_vector = self.vectorizer.transform(query);

        let mut best = MatchResult {
            best_index: 0,
            similarity: f32::MIN,
        };
        for (i, row) in self.question_matrix.rows().into_iter().enumerate() {
            let similarity = cosine_similarity(&query_vector, &row.to_owned());
            if similarity > best.similarity {
                best = MatchResult {
                    best_index: i,
                    similarity,
                };
            }
        }
        Some(best)
    }

    /// Returns the stored answer when the best match clears the threshold.
    pub fn answer<'a>(&self, corpus: &'a Corpus, query: &str) -> Option<&'a str> {
        let result = self.best_match(query)?;
        log::debug!(
            "Best dataset match for {:?}: {:?} (similarity {:.3}, threshold {})",
            query,
            corpus.question(result.best_index).unwrap_or(""),
            result.similarity,
            self.threshold
        );
        if result.similarity >= self.threshold {
            corpus.answer(result.best_index)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_corpus() -> Corpus {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.json");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        file.write_all(
            br#"[
                {"question": "what is rust", "answer": "A systems language."},
                {"question": "who is einstein", "answer": "A physicist."},
                {"question": "how do i cook rice", "answer": "Boil it."}
            ]"#,
        )
        .unwrap();
        Corpus::load(&dataset_path, &dir.path().join("absent.json")).unwrap()
    }

    #[test]
    fn exact_question_is_a_unit_hit() {
        let corpus = test_corpus();
        let matcher = DatasetMatcher::new(&corpus, DEFAULT_SIMILARITY_THRESHOLD);
        let result = matcher.best_match("What is Rust?").unwrap();
        assert_eq!(result.best_index, 0);
        assert!((result.similarity - 1.0).abs() < 1e-6);
        assert_eq!(matcher.answer(&corpus, "What is Rust?"), Some("A systems language."));
    }

    #[test]
    fn below_threshold_is_no_match() {
        let corpus = test_corpus();
        let matcher = DatasetMatcher::new(&corpus, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(matcher.answer(&corpus, "completely unrelated zeppelin talk"), None);
    }

    #[test]
    fn threshold_comparison_is_inclusive() {
        let corpus = test_corpus();
        let probe = DatasetMatcher::new(&corpus, 0.0);
        // A partial-overlap query lands strictly between 0 and 1.
        let similarity = probe.best_match("what is einstein").unwrap().similarity;
        assert!(similarity > 0.0 && similarity < 1.0);

        // A threshold exactly at the achieved similarity is still a hit...
        let at = DatasetMatcher::new(&corpus, similarity);
        assert!(at.answer(&corpus, "what is einstein").is_some());

        // ...while any threshold above it is not.
        let above = DatasetMatcher::new(&corpus, similarity + 1e-4);
        assert_eq!(above.answer(&corpus, "what is einstein"), None);
    }

    #[test]
    fn matching_is_idempotent() {
        let corpus = test_corpus();
        let matcher = DatasetMatcher::new(&corpus, DEFAULT_SIMILARITY_THRESHOLD);
        let first = matcher.best_match("how do i cook rice");
        let second = matcher.best_match("how do i cook rice");
        assert_eq!(first, second);
    }

    #[test]
    fn ties_resolve_to_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("dataset.json");
        let mut file = std::fs::File::create(&dataset_path).unwrap();
        file.write_all(
            br#"[
                {"question": "hello there", "answer": "first"},
                {"question": "hello there", "answer": "second"}
            ]"#,
        )
        .unwrap();
        let corpus = Corpus::load(&dataset_path, &dir.path().join("absent.json")).unwrap();
        let matcher = DatasetMatcher::new(&corpus, DEFAULT_SIMILARITY_THRESHOLD);
        let result = matcher.best_match("hello there").unwrap();
        assert_eq!(result.best_index, 0);
        assert_eq!(matcher.answer(&corpus, "hello there"), Some("first"));
    }
}
