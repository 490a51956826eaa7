use ndarray::{Array1, Array2};
use std::collections::{BTreeSet, HashMap};

/// Splits text into lower-cased alphanumeric tokens. Punctuation and
/// whitespace both act as delimiters, so "python?" and "python" tokenize
/// identically.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// A tf-idf vector space fitted over the corpus questions.
///
/// The vocabulary is fixed at fit time: dimensions are assigned to terms in
/// sorted order so an identical corpus always yields an identical space, and
/// unseen query tokens simply contribute zero weight.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocab: HashMap<String, usize>,
    idf: Array1<f32>,
}

impl TfidfVectorizer {
    /// Fits the vocabulary and smoothed inverse document frequencies over
    /// the given documents.
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = documents.into_iter().map(tokenize).collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flatten()
            .map(|t| t.as_str())
            .collect();
        let vocab: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(dim, term)| (term.to_string(), dim))
            .collect();

        let mut doc_freq = vec![0usize; vocab.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for token in unique {
                if let Some(&dim) = vocab.get(token) {
                    doc_freq[dim] += 1;
                }
            }
        }

        // Smoothed idf, so terms present in every document still carry weight
        // and an exact corpus question scores cosine similarity 1.0.
        let total_docs = tokenized.len() as f32;
        let idf = Array1::from_iter(
            doc_freq
                .iter()
                .map(|&df| ((1.0 + total_docs) / (1.0 + df as f32)).ln() + 1.0),
        );

        TfidfVectorizer { vocab, idf }
    }

    pub fn dimensions(&self) -> usize {
        self.vocab.len()
    }

    /// Projects arbitrary text into the fitted space as an L2-normalized
    /// tf-idf vector. Out-of-vocabulary tokens are ignored.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut vector = Array1::<f32>::zeros(self.vocab.len());
        for token in tokenize(text) {
            if let Some(&dim) = self.vocab.get(&token) {
                vector[dim] += 1.0;
            }
        }
        vector *= &self.idf;
        let norm = vector.dot(&vector).sqrt();
        if norm > 0.0 {
            vector / norm
        } else {
            vector
        }
    }

    /// Transforms a batch of documents into a matrix with one row each.
    pub fn transform_batch<'a, I>(&self, documents: I) -> Array2<f32>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<Array1<f32>> = documents.into_iter().map(|d| self.transform(d)).collect();
        let mut matrix = Array2::zeros((rows.len(), self.vocab.len()));
        for (i, row) in rows.iter().enumerate() {
            matrix.row_mut(i).assign(row);
        }
        matrix
    }
}

pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let dot_product = a.dot(b);
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
