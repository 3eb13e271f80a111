use std::collections::{BTreeMap, HashMap};

/// Lowercase `text` and split it into word tokens. A token is a maximal run
/// of alphanumeric or `_` characters at least two characters long.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_owned)
        .collect()
}

/// Sparse, L2-normalised TF-IDF vector keyed by vocabulary index. Ordered so
/// that sums come out bit-identical between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector(BTreeMap<usize, f64>);

impl TermVector {
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weight(&self, term: usize) -> f64 {
        self.0.get(&term).copied().unwrap_or(0.0)
    }

    /// Cosine similarity. Both vectors are already unit length, so this is the dot product.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.0.len() <= other.0.len() { (self, other) } else { (other, self) };
        small.0.iter().map(|(term, w)| w * large.weight(*term)).sum()
    }
}

/// Vocabulary and document frequencies fitted on one batch of documents.
#[derive(Debug, Clone, Default)]
pub struct TfIdf {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdf {
    /// Fit on a batch of pre-tokenised documents using the smoothed idf
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut vocabulary = HashMap::new();
        let mut df: Vec<usize> = Vec::new();
        let mut n_docs = 0usize;
        for doc in documents {
            n_docs += 1;
            let mut seen = Vec::new();
            for token in doc {
                let next = vocabulary.len();
                let id = *vocabulary.entry(token.clone()).or_insert(next);
                if id == df.len() {
                    df.push(0);
                }
                if !seen.contains(&id) {
                    seen.push(id);
                    df[id] += 1;
                }
            }
        }

        let n = n_docs as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();
        Self { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&id| self.idf[id])
    }

    /// Weight a document against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, document: &[String]) -> TermVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for token in document {
            if let Some(&id) = self.vocabulary.get(token) {
                *weights.entry(id).or_insert(0.0) += 1.0;
            }
        }
        for (id, w) in weights.iter_mut() {
            *w *= self.idf[*id];
        }

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        TermVector(weights)
    }
}
