use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{PaletteError, Result};
use crate::tfidf::{TfIdf, tokenize};

pub const DEFAULT_TOP_N: usize = 5;

/// Free-text description of the colors someone is looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub mood: String,
    pub tema: String,
    pub suasana: String,
    pub kontras: String,
}

impl Query {
    pub fn descriptor(&self) -> String {
        [
            self.mood.as_str(),
            self.tema.as_str(),
            self.suasana.as_str(),
            self.kontras.as_str(),
        ]
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub code: String,
}

/// Ranks catalog colors against a query by TF-IDF cosine similarity.
///
/// The vocabulary is refitted on every call over the catalog plus the query,
/// so a query introducing new terms slightly shifts the catalog's idf weights.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    documents: Vec<Vec<String>>,
    top_n: usize,
}

impl Recommender {
    pub fn new(catalog: Catalog) -> Self {
        let documents = catalog.rows().iter().map(|row| tokenize(&row.descriptor())).collect();
        Self {
            catalog,
            documents,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recommend(&self, mood: &str, theme: &str, suasana: &str, kontras: &str) -> Result<Vec<Recommendation>> {
        self.recommend_query(&Query {
            mood: mood.to_owned(),
            tema: theme.to_owned(),
            suasana: suasana.to_owned(),
            kontras: kontras.to_owned(),
        })
    }

    /// Best matches first; ties keep catalog order.
    pub fn recommend_query(&self, query: &Query) -> Result<Vec<Recommendation>> {
        let query_tokens = tokenize(&query.descriptor());
        if query_tokens.is_empty() {
            return Err(PaletteError::EmptyQuery);
        }

        let batch = self
            .documents
            .iter()
            .map(Vec::as_slice)
            .chain(std::iter::once(query_tokens.as_slice()));
        let model = TfIdf::fit(batch);

        let query_vec = model.transform(&query_tokens);
        let mut scored: Vec<(usize, f64)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, query_vec.cosine(&model.transform(doc))))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let rows = self.catalog.rows();
        Ok(scored
            .into_iter()
            .take(self.top_n)
            .map(|(i, score)| {
                debug!("{} ({}) similarity {score:.4}", rows[i].name, rows[i].code);
                Recommendation {
                    name: rows[i].name.clone(),
                    code: rows[i].code.clone(),
                }
            })
            .collect())
    }
}
