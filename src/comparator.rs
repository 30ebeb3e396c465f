//! Semantic Comparator (C1): TF-IDF + cosine similarity clustering of
//! short texts.
//!
//! No linear-algebra or NLP dependency appears anywhere in the teacher
//! corpus for a job this size — sparse `HashMap<String, f64>` vectors
//! match its "small focused utility module" texture (`pricing.rs`'s
//! hand-rolled token-cost tables are the closest analogue).

use std::collections::{HashMap, HashSet};

/// One cluster of indices into the input slice, anchored at the first
/// (smallest-index) member encountered during the greedy scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub anchor: usize,
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Result of comparing a batch of texts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub clusters: Vec<Cluster>,
    /// Full pairwise similarity matrix, `matrix[i][j] == matrix[j][i]`,
    /// diagonal is `1.0`. Empty when `n < 2`.
    pub matrix: Vec<Vec<f64>>,
    /// The maximum off-diagonal similarity observed.
    pub max_similarity: f64,
    /// Whether any pair met the similarity threshold.
    pub is_similar: bool,
}

/// Cluster `texts` such that any two indices placed in the same cluster
/// have cosine similarity `>= threshold`. Clustering is anchor-based and
/// greedy in insertion order (deliberately not transitive): iterate
/// `i = 0..n`; if unvisited, open a cluster at `i` and absorb every later
/// unvisited `j` with `sim(i, j) >= threshold`.
///
/// `n < 2` (including all-empty input) is a degenerate case: empty
/// matrix, `is_similar = false`, no clusters.
pub fn compare(texts: &[String], threshold: f64) -> ComparisonResult {
    let n = texts.len();
    if n < 2 {
        return ComparisonResult {
            clusters: Vec::new(),
            matrix: Vec::new(),
            max_similarity: 0.0,
            is_similar: false,
        };
    }

    let vectors = tfidf_vectors(texts);
    let mut matrix = vec![vec![0.0; n]; n];
    let mut max_similarity: f64 = 0.0;

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = cosine(&vectors[i], &vectors[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
            if sim > max_similarity {
                max_similarity = sim;
            }
        }
    }

    let mut visited = vec![false; n];
    let mut clusters = Vec::new();
    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut members = vec![i];
        for (j, v) in visited.iter_mut().enumerate().skip(i + 1) {
            if !*v && matrix[i][j] >= threshold {
                *v = true;
                members.push(j);
            }
        }
        clusters.push(Cluster { anchor: i, members });
    }

    ComparisonResult {
        clusters,
        matrix,
        max_similarity,
        is_similar: max_similarity >= threshold,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// TF-IDF with add-one smoothing on the IDF term, L2-normalised so cosine
/// similarity reduces to a plain dot product.
fn tfidf_vectors(texts: &[String]) -> Vec<HashMap<String, f64>> {
    let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();
    let n = docs.len() as f64;

    let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *doc_frequency.entry(term).or_insert(0) += 1;
        }
    }

    docs.iter()
        .map(|doc| {
            let mut term_counts: HashMap<&str, f64> = HashMap::new();
            for term in doc {
                *term_counts.entry(term.as_str()).or_insert(0.0) += 1.0;
            }

            let mut vector: HashMap<String, f64> = HashMap::new();
            for (term, count) in &term_counts {
                let df = *doc_frequency.get(term).unwrap_or(&1) as f64;
                let idf = (n / df).ln() + 1.0;
                vector.insert((*term).to_string(), count * idf);
            }

            let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in vector.values_mut() {
                    *v /= norm;
                }
            }
            vector
        })
        .collect()
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .map(|(term, weight)| weight * large.get(term).copied().unwrap_or(0.0))
        .sum()
}
