use crate::adaptive::Fingerprint;
use crate::config::{FingerprintConfig, MatchWeights};
use crate::dom::Element;

/// Scores candidate elements against a stored fingerprint.
///
/// Scoring is weighted feature agreement: attribute overlap carries the most
/// weight since `class`/`id` carry the most selection intent, then text,
/// then ancestor path, then positional proximity. Tag identity is a hard
/// gate, not a weighted feature.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
    fingerprint: FingerprintConfig,
}

impl Matcher {
    pub fn new(weights: MatchWeights, fingerprint: FingerprintConfig) -> Self {
        Self {
            weights,
            fingerprint,
        }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Similarity of two fingerprints in [0, 1]. Pure and total; differing
    /// tags score 0 outright.
    pub fn score(&self, stored: &Fingerprint, candidate: &Fingerprint) -> f64 {
        if stored.tag != candidate.tag {
            return 0.0;
        }

        let attributes = attribute_agreement(stored, candidate);
        let text = text_similarity(&stored.text_signature, &candidate.text_signature);
        let path = sequence_similarity(&stored.path_signature, &candidate.path_signature);
        let structural = positional_proximity(stored, candidate);

        (self.weights.attributes * attributes
            + self.weights.text * text
            + self.weights.path * path
            + self.weights.structural * structural)
            .clamp(0.0, 1.0)
    }

    /// Rank candidates against a stored fingerprint, descending by score.
    /// Candidates with a different tag are excluded. Ties keep the order the
    /// candidates were supplied in, so a document-order scan breaks ties by
    /// document order. An empty candidate set yields an empty ranking.
    pub fn rank<'a>(
        &self,
        stored: &Fingerprint,
        candidates: impl IntoIterator<Item = Element<'a>>,
    ) -> Vec<(Element<'a>, f64)> {
        let mut ranked: Vec<(Element<'a>, f64)> = candidates
            .into_iter()
            .filter(|candidate| candidate.tag() == stored.tag)
            .map(|candidate| {
                let fp = Fingerprint::capture(&candidate, &self.fingerprint);
                let score = self.score(stored, &fp);
                (candidate, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Fraction of stored (name, value) pairs present identically on the
/// candidate. An attribute-less stored fingerprint is vacuously satisfied.
fn attribute_agreement(stored: &Fingerprint, candidate: &Fingerprint) -> f64 {
    if stored.attributes.is_empty() {
        return 1.0;
    }
    let hits = stored
        .attributes
        .iter()
        .filter(|(k, v)| candidate.attributes.get(*k) == Some(v))
        .count();
    hits as f64 / stored.attributes.len() as f64
}

/// Character-level LCS dice ratio. An empty stored signature is vacuously
/// satisfied so originally text-less elements are not penalized.
fn text_similarity(stored: &str, candidate: &str) -> f64 {
    if stored.is_empty() {
        return 1.0;
    }
    if candidate.is_empty() {
        return 0.0;
    }
    let a: Vec<char> = stored.chars().collect();
    let b: Vec<char> = candidate.chars().collect();
    dice_ratio(lcs_length(&a, &b), a.len(), b.len())
}

/// LCS dice ratio over ancestor tag sequences; tolerates inserted or removed
/// wrapper elements with partial credit instead of exact positional equality.
fn sequence_similarity(stored: &[String], candidate: &[String]) -> f64 {
    if stored.is_empty() && candidate.is_empty() {
        return 1.0;
    }
    dice_ratio(lcs_length(stored, candidate), stored.len(), candidate.len())
}

/// Positional drift term: 1.0 when depth and sibling index are unchanged,
/// decaying as either drifts.
fn positional_proximity(stored: &Fingerprint, candidate: &Fingerprint) -> f64 {
    let depth_drift = stored.depth.abs_diff(candidate.depth) as f64;
    let sibling_drift = stored.sibling_index.abs_diff(candidate.sibling_index) as f64;
    0.5 / (1.0 + depth_drift) + 0.5 / (1.0 + sibling_drift)
}

fn dice_ratio(lcs: usize, len_a: usize, len_b: usize) -> f64 {
    if len_a + len_b == 0 {
        return 1.0;
    }
    (2 * lcs) as f64 / (len_a + len_b) as f64
}

/// Longest common subsequence length, single rolling row.
fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut row = vec![0usize; b.len() + 1];
    for item_a in a {
        let mut diagonal = 0;
        for (j, item_b) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if item_a == item_b {
                diagonal + 1
            } else {
                up.max(row[j])
            };
            diagonal = up;
        }
    }
    row[b.len()]
}
