//! Top-N retrieval over a similarity row

use crate::encoder::IdentifierEncoder;
use crate::similarity::SimilarityMatrix;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 5;

/// A recommended item and its similarity to the query item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: String,
    pub score: f64,
}

/// Candidate during ranking. Orders best-first: higher score, then lower index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoredItem {
    pub(crate) item: usize,
    pub(crate) score: OrderedFloat<f64>,
}

impl ScoredItem {
    pub(crate) fn new(item: usize, score: f64) -> Self {
        Self {
            item,
            score: OrderedFloat(score),
        }
    }
}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.item.cmp(&other.item))
    }
}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank every item except `query` by similarity and keep the best `top_n`
pub(crate) fn rank(similarity: &SimilarityMatrix, query: usize, top_n: usize) -> Vec<ScoredItem> {
    let row = match similarity.row(query) {
        Some(row) if top_n > 0 => row,
        _ => return Vec::new(),
    };

    let mut candidates: Vec<ScoredItem> = row
        .iter()
        .enumerate()
        .filter(|&(item, _)| item != query)
        .map(|(item, &score)| ScoredItem::new(item, score))
        .collect();

    if top_n < candidates.len() {
        candidates.select_nth_unstable(top_n - 1);
        candidates.truncate(top_n);
    }
    candidates.sort_unstable();
    candidates
}

/// Rank and map indices back to raw identifiers
pub fn recommend(
    items: &IdentifierEncoder,
    similarity: &SimilarityMatrix,
    query_item: &str,
    top_n: usize,
) -> Vec<Recommendation> {
    let query = match items.encode(query_item).index() {
        Some(index) => index,
        None => return Vec::new(),
    };

    rank(similarity, query, top_n)
        .into_iter()
        .filter_map(|candidate| {
            items.decode(candidate.item).map(|item_id| Recommendation {
                item_id: item_id.to_string(),
                score: candidate.score.into_inner(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_prefers_score_then_index() {
        let mut items = vec![
            ScoredItem::new(3, 0.5),
            ScoredItem::new(1, 0.9),
            ScoredItem::new(0, 0.5),
            ScoredItem::new(2, 0.9),
        ];
        items.sort();
        let order: Vec<usize> = items.iter().map(|s| s.item).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_select_matches_full_sort() {
        let scores = [0.1, 0.7, 0.7, 0.3, 0.9, 0.0, 0.7, 0.3];
        let mut all: Vec<ScoredItem> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| ScoredItem::new(i, s))
            .collect();

        for k in 1..=scores.len() {
            let mut partial = all.clone();
            partial.select_nth_unstable(k - 1);
            partial.truncate(k);
            partial.sort_unstable();

            all.sort_unstable();
            assert_eq!(partial, all[..k].to_vec());
        }
    }
}
