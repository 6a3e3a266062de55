//! Item x item cosine similarity.
//!
//! Dot products are gathered per item through the users that touched it, so
//! the cost follows co-occurrence instead of `items * items * users`. The
//! result is stored densely and is exactly symmetric.
//!
//! Cosine is scale invariant, so every usage vector is divided by its largest
//! magnitude before squaring. Squares then stay within `(0, 1]` and neither
//! overflow nor underflow to zero for any finite positive input.

use crate::matrix::InteractionMatrix;
use rayon::prelude::*;

/// Largest absolute value, or 0.0 for an empty or all-zero vector
#[inline]
fn max_abs<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Non-finite ratios read as "no similarity"
#[inline]
fn finite_or_zero(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Cosine similarity of two dense vectors.
///
/// Returns 0.0 when the lengths differ or either vector has zero norm.
#[inline]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let scale_a = max_abs(a.iter().copied());
    let scale_b = max_abs(b.iter().copied());
    if scale_a == 0.0 || scale_b == 0.0 || !scale_a.is_finite() || !scale_b.is_finite() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x / scale_a) * (y / scale_b))
        .sum();
    let norm_a = a.iter().map(|x| (x / scale_a).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (x / scale_b).powi(2)).sum::<f64>().sqrt();

    finite_or_zero(dot / (norm_a * norm_b))
}

/// Scratch space for one similarity row; only touched slots are reset
struct RowAccumulator {
    sums: Vec<f64>,
    touched: Vec<usize>,
    occupied: Vec<bool>,
}

impl RowAccumulator {
    fn new(num_items: usize) -> Self {
        Self {
            sums: vec![0.0; num_items],
            touched: Vec::new(),
            occupied: vec![false; num_items],
        }
    }

    #[inline]
    fn add_to(&mut self, column: usize, value: f64) {
        self.sums[column] += value;
        if !self.occupied[column] {
            self.occupied[column] = true;
            self.touched.push(column);
        }
    }

    /// Write normalized scores for `item` into `row` and reset.
    ///
    /// A zero norm only happens for an item with no stored cells.
    fn drain_into(&mut self, item: usize, norms: &[f64], row: &mut [f64]) {
        for &other in &self.touched {
            if other != item {
                let denominator = norms[item] * norms[other];
                row[other] = if denominator == 0.0 {
                    0.0
                } else {
                    finite_or_zero(self.sums[other] / denominator)
                };
            }
            self.sums[other] = 0.0;
            self.occupied[other] = false;
        }
        self.touched.clear();
        row[item] = if norms[item] == 0.0 { 0.0 } else { 1.0 };
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute the full item x item matrix.
    ///
    /// With `parallel` set, rows are spread over the rayon pool; every row is
    /// produced by the same sequential summation, so both paths agree.
    pub fn compute(matrix: &InteractionMatrix, parallel: bool) -> Self {
        let n = matrix.num_items();
        let scales: Vec<f64> = (0..n)
            .map(|item| max_abs(matrix.column(item).iter().map(|&(_, v)| v)))
            .collect();
        let scaled = |item: usize, value: f64| {
            if scales[item] > 0.0 {
                value / scales[item]
            } else {
                0.0
            }
        };

        let mut user_rows = matrix.user_rows();
        for row in &mut user_rows {
            for (item, value) in row.iter_mut() {
                *value = scaled(*item, *value);
            }
        }
        // every stored cell is positive, so a non-empty column has its
        // largest cell scaled to exactly 1.0 and a norm of at least 1.0
        let norms: Vec<f64> = (0..n)
            .map(|item| {
                matrix
                    .column(item)
                    .iter()
                    .map(|&(_, v)| scaled(item, v).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let fill_row = |acc: &mut RowAccumulator, item: usize, row: &mut [f64]| {
            for &(user, value) in matrix.column(item) {
                let value = scaled(item, value);
                for &(other, other_value) in &user_rows[user] {
                    acc.add_to(other, value * other_value);
                }
            }
            acc.drain_into(item, &norms, row);
        };

        let mut scores = vec![0.0; n * n];
        if n > 0 {
            if parallel {
                scores
                    .par_chunks_mut(n)
                    .enumerate()
                    .for_each_init(
                        || RowAccumulator::new(n),
                        |acc, (item, row)| fill_row(acc, item, row),
                    );
            } else {
                let mut acc = RowAccumulator::new(n);
                for (item, row) in scores.chunks_mut(n).enumerate() {
                    fill_row(&mut acc, item, row);
                }
            }
        }

        // mirror the upper triangle so S[i][j] and S[j][i] are the same bits
        for i in 0..n {
            for j in (i + 1)..n {
                scores[j * n + i] = scores[i * n + j];
            }
        }

        Self { n, scores }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity scores of `item` against every item, indexed by item
    pub fn row(&self, item: usize) -> Option<&[f64]> {
        if item < self.n {
            Some(&self.scores[item * self.n..(item + 1) * self.n])
        } else {
            None
        }
    }

    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        if a < self.n && b < self.n {
            Some(self.scores[a * self.n + b])
        } else {
            None
        }
    }
}
