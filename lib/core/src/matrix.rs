//! User x item interaction matrix.
//!
//! Stored column-major and sparse: every item keeps the users that touched it,
//! sorted by user index. Cells nobody wrote to read as zero.

use crate::config::DuplicatePolicy;
use crate::encoder::IdentifierEncoder;
use crate::record::InteractionRecord;
use crate::{Error, Result};
use ahash::AHashMap;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    sum: f64,
    max: f64,
    count: u32,
}

impl Cell {
    fn add(&mut self, magnitude: f64) {
        self.sum += magnitude;
        self.max = self.max.max(magnitude);
        self.count += 1;
    }

    fn resolve(&self, policy: DuplicatePolicy) -> f64 {
        match policy {
            DuplicatePolicy::Sum => self.sum,
            DuplicatePolicy::Mean => self.sum / f64::from(self.count),
            DuplicatePolicy::Max => self.max,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    num_users: usize,
    columns: Vec<Vec<(usize, f64)>>,
    merged_duplicates: usize,
}

impl InteractionMatrix {
    /// Aggregate eligible records into a `users x items` matrix.
    ///
    /// Every record must reference identifiers known to the encoders and
    /// carry a finite, strictly positive magnitude.
    pub fn build(
        records: &[InteractionRecord],
        users: &IdentifierEncoder,
        items: &IdentifierEncoder,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut cells: Vec<AHashMap<usize, Cell>> = vec![AHashMap::new(); items.len()];
        let mut merged_duplicates = 0;

        for record in records {
            if !record.magnitude.is_finite() || record.magnitude <= 0.0 {
                return Err(Error::InvalidMagnitude {
                    user_id: record.user_id.clone(),
                    item_id: record.item_id.clone(),
                    magnitude: record.magnitude,
                });
            }
            let user = users
                .encode(&record.user_id)
                .index()
                .ok_or_else(|| Error::UnencodedIdentifier {
                    kind: "user",
                    id: record.user_id.clone(),
                })?;
            let item = items
                .encode(&record.item_id)
                .index()
                .ok_or_else(|| Error::UnencodedIdentifier {
                    kind: "item",
                    id: record.item_id.clone(),
                })?;

            let cell = cells[item].entry(user).or_default();
            if cell.count > 0 {
                merged_duplicates += 1;
            }
            cell.add(record.magnitude);
        }

        let columns = cells
            .into_iter()
            .map(|column| {
                let mut entries: Vec<(usize, f64)> = column
                    .into_iter()
                    .map(|(user, cell)| (user, cell.resolve(policy)))
                    .collect();
                entries.sort_unstable_by_key(|&(user, _)| user);
                entries
            })
            .collect();

        Ok(Self {
            num_users: users.len(),
            columns,
            merged_duplicates,
        })
    }

    /// `(users, items)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_users, self.columns.len())
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn num_items(&self) -> usize {
        self.columns.len()
    }

    /// Number of stored (non-zero) cells
    pub fn nnz(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Records that landed on an already occupied cell
    pub fn merged_duplicates(&self) -> usize {
        self.merged_duplicates
    }

    pub fn get(&self, user: usize, item: usize) -> f64 {
        self.columns
            .get(item)
            .and_then(|column| {
                column
                    .binary_search_by_key(&user, |&(u, _)| u)
                    .ok()
                    .map(|pos| column[pos].1)
            })
            .unwrap_or(0.0)
    }

    /// Non-zero entries of an item's usage vector, sorted by user index
    pub fn column(&self, item: usize) -> &[(usize, f64)] {
        self.columns.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dense copy of an item's usage vector across all users
    pub fn dense_column(&self, item: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.num_users];
        for &(user, value) in self.column(item) {
            dense[user] = value;
        }
        dense
    }

    /// Row-major view: for every user, the items it touched sorted by item index
    pub(crate) fn user_rows(&self) -> Vec<Vec<(usize, f64)>> {
        let mut rows = vec![Vec::new(); self.num_users];
        for (item, column) in self.columns.iter().enumerate() {
            for &(user, value) in column {
                rows[user].push((item, value));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(records: &[InteractionRecord]) -> (IdentifierEncoder, IdentifierEncoder) {
        (
            IdentifierEncoder::fit(records.iter().map(|r| &r.user_id)),
            IdentifierEncoder::fit(records.iter().map(|r| &r.item_id)),
        )
    }

    fn play(user: &str, item: &str, magnitude: f64) -> InteractionRecord {
        InteractionRecord::new(user, item, "play", magnitude)
    }

    #[test]
    fn test_shape_and_defaults() {
        let records = vec![play("u1", "A", 10.0), play("u2", "B", 4.0), play("u3", "C", 1.5)];
        let (users, items) = fit(&records);
        let matrix = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap();

        assert_eq!(matrix.shape(), (3, 3));
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(matrix.get(0, 0), 10.0);
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(1, 1), 4.0);
        assert_eq!(matrix.get(7, 7), 0.0);
    }

    #[test]
    fn test_duplicates_sum_by_default() {
        let records = vec![play("u1", "A", 3.0), play("u1", "A", 7.0)];
        let (users, items) = fit(&records);
        let matrix = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap();

        assert_eq!(matrix.get(0, 0), 10.0);
        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.merged_duplicates(), 1);
    }

    #[test]
    fn test_duplicates_mean_and_max() {
        let records = vec![play("u1", "A", 3.0), play("u1", "A", 7.0)];
        let (users, items) = fit(&records);

        let mean = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Mean).unwrap();
        assert_eq!(mean.get(0, 0), 5.0);

        let max = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Max).unwrap();
        assert_eq!(max.get(0, 0), 7.0);
    }

    #[test]
    fn test_columns_sorted_by_user() {
        let records = vec![play("u3", "A", 1.0), play("u1", "A", 2.0), play("u2", "A", 3.0)];
        let (users, items) = fit(&records);
        let matrix = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap();

        assert_eq!(matrix.column(0), &[(0, 2.0), (1, 3.0), (2, 1.0)]);
        assert_eq!(matrix.dense_column(0), vec![2.0, 3.0, 1.0]);
        assert!(matrix.column(5).is_empty());
    }

    #[test]
    fn test_user_rows() {
        let records = vec![play("u1", "B", 1.0), play("u1", "A", 2.0), play("u2", "B", 3.0)];
        let (users, items) = fit(&records);
        let matrix = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap();

        let rows = matrix.user_rows();
        assert_eq!(rows[0], vec![(0, 2.0), (1, 1.0)]);
        assert_eq!(rows[1], vec![(1, 3.0)]);
    }

    #[test]
    fn test_unencoded_identifier() {
        let records = vec![play("u1", "A", 1.0)];
        let users = IdentifierEncoder::fit(["u1"]);
        let items = IdentifierEncoder::fit(["B"]);
        let err = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap_err();
        assert!(matches!(err, Error::UnencodedIdentifier { kind: "item", .. }));
    }

    #[test]
    fn test_rejects_non_positive_magnitude() {
        let records = vec![play("u1", "A", 0.0)];
        let (users, items) = fit(&records);
        let err = InteractionMatrix::build(&records, &users, &items, DuplicatePolicy::Sum).unwrap_err();
        assert!(matches!(err, Error::InvalidMagnitude { .. }));
    }
}
