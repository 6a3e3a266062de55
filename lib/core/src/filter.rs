//! Record eligibility
//!
//! Only rows that describe genuine usage with a strictly positive magnitude
//! reach the matrix builder. Row-level problems drop the row; a batch that
//! lacks one of the required columns is rejected as a whole.

use crate::config::EngineConfig;
use crate::record::{InteractionRecord, RawRecords};
use crate::{Error, Result};
use serde::Serialize;
use tracing::debug;

pub trait Filter {
    fn matches(&self, record: &InteractionRecord) -> bool;
}

/// Counters describing what happened to each row of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: usize,
    pub kept: usize,
    pub malformed: usize,
    pub inactive: usize,
    pub non_positive: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<InteractionRecord>,
    pub stats: FilterStats,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    user_id: usize,
    item_id: usize,
    behavior: usize,
    magnitude: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Malformed,
    Inactive,
    NonPositive,
}

impl FilterStats {
    fn reject(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Malformed => self.malformed += 1,
            Rejection::Inactive => self.inactive += 1,
            Rejection::NonPositive => self.non_positive += 1,
        }
    }
}

/// Keeps active-usage records with `magnitude > 0`
#[derive(Debug, Clone)]
pub struct RecordFilter {
    config: EngineConfig,
}

impl RecordFilter {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Apply the eligibility predicate to already-typed records
    pub fn filter<I>(&self, records: I) -> Vec<InteractionRecord>
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Like [`RecordFilter::filter`], also counting why records were dropped
    pub fn filter_with_stats<I>(&self, records: I) -> FilterOutcome
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        let mut outcome = FilterOutcome::default();
        for record in records {
            outcome.stats.total += 1;
            match self.classify(&record) {
                None => outcome.records.push(record),
                Some(rejection) => outcome.stats.reject(rejection),
            }
        }
        outcome.stats.kept = outcome.records.len();
        outcome
    }

    /// Parse and filter a raw batch.
    ///
    /// Fails only when a mapped column is absent from the batch header.
    pub fn extract(&self, raw: &RawRecords) -> Result<FilterOutcome> {
        let columns = self.resolve_columns(raw)?;
        let mut outcome = FilterOutcome::default();
        outcome.stats.total = raw.len();

        for row in raw.rows() {
            match self.parse_row(row, columns) {
                Ok(record) => outcome.records.push(record),
                Err(rejection) => outcome.stats.reject(rejection),
            }
        }
        outcome.stats.kept = outcome.records.len();

        debug!(
            total = outcome.stats.total,
            kept = outcome.stats.kept,
            malformed = outcome.stats.malformed,
            inactive = outcome.stats.inactive,
            non_positive = outcome.stats.non_positive,
            "Filtered raw interaction rows"
        );

        Ok(outcome)
    }

    fn resolve_columns(&self, raw: &RawRecords) -> Result<ColumnIndices> {
        let fields = &self.config.fields;
        let find = |column: &str| {
            raw.column_index(column)
                .ok_or_else(|| Error::MissingField(column.to_string()))
        };
        Ok(ColumnIndices {
            user_id: find(&fields.user_id)?,
            item_id: find(&fields.item_id)?,
            behavior: find(&fields.behavior)?,
            magnitude: find(&fields.magnitude)?,
        })
    }

    fn parse_row(
        &self,
        row: &[String],
        columns: ColumnIndices,
    ) -> std::result::Result<InteractionRecord, Rejection> {
        let cell = |index: usize| {
            row.get(index)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .ok_or(Rejection::Malformed)
        };

        let user_id = cell(columns.user_id)?;
        let item_id = cell(columns.item_id)?;
        let behavior = cell(columns.behavior)?;
        let magnitude: f64 = cell(columns.magnitude)?
            .parse()
            .map_err(|_| Rejection::Malformed)?;

        let record = InteractionRecord::new(user_id, item_id, behavior, magnitude);
        match self.classify(&record) {
            None => Ok(record),
            Some(rejection) => Err(rejection),
        }
    }

    /// Why a record is ineligible, checked in order: malformed, inactive,
    /// non-positive
    fn classify(&self, record: &InteractionRecord) -> Option<Rejection> {
        if !record.magnitude.is_finite()
            || record.user_id.trim().is_empty()
            || record.item_id.trim().is_empty()
        {
            Some(Rejection::Malformed)
        } else if record.behavior.trim() != self.config.active_behavior {
            Some(Rejection::Inactive)
        } else if record.magnitude <= 0.0 {
            Some(Rejection::NonPositive)
        } else {
            None
        }
    }
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Filter for RecordFilter {
    fn matches(&self, record: &InteractionRecord) -> bool {
        self.classify(record).is_none()
    }
}
