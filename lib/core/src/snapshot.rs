//! Immutable fitted model: encoders, interaction matrix and similarity
//! matrix built together in one pass.

use crate::config::{DuplicatePolicy, EngineConfig};
use crate::encoder::IdentifierEncoder;
use crate::filter::{FilterStats, RecordFilter};
use crate::matrix::InteractionMatrix;
use crate::record::{InteractionRecord, RawRecords};
use crate::recommender::{self, Recommendation};
use crate::similarity::SimilarityMatrix;
use crate::{Error, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// What a fit pass saw and produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitStats {
    pub filter: FilterStats,
    pub users: usize,
    pub items: usize,
    pub interactions: usize,
    pub merged_duplicates: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EngineSnapshot {
    users: IdentifierEncoder,
    items: IdentifierEncoder,
    interactions: InteractionMatrix,
    similarity: SimilarityMatrix,
    stats: FitStats,
}

impl EngineSnapshot {
    /// Filter, encode and build a snapshot from a raw batch.
    ///
    /// Fails on an invalid config or a batch missing a mapped column.
    pub fn fit(raw: &RawRecords, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let outcome = RecordFilter::new(config.clone()).extract(raw)?;
        Self::build(outcome.records, outcome.stats, config)
    }

    /// Build a snapshot from typed records; ineligible ones are dropped
    pub fn fit_records(records: Vec<InteractionRecord>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let outcome = RecordFilter::new(config.clone()).filter_with_stats(records);
        Self::build(outcome.records, outcome.stats, config)
    }

    fn build(
        records: Vec<InteractionRecord>,
        filter_stats: FilterStats,
        config: &EngineConfig,
    ) -> Result<Self> {
        let started = Instant::now();
        info!(records = records.len(), "Fitting recommender snapshot");

        let users = IdentifierEncoder::fit(records.iter().map(|r| &r.user_id));
        let items = IdentifierEncoder::fit(records.iter().map(|r| &r.item_id));

        if let Some(limit) = config.max_items {
            if items.len() > limit {
                warn!(items = items.len(), limit, "Item universe exceeds configured limit");
                return Err(Error::CapacityExceeded {
                    items: items.len(),
                    limit,
                });
            }
        }
        if items.is_empty() {
            warn!(
                total = filter_stats.total,
                "No eligible interaction records; snapshot is empty"
            );
        }

        let interactions =
            InteractionMatrix::build(&records, &users, &items, config.duplicate_policy)?;
        let similarity = SimilarityMatrix::compute(&interactions, config.parallel);

        let stats = FitStats {
            filter: filter_stats,
            users: users.len(),
            items: items.len(),
            interactions: interactions.nnz(),
            merged_duplicates: interactions.merged_duplicates(),
            duplicate_policy: config.duplicate_policy,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            users = stats.users,
            items = stats.items,
            interactions = stats.interactions,
            merged_duplicates = stats.merged_duplicates,
            elapsed_ms = stats.elapsed_ms,
            "Recommender snapshot ready"
        );

        Ok(Self {
            users,
            items,
            interactions,
            similarity,
            stats,
        })
    }

    /// Up to `top_n` items most similar to `item`, best first.
    ///
    /// An unknown item yields an empty list.
    pub fn recommend(&self, item: &str, top_n: usize) -> Vec<Recommendation> {
        recommender::recommend(&self.items, &self.similarity, item, top_n)
    }

    /// Similarity between two known items
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.items.encode(a).index()?;
        let b = self.items.encode(b).index()?;
        self.similarity.get(a, b)
    }

    /// Known items in ascending order
    pub fn list_known_items(&self) -> &[String] {
        self.items.identifiers()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn stats(&self) -> &FitStats {
        &self.stats
    }

    pub fn user_encoder(&self) -> &IdentifierEncoder {
        &self.users
    }

    pub fn item_encoder(&self) -> &IdentifierEncoder {
        &self.items
    }

    pub fn interactions(&self) -> &InteractionMatrix {
        &self.interactions
    }

    pub fn similarity_matrix(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
