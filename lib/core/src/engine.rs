use crate::config::EngineConfig;
use crate::record::{InteractionRecord, RawRecords};
use crate::recommender::Recommendation;
use crate::snapshot::EngineSnapshot;
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared handle to the current snapshot.
///
/// Queries run against an `Arc` of the snapshot that was current when they
/// started. A refit builds the replacement off to the side and swaps it in
/// whole; if the build fails the old snapshot keeps serving.
pub struct Engine {
    config: EngineConfig,
    current: RwLock<Arc<EngineSnapshot>>,
}

impl Engine {
    /// Fit the initial snapshot from a raw batch
    pub fn fit(raw: &RawRecords, config: EngineConfig) -> Result<Self> {
        let snapshot = EngineSnapshot::fit(raw, &config)?;
        Ok(Self::from_snapshot(snapshot, config))
    }

    pub fn from_snapshot(snapshot: EngineSnapshot, config: EngineConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot currently serving queries
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        self.current.read().clone()
    }

    pub fn recommend(&self, item: &str, top_n: usize) -> Vec<Recommendation> {
        self.snapshot().recommend(item, top_n)
    }

    pub fn list_known_items(&self) -> Vec<String> {
        self.snapshot().list_known_items().to_vec()
    }

    /// Replace the snapshot with one fitted from `raw`
    pub fn refit(&self, raw: &RawRecords) -> Result<Arc<EngineSnapshot>> {
        let built = EngineSnapshot::fit(raw, &self.config);
        self.install(built)
    }

    /// Replace the snapshot with one fitted from typed records
    pub fn refit_records(&self, records: Vec<InteractionRecord>) -> Result<Arc<EngineSnapshot>> {
        let built = EngineSnapshot::fit_records(records, &self.config);
        self.install(built)
    }

    fn install(&self, built: Result<EngineSnapshot>) -> Result<Arc<EngineSnapshot>> {
        match built {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.current.write() = snapshot.clone();
                info!(items = snapshot.stats().items, "Installed new snapshot");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Refit failed; keeping previous snapshot");
                Err(e)
            }
        }
    }
}
