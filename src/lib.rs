//! # playrec
//!
//! "Players who played this also played..." recommendations from raw usage
//! logs, using item-item collaborative filtering with cosine similarity.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! playrec recommend --data steam-200k.csv --game "Dota 2" -n 5
//! playrec serve --data steam-200k.csv --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use playrec::prelude::*;
//!
//! let raw = CsvLoader::default().load("steam-200k.csv").unwrap();
//! let snapshot = EngineSnapshot::fit(&raw, &EngineConfig::default()).unwrap();
//!
//! for rec in snapshot.recommend("Dota 2", 5) {
//!     println!("{} ({:.3})", rec.item_id, rec.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `playrec-core` - filtering, encoding, interaction matrix, similarity, ranking
//! - `playrec-loader` - CSV ingestion
//! - `playrec-api` - REST endpoints

pub use playrec_core::{
    DuplicatePolicy, Engine, EngineConfig, EngineSnapshot, Error, FieldMapping, FitStats,
    IdentifierEncoder, InteractionMatrix, InteractionRecord, Lookup, RawRecords,
    Recommendation, RecordFilter, Result, SimilarityMatrix, DEFAULT_TOP_N,
};

pub use playrec_loader::{CsvLoader, CsvOptions, LoaderError};

pub use playrec_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CsvLoader, CsvOptions, DuplicatePolicy, Engine, EngineConfig, EngineSnapshot, Error,
        InteractionRecord, RawRecords, Recommendation, RestApi, Result,
    };
}
