//! # playrec Core
//!
//! Item-item collaborative filtering over usage logs.
//!
//! Raw interaction rows flow through a fixed pipeline:
//!
//! ```text
//! raw rows -> RecordFilter -> IdentifierEncoder (users, items)
//!          -> InteractionMatrix -> SimilarityMatrix -> recommend()
//! ```
//!
//! - [`RecordFilter`] - keeps active-usage rows with positive magnitude
//! - [`IdentifierEncoder`] - raw identifier <-> dense index
//! - [`InteractionMatrix`] - sparse users x items usage magnitudes
//! - [`SimilarityMatrix`] - dense, symmetric item x item cosine scores
//! - [`EngineSnapshot`] - the immutable fitted triple plus query methods
//! - [`Engine`] - shared handle that swaps snapshots atomically on refit
//!
//! ## Example
//!
//! ```rust
//! use playrec_core::{EngineConfig, EngineSnapshot, InteractionRecord};
//!
//! let records = vec![
//!     InteractionRecord::new("u1", "Portal", "play", 10.0),
//!     InteractionRecord::new("u1", "Portal 2", "play", 12.0),
//!     InteractionRecord::new("u2", "Portal", "play", 3.0),
//!     InteractionRecord::new("u2", "Portal 2", "play", 4.0),
//!     InteractionRecord::new("u3", "Dota 2", "play", 900.0),
//! ];
//! let snapshot = EngineSnapshot::fit_records(records, &EngineConfig::default()).unwrap();
//!
//! let recommendations = snapshot.recommend("Portal", 5);
//! assert_eq!(recommendations[0].item_id, "Portal 2");
//! assert!(snapshot.recommend("Half-Life 3", 5).is_empty());
//! ```

pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod filter;
pub mod matrix;
pub mod record;
pub mod recommender;
pub mod similarity;
pub mod snapshot;

pub use config::{DuplicatePolicy, EngineConfig, FieldMapping};
pub use encoder::{IdentifierEncoder, Lookup};
pub use engine::Engine;
pub use error::{Error, Result};
pub use filter::{Filter, FilterOutcome, FilterStats, RecordFilter};
pub use matrix::InteractionMatrix;
pub use record::{InteractionRecord, RawRecords};
pub use recommender::{Recommendation, DEFAULT_TOP_N};
pub use similarity::{cosine, SimilarityMatrix};
pub use snapshot::{EngineSnapshot, FitStats};
