//! # playrec Loader
//!
//! Reads interaction logs from CSV into [`RawRecords`] for the core.
//!
//! The default layout is the header-less five-column Steam log:
//! `user_id, game, behavior, value, other`.
//!
//! ```rust
//! use playrec_loader::{CsvLoader, CsvOptions};
//!
//! let data = "151603712,\"The Elder Scrolls V Skyrim\",purchase,1.0,0\n\
//!             151603712,\"The Elder Scrolls V Skyrim\",play,273.0,0\n";
//! let raw = CsvLoader::new(CsvOptions::default()).read_from(data.as_bytes()).unwrap();
//! assert_eq!(raw.len(), 2);
//! assert_eq!(raw.columns()[1], "game");
//! ```

mod csv_loader;
mod error;

pub use csv_loader::{CsvLoader, CsvOptions, STEAM_COLUMNS};
pub use error::{LoaderError, Result};

pub use playrec_core::RawRecords;
