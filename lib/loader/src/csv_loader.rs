use crate::error::{LoaderError, Result};
use playrec_core::RawRecords;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Column names of the header-less Steam interaction log
pub const STEAM_COLUMNS: [&str; 5] = ["user_id", "game", "behavior", "value", "other"];

#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// First row holds column names
    pub has_headers: bool,
    /// Names to use when there is no header row; defaults to [`STEAM_COLUMNS`]
    pub column_names: Option<Vec<String>>,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            column_names: None,
            delimiter: b',',
        }
    }
}

impl CsvOptions {
    pub fn with_headers() -> Self {
        Self {
            has_headers: true,
            ..Default::default()
        }
    }
}

/// CSV reader producing raw record batches.
///
/// Rows of differing length are accepted as-is; whether a short row is usable
/// is decided by the record filter.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    options: CsvOptions,
}

impl CsvLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RawRecords> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw = self.read_from(file)?;
        info!(path = %path.display(), rows = raw.len(), "Loaded interaction log");
        Ok(raw)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<RawRecords> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.options.has_headers)
            .delimiter(self.options.delimiter)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = if self.options.has_headers {
            let headers = reader.headers()?;
            if headers.is_empty() {
                return Err(LoaderError::EmptyHeader);
            }
            headers.iter().map(|h| h.trim().to_string()).collect()
        } else {
            match &self.options.column_names {
                Some(names) => names.clone(),
                None => STEAM_COLUMNS.iter().map(|c| c.to_string()).collect(),
            }
        };

        let mut raw = RawRecords::new(columns);
        for record in reader.records() {
            let record = record?;
            raw.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(raw)
    }
}
