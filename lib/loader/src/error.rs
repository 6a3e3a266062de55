use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("CSV source has no header row")]
    EmptyHeader,
}

impl From<csv::Error> for LoaderError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line()).unwrap_or(0);
        LoaderError::Csv {
            line,
            message: e.to_string(),
        }
    }
}
