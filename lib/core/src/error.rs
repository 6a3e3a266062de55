use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Required field missing from record source: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Identifier not known to the {kind} encoder: {id}")]
    UnencodedIdentifier { kind: &'static str, id: String },

    #[error("Invalid magnitude for ({user_id}, {item_id}): {magnitude}")]
    InvalidMagnitude {
        user_id: String,
        item_id: String,
        magnitude: f64,
    },

    #[error("Item universe too large: {items} items exceeds the configured limit of {limit}")]
    CapacityExceeded { items: usize, limit: usize },
}
