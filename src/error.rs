use thiserror::Error;

/// Everything that can go wrong while analysing an image or ranking catalog colors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaletteError {
    /// Undecodable, empty or zero-sized image data.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The k scan bounds make no sense (k_min < 2 or k_max < k_min).
    #[error("invalid k range [{k_min}, {k_max}]: bounds must satisfy 2 <= k_min <= k_max")]
    InvalidRange { k_min: usize, k_max: usize },
    /// The requested cluster count cannot be satisfied by the data.
    #[error("cannot build {k} clusters from {distinct} distinct colors")]
    InvalidK { k: usize, distinct: usize },
    #[error("recommendation query is empty")]
    EmptyQuery,
    #[error("failed to load color catalog: {0}")]
    CatalogLoad(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = PaletteError> = std::result::Result<T, E>;
