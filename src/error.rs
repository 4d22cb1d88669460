use thiserror::Error;

/// A malformed input document. Raised once, at the boundary, before any
/// layout work happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("annotation #{index} ({label:?}) has negative offset {offset}")]
    NegativeOffset {
        index: usize,
        label: String,
        offset: i64,
    },

    #[error("annotation #{index} ({label:?}) starts at {start} after it ends at {end}")]
    Inverted {
        index: usize,
        label: String,
        start: i64,
        end: i64,
    },

    #[error("annotation #{index} ({label:?}) ends at {end}, past the end of the text ({len})")]
    OutOfRange {
        index: usize,
        label: String,
        end: i64,
        len: usize,
    },
}

/// Failure of the output sink. Content never causes one of these.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to rasterize SVG: {0}")]
    Raster(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}
