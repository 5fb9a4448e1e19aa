use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("shape source contains no rows")]
    EmptyShape,

    #[error("ragged shape mask: row {row} has {found} cells, expected {expected}")]
    RaggedMask {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
