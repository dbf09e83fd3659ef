use {
    std::{io, path::PathBuf},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("cannot create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected a {expected}x{expected} matrix, found {rows}x{cols}")]
    Shape {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("row {row}, column {col}: {value:?} is not a number")]
    Parse {
        row: usize,
        col: usize,
        value: String,
    },
    #[error("leading minor of order {order} is not positive definite")]
    NotPositiveDefinite { order: usize },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
