use crate::matrix::Dim2;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the matrix of shape {0} is not a non-empty square 2D matrix")]
    InvalidShape(Dim2),
    #[error("no pair of width {width} with condition number below {threshold:e} after {attempts} attempts")]
    AttemptsExhausted {
        width: usize,
        attempts: usize,
        threshold: f64,
    },
    #[error("invalid sampling range [{low}, {high})")]
    InvalidRange { low: f64, high: f64 },
    #[error("error accessing {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input: read {read} of {expected} values")]
    UnexpectedEof { read: usize, expected: usize },
    #[error("{token:?} is not a number: {source}")]
    ParseFloat {
        token: String,
        #[source]
        source: ParseFloatError,
    },
    #[cfg(feature = "serde")]
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }
}
