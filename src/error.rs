use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading inputs or rendering outputs.
#[derive(Debug, Error)]
pub enum CvError {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be parsed or written
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A BibTeX file is malformed
    #[error("BibTeX error in {} (line {line}): {message}", path.display())]
    Bib {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A date field could not be understood
    #[error("cannot parse date '{value}'")]
    Date { value: String },

    /// A numeric field could not be understood
    #[error("cannot parse number '{value}'")]
    Number { value: String },

    /// A field holds a value with no known mapping
    #[error("unknown {field}: '{value}'")]
    UnknownValue { field: String, value: String },

    /// An HTTP request could not be built or sent
    #[error("HTTP error on {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl CvError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CvError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        CvError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn unknown(field: impl Into<String>, value: impl Into<String>) -> Self {
        CvError::UnknownValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CvError>;
