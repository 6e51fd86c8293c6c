//! Error types for cclaw2epub.
//!
//! The library surfaces a small typed taxonomy via `thiserror`; the binary
//! wraps it with `anyhow` context naming the pipeline stage.

use std::path::PathBuf;

/// Top-level error type for the scrape-to-book pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid command-line arguments, or a flag/TOC mismatch.
    #[error("config error: {message}")]
    Config { message: String },

    /// Fetch failure: DNS, connect, timeout, or non-success HTTP status.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    /// TOC or chapter markup does not match the expected structure.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error while staging or writing the output file.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `reqwest::Error` with the URL that was being fetched.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
