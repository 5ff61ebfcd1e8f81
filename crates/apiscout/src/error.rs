use std::path::PathBuf;

use thiserror::Error;

/// Faults raised while reading route sources; any of them aborts the run.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: syn::Error },

    #[error("invalid route `{function}` in {file}: {message}")]
    InvalidRoute {
        file: String,
        function: String,
        message: String,
    },

    #[error("unsupported HTTP method `{method}` on route `{function}` in {file}")]
    UnsupportedMethod {
        file: String,
        function: String,
        method: String,
    },
}

/// Faults in a [`GeneratorConfig`](crate::GeneratorConfig) that only show once sources are read
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("extra type `{name}` is not declared under the source folder")]
    UnknownExtraType { name: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
