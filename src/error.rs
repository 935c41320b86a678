use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(value: E) -> Self {
        Error(Box::new(value.into()))
    }
}

#[derive(Debug, Error)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    #[error("IO error:\n{0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error:\n{0}")]
    JsonError(#[from] serde_json::Error),
    /// A line of JSON input (workload records, select statements) did not parse.
    #[error("Invalid input on line {line}:\n{source}")]
    LineError {
        line: usize,
        source: serde_json::Error,
    },
    /// The workload has nothing to build a condition of this kind from.
    #[error("Cannot generate a {0} condition: the workload has none")]
    EmptyMetadata(&'static str),
    /// JSON has no way to write infinities or NaN, so these never make it into a statement.
    #[error("Generated a value for metric {0} that is not a finite number")]
    NonFiniteMetric(String),
    #[error("Invalid configuration:\n{0}")]
    ConfigError(#[from] InvalidConfig),
}

#[derive(Error, Debug)]
pub struct InvalidConfig(pub String);

impl Display for InvalidConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_inner(self) -> ErrorKind {
        *self.0
    }
}
