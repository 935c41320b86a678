//! Writes select statements for a label/metric time series store, one JSON object per line.
//!
//! The simplest thing this does is print sample statements that select `Key = Value`. It can
//! also look at a workload to make random statements that match real labels and metrics, and
//! rewrite statements into disjunctive normal form.

pub mod config;
mod error;
pub mod generator;
pub mod output;
pub mod query;
pub mod workload;


pub use error::{Error, ErrorKind, InvalidConfig};
pub use query::dnf::{statement_to_dnf, to_dnf};
