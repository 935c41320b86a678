//! Builds select statements.
//!
//! The sample generator always builds the same statement, only the names change with the index.
//! The random generator builds condition trees out of the labels and metrics found in a workload.
mod random;
mod sample;

pub use random::RandomGenerator;
pub use sample::{sample, sample_condition, samples};
