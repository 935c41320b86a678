use crate::query::{Condition, Conditions, Predicate, Select, Statement};

pub const SAMPLE_KEY: &str = "Key";
pub const SAMPLE_VALUE: &str = "Value";

pub fn sample_condition() -> Conditions {
    Condition::label(SAMPLE_KEY, SAMPLE_VALUE).into()
}

/// The sample statement for `index`: `Key = Value`, named after the index.
pub fn sample(index: usize) -> Statement {
    let predicate = Predicate::new(format!("predicate {index}"), sample_condition());

    Select::new(format!("sample {index}"), predicate).into()
}

/// Samples `0..bound`, in order.
pub fn samples(bound: usize) -> impl Iterator<Item = Statement> {
    (0..bound).map(sample)
}
