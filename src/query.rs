//! The select statement model.
//!
//! Everything here serializes to the JSON shape the store reads, using serde's externally
//! tagged enums:
//! ```text
//! {"Select":{"name":"sample 0","predicate":{"name":"predicate 0","condition":
//!     {"Leaf":{"lhs":{"LabelKey":"Key"},"rhs":{"LabelValue":"Value"},"op":"Eq"}}}}}
//! ```
//! Field order matters to anyone diffing output, so struct fields are declared in the order
//! they are written.
pub mod dnf;

use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io::BufRead;

/// Top level envelope, one per line of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(Select),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub name: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub name: String,
    pub condition: Conditions,
}

/// A tree of conditions. Branches always have exactly two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Conditions {
    Leaf(Condition),
    And(Box<Conditions>, Box<Conditions>),
    Or(Box<Conditions>, Box<Conditions>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub lhs: Operand,
    pub rhs: Operand,
    pub op: Comparison,
}

/// Something a condition can compare.
///
/// Label keys are compared to label values, variables to metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    LabelKey(String),
    LabelValue(String),
    Variable(String),
    Metric(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    NEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::NEq,
        Comparison::Gt,
        Comparison::Lt,
        Comparison::GtEq,
        Comparison::LtEq,
    ];
}

impl Statement {
    pub fn select(&self) -> &Select {
        match self {
            Statement::Select(select) => select,
        }
    }

    pub fn into_select(self) -> Select {
        match self {
            Statement::Select(select) => select,
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Select(value)
    }
}

impl Select {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Select {
            name: name.into(),
            predicate,
        }
    }
}

impl Predicate {
    pub fn new(name: impl Into<String>, condition: Conditions) -> Self {
        Predicate {
            name: name.into(),
            condition,
        }
    }
}

impl Condition {
    /// `key = value` on labels. Labels only support equality.
    pub fn label(key: impl Into<String>, value: impl Into<String>) -> Self {
        Condition {
            lhs: Operand::LabelKey(key.into()),
            rhs: Operand::LabelValue(value.into()),
            op: Comparison::Eq,
        }
    }

    pub fn metric(variable: impl Into<String>, op: Comparison, value: f64) -> Self {
        Condition {
            lhs: Operand::Variable(variable.into()),
            rhs: Operand::Metric(value),
            op,
        }
    }
}

impl Conditions {
    pub fn and(left: Conditions, right: Conditions) -> Self {
        Conditions::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Conditions, right: Conditions) -> Self {
        Conditions::Or(Box::new(left), Box::new(right))
    }

    pub fn is_or(&self) -> bool {
        matches!(self, Conditions::Or(_, _))
    }

    /// True if there is no Or anywhere in this subtree.
    pub fn has_no_or(&self) -> bool {
        match self {
            Conditions::Leaf(_) => true,
            Conditions::And(left, right) => left.has_no_or() && right.has_no_or(),
            Conditions::Or(_, _) => false,
        }
    }

    /// Number of branch levels above the deepest leaf; a lone leaf has height 0.
    pub fn height(&self) -> usize {
        match self {
            Conditions::Leaf(_) => 0,
            Conditions::And(left, right) | Conditions::Or(left, right) => {
                1 + left.height().max(right.height())
            }
        }
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<&Condition> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);

        leaves
    }

    fn collect_leaves<'a>(&'a self, into: &mut Vec<&'a Condition>) {
        match self {
            Conditions::Leaf(condition) => into.push(condition),
            Conditions::And(left, right) | Conditions::Or(left, right) => {
                left.collect_leaves(into);
                right.collect_leaves(into);
            }
        }
    }
}

impl From<Condition> for Conditions {
    fn from(value: Condition) -> Self {
        Conditions::Leaf(value)
    }
}

/// Reads one statement per line, skipping blank lines.
pub fn read_statements<R: BufRead>(reader: R) -> Result<Vec<Statement>, Error> {
    let mut statements = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let statement =
            serde_json::from_str::<Statement>(&line).map_err(|source| ErrorKind::LineError {
                line: index + 1,
                source,
            })?;

        statements.push(statement);
    }

    Ok(statements)
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Comparison::Eq => "=",
            Comparison::NEq => "!=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::GtEq => ">=",
            Comparison::LtEq => "<=",
        };

        write!(f, "{symbol}")
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::LabelKey(it) | Operand::LabelValue(it) | Operand::Variable(it) => {
                write!(f, "{it}")
            }
            Operand::Metric(value) => write!(f, "{value}"),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// Used in logs, e.g. `(Key = Value AND (cpu > 0.5 OR cpu < 0.1))`.
impl Display for Conditions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Conditions::Leaf(condition) => write!(f, "{condition}"),
            Conditions::And(left, right) => write!(f, "({left} AND {right})"),
            Conditions::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_label_condition() {
        let data = r#"
        {
            "lhs": {"LabelKey": "Key"},
            "rhs": {"LabelValue": "Value"},
            "op": "Eq"
        }
        "#;

        let condition: Condition = serde_json::from_str(data).unwrap();

        assert_eq!(condition, Condition::label("Key", "Value"));
    }

    #[test]
    fn deserializes_metric_leaf() {
        let data = r#"
        {
            "Leaf": {
                "lhs": {"Variable": "Var"},
                "rhs": {"Metric": 6.0},
                "op": "Gt"
            }
        }
        "#;

        let conditions: Conditions = serde_json::from_str(data).unwrap();

        assert_eq!(
            conditions,
            Conditions::Leaf(Condition::metric("Var", Comparison::Gt, 6.0))
        );
    }

    #[test]
    fn branches_serialize_as_pairs() {
        let conditions = Conditions::and(
            Condition::label("a", "1").into(),
            Condition::metric("cpu", Comparison::LtEq, 0.5).into(),
        );

        let json = serde_json::to_string(&conditions).unwrap();

        assert_eq!(
            json,
            r#"{"And":[{"Leaf":{"lhs":{"LabelKey":"a"},"rhs":{"LabelValue":"1"},"op":"Eq"}},{"Leaf":{"lhs":{"Variable":"cpu"},"rhs":{"Metric":0.5},"op":"LtEq"}}]}"#
        );
    }

    #[test]
    fn fields_keep_declaration_order() {
        let statement: Statement = Select::new(
            "s",
            Predicate::new("p", Condition::label("Key", "Value").into()),
        )
        .into();

        let json = serde_json::to_string(&statement).unwrap();

        let name = json.find("\"name\":\"s\"").unwrap();
        let predicate = json.find("\"predicate\"").unwrap();
        let lhs = json.find("\"lhs\"").unwrap();
        let op = json.find("\"op\"").unwrap();
        assert!(name < predicate);
        assert!(lhs < op);
    }

    #[test]
    fn height_counts_branch_levels() {
        let leaf: Conditions = Condition::label("a", "1").into();
        let tree = Conditions::or(Conditions::and(leaf.clone(), leaf.clone()), leaf.clone());

        assert_eq!(leaf.height(), 0);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaves().len(), 3);
    }

    #[test]
    fn has_no_or_looks_at_the_whole_tree() {
        let leaf: Conditions = Condition::label("a", "1").into();
        let nested_or = Conditions::and(leaf.clone(), Conditions::or(leaf.clone(), leaf.clone()));

        assert!(Conditions::and(leaf.clone(), leaf.clone()).has_no_or());
        assert!(!nested_or.has_no_or());
        assert!(!nested_or.is_or());
    }

    #[test]
    fn displays_conditions() {
        let tree = Conditions::and(
            Condition::label("Key", "Value").into(),
            Condition::metric("cpu", Comparison::Gt, 0.5).into(),
        );

        assert_eq!(tree.to_string(), "(Key = Value AND cpu > 0.5)");
    }

    #[test]
    fn reads_statements_line_by_line() {
        let input = concat!(
            r#"{"Select":{"name":"a","predicate":{"name":"b","condition":{"Leaf":{"lhs":{"LabelKey":"Key"},"rhs":{"LabelValue":"Value"},"op":"Eq"}}}}}"#,
            "\n\n",
            r#"{"Select":{"name":"c","predicate":{"name":"d","condition":{"Leaf":{"lhs":{"Variable":"x"},"rhs":{"Metric":1.5},"op":"Lt"}}}}}"#,
            "\n",
        );

        let statements = read_statements(input.as_bytes()).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].select().name, "c");
    }

    #[test]
    fn bad_statement_reports_line() {
        let input = "\n{\"Select\": 3}\n";

        let error = read_statements(input.as_bytes()).unwrap_err();

        match error.into_inner() {
            ErrorKind::LineError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
