//! Rewrites condition trees into disjunctive normal form: an Or of Ands of leaves.
//!
//! Ands are pushed below Ors by distribution:
//! ```text
//! (a OR b) AND r  ->  (a AND r) OR (b AND r)
//! ```
use crate::query::{Conditions, Predicate, Select, Statement};
use log::debug;

pub fn to_dnf(select: Select) -> Select {
    let Select { name, predicate } = select;
    let Predicate { name: predicate_name, condition } = predicate;

    debug!("Normalizing {name}: {condition}");
    let condition = normalize(condition);
    debug!("Normalized {name}: {condition}");

    Select {
        name,
        predicate: Predicate {
            name: predicate_name,
            condition,
        },
    }
}

pub fn statement_to_dnf(statement: Statement) -> Statement {
    match statement {
        Statement::Select(select) => Statement::Select(to_dnf(select)),
    }
}

impl Conditions {
    /// No And in the tree has an Or below it.
    pub fn is_dnf(&self) -> bool {
        match self {
            Conditions::Leaf(_) => true,
            Conditions::Or(left, right) => left.is_dnf() && right.is_dnf(),
            Conditions::And(_, _) => self.has_no_or(),
        }
    }
}

fn normalize(conditions: Conditions) -> Conditions {
    if conditions.has_no_or() {
        return conditions;
    }

    match conditions {
        leaf @ Conditions::Leaf(_) => leaf,
        Conditions::Or(left, right) => Conditions::or(normalize(*left), normalize(*right)),
        Conditions::And(left, right) => distribute(normalize(*left), normalize(*right)),
    }
}

/// Builds `left AND right` out of two trees that are already normalized.
fn distribute(left: Conditions, right: Conditions) -> Conditions {
    match (left, right) {
        (Conditions::Or(first, second), other) | (other, Conditions::Or(first, second)) => {
            Conditions::or(
                distribute(*first, other.clone()),
                distribute(*second, other),
            )
        }
        (left, right) => Conditions::and(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Condition, Operand};

    fn leaf(name: &str) -> Conditions {
        Condition::label(name, "on").into()
    }

    /// Evaluates a tree where each leaf is true when its key is in `truthy`.
    fn eval(conditions: &Conditions, truthy: &[&str]) -> bool {
        match conditions {
            Conditions::Leaf(condition) => match &condition.lhs {
                Operand::LabelKey(key) => truthy.contains(&key.as_str()),
                _ => panic!("tests only use label leaves"),
            },
            Conditions::And(left, right) => eval(left, truthy) && eval(right, truthy),
            Conditions::Or(left, right) => eval(left, truthy) || eval(right, truthy),
        }
    }

    fn assert_equivalent(before: &Conditions, after: &Conditions, names: &[&str]) {
        for mask in 0..(1u32 << names.len()) {
            let truthy: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, name)| *name)
                .collect();

            assert_eq!(
                eval(before, &truthy),
                eval(after, &truthy),
                "differs for {truthy:?}: {before} vs {after}"
            );
        }
    }

    fn select(condition: Conditions) -> Select {
        Select::new("s", Predicate::new("p", condition))
    }

    #[test]
    fn leaves_and_plain_ands_are_untouched() {
        let tree = Conditions::and(leaf("a"), Conditions::and(leaf("b"), leaf("c")));

        let result = to_dnf(select(tree.clone()));

        assert_eq!(result.predicate.condition, tree);
        assert_eq!(to_dnf(select(leaf("a"))).predicate.condition, leaf("a"));
    }

    #[test]
    fn distributes_left_or() {
        let tree = Conditions::and(Conditions::or(leaf("a"), leaf("b")), leaf("c"));

        let result = to_dnf(select(tree)).predicate.condition;

        assert_eq!(
            result,
            Conditions::or(
                Conditions::and(leaf("a"), leaf("c")),
                Conditions::and(leaf("b"), leaf("c")),
            )
        );
    }

    #[test]
    fn distributes_right_or() {
        let tree = Conditions::and(leaf("c"), Conditions::or(leaf("a"), leaf("b")));

        let result = to_dnf(select(tree)).predicate.condition;

        assert_eq!(
            result,
            Conditions::or(
                Conditions::and(leaf("a"), leaf("c")),
                Conditions::and(leaf("b"), leaf("c")),
            )
        );
    }

    #[test]
    fn handles_ors_on_both_sides() {
        let tree = Conditions::and(
            Conditions::or(leaf("a"), leaf("b")),
            Conditions::or(leaf("c"), leaf("d")),
        );

        let result = to_dnf(select(tree.clone())).predicate.condition;

        assert_eq!(
            result,
            Conditions::or(
                Conditions::or(
                    Conditions::and(leaf("c"), leaf("a")),
                    Conditions::and(leaf("d"), leaf("a")),
                ),
                Conditions::or(
                    Conditions::and(leaf("c"), leaf("b")),
                    Conditions::and(leaf("d"), leaf("b")),
                ),
            )
        );
        assert_equivalent(&tree, &result, &["a", "b", "c", "d"]);
    }

    #[test]
    fn handles_deeply_nested_ors() {
        let tree = Conditions::and(
            Conditions::and(leaf("a"), Conditions::or(leaf("b"), leaf("c"))),
            Conditions::or(
                leaf("d"),
                Conditions::and(leaf("e"), Conditions::or(leaf("a"), leaf("c"))),
            ),
        );

        let result = to_dnf(select(tree.clone())).predicate.condition;

        assert!(!tree.is_dnf());
        assert!(result.is_dnf());
        assert_equivalent(&tree, &result, &["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn keeps_names() {
        let result = statement_to_dnf(
            Select::new(
                "query",
                Predicate::new("filter", Conditions::and(leaf("a"), leaf("b"))),
            )
            .into(),
        );

        let select = result.into_select();
        assert_eq!(select.name, "query");
        assert_eq!(select.predicate.name, "filter");
    }
}
