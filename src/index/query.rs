use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean predicate tree over term-equality predicates.
///
/// `And` of no children matches every document, `Or` of no children matches
/// none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterNode {
    Term(Box<str>),
    Not(Box<FilterNode>),
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
}

impl FilterNode {
    /// Terms referenced anywhere in the tree, in visiting order
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterNode::Term(t) => out.push(t),
            FilterNode::Not(inner) => inner.collect_terms(out),
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().for_each(|c| c.collect_terms(out))
            }
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[FilterNode], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, ")")
        }
        match self {
            FilterNode::Term(t) => write!(f, "{}", t),
            FilterNode::Not(inner) => write!(f, "NOT {}", inner),
            FilterNode::And(children) => join(f, children, "AND"),
            FilterNode::Or(children) => join(f, children, "OR"),
        }
    }
}

/// Shorthand constructors
pub mod q {
    use super::FilterNode;

    pub fn term(term: &str) -> FilterNode {
        FilterNode::Term(Box::from(term))
    }

    pub fn not(order: FilterNode) -> FilterNode {
        FilterNode::Not(Box::new(order))
    }

    pub fn and<I: IntoIterator<Item = FilterNode>>(children: I) -> FilterNode {
        FilterNode::And(children.into_iter().collect())
    }

    pub fn or<I: IntoIterator<Item = FilterNode>>(children: I) -> FilterNode {
        FilterNode::Or(children.into_iter().collect())
    }
}
