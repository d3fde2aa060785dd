//! Query predicates
//!
//! Each variant names the index it runs against:
//! - `Equals` / `Range` / `TailFrom` target a secondary index by attribute
//! - `Compound` targets a compound index by name

use std::fmt;

use crate::index::{IndexKey, KeyBound};

/// A single-index query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `attribute = value`
    Equals { attribute: String, value: IndexKey },
    /// `lower <op> attribute <op> upper`
    Range {
        attribute: String,
        lower: KeyBound,
        upper: KeyBound,
    },
    /// `attribute >= lower` (or `>`)
    TailFrom { attribute: String, lower: KeyBound },
    /// `first = value AND second >= lower` over a compound index
    Compound {
        index: String,
        first: IndexKey,
        second_lower: KeyBound,
    },
}

impl Query {
    pub fn equals(attribute: impl Into<String>, value: impl Into<IndexKey>) -> Self {
        Query::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Range with per-bound inclusivity: `between("year", 2000, true, 3000, false)` is `[2000, 3000)`.
    pub fn between(
        attribute: impl Into<String>,
        lower: impl Into<IndexKey>,
        lower_inclusive: bool,
        upper: impl Into<IndexKey>,
        upper_inclusive: bool,
    ) -> Self {
        Query::Range {
            attribute: attribute.into(),
            lower: KeyBound {
                key: lower.into(),
                inclusive: lower_inclusive,
            },
            upper: KeyBound {
                key: upper.into(),
                inclusive: upper_inclusive,
            },
        }
    }

    pub fn tail_from(attribute: impl Into<String>, lower: impl Into<IndexKey>, inclusive: bool) -> Self {
        Query::TailFrom {
            attribute: attribute.into(),
            lower: KeyBound {
                key: lower.into(),
                inclusive,
            },
        }
    }

    pub fn compound(
        index: impl Into<String>,
        first: impl Into<IndexKey>,
        second_lower: impl Into<IndexKey>,
        inclusive: bool,
    ) -> Self {
        Query::Compound {
            index: index.into(),
            first: first.into(),
            second_lower: KeyBound {
                key: second_lower.into(),
                inclusive,
            },
        }
    }

    /// Attribute or compound index name this query runs against
    pub fn target(&self) -> &str {
        match self {
            Query::Equals { attribute, .. }
            | Query::Range { attribute, .. }
            | Query::TailFrom { attribute, .. } => attribute,
            Query::Compound { index, .. } => index,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Query::Equals { .. } => "equals",
            Query::Range { .. } => "range",
            Query::TailFrom { .. } => "tail",
            Query::Compound { .. } => "compound",
        }
    }
}

fn lower_op(bound: &KeyBound) -> &'static str {
    if bound.inclusive {
        "<="
    } else {
        "<"
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Equals { attribute, value } => write!(f, "{} = {}", attribute, value),
            Query::Range { attribute, lower, upper } => write!(
                f,
                "{} {} {} {} {}",
                lower.key,
                lower_op(lower),
                attribute,
                lower_op(upper),
                upper.key
            ),
            Query::TailFrom { attribute, lower } => {
                write!(f, "{} {} {}", lower.key, lower_op(lower), attribute)
            }
            Query::Compound {
                index,
                first,
                second_lower,
            } => write!(
                f,
                "{}: first = {} AND {} {} second",
                index,
                first,
                second_lower.key,
                lower_op(second_lower)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let q = Query::between("year", 2000, true, 3000, false);
        match &q {
            Query::Range { lower, upper, .. } => {
                assert_eq!(lower, &KeyBound::included(2000));
                assert_eq!(upper, &KeyBound::excluded(3000));
            }
            other => panic!("unexpected query {:?}", other),
        }
        assert_eq!(q.target(), "year");
        assert_eq!(q.kind(), "range");
    }

    #[test]
    fn test_display() {
        assert_eq!(Query::equals("year", 2001).to_string(), "year = 2001");
        assert_eq!(
            Query::between("year", 2000, true, 3000, false).to_string(),
            "2000 <= year < 3000"
        );
        assert_eq!(Query::tail_from("price", 100.0, false).to_string(), "100 < price");
        assert_eq!(
            Query::compound("year_price", 2000, 100.0, true).to_string(),
            "year_price: first = 2000 AND 100 <= second"
        );
    }

    #[test]
    fn test_compound_target() {
        let q = Query::compound("year_price", 2000, 100.0, true);
        assert_eq!(q.target(), "year_price");
        assert_eq!(q.kind(), "compound");
    }
}
