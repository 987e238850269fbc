//! Typed filter predicates over block-table columns.

use std::cmp::Ordering;
use std::fmt;

/// One of the two versions covered by a block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The other side of the pair.
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Per-version field of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Chr,
    Start,
    End,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Chr, Field::Start, Field::End];

    /// Suffix used in block-table column names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Chr => "chr",
            Field::Start => "start",
            Field::End => "end",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column of the block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Version(Side, Field),
    Strand,
}

/// A borrowed cell value read from a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Int(i64),
    Text(&'a str),
}

impl Cell<'_> {
    /// Compare against a predicate operand. `None` when the types differ.
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (self, value) {
            (Cell::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Cell::Text(a), Value::Text(b)) => Some((*a).cmp(b.as_str())),
            _ => None,
        }
    }

    /// Total order used for sorting: integers before text.
    pub fn sort_cmp(&self, other: &Cell<'_>) -> Ordering {
        match (self, other) {
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Int(_), Cell::Text(_)) => Ordering::Less,
            (Cell::Text(_), Cell::Int(_)) => Ordering::Greater,
        }
    }
}

/// An owned predicate operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Comparison applied to a single cell.
///
/// Ordered comparisons between an integer column and a text operand (or the
/// reverse) never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Ne(Value),
    /// Text cell contains the substring.
    Contains(String),
    /// Text cell does not contain the substring.
    NotContains(String),
    /// Cell equals any of the values.
    In(Vec<Value>),
    /// Matches every row.
    Any,
}

impl Predicate {
    /// Evaluate the predicate against a cell.
    pub fn matches(&self, cell: Cell<'_>) -> bool {
        match self {
            Predicate::Eq(v) => cell.compare(v) == Some(Ordering::Equal),
            Predicate::Ne(v) => cell.compare(v) != Some(Ordering::Equal),
            Predicate::Gt(v) => cell.compare(v) == Some(Ordering::Greater),
            Predicate::Gte(v) => matches!(
                cell.compare(v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Predicate::Lt(v) => cell.compare(v) == Some(Ordering::Less),
            Predicate::Lte(v) => {
                matches!(cell.compare(v), Some(Ordering::Less | Ordering::Equal))
            }
            Predicate::Contains(needle) => match cell {
                Cell::Text(s) => s.contains(needle.as_str()),
                Cell::Int(_) => false,
            },
            Predicate::NotContains(needle) => match cell {
                Cell::Text(s) => !s.contains(needle.as_str()),
                Cell::Int(_) => false,
            },
            Predicate::In(values) => values
                .iter()
                .any(|v| cell.compare(v) == Some(Ordering::Equal)),
            Predicate::Any => true,
        }
    }
}

/// A predicate bound to a column. Several filters combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: Column,
    pub predicate: Predicate,
}

impl Filter {
    pub fn new(column: Column, predicate: Predicate) -> Self {
        Filter { column, predicate }
    }
}

/// Optional ordering applied to filter results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub ascending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparisons() {
        let cell = Cell::Int(100);
        assert!(Predicate::Eq(100i64.into()).matches(cell));
        assert!(Predicate::Gte(100i64.into()).matches(cell));
        assert!(Predicate::Lte(100i64.into()).matches(cell));
        assert!(Predicate::Gt(99i64.into()).matches(cell));
        assert!(!Predicate::Gt(100i64.into()).matches(cell));
        assert!(Predicate::Lt(101i64.into()).matches(cell));
        assert!(!Predicate::Lt(100i64.into()).matches(cell));
        assert!(Predicate::Ne(5i64.into()).matches(cell));
        assert!(!Predicate::Ne(100i64.into()).matches(cell));
    }

    #[test]
    fn test_text_predicates() {
        let cell = Cell::Text("2L");
        assert!(Predicate::Eq("2L".into()).matches(cell));
        assert!(!Predicate::Eq("2R".into()).matches(cell));
        assert!(Predicate::Contains("L".to_string()).matches(cell));
        assert!(!Predicate::NotContains("L".to_string()).matches(cell));
        assert!(Predicate::NotContains("R".to_string()).matches(cell));
        assert!(Predicate::In(vec!["2R".into(), "2L".into()]).matches(cell));
        assert!(!Predicate::In(vec!["3L".into()]).matches(cell));
        assert!(Predicate::Any.matches(cell));
    }

    #[test]
    fn test_mismatched_types_do_not_match() {
        assert!(!Predicate::Eq("100".into()).matches(Cell::Int(100)));
        assert!(!Predicate::Gte(1i64.into()).matches(Cell::Text("2L")));
        assert!(!Predicate::Contains("1".to_string()).matches(Cell::Int(100)));
        assert!(Predicate::Ne("100".into()).matches(Cell::Int(100)));
    }

    #[test]
    fn test_sort_cmp() {
        assert_eq!(Cell::Int(1).sort_cmp(&Cell::Int(2)), Ordering::Less);
        assert_eq!(Cell::Text("2R").sort_cmp(&Cell::Text("2L")), Ordering::Greater);
        assert_eq!(Cell::Int(9).sort_cmp(&Cell::Text("a")), Ordering::Less);
    }
}
