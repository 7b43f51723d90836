//! Cell values and group-by keys
//!
//! Column types are inferred cell-by-cell at load time: a field that parses
//! as a float becomes [`Value::Number`], an empty field becomes
//! [`Value::Missing`], anything else stays [`Value::Text`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::sheet::Cell;

/// A single cell of the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Infer a value from a raw CSV field.
    pub fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Numeric coercion: numbers pass through, text is re-parsed, everything
    /// else (including NaN) is `None`. Mirrors a "coerce errors to missing"
    /// numeric conversion.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Missing => return None,
        };
        if n.is_nan() { None } else { Some(n) }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Convert to an output-sheet cell.
    pub fn to_cell(&self) -> Cell {
        match self {
            Value::Number(n) if n.is_nan() => Cell::Empty,
            Value::Number(n) => Cell::Number(*n),
            Value::Text(s) => Cell::Text(s.clone()),
            Value::Missing => Cell::Empty,
        }
    }
}

/// A grouping key with a total order, usable in ordered maps.
///
/// Numeric keys sort numerically (via `total_cmp`), text keys sort lexically,
/// and all numeric keys sort before all text keys. Missing values never form
/// a key; rows with a missing grouping value are excluded from group-bys.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Number(f64),
    Text(String),
}

impl GroupKey {
    pub fn from_value(value: &Value) -> Option<GroupKey> {
        match value {
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(GroupKey::Number(*n)),
            Value::Text(s) => Some(GroupKey::Text(s.clone())),
            Value::Missing => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            GroupKey::Number(n) => Some(*n),
            GroupKey::Text(_) => None,
        }
    }

    pub fn to_cell(&self) -> Cell {
        match self {
            GroupKey::Number(n) => Cell::Number(*n),
            GroupKey::Text(s) => Cell::Text(s.clone()),
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            GroupKey::Number(n) => n.to_bits().hash(state),
            GroupKey::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(n) => write!(f, "{n}"),
            GroupKey::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(Value::parse("3.5"), Value::Number(3.5));
        assert_eq!(Value::parse("  -2 "), Value::Number(-2.0));
        assert_eq!(Value::parse("true"), Value::Text("true".to_string()));
        assert_eq!(Value::parse(""), Value::Missing);
        assert_eq!(Value::parse("   "), Value::Missing);
    }

    #[test]
    fn test_as_number_coerces_text() {
        assert_eq!(Value::Text("7".to_string()).as_number(), Some(7.0));
        assert_eq!(Value::Text("seven".to_string()).as_number(), None);
        assert_eq!(Value::Missing.as_number(), None);
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_group_key_ordering() {
        let mut keys = vec![
            GroupKey::Text("b".to_string()),
            GroupKey::Number(10.0),
            GroupKey::Number(2.0),
            GroupKey::Text("a".to_string()),
        ];
        keys.sort();
        assert_eq!(keys[0], GroupKey::Number(2.0));
        assert_eq!(keys[1], GroupKey::Number(10.0));
        assert_eq!(keys[2], GroupKey::Text("a".to_string()));
        assert_eq!(keys[3], GroupKey::Text("b".to_string()));
    }

    #[test]
    fn test_group_key_excludes_missing() {
        assert!(GroupKey::from_value(&Value::Missing).is_none());
        assert!(GroupKey::from_value(&Value::Number(f64::NAN)).is_none());
        assert!(GroupKey::from_value(&Value::Number(1.0)).is_some());
    }

    #[test]
    fn test_group_key_display_formats_integers_plainly() {
        assert_eq!(GroupKey::Number(5.0).to_string(), "5");
        assert_eq!(GroupKey::Number(0.25).to_string(), "0.25");
    }
}
