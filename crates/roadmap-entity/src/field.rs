//! Per-field extraction result
//!
//! Raw records are loosely typed. Every modelled field is read into a
//! [`ParsedField`] and resolved explicitly by the parser instead of being
//! silently coerced.

use serde_yaml::Value;

/// Outcome of reading one field from a raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedField<T> {
    /// Field present with a usable value
    Present(T),
    /// Field missing or null
    Absent,
    /// Field present but of an unusable shape
    Malformed(String),
}

impl<T> ParsedField<T> {
    /// The value, if present
    #[inline]
    pub fn present(self) -> Option<T> {
        match self {
            ParsedField::Present(value) => Some(value),
            ParsedField::Absent | ParsedField::Malformed(_) => None,
        }
    }

    /// Whether the field was present but unusable
    #[inline]
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParsedField::Malformed(_))
    }

    /// Map the present value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParsedField<U> {
        match self {
            ParsedField::Present(value) => ParsedField::Present(f(value)),
            ParsedField::Absent => ParsedField::Absent,
            ParsedField::Malformed(reason) => ParsedField::Malformed(reason),
        }
    }
}

/// Read a scalar field as a string
///
/// Strings, numbers and booleans are accepted; blank strings count as absent.
#[must_use]
pub fn scalar(value: Option<&Value>) -> ParsedField<String> {
    match value {
        None | Some(Value::Null) => ParsedField::Absent,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                ParsedField::Absent
            } else {
                ParsedField::Present(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => ParsedField::Present(n.to_string()),
        Some(Value::Bool(b)) => ParsedField::Present(b.to_string()),
        Some(Value::Tagged(tagged)) => scalar(Some(&tagged.value)),
        Some(seq @ Value::Sequence(_)) => match unquoted_wikilink(seq) {
            Some(inner) => scalar(Some(inner)),
            None => ParsedField::Malformed("expected a scalar, found a list".into()),
        },
        Some(Value::Mapping(_)) => {
            ParsedField::Malformed("expected a scalar, found a mapping".into())
        }
    }
}

/// An unquoted `[[target]]` arrives as a one-item list inside a one-item list
fn unquoted_wikilink(value: &Value) -> Option<&Value> {
    let Value::Sequence(outer) = value else {
        return None;
    };
    let [Value::Sequence(inner)] = outer.as_slice() else {
        return None;
    };
    match inner.as_slice() {
        [only @ (Value::String(_) | Value::Number(_))] => Some(only),
        _ => None,
    }
}

/// Read a list field
///
/// Accepts block lists and inline `[a, b]` lists (both arrive as YAML
/// sequences) as well as a lone scalar, which is treated as a one-item list.
#[must_use]
pub fn list(value: Option<&Value>) -> ParsedField<Vec<String>> {
    match value {
        None | Some(Value::Null) => ParsedField::Absent,
        Some(seq @ Value::Sequence(items)) => {
            if let Some(inner) = unquoted_wikilink(seq) {
                return scalar(Some(inner)).map(|s| vec![s]);
            }
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let item = unquoted_wikilink(item).unwrap_or(item);
                match scalar(Some(item)) {
                    ParsedField::Present(s) => out.push(s),
                    ParsedField::Absent => {}
                    ParsedField::Malformed(_) => {
                        return ParsedField::Malformed("list contains a nested value".into())
                    }
                }
            }
            ParsedField::Present(out)
        }
        Some(Value::Mapping(_)) => ParsedField::Malformed("expected a list, found a mapping".into()),
        Some(other) => scalar(Some(other)).map(|s| vec![s]),
    }
}

/// Read a boolean flag
///
/// Accepts YAML booleans and the strings `true`, `false`, `yes`, `no`.
#[must_use]
pub fn flag(value: Option<&Value>) -> ParsedField<bool> {
    match value {
        None | Some(Value::Null) => ParsedField::Absent,
        Some(Value::Bool(b)) => ParsedField::Present(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => ParsedField::Present(true),
            "false" | "no" => ParsedField::Present(false),
            "" => ParsedField::Absent,
            other => ParsedField::Malformed(format!("'{other}' is not a boolean")),
        },
        Some(_) => ParsedField::Malformed("expected a boolean".into()),
    }
}
