//! The `case` pattern matcher.
//!
//! Arrays match position by position, with `_` consuming zero or more
//! consecutive subject elements (nested arrays recurse). Strings match by
//! the same algorithm over characters, with `'\u{c}'` (the `\f` escape)
//! standing in for the wildcard. Patterns never contain two consecutive
//! wildcards; analysis rejects them.

use crate::errors::{invalid_pattern, EvalResult};
use crate::value::{structural_eq, Value};

/// Does `pattern` match `subject`?
pub(crate) fn match_value(pattern: &Value, subject: &Value) -> EvalResult<bool> {
    if pattern.is_wildcard() {
        return Ok(true);
    }
    match subject {
        Value::Array(subject_cells) => match pattern {
            Value::Array(pattern_cells) => Ok(match_array(
                &pattern_cells.borrow(),
                &subject_cells.borrow(),
            )),
            other => Err(invalid_pattern("array", other.type_name()).into()),
        },
        Value::Str(subject_str) => match pattern {
            Value::Str(pattern_str) => Ok(match_string(pattern_str, subject_str)),
            other => Err(invalid_pattern("string", other.type_name()).into()),
        },
        _ => Ok(structural_eq(pattern, subject)),
    }
}

fn match_array(pattern: &[Value], subject: &[Value]) -> bool {
    // Both exhausted: done.
    if pattern.is_empty() && subject.is_empty() {
        return true;
    }

    // Elements required after a wildcard cannot match an empty subject.
    if pattern.len() > 1 && pattern[0].is_wildcard() && subject.is_empty() {
        return false;
    }

    if !pattern.is_empty() && !subject.is_empty() {
        let heads_match = match (&pattern[0], &subject[0]) {
            (Value::Array(p), Value::Array(s)) => match_array(&p.borrow(), &s.borrow()),
            (p, s) => !p.is_wildcard() && structural_eq(p, s),
        };
        if heads_match {
            return match_array(&pattern[1..], &subject[1..]);
        }
    }

    // A wildcard either stands for nothing, or consumes one subject
    // element and stays in play.
    if !pattern.is_empty() && pattern[0].is_wildcard() {
        return match_array(&pattern[1..], subject) || match_array(pattern, &subject[1..]);
    }

    false
}

const WILDCARD_CHAR: char = '\u{c}';

fn match_string(pattern: &str, subject: &str) -> bool {
    match_chars(
        &pattern.chars().collect::<Vec<_>>(),
        &subject.chars().collect::<Vec<_>>(),
    )
}

fn match_chars(pattern: &[char], subject: &[char]) -> bool {
    if pattern.is_empty() && subject.is_empty() {
        return true;
    }
    if pattern.len() > 1 && pattern[0] == WILDCARD_CHAR && subject.is_empty() {
        return false;
    }
    if !pattern.is_empty()
        && !subject.is_empty()
        && pattern[0] != WILDCARD_CHAR
        && pattern[0] == subject[0]
    {
        return match_chars(&pattern[1..], &subject[1..]);
    }
    if !pattern.is_empty() && pattern[0] == WILDCARD_CHAR {
        return match_chars(&pattern[1..], subject) || match_chars(pattern, &subject[1..]);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().map(|&v| Value::Int(v)).collect())
    }

    #[test]
    fn test_exact_array_match() {
        assert!(match_value(&ints(&[1, 2, 3]), &ints(&[1, 2, 3])).unwrap());
        assert!(!match_value(&ints(&[1, 2]), &ints(&[1, 2, 3])).unwrap());
    }

    #[test]
    fn test_wildcard_spans_elements() {
        // [1, 2, _, 5] matches [1, 2, 3, 4, 5]
        let pattern = Value::array(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Wildcard,
            Value::Int(5),
        ]);
        assert!(match_value(&pattern, &ints(&[1, 2, 3, 4, 5])).unwrap());
        // and also [1, 2, 5] (the wildcard may span zero elements)
        assert!(match_value(&pattern, &ints(&[1, 2, 5])).unwrap());
        assert!(!match_value(&pattern, &ints(&[1, 2, 3, 4])).unwrap());
    }

    #[test]
    fn test_trailing_wildcard() {
        let pattern = Value::array(vec![Value::Int(1), Value::Wildcard]);
        assert!(match_value(&pattern, &ints(&[1, 2, 3, 4, 5])).unwrap());
        assert!(match_value(&pattern, &ints(&[1])).unwrap());
        assert!(!match_value(&pattern, &ints(&[2])).unwrap());
    }

    #[test]
    fn test_nested_array_match() {
        // [[2, _], _] vs [[2, 2], [2, 2]]
        let pattern = Value::array(vec![
            Value::array(vec![Value::Int(2), Value::Wildcard]),
            Value::Wildcard,
        ]);
        let subject = Value::array(vec![ints(&[2, 2]), ints(&[2, 2])]);
        assert!(match_value(&pattern, &subject).unwrap());
    }

    #[test]
    fn test_bare_wildcard_matches_everything() {
        assert!(match_value(&Value::Wildcard, &Value::Float(2.5)).unwrap());
        assert!(match_value(&Value::Wildcard, &ints(&[1, 2])).unwrap());
        assert!(match_value(&Value::Wildcard, &Value::Null).unwrap());
    }

    #[test]
    fn test_string_wildcard() {
        let pattern = Value::string(format!("he{}o", '\u{c}'));
        assert!(match_value(&pattern, &Value::string("hello")).unwrap());
        assert!(match_value(&pattern, &Value::string("heo")).unwrap());
        assert!(!match_value(&pattern, &Value::string("help")).unwrap());
    }

    #[test]
    fn test_primitive_match() {
        assert!(match_value(&Value::Int(2), &Value::Int(2)).unwrap());
        assert!(!match_value(&Value::Int(2), &Value::Int(3)).unwrap());
        assert!(match_value(&Value::string("a"), &Value::string("a")).unwrap());
    }

    #[test]
    fn test_pattern_kind_mismatch_faults() {
        assert!(match_value(&Value::Int(1), &ints(&[1])).is_err());
    }
}
