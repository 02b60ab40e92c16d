use super::entities::{Catalog, Condition, Operator};
use super::value::coerce_input;
use regex::Regex;
use std::sync::LazyLock;

/// `<column> <operator> <value...>`; the column token is restricted to identifier-ish characters
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.:-]+\s[^\s]+\s(.*)$").expect("valid condition value regex")
});

/// Render a condition in canonical string form
///
/// Non-null slots are joined with single spaces in column, operator, value
/// order. List values are comma-joined without brackets.
pub fn encode(condition: &Condition) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(column) = &condition.column {
        parts.push(column.clone());
    }
    if let Some(operator) = condition.operator {
        parts.push(operator.to_string());
    }
    if let Some(value) = &condition.value {
        parts.push(value.to_string());
    }
    parts.join(" ").trim().to_string()
}

/// Parse free text into a condition
///
/// Tokenization is greedy and left to right and never fails: fragments that
/// cannot be resolved leave their slot empty. The operator is only looked at
/// once the column resolved, and the value only once both did.
pub fn decode(text: &str, catalog: &Catalog) -> Condition {
    let mut condition = Condition::empty();

    let Some(column) = text
        .split_whitespace()
        .next()
        .and_then(|token| catalog.column(token))
    else {
        tracing::trace!(text, "decode: no column");
        return condition;
    };
    let remaining = text.replacen(&column.name, "", 1);
    let remaining = remaining.trim();

    let operator = match remaining {
        "IS NULL" => Some(Operator::IsNull),
        "IS NOT NULL" => Some(Operator::IsNotNull),
        _ => remaining
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<Operator>().ok())
            .filter(|op| catalog.operators().contains(*op)),
    };
    condition.column = Some(column.name.clone());

    let Some(operator) = operator else {
        tracing::trace!(text, "decode: column only");
        return condition;
    };
    condition.operator = Some(operator);

    if !operator.is_nullary() {
        condition.value = VALUE_RE.captures(text).map(|caps| {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            coerce_input(raw, operator, column.column_type)
        });
    }

    tracing::trace!(text, decoded = %encode(&condition), "decode: resolved");
    condition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::entities::{Column, Value};

    fn catalog() -> Catalog {
        Catalog::with_columns(vec![
            Column::number("status"),
            Column::string("message"),
            Column::string("tag"),
        ])
    }

    #[test]
    fn test_encode_skips_null_slots() {
        assert_eq!(encode(&Condition::empty()), "");
        let partial = Condition {
            column: Some("status".to_string()),
            operator: None,
            value: None,
        };
        assert_eq!(encode(&partial), "status");
        assert_eq!(
            encode(&Condition::nullary("message", Operator::IsNotNull)),
            "message IS NOT NULL"
        );
    }

    #[test]
    fn test_decode_numeric_value_is_coerced() {
        let condition = decode("status = 1", &catalog());
        assert_eq!(condition, Condition::new("status", Operator::Eq, Some(1)));
    }

    #[test]
    fn test_decode_non_numeric_value_is_left_raw() {
        let condition = decode("status = abc", &catalog());
        assert_eq!(condition.value, Some(Value::from("abc")));
    }

    #[test]
    fn test_decode_missing_value_separator() {
        let condition = decode("status =", &catalog());
        assert_eq!(condition.operator, Some(Operator::Eq));
        assert_eq!(condition.value, None);
    }

    #[test]
    fn test_decode_string_value_keeps_inner_spaces() {
        let condition = decode("message LIKE %connection reset%", &catalog());
        assert_eq!(condition.value, Some(Value::from("%connection reset%")));
    }

    #[test]
    fn test_decode_operator_outside_catalog() {
        let limited = Catalog::new(
            vec![Column::number("status")],
            vec![Operator::Eq].into(),
        );
        let condition = decode("status > 1", &limited);
        assert_eq!(condition.column.as_deref(), Some("status"));
        assert_eq!(condition.operator, None);
        assert_eq!(condition.value, None);
    }

    #[test]
    fn test_decode_is_null_with_trailing_text_is_not_nullary() {
        let condition = decode("message IS NULL x", &catalog());
        assert_eq!(condition.operator, None);
    }

    #[test]
    fn test_decode_tab_separated_tokens() {
        let condition = decode("status\t=\t1", &catalog());
        assert_eq!(condition, Condition::new("status", Operator::Eq, Some(1)));
    }
}
