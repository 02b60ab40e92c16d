//! Value coercion and reshaping
//!
//! Both the row editor and the list controller funnel user-typed values through
//! these helpers so a row's value always has the shape its operator expects:
//! nothing for `IS NULL`/`IS NOT NULL`, a list for `IN`, a scalar otherwise.

use super::entities::{ColumnType, Operator, Value};

/// Parse a number the way a numeric column expects it; non-finite values are rejected
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a single typed value by the column type
///
/// Numeric columns get a number when the text parses as one. Anything else is
/// kept as the raw string so the validator can flag it instead of the editor
/// losing what was typed.
pub fn coerce_scalar(raw: &str, column_type: Option<ColumnType>) -> Value {
    match column_type {
        Some(ColumnType::Number) => match parse_number(raw) {
            Some(n) => Value::Number(n),
            None => Value::String(raw.to_string()),
        },
        _ => Value::String(raw.to_string()),
    }
}

/// Split a comma separated string into list elements, coercing each one
pub fn split_list(raw: &str, column_type: Option<ColumnType>) -> Value {
    if raw.is_empty() {
        return Value::List(Vec::new());
    }
    Value::List(
        raw.split(',')
            .map(|item| coerce_scalar(item, column_type))
            .collect(),
    )
}

/// Coerce raw input for the given operator: `IN` takes a comma list, everything else a scalar
pub fn coerce_input(raw: &str, operator: Operator, column_type: ColumnType) -> Value {
    if operator == Operator::In {
        split_list(raw, Some(column_type))
    } else {
        coerce_scalar(raw, Some(column_type))
    }
}

/// Reshape an existing value after the operator slot changed
///
/// - nullary operators drop the value
/// - `IN` wraps a scalar into a list (strings are split on `,`); a missing value becomes `[]`
/// - leaving `IN` joins the list back with `,` and re-coerces it by the column type;
///   an empty list becomes no value
pub fn reshape_for_operator(
    value: Option<Value>,
    operator: Option<Operator>,
    column_type: Option<ColumnType>,
) -> Option<Value> {
    let Some(operator) = operator else {
        return value;
    };

    if operator.is_nullary() {
        return None;
    }

    if operator == Operator::In {
        return Some(match value {
            None => Value::List(Vec::new()),
            Some(Value::String(s)) => split_list(&s, column_type),
            Some(Value::Number(n)) => Value::List(vec![Value::Number(n)]),
            Some(list @ Value::List(_)) => list,
        });
    }

    match value {
        Some(Value::List(items)) if items.is_empty() => None,
        Some(list @ Value::List(_)) => Some(coerce_scalar(&list.to_string(), column_type)),
        scalar => scalar,
    }
}
