use super::entities::{Catalog, Condition, Operator};

/// Check whether a condition is well-formed against the catalogs
///
/// The value check compares the runtime shape of the value with the column's
/// declared type. For `IN` only the container is checked: any list passes,
/// whatever its elements are, so `status IN [1, "x"]` is accepted on a numeric
/// column. Nullary operators skip the value check entirely.
pub fn is_valid_condition(condition: &Condition, catalog: &Catalog) -> bool {
    let Some(column) = condition
        .column
        .as_deref()
        .and_then(|name| catalog.column(name))
    else {
        return false;
    };

    let Some(operator) = condition
        .operator
        .filter(|op| catalog.operators().contains(*op))
    else {
        return false;
    };

    if operator.is_nullary() {
        return true;
    }

    match (&condition.value, operator) {
        (Some(value), Operator::In) => value.is_list(),
        (Some(value), _) => value.scalar_type() == Some(column.column_type),
        (None, _) => false,
    }
}
