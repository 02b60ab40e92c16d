use super::error::OperatorParseError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest integer an f64 holds exactly; bigger numbers serialize as floats.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Declared type of a filterable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filterable field supplied by the hosting application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Number)
    }
}

/// Comparison token of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    IsNull,
    IsNotNull,
    Like,
}

impl Operator {
    /// Every known operator, in default catalog order
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::In,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Like,
    ];

    /// Operators offered for string columns; ordering comparisons make no sense there
    const STRING_COMPATIBLE: [Operator; 6] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::In,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Like,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Like => "LIKE",
        }
    }

    /// `IS NULL` and `IS NOT NULL` take no value
    pub fn is_nullary(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    pub fn applies_to(&self, column_type: ColumnType) -> bool {
        match column_type {
            ColumnType::Number => true,
            ColumnType::String => Self::STRING_COMPATIBLE.contains(self),
        }
    }
}

impl FromStr for Operator {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| OperatorParseError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = OperatorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of operators the host allows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Operator>", into = "Vec<Operator>")]
pub struct OperatorCatalog(Vec<Operator>);

impl OperatorCatalog {
    /// Build a catalog, dropping repeated operators but keeping first-seen order
    pub fn new(operators: impl IntoIterator<Item = Operator>) -> Self {
        let mut unique = Vec::new();
        for op in operators {
            if !unique.contains(&op) {
                unique.push(op);
            }
        }
        Self(unique)
    }

    pub fn contains(&self, op: Operator) -> bool {
        self.0.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Catalog operators usable against a column of the given type
    pub fn allowed_for(&self, column_type: ColumnType) -> Vec<Operator> {
        self.iter().filter(|op| op.applies_to(column_type)).collect()
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self(Operator::ALL.to_vec())
    }
}

impl From<Vec<Operator>> for OperatorCatalog {
    fn from(operators: Vec<Operator>) -> Self {
        Self::new(operators)
    }
}

impl From<OperatorCatalog> for Vec<Operator> {
    fn from(catalog: OperatorCatalog) -> Self {
        catalog.0
    }
}

/// The column and operator catalogs every codec, validator and suggester call reads
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    columns: Vec<Column>,
    operators: OperatorCatalog,
}

impl Catalog {
    pub fn new(columns: Vec<Column>, operators: OperatorCatalog) -> Self {
        Self { columns, operators }
    }

    /// Catalog over `columns` with every known operator
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self::new(columns, OperatorCatalog::default())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn operators(&self) -> &OperatorCatalog {
        &self.operators
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(|col| col.column_type)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|col| col.name.as_str())
    }
}

/// Value slot of a condition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Type the validator compares against the column's declared type; lists have none
    pub fn scalar_type(&self) -> Option<ColumnType> {
        match self {
            Value::String(_) => Some(ColumnType::String),
            Value::Number(_) => Some(ColumnType::Number),
            Value::List(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::List(items) => items.serialize(serializer),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Wire shape of a condition: `[column, operator, value]`
type ConditionTuple = (Option<String>, Option<Operator>, Option<Value>);

/// One filter clause, in progress or committed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ConditionTuple", into = "ConditionTuple")]
pub struct Condition {
    pub column: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<Value>,
}

impl Condition {
    /// The `(null, null, null)` triple a freshly added row starts with
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: Option<impl Into<Value>>,
    ) -> Self {
        Self {
            column: Some(column.into()),
            operator: Some(operator),
            value: value.map(Into::into),
        }
    }

    /// Condition using a nullary operator
    pub fn nullary(column: impl Into<String>, operator: Operator) -> Self {
        Self {
            column: Some(column.into()),
            operator: Some(operator),
            value: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_none() && self.operator.is_none() && self.value.is_none()
    }
}

impl From<ConditionTuple> for Condition {
    fn from((column, operator, value): ConditionTuple) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }
}

impl From<Condition> for ConditionTuple {
    fn from(condition: Condition) -> Self {
        (condition.column, condition.operator, condition.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::codec::encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>(), Ok(op));
        }
        assert!("is null".parse::<Operator>().is_err());
        assert!("~".parse::<Operator>().is_err());
    }

    #[test]
    fn test_string_columns_restrict_operators() {
        let allowed = OperatorCatalog::default().allowed_for(ColumnType::String);
        assert_eq!(
            allowed,
            vec![
                Operator::Eq,
                Operator::NotEq,
                Operator::In,
                Operator::IsNull,
                Operator::IsNotNull,
                Operator::Like,
            ]
        );
        assert_eq!(
            OperatorCatalog::default().allowed_for(ColumnType::Number).len(),
            10
        );
    }

    #[test]
    fn test_operator_catalog_drops_duplicates() {
        let catalog = OperatorCatalog::new([Operator::In, Operator::Eq, Operator::In]);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec![Operator::In, Operator::Eq]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::from(vec!["a", "b", "c"]).to_string(), "a,b,c");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "1,2");
    }

    #[test]
    fn test_condition_wire_shape() {
        let condition = Condition::new("status", Operator::In, Some(vec![1, 2]));
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json, serde_json::json!(["status", "IN", [1, 2]]));

        let empty = serde_json::to_value(Condition::empty()).unwrap();
        assert_eq!(empty, serde_json::json!([null, null, null]));

        let parsed: Condition =
            serde_json::from_value(serde_json::json!(["message", "IS NULL", null])).unwrap();
        assert_eq!(parsed, Condition::nullary("message", Operator::IsNull));
    }

    #[test]
    fn test_fractional_numbers_serialize_as_floats() {
        let json = serde_json::to_value(Value::Number(0.5)).unwrap();
        assert_eq!(json, serde_json::json!(0.5));
    }
}
