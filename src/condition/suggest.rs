use super::codec::decode;
use super::entities::{Catalog, Operator};
use super::validator::is_valid_condition;
use serde::Serialize;

/// Column and operator already picked from earlier suggestions in the row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub column: Option<String>,
    pub operator: Option<Operator>,
}

impl Selection {
    pub fn new(column: Option<String>, operator: Option<Operator>) -> Self {
        Self { column, operator }
    }
}

/// Which slot accepting a suggestion fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "lowercase")]
pub enum SuggestionKind {
    Column { column: String },
    Operator { column: String, operator: Operator },
}

/// One autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Text shown to the user and matched against the typed buffer
    pub label: String,
    #[serde(flatten)]
    pub kind: SuggestionKind,
}

impl Suggestion {
    fn column(name: &str) -> Self {
        Self {
            label: format!("{}...", name),
            kind: SuggestionKind::Column {
                column: name.to_string(),
            },
        }
    }

    fn operator(column: &str, operator: Operator) -> Self {
        Self {
            label: format!("{} {}", column, operator),
            kind: SuggestionKind::Operator {
                column: column.to_string(),
                operator,
            },
        }
    }
}

/// Suggestions to offer for the text typed so far
///
/// A buffer that already decodes to a valid condition gets nothing: further
/// typing is value entry. Otherwise columns are offered until one is known,
/// then the operators that fit its type. Once both are known the value has to
/// be typed by hand. The result only keeps entries whose label contains `text`.
pub fn suggest(text: &str, selection: &Selection, catalog: &Catalog) -> Vec<Suggestion> {
    let decoded = decode(text, catalog);
    if is_valid_condition(&decoded, catalog) {
        return Vec::new();
    }

    let column = decoded.column.or_else(|| selection.column.clone());
    let has_operator = decoded.operator.is_some() || selection.operator.is_some();

    let options: Vec<Suggestion> = match column {
        None => catalog.column_names().map(Suggestion::column).collect(),
        Some(column) if !has_operator => operators_for(&column, catalog)
            .into_iter()
            .map(|op| Suggestion::operator(&column, op))
            .collect(),
        Some(_) => Vec::new(),
    };

    options
        .into_iter()
        .filter(|option| option.label.contains(text))
        .collect()
}

/// Operators allowed for a column; an unknown column gets the whole catalog
pub fn operators_for(column: &str, catalog: &Catalog) -> Vec<Operator> {
    match catalog.column_type(column) {
        Some(column_type) => catalog.operators().allowed_for(column_type),
        None => catalog.operators().iter().collect(),
    }
}

/// Whether free text may be committed as a row as-is
pub fn is_valid_new_option(label: &str, catalog: &Catalog) -> bool {
    is_valid_condition(&decode(label, catalog), catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::entities::Column;

    fn catalog() -> Catalog {
        Catalog::with_columns(vec![Column::number("status"), Column::string("message")])
    }

    fn labels(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_empty_buffer_lists_columns() {
        let suggestions = suggest("", &Selection::default(), &catalog());
        assert_eq!(labels(&suggestions), vec!["status...", "message..."]);
        assert_eq!(
            suggestions[0].kind,
            SuggestionKind::Column {
                column: "status".to_string()
            }
        );
    }

    #[test]
    fn test_string_column_gets_restricted_operators() {
        let suggestions = suggest("message", &Selection::default(), &catalog());
        assert_eq!(
            labels(&suggestions),
            vec![
                "message =",
                "message !=",
                "message IN",
                "message IS NULL",
                "message IS NOT NULL",
                "message LIKE",
            ]
        );
    }

    #[test]
    fn test_valid_buffer_has_no_suggestions() {
        assert!(suggest("status = 1", &Selection::default(), &catalog()).is_empty());
    }

    #[test]
    fn test_both_slots_known_means_manual_value() {
        let selection = Selection::new(Some("status".to_string()), Some(Operator::Gt));
        assert!(suggest("", &selection, &catalog()).is_empty());
    }

    #[test]
    fn test_is_valid_new_option() {
        assert!(is_valid_new_option("message IS NULL", &catalog()));
        assert!(!is_valid_new_option("message =", &catalog()));
    }
}
