use super::error::EditorError;
use crate::condition::{
    Catalog, ColumnType, Condition, Operator, Selection, Suggestion, SuggestionKind, Value,
    coerce_input, decode, encode, is_valid_new_option, reshape_for_operator, suggest,
};

/// Where a row is in its editing session
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
    /// Freshly added row, nothing picked yet
    Empty,
    ColumnChosen {
        column: String,
    },
    /// Column and operator known. With a nullary operator the row is complete.
    ColumnAndOperatorChosen {
        column: String,
        operator: Operator,
    },
    ValueEntry {
        column: String,
        operator: Operator,
        value: Value,
    },
    /// Terminal: the condition was handed to the list
    Saved(Condition),
}

impl RowState {
    /// Derive the state a committed condition would be edited from
    pub fn from_condition(condition: &Condition) -> Self {
        let Some(column) = condition.column.clone() else {
            return RowState::Empty;
        };
        let Some(operator) = condition.operator else {
            return RowState::ColumnChosen { column };
        };
        match condition.value.clone() {
            Some(value) if !operator.is_nullary() => RowState::ValueEntry {
                column,
                operator,
                value,
            },
            _ => RowState::ColumnAndOperatorChosen { column, operator },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RowState::Empty => "empty",
            RowState::ColumnChosen { .. } => "column-chosen",
            RowState::ColumnAndOperatorChosen { .. } => "operator-chosen",
            RowState::ValueEntry { .. } => "value-entry",
            RowState::Saved(_) => "saved",
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            RowState::Empty => None,
            RowState::ColumnChosen { column }
            | RowState::ColumnAndOperatorChosen { column, .. }
            | RowState::ValueEntry { column, .. } => Some(column),
            RowState::Saved(condition) => condition.column.as_deref(),
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            RowState::Empty | RowState::ColumnChosen { .. } => None,
            RowState::ColumnAndOperatorChosen { operator, .. }
            | RowState::ValueEntry { operator, .. } => Some(*operator),
            RowState::Saved(condition) => condition.operator,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            RowState::ValueEntry { value, .. } => Some(value),
            RowState::Saved(condition) => condition.value.as_ref(),
            _ => None,
        }
    }

    /// The triple this state stands for
    pub fn condition(&self) -> Condition {
        match self {
            RowState::Saved(condition) => condition.clone(),
            other => Condition {
                column: other.column().map(str::to_string),
                operator: other.operator(),
                value: other.value().cloned(),
            },
        }
    }
}

/// Interaction state of a single row while its condition is being composed
///
/// The state is the source of truth; the row's text is rendered from it.
/// `query` only holds what is currently typed in the autocomplete box.
#[derive(Debug, Clone)]
pub struct RowEditor {
    catalog: Catalog,
    state: RowState,
    query: String,
}

impl RowEditor {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: RowState::Empty,
            query: String::new(),
        }
    }

    /// Reopen a committed condition for editing
    pub fn from_condition(catalog: Catalog, condition: &Condition) -> Self {
        Self {
            catalog,
            state: RowState::from_condition(condition),
            query: String::new(),
        }
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    pub fn condition(&self) -> Condition {
        self.state.condition()
    }

    /// Canonical text of the row
    pub fn text(&self) -> String {
        encode(&self.condition())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn selection(&self) -> Selection {
        match &self.state {
            RowState::Saved(_) => Selection::default(),
            state => Selection::new(state.column().map(str::to_string), state.operator()),
        }
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        suggest(&self.query, &self.selection(), &self.catalog)
    }

    /// Accept a suggestion produced by [`RowEditor::suggestions`]
    pub fn pick(&mut self, suggestion: &Suggestion) -> Result<(), EditorError> {
        match &suggestion.kind {
            SuggestionKind::Column { column } => self.pick_column(column),
            SuggestionKind::Operator { column, operator } => {
                if self.state.column() != Some(column.as_str()) {
                    self.pick_column(column)?;
                }
                self.pick_operator(*operator)
            }
        }
    }

    pub fn pick_column(&mut self, column: &str) -> Result<(), EditorError> {
        self.ensure_editable()?;
        if !self.catalog.has_column(column) {
            return Err(EditorError::UnknownColumn(column.to_string()));
        }
        self.query.clear();
        self.transition(RowState::ColumnChosen {
            column: column.to_string(),
        });
        Ok(())
    }

    pub fn pick_operator(&mut self, operator: Operator) -> Result<(), EditorError> {
        self.change_operator(operator)?;
        self.query.clear();
        Ok(())
    }

    /// Set or replace the operator, reshaping any value already entered
    pub fn change_operator(&mut self, operator: Operator) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let Some(column) = self.state.column().map(str::to_string) else {
            return Err(EditorError::InvalidTransition {
                action: "pick an operator",
                state: self.state.name(),
            });
        };

        let column_type = self.catalog.column_type(&column);
        let allowed = self.catalog.operators().contains(operator)
            && column_type.is_none_or(|t| operator.applies_to(t));
        if !allowed {
            return Err(EditorError::OperatorNotAllowed { operator, column });
        }

        let value = self
            .state
            .value()
            .cloned()
            .and_then(|value| reshape_for_operator(Some(value), Some(operator), column_type));

        let next = match value {
            Some(value) => RowState::ValueEntry {
                column,
                operator,
                value,
            },
            None => RowState::ColumnAndOperatorChosen { column, operator },
        };
        self.transition(next);
        Ok(())
    }

    /// Enter the value as typed; `IN` takes a comma separated list
    pub fn enter_value(&mut self, raw: &str) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let (Some(column), Some(operator)) = (self.state.column(), self.state.operator()) else {
            return Err(self.invalid("enter a value"));
        };
        if operator.is_nullary() {
            return Err(self.invalid("enter a value"));
        }

        let column = column.to_string();
        let column_type = self
            .catalog
            .column_type(&column)
            .unwrap_or(ColumnType::String);
        let value = coerce_input(raw, operator, column_type);
        self.transition(RowState::ValueEntry {
            column,
            operator,
            value,
        });
        Ok(())
    }

    /// Accept free text typed in the box as the whole condition
    pub fn commit_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.ensure_editable()?;
        if !is_valid_new_option(text, &self.catalog) {
            return Err(EditorError::IncompleteCondition(text.to_string()));
        }
        let decoded = decode(text, &self.catalog);
        self.query.clear();
        self.transition(RowState::from_condition(&decoded));
        Ok(())
    }

    /// A value was entered, or the operator needs none
    pub fn can_save(&self) -> bool {
        match &self.state {
            RowState::ValueEntry { .. } => true,
            RowState::ColumnAndOperatorChosen { operator, .. } => operator.is_nullary(),
            _ => false,
        }
    }

    /// Finish the session and hand back the condition to store
    pub fn save(&mut self) -> Result<Condition, EditorError> {
        if !self.can_save() {
            return Err(self.invalid("save"));
        }
        let condition = self.condition();
        self.query.clear();
        self.transition(RowState::Saved(condition.clone()));
        Ok(condition)
    }

    /// Input lost focus: drop a half-made selection, keep entered values
    ///
    /// A nullary operator completes the row, so it survives the blur.
    pub fn close(&mut self) {
        self.query.clear();
        let half_made = match &self.state {
            RowState::ColumnChosen { .. } => true,
            RowState::ColumnAndOperatorChosen { operator, .. } => !operator.is_nullary(),
            _ => false,
        };
        if half_made {
            self.transition(RowState::Empty);
        }
    }

    pub fn cancel(&mut self) {
        self.query.clear();
        self.transition(RowState::Empty);
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.state, RowState::Saved(_))
    }

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.is_saved() {
            Err(EditorError::AlreadySaved)
        } else {
            Ok(())
        }
    }

    fn invalid(&self, action: &'static str) -> EditorError {
        EditorError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    fn transition(&mut self, next: RowState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "row state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Column;

    fn editor() -> RowEditor {
        RowEditor::new(Catalog::with_columns(vec![
            Column::number("status"),
            Column::string("message"),
        ]))
    }

    #[test]
    fn test_state_from_condition() {
        assert_eq!(RowState::from_condition(&Condition::empty()), RowState::Empty);
        assert_eq!(
            RowState::from_condition(&Condition::nullary("message", Operator::IsNull)),
            RowState::ColumnAndOperatorChosen {
                column: "message".to_string(),
                operator: Operator::IsNull,
            }
        );
    }

    #[test]
    fn test_pick_column_clears_query() {
        let mut row = editor();
        row.set_query("sta");
        row.pick_column("status").unwrap();
        assert_eq!(row.query(), "");
        assert_eq!(row.state().name(), "column-chosen");
    }

    #[test]
    fn test_operator_needs_column() {
        let mut row = editor();
        let err = row.pick_operator(Operator::Eq).unwrap_err();
        assert_eq!(
            err,
            EditorError::InvalidTransition {
                action: "pick an operator",
                state: "empty",
            }
        );
    }

    #[test]
    fn test_string_column_rejects_ordering_operator() {
        let mut row = editor();
        row.pick_column("message").unwrap();
        assert!(matches!(
            row.pick_operator(Operator::Gt),
            Err(EditorError::OperatorNotAllowed { .. })
        ));
    }

    #[test]
    fn test_saved_row_is_terminal() {
        let mut row = editor();
        row.pick_column("message").unwrap();
        row.pick_operator(Operator::IsNull).unwrap();
        row.save().unwrap();
        assert_eq!(row.pick_column("status"), Err(EditorError::AlreadySaved));
        assert!(row.is_saved());
    }
}
