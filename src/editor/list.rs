use super::error::ListError;
use crate::condition::{
    Catalog, Condition, Operator, coerce_input, is_valid_condition, reshape_for_operator,
    value::coerce_scalar,
};

/// Receives the full condition list after every change
pub trait ConditionSink {
    fn conditions_changed(&mut self, conditions: &[Condition]);
}

impl<F> ConditionSink for F
where
    F: FnMut(&[Condition]),
{
    fn conditions_changed(&mut self, conditions: &[Condition]) {
        self(conditions)
    }
}

/// A single-slot change to a row
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Column(Option<String>),
    Operator(Option<Operator>),
    /// Raw text from the value input; coerced by the row's column and operator
    Value(Option<String>),
}

/// Owns the ordered condition list and the index of the row being edited
pub struct ConditionListController {
    catalog: Catalog,
    conditions: Vec<Condition>,
    edit_index: Option<usize>,
    sink: Box<dyn ConditionSink>,
}

impl ConditionListController {
    pub fn new(catalog: Catalog, sink: impl ConditionSink + 'static) -> Self {
        Self::with_conditions(catalog, Vec::new(), sink)
    }

    /// Start from a list the host already has; nothing is emitted until it changes
    pub fn with_conditions(
        catalog: Catalog,
        conditions: Vec<Condition>,
        sink: impl ConditionSink + 'static,
    ) -> Self {
        Self {
            catalog,
            conditions,
            edit_index: None,
            sink: Box::new(sink),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn edit_index(&self) -> Option<usize> {
        self.edit_index
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index)
    }

    /// Conditions that pass validation, in list order
    pub fn valid_conditions(&self) -> Vec<Condition> {
        self.conditions
            .iter()
            .filter(|condition| is_valid_condition(condition, &self.catalog))
            .cloned()
            .collect()
    }

    /// Append an empty row and start editing it
    pub fn add_row(&mut self) -> usize {
        let index = self.conditions.len();
        self.conditions.push(Condition::empty());
        self.edit_index = Some(index);
        tracing::debug!(index, "row added");
        self.emit();
        index
    }

    pub fn remove_row(&mut self, index: usize) -> Result<Condition, ListError> {
        self.check_index(index)?;
        let removed = self.conditions.remove(index);
        self.edit_index = match self.edit_index {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        tracing::debug!(index, "row removed");
        self.emit();
        Ok(removed)
    }

    /// Change one slot of a row, keeping the value in the shape the operator needs
    pub fn update_field(&mut self, index: usize, update: FieldUpdate) -> Result<(), ListError> {
        self.check_index(index)?;
        let column_type = |condition: &Condition| {
            condition
                .column
                .as_deref()
                .and_then(|name| self.catalog.column_type(name))
        };
        let condition = &self.conditions[index];
        let mut next = condition.clone();

        match update {
            FieldUpdate::Column(column) => next.column = column,
            FieldUpdate::Operator(operator) => {
                next.operator = operator;
                next.value =
                    reshape_for_operator(next.value.take(), operator, column_type(condition));
            }
            FieldUpdate::Value(raw) => {
                next.value = match (raw, condition.operator) {
                    (None, _) => None,
                    (Some(_), Some(op)) if op.is_nullary() => None,
                    (Some(raw), Some(op)) => Some(match column_type(condition) {
                        Some(t) => coerce_input(&raw, op, t),
                        None => coerce_scalar(&raw, None),
                    }),
                    (Some(raw), None) => Some(coerce_scalar(&raw, column_type(condition))),
                };
            }
        }

        tracing::debug!(index, condition = %next, "row updated");
        self.conditions[index] = next;
        self.emit();
        Ok(())
    }

    /// Replace a row with its finished condition and leave edit mode
    pub fn save_row(&mut self, index: usize, condition: Condition) -> Result<(), ListError> {
        self.check_index(index)?;
        tracing::debug!(index, condition = %condition, "row saved");
        self.conditions[index] = condition;
        self.edit_index = None;
        self.emit();
        Ok(())
    }

    /// Put a row in edit mode; any other row leaves it
    pub fn begin_edit(&mut self, index: usize) -> Result<(), ListError> {
        self.check_index(index)?;
        self.edit_index = Some(index);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit_index = None;
    }

    fn check_index(&self, index: usize) -> Result<(), ListError> {
        if index < self.conditions.len() {
            Ok(())
        } else {
            Err(ListError::IndexOutOfRange {
                index,
                len: self.conditions.len(),
            })
        }
    }

    fn emit(&mut self) {
        self.sink.conditions_changed(&self.conditions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Column, Value};

    fn controller() -> ConditionListController {
        let catalog = Catalog::with_columns(vec![
            Column::number("status"),
            Column::string("message"),
        ]);
        ConditionListController::new(catalog, |_: &[Condition]| {})
    }

    #[test]
    fn test_add_row_starts_editing_it() {
        let mut list = controller();
        assert_eq!(list.add_row(), 0);
        assert_eq!(list.add_row(), 1);
        assert_eq!(list.edit_index(), Some(1));
        assert_eq!(list.conditions(), &[Condition::empty(), Condition::empty()]);
    }

    #[test]
    fn test_remove_row_keeps_edit_index_on_same_row() {
        let mut list = controller();
        list.add_row();
        list.add_row();
        list.add_row();
        list.remove_row(0).unwrap();
        assert_eq!(list.edit_index(), Some(1));
        list.remove_row(1).unwrap();
        assert_eq!(list.edit_index(), None);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut list = controller();
        assert_eq!(
            list.remove_row(0),
            Err(ListError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert!(list.begin_edit(3).is_err());
    }

    #[test]
    fn test_value_update_is_coerced_by_column_type() {
        let mut list = controller();
        list.add_row();
        list.update_field(0, FieldUpdate::Column(Some("status".to_string())))
            .unwrap();
        list.update_field(0, FieldUpdate::Operator(Some(Operator::Gt)))
            .unwrap();
        list.update_field(0, FieldUpdate::Value(Some("500".to_string())))
            .unwrap();
        assert_eq!(list.conditions()[0].value, Some(Value::Number(500.0)));
        assert_eq!(list.valid_conditions().len(), 1);
    }

    #[test]
    fn test_value_ignored_for_nullary_operator() {
        let mut list = controller();
        list.add_row();
        list.update_field(0, FieldUpdate::Column(Some("message".to_string())))
            .unwrap();
        list.update_field(0, FieldUpdate::Operator(Some(Operator::IsNull)))
            .unwrap();
        list.update_field(0, FieldUpdate::Value(Some("x".to_string())))
            .unwrap();
        assert_eq!(list.conditions()[0].value, None);
    }
}
