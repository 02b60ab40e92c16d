//! Row editing and the condition list
//!
//! [`RowEditor`] drives one row through column, operator and value selection.
//! [`ConditionListController`] owns the committed rows, allows at most one of
//! them in edit mode and pushes the whole list to its sink after each change.

pub mod error;
pub mod list;
pub mod row;

pub use error::{EditorError, ListError};
pub use list::{ConditionListController, ConditionSink, FieldUpdate};
pub use row::{RowEditor, RowState};
