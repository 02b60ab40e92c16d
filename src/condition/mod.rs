//! Filter conditions and their text form
//!
//! A condition is a `(column, operator, value)` triple. Users either build it
//! slot by slot or type it as a single line, so this module converts between
//! the two and decides when a triple is complete.
//!
//! # Syntax
//!
//! ```text
//! <column> <operator> <value>     Comparison, e.g. `status = 1`
//! <column> IN <v1>,<v2>,...       Membership, values comma separated without spaces
//! <column> IS NULL                Nullary test, no value
//! <column> IS NOT NULL
//! ```
//!
//! # Operators
//!
//! `=`, `!=`, `>`, `<`, `>=`, `<=`, `IN`, `IS NULL`, `IS NOT NULL`, `LIKE`.
//! String columns only accept `=`, `!=`, `IN`, `IS NULL`, `IS NOT NULL` and `LIKE`.
//!
//! # Examples
//!
//! ```text
//! status = 1                    # numeric column, value parsed as a number
//! message IS NULL               # no value
//! tag IN a,b,c                  # value is the list [a, b, c]
//! message LIKE %timeout%        # the value runs to the end of the line
//! ```

pub mod codec;
pub mod entities;
pub mod error;
pub mod suggest;
pub mod validator;
pub mod value;

pub use codec::{decode, encode};
pub use entities::{Catalog, Column, ColumnType, Condition, Operator, OperatorCatalog, Value};
pub use error::OperatorParseError;
pub use suggest::{Selection, Suggestion, SuggestionKind, is_valid_new_option, suggest};
pub use validator::is_valid_condition;
pub use value::{coerce_input, reshape_for_operator};
