//! Line-oriented driver for the condition editor
//!
//! Each input line is one user action. Whenever the condition list changes its
//! full content is written as a single JSON line (the feed a request builder
//! would consume); everything else is human-readable text.

use crate::condition::{
    Catalog, Condition, Operator, OperatorParseError, Suggestion, is_valid_condition,
};
use crate::editor::{ConditionListController, EditorError, FieldUpdate, ListError, RowEditor};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

const HELP: &str = "\
Commands:
  add              append an empty row and edit it
  edit N           edit row N
  remove N         delete row N
  type TEXT        set the autocomplete input and list suggestions
  pick N           accept suggestion N from the last list
  op OP            set the operator of the edited row
  value TEXT       set the value (IN takes a comma separated list)
  commit TEXT      accept a complete condition typed as text
  save             store the edited row in the list
  cancel           reset the edited row
  close            blur the input, dropping a half-picked column/operator
  list             show all rows
  help             show this message";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown command: '{0}'. Type 'help' for the list of commands")]
    UnknownCommand(String),

    #[error("Command '{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid row or suggestion number: '{0}'")]
    InvalidNumber(String),

    #[error("No row is being edited; use 'add' or 'edit N' first")]
    NoActiveRow,

    #[error("No suggestion numbered {0}")]
    NoSuchSuggestion(usize),

    #[error(transparent)]
    Operator(#[from] OperatorParseError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Add,
    Edit(usize),
    Remove(usize),
    Type(String),
    Pick(usize),
    Operator(Operator),
    Value(String),
    Commit(String),
    Save,
    Cancel,
    Close,
    List,
    Help,
}

impl FromStr for SessionCommand {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (name, rest) = match line.split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (line.trim_end(), ""),
        };

        match name {
            "add" => Ok(SessionCommand::Add),
            "edit" => Ok(SessionCommand::Edit(parse_number("edit", rest)?)),
            "remove" | "rm" => Ok(SessionCommand::Remove(parse_number("remove", rest)?)),
            "type" => Ok(SessionCommand::Type(rest.to_string())),
            "pick" => Ok(SessionCommand::Pick(parse_number("pick", rest)?)),
            "op" => {
                let token = required("op", rest)?;
                Ok(SessionCommand::Operator(token.parse()?))
            }
            "value" => Ok(SessionCommand::Value(rest.to_string())),
            "commit" => Ok(SessionCommand::Commit(required("commit", rest)?.to_string())),
            "save" => Ok(SessionCommand::Save),
            "cancel" => Ok(SessionCommand::Cancel),
            "close" => Ok(SessionCommand::Close),
            "list" | "ls" => Ok(SessionCommand::List),
            "help" | "?" => Ok(SessionCommand::Help),
            other => Err(SessionError::UnknownCommand(other.to_string())),
        }
    }
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, SessionError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(SessionError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn parse_number(command: &'static str, rest: &str) -> Result<usize, SessionError> {
    let arg = required(command, rest)?;
    arg.parse()
        .map_err(|_| SessionError::InvalidNumber(arg.to_string()))
}

/// A condition list plus the editor of its active row
pub struct Session {
    controller: ConditionListController,
    editor: Option<RowEditor>,
    suggestions: Vec<Suggestion>,
    feed: Rc<RefCell<Vec<String>>>,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_conditions(catalog, Vec::new())
    }

    pub fn with_conditions(catalog: Catalog, conditions: Vec<Condition>) -> Self {
        let feed = Rc::new(RefCell::new(Vec::new()));
        let sink_feed = Rc::clone(&feed);
        let sink = move |list: &[Condition]| {
            let line = serde_json::to_string(list)
                .unwrap_or_else(|_| "{\"error\":\"failed to serialize conditions\"}".into());
            sink_feed.borrow_mut().push(line);
        };
        let controller = ConditionListController::with_conditions(catalog, conditions, sink);
        Self {
            controller,
            editor: None,
            suggestions: Vec::new(),
            feed,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        self.controller.conditions()
    }

    pub fn editor(&self) -> Option<&RowEditor> {
        self.editor.as_ref()
    }

    /// Parse and run one input line, returning the lines to print
    pub fn execute(&mut self, line: &str) -> Result<Vec<String>, SessionError> {
        let command: SessionCommand = line.parse()?;
        self.apply(command)
    }

    pub fn apply(&mut self, command: SessionCommand) -> Result<Vec<String>, SessionError> {
        tracing::debug!(?command, "session command");
        let mut out = Vec::new();

        match command {
            SessionCommand::Add => {
                let index = self.controller.add_row();
                self.start_editing(index);
                out.push(format!("editing row {}", index));
            }
            SessionCommand::Edit(index) => {
                self.controller.begin_edit(index)?;
                self.start_editing(index);
                out.push(format!("editing row {}", index));
            }
            SessionCommand::Remove(index) => {
                self.controller.remove_row(index)?;
                if self.controller.edit_index().is_none() {
                    self.editor = None;
                    self.suggestions.clear();
                }
            }
            SessionCommand::Type(text) => {
                let editor = self.active_editor()?;
                editor.set_query(text);
                self.refresh_suggestions(&mut out)?;
            }
            SessionCommand::Pick(number) => {
                let suggestion = number
                    .checked_sub(1)
                    .and_then(|idx| self.suggestions.get(idx))
                    .cloned()
                    .ok_or(SessionError::NoSuchSuggestion(number))?;
                self.active_editor()?.pick(&suggestion)?;
                self.sync_row()?;
                self.describe_row(&mut out)?;
                self.refresh_suggestions(&mut out)?;
            }
            SessionCommand::Operator(operator) => {
                self.active_editor()?.change_operator(operator)?;
                self.sync_row()?;
                self.describe_row(&mut out)?;
            }
            SessionCommand::Value(raw) => {
                self.active_editor()?.enter_value(&raw)?;
                self.sync_row()?;
                self.describe_row(&mut out)?;
            }
            SessionCommand::Commit(text) => {
                self.active_editor()?.commit_text(&text)?;
                self.sync_row()?;
                self.describe_row(&mut out)?;
            }
            SessionCommand::Save => {
                let index = self.controller.edit_index().ok_or(SessionError::NoActiveRow)?;
                let condition = self.active_editor()?.save()?;
                self.controller.save_row(index, condition)?;
                self.editor = None;
                self.suggestions.clear();
                out.push(format!("saved row {}", index));
            }
            SessionCommand::Cancel => {
                self.active_editor()?.cancel();
                self.sync_row()?;
                self.suggestions.clear();
                self.describe_row(&mut out)?;
            }
            SessionCommand::Close => {
                self.active_editor()?.close();
                self.sync_row()?;
                self.suggestions.clear();
                self.describe_row(&mut out)?;
            }
            SessionCommand::List => self.describe_list(&mut out),
            SessionCommand::Help => out.push(HELP.to_string()),
        }

        let mut lines: Vec<String> = self.feed.borrow_mut().drain(..).collect();
        lines.append(&mut out);
        Ok(lines)
    }

    fn start_editing(&mut self, index: usize) {
        let catalog = self.controller.catalog().clone();
        let editor = match self.controller.get(index) {
            Some(condition) => RowEditor::from_condition(catalog, condition),
            None => RowEditor::new(catalog),
        };
        self.editor = Some(editor);
        self.suggestions.clear();
    }

    /// Push the slots the editor changed into the edited row of the list
    fn sync_row(&mut self) -> Result<(), SessionError> {
        let (Some(index), Some(editor)) = (self.controller.edit_index(), self.editor.as_ref())
        else {
            return Ok(());
        };
        let target = editor.condition();
        let current = self.controller.get(index).cloned().unwrap_or_default();

        if current.column != target.column {
            self.controller
                .update_field(index, FieldUpdate::Column(target.column.clone()))?;
        }
        if current.operator != target.operator {
            self.controller
                .update_field(index, FieldUpdate::Operator(target.operator))?;
        }
        let value = self.controller.get(index).and_then(|c| c.value.as_ref());
        if value != target.value.as_ref() {
            let raw = target.value.as_ref().map(ToString::to_string);
            self.controller.update_field(index, FieldUpdate::Value(raw))?;
        }
        Ok(())
    }

    fn active_editor(&mut self) -> Result<&mut RowEditor, SessionError> {
        self.editor.as_mut().ok_or(SessionError::NoActiveRow)
    }

    fn refresh_suggestions(&mut self, out: &mut Vec<String>) -> Result<(), SessionError> {
        self.suggestions = self.active_editor()?.suggestions();
        if self.suggestions.is_empty() {
            out.push("(no suggestions)".to_string());
        }
        for (idx, suggestion) in self.suggestions.iter().enumerate() {
            out.push(format!("{:>3}. {}", idx + 1, suggestion.label));
        }
        Ok(())
    }

    fn describe_row(&mut self, out: &mut Vec<String>) -> Result<(), SessionError> {
        let editor = self.active_editor()?;
        let ready = if editor.can_save() { ", ready to save" } else { "" };
        out.push(format!(
            "row: {} [{}{}]",
            editor.text(),
            editor.state().name(),
            ready
        ));
        Ok(())
    }

    fn describe_list(&self, out: &mut Vec<String>) {
        if self.controller.is_empty() {
            out.push("None, showing all events".to_string());
            return;
        }
        for (idx, condition) in self.controller.conditions().iter().enumerate() {
            let marker = if self.controller.edit_index() == Some(idx) {
                '*'
            } else {
                ' '
            };
            let status = if is_valid_condition(condition, self.controller.catalog()) {
                "valid"
            } else {
                "invalid"
            };
            out.push(format!("{}{:>3}  {}  ({})", marker, idx, condition, status));
        }
    }
}

/// Feed every line of `input` to a session, printing results and errors to `output`
///
/// Errors are reported inline and do not end the session.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> Result<(), SessionError> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed, "quit" | "exit") {
            break;
        }
        match session.execute(&line) {
            Ok(lines) => {
                for out_line in lines {
                    writeln!(output, "{}", out_line)?;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, line = trimmed, "session command failed");
                writeln!(output, "error: {}", e)?;
            }
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("add".parse::<SessionCommand>().unwrap(), SessionCommand::Add);
        assert_eq!(
            "edit 2".parse::<SessionCommand>().unwrap(),
            SessionCommand::Edit(2)
        );
        assert_eq!(
            "op IS NOT NULL".parse::<SessionCommand>().unwrap(),
            SessionCommand::Operator(Operator::IsNotNull)
        );
        assert_eq!(
            "type ".parse::<SessionCommand>().unwrap(),
            SessionCommand::Type(String::new())
        );
        assert_eq!(
            "value a b".parse::<SessionCommand>().unwrap(),
            SessionCommand::Value("a b".to_string())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "frobnicate".parse::<SessionCommand>(),
            Err(SessionError::UnknownCommand(_))
        ));
        assert!(matches!(
            "edit".parse::<SessionCommand>(),
            Err(SessionError::MissingArgument("edit"))
        ));
        assert!(matches!(
            "pick two".parse::<SessionCommand>(),
            Err(SessionError::InvalidNumber(_))
        ));
        assert!(matches!(
            "op ~".parse::<SessionCommand>(),
            Err(SessionError::Operator(_))
        ));
    }
}
