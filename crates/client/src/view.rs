//! Plain-text rendering and command parsing for the terminal front-end.

use std::fmt::Write as _;

use invtrack_core::{DomainError, ItemId};
use invtrack_inventory::{timestamp, InventoryItem, ItemFields, ItemState, ItemType};

use crate::store::EditState;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Reload,
    DraftType(ItemType),
    DraftDescription(String),
    DraftState(ItemState),
    Add,
    Edit(ItemId),
    SetType(ItemType),
    SetDescription(String),
    SetState(ItemState),
    Save,
    Delete(ItemId),
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = |name: &'static str| {
            if rest.is_empty() {
                Err(ParseError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        let cmd = match word.to_ascii_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "list" | "ls" => Command::List,
            "reload" => Command::Reload,
            "type" => Command::DraftType(arg("type")?.parse()?),
            "desc" => Command::DraftDescription(arg("desc")?.to_string()),
            "state" => Command::DraftState(arg("state")?.parse()?),
            "add" => Command::Add,
            "edit" => Command::Edit(arg("edit")?.parse()?),
            "set-type" => Command::SetType(arg("set-type")?.parse()?),
            "set-desc" => Command::SetDescription(arg("set-desc")?.to_string()),
            "set-state" => Command::SetState(arg("set-state")?.parse()?),
            "save" => Command::Save,
            "delete" | "rm" => Command::Delete(arg("delete")?.parse()?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}

pub fn help() -> String {
    let types: Vec<&str> = ItemType::ALL.iter().map(|t| t.as_str()).collect();
    let states: Vec<&str> = ItemState::ALL.iter().map(|s| s.as_str()).collect();
    format!(
        "commands:\n\
         \x20 list | reload\n\
         \x20 type <type> | desc <text> | state <state> | add\n\
         \x20 edit <id> | set-type <type> | set-desc <text> | set-state <state> | save\n\
         \x20 delete <id> | help | quit\n\
         types: {}\n\
         states: {}\n",
        types.join(", "),
        states.join(", ")
    )
}

pub fn render_draft(draft: &ItemFields) -> String {
    format!(
        "new item: [{}] {:?} [{}]",
        draft.item_type.label(),
        draft.description,
        draft.state.label()
    )
}

const HEADERS: [&str; 6] = ["ID", "Type", "Description", "Added At", "State", "Last Updated At"];

/// Render the inventory table. The row being edited shows its edit buffer
/// and is marked with `*`.
pub fn render_table(items: &[InventoryItem], edit: &EditState) -> String {
    let rows: Vec<[String; 6]> = items.iter().map(|item| row(item, edit)).collect();

    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, " ", &HEADERS.map(String::from), &widths);
    if rows.is_empty() {
        out.push_str("  (no inventory items)\n");
    }
    for (item, r) in items.iter().zip(&rows) {
        let marker = if edit.is_editing(&item.id) { "*" } else { " " };
        push_line(&mut out, marker, r, &widths);
    }
    out
}

fn row(item: &InventoryItem, edit: &EditState) -> [String; 6] {
    let shown = match edit {
        EditState::Editing { id, buffer } if id == &item.id => buffer.clone(),
        _ => item.fields(),
    };
    [
        item.id.to_string(),
        shown.item_type.to_string(),
        shown.description,
        timestamp::to_display(&item.added_at),
        shown.state.to_string(),
        timestamp::to_display(&item.last_updated_at),
    ]
}

fn push_line(out: &mut String, marker: &str, cells: &[String; 6], widths: &[usize; 6]) {
    out.push_str(marker);
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(out, " {cell:<width$} |");
    }
    out.pop();
    out.push('\n');
}
