//! Line-oriented command parsing for the interactive console.

use std::fmt;
use std::str::FromStr;

use pixelforge_core::Command;

/// A change to one of the table's filter inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `None` clears the search.
    Search(Option<String>),
    Status(String),
    /// `None` clears the category filter.
    Category(Option<String>),
    /// `None` clears the role filter.
    Role(Option<String>),
}

/// Actions that can result from one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction<Q, Id> {
    /// Dispatch a core Command.
    Command(Command<Q, Id>),
    /// Update the query and refetch from page 1.
    Filter(Filter),
    /// List bulk operations, optionally fuzzy-filtered.
    ListOperations(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <term>      search the loaded page (empty clears)
  status <value>     all | active | locked | inactive
  category <name>    products only; 'all' clears
  role <value>       users only: user | admin | all
  page <n>           jump to page n
  next, prev         move one page
  refresh            reload the current page
  toggle <id>        select or unselect one row
  toggle all         flip the header checkbox
  all, none          select every visible row / clear the selection
  ops [query]        list bulk operations
  run <op>           run a bulk operation on the selection
  yes, no            answer a confirmation prompt
  help, quit";

/// Parses one input line.
///
/// Returns `Ok(None)` for blank lines and `Err` with a message for
/// anything that is not understood.
pub fn parse_line<Q, Id>(line: &str) -> Result<Option<InputAction<Q, Id>>, String>
where
    Id: FromStr,
    Id::Err: fmt::Display,
{
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let action = match word.to_lowercase().as_str() {
        "search" | "/" => InputAction::Filter(Filter::Search(arg)),
        "status" => InputAction::Filter(Filter::Status(required(arg, "status")?)),
        "category" => InputAction::Filter(Filter::Category(clearable(arg))),
        "role" => InputAction::Filter(Filter::Role(clearable(arg))),
        "page" => {
            let raw = required(arg, "page")?;
            let page = raw
                .parse::<u32>()
                .map_err(|_| format!("not a page number: {raw}"))?;
            InputAction::Command(Command::GoToPage(page))
        }
        "next" | "n" => InputAction::Command(Command::NextPage),
        "prev" | "p" => InputAction::Command(Command::PrevPage),
        "refresh" | "r" => InputAction::Command(Command::Refetch),
        "toggle" | "t" => {
            let raw = required(arg, "toggle")?;
            if raw.eq_ignore_ascii_case("all") {
                InputAction::Command(Command::ToggleAll)
            } else {
                let id = raw
                    .parse::<Id>()
                    .map_err(|e| format!("invalid id {raw:?}: {e}"))?;
                InputAction::Command(Command::Toggle(id))
            }
        }
        "all" => InputAction::Command(Command::SelectAll),
        "none" => InputAction::Command(Command::ClearSelection),
        "ops" => InputAction::ListOperations(rest.to_string()),
        "run" => InputAction::Command(Command::RunBulk(required(arg, "run")?)),
        "yes" | "y" => InputAction::Command(Command::Confirm),
        "no" => InputAction::Command(Command::Cancel),
        "help" | "?" => InputAction::Help,
        "quit" | "q" | "exit" => InputAction::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(action))
}

fn required(arg: Option<String>, command: &str) -> Result<String, String> {
    arg.ok_or_else(|| format!("usage: {command} <value>"))
}

fn clearable(arg: Option<String>) -> Option<String> {
    arg.filter(|value| !value.eq_ignore_ascii_case("all"))
}
