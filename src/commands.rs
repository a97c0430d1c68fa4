//! Shell command parsing

use crate::data::application::ApplicationId;
use crate::data::table_view::{Column, SortOrder, SortSpec};
use crate::state::edit_surface::DraftField;
use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Page(usize),
    Rows(usize),
    Sort(Option<SortSpec>),
    Find(String),
    New,
    Edit(ApplicationId),
    Set(DraftField, String),
    ShowDraft,
    Save,
    Cancel,
    Delete(ApplicationId),
    Select(Vec<ApplicationId>),
    Deselect(Vec<ApplicationId>),
    SelectNone,
    DeleteSelected,
    Yes,
    No,
    Names,
    Export(Option<String>),
    Logs(usize),
    Help,
    Quit,
}

fn ids(args: &[&str]) -> Result<Vec<ApplicationId>> {
    if args.is_empty() {
        bail!("at least one application id is required");
    }
    Ok(args.iter().map(|s| ApplicationId::new(*s)).collect())
}

fn single_id(args: &[&str], usage: &str) -> Result<ApplicationId> {
    match args {
        [id] => Ok(ApplicationId::new(*id)),
        _ => Err(anyhow!("Usage: {}", usage)),
    }
}

/// Parse one input line. Returns `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word.to_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "page" => {
            let n: usize = rest
                .parse()
                .map_err(|_| anyhow!("Usage: page <number>"))?;
            if n == 0 {
                bail!("Pages are numbered from 1");
            }
            Command::Page(n - 1)
        }
        "rows" => Command::Rows(rest.parse().map_err(|_| anyhow!("Usage: rows <5|10|25>"))?),
        "sort" => match args.as_slice() {
            [] | ["none"] => Command::Sort(None),
            [column, order @ ..] => {
                let column = Column::parse(column)
                    .ok_or_else(|| anyhow!("Sortable columns: type, name, path"))?;
                let order = match order {
                    [] | ["asc"] => SortOrder::Ascending,
                    ["desc"] => SortOrder::Descending,
                    _ => bail!("Usage: sort <type|name|path> [asc|desc]"),
                };
                Command::Sort(Some(SortSpec { column, order }))
            }
        },
        "find" | "filter" => Command::Find(rest.to_string()),
        "new" | "add" => Command::New,
        "edit" => Command::Edit(single_id(&args, "edit <id>")?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((rest, ""));
            let field = DraftField::parse(field)
                .ok_or_else(|| anyhow!("Usage: set <type|name|path> <value>"))?;
            Command::Set(field, value.to_string())
        }
        "draft" => Command::ShowDraft,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" | "rm" => Command::Delete(single_id(&args, "delete <id>")?),
        "select" => Command::Select(ids(&args)?),
        "deselect" => Command::Deselect(ids(&args)?),
        "select-none" => Command::SelectNone,
        "delete-selected" => Command::DeleteSelected,
        "yes" | "y" => Command::Yes,
        "no" | "n" => Command::No,
        "names" => Command::Names,
        "export" => Command::Export(args.first().map(|s| s.to_string())),
        "logs" => Command::Logs(match args.first() {
            Some(n) => n.parse().map_err(|_| anyhow!("Usage: logs [count]"))?,
            None => 20,
        }),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command: {} (try 'help')", other),
    };

    Ok(Some(command))
}

pub fn help_text() -> &'static str {
    r#"Commands:
  list                              Show the current page
  page <n> | rows <5|10|25>         Paginate
  sort <type|name|path> [asc|desc]  Sort the table (sort none to reset)
  find [text]                       Global filter (empty clears it)
  new | edit <id>                   Open the edit dialog
  set <type|name|path> <value>      Edit a field of the open draft
  draft | save | cancel             Show, save or discard the draft
  delete <id>                       Delete one application (asks to confirm)
  select <id>... | deselect <id>... Change the selection
  select-none | delete-selected     Clear or delete the selection
  yes | no                          Answer the open confirmation
  names                             List known application names
  export [file.csv]                 Export filtered rows to CSV
  logs [n]                          Show recent log entries
  help | quit"#
}
