//! Shell input parsing: backslash meta-commands and SQL.
//!
//! Meta-command arguments are separated by whitespace. Double quotes group
//! words into one argument, and `\"` inside quotes is a literal quote.
//! Row numbers are the 1-based numbers shown in the `#` column.

use std::path::PathBuf;

use crate::domain::cell::CellValue;
use crate::domain::schema::{parse_column_definition, ColumnInfo};
use crate::domain::template::Template;
use crate::error::{Error, Result};

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// SQL text for the console.
    Sql(String),
    Tables,
    /// Load a table; `None` reloads the current one.
    Show(Option<String>),
    Sort(String),
    Edit {
        row: usize,
        column: String,
        value: CellValue,
    },
    Add(Vec<CellValue>),
    AddEmpty(usize),
    Delete(Vec<usize>),
    NewTable {
        name: String,
        columns: Vec<ColumnInfo>,
    },
    DropTable,
    AddColumn {
        name: String,
        declared_type: String,
    },
    RenameColumn {
        from: String,
        to: String,
    },
    DropColumn(String),
    SetColumn {
        column: String,
        value: CellValue,
    },
    Copy(usize),
    Paste(i64),
    Find {
        column: String,
        value: String,
    },
    Open(PathBuf),
    New {
        path: PathBuf,
        template: Option<Template>,
    },
    Save,
    SaveAs(PathBuf),
    Undo,
    Redo,
    WhoAmI,
    Help,
    Quit,
}

/// Meta-commands with their argument synopsis and a description.
pub const META_COMMANDS: &[(&str, &str, &str)] = &[
    ("\\tables", "", "list tables"),
    ("\\show", "[TABLE]", "show a table, or reload the current one"),
    ("\\sort", "COLUMN", "sort by a column; repeat to flip the direction"),
    ("\\edit", "ROW COLUMN VALUE", "set one cell"),
    ("\\add", "VALUE...", "add a row (values for non-key columns)"),
    ("\\addempty", "[COUNT]", "add empty rows"),
    ("\\delete", "ROW...", "delete rows"),
    ("\\newtable", "NAME \"COLUMN TYPE\"...", "create a table"),
    ("\\droptable", "", "drop the current table"),
    ("\\addcolumn", "NAME TYPE", "add a column"),
    ("\\renamecolumn", "OLD NEW", "rename a column"),
    ("\\dropcolumn", "NAME", "drop a column"),
    ("\\setcolumn", "COLUMN VALUE", "set a column in every row"),
    ("\\copy", "ROW", "copy a row"),
    ("\\paste", "ID", "paste the copied row with a new id"),
    ("\\find", "COLUMN VALUE", "search a column"),
    ("\\open", "PATH", "open a database"),
    ("\\new", "PATH [user|business]", "create a database"),
    ("\\save", "", "commit pending changes"),
    ("\\saveas", "PATH", "copy the database and continue there"),
    ("\\undo", "", "not supported"),
    ("\\redo", "", "not supported"),
    ("\\whoami", "", "show the session"),
    ("\\help", "", "show this help"),
    ("\\quit", "", "leave the shell"),
];

/// Split meta-command arguments, honoring double quotes.
pub fn split_args(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '\\' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(Error::Usage("unterminated quote".into()));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

/// Parse one complete line of shell input.
pub fn parse(line: &str) -> Result<Command> {
    let trimmed = line.trim();
    if !trimmed.starts_with('\\') {
        return Ok(Command::Sql(trimmed.to_string()));
    }

    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let args = split_args(rest)?;
    let usage = |synopsis: &str| Error::Usage(format!("usage: {name} {synopsis}"));
    let exact = |count: usize, synopsis: &str| {
        if args.len() == count {
            Ok(())
        } else {
            Err(usage(synopsis))
        }
    };

    let command = match name {
        "\\tables" | "\\dt" => {
            exact(0, "")?;
            Command::Tables
        }
        "\\show" => match args.as_slice() {
            [] => Command::Show(None),
            [table] => Command::Show(Some(table.clone())),
            _ => return Err(usage("[TABLE]")),
        },
        "\\sort" => {
            exact(1, "COLUMN")?;
            Command::Sort(args[0].clone())
        }
        "\\edit" => {
            exact(3, "ROW COLUMN VALUE")?;
            Command::Edit {
                row: row_index(&args[0])?,
                column: args[1].clone(),
                value: CellValue::from_input(&args[2]),
            }
        }
        "\\add" => Command::Add(args.iter().map(|a| CellValue::from_input(a)).collect()),
        "\\addempty" => match args.as_slice() {
            [] => Command::AddEmpty(1),
            [count] => Command::AddEmpty(
                count
                    .parse()
                    .map_err(|_| Error::Usage(format!("not a row count: {count}")))?,
            ),
            _ => return Err(usage("[COUNT]")),
        },
        "\\delete" => {
            if args.is_empty() {
                return Err(usage("ROW..."));
            }
            Command::Delete(args.iter().map(|a| row_index(a)).collect::<Result<_>>()?)
        }
        "\\newtable" => {
            if args.len() < 2 {
                return Err(usage("NAME \"COLUMN TYPE\"..."));
            }
            let columns = args[1..]
                .iter()
                .map(|definition| parse_column_definition(definition))
                .collect::<std::result::Result<_, _>>()?;
            Command::NewTable {
                name: args[0].clone(),
                columns,
            }
        }
        "\\droptable" => {
            exact(0, "")?;
            Command::DropTable
        }
        "\\addcolumn" => {
            exact(2, "NAME TYPE")?;
            Command::AddColumn {
                name: args[0].clone(),
                declared_type: args[1].clone(),
            }
        }
        "\\renamecolumn" => {
            exact(2, "OLD NEW")?;
            Command::RenameColumn {
                from: args[0].clone(),
                to: args[1].clone(),
            }
        }
        "\\dropcolumn" => {
            exact(1, "NAME")?;
            Command::DropColumn(args[0].clone())
        }
        "\\setcolumn" => {
            exact(2, "COLUMN VALUE")?;
            Command::SetColumn {
                column: args[0].clone(),
                value: CellValue::from_input(&args[1]),
            }
        }
        "\\copy" => {
            exact(1, "ROW")?;
            Command::Copy(row_index(&args[0])?)
        }
        "\\paste" => {
            exact(1, "ID")?;
            Command::Paste(
                args[0]
                    .parse()
                    .map_err(|_| Error::Usage(format!("not an integer id: {}", args[0])))?,
            )
        }
        "\\find" => {
            exact(2, "COLUMN VALUE")?;
            Command::Find {
                column: args[0].clone(),
                value: args[1].clone(),
            }
        }
        "\\open" => {
            exact(1, "PATH")?;
            Command::Open(PathBuf::from(&args[0]))
        }
        "\\new" => match args.as_slice() {
            [path] => Command::New {
                path: PathBuf::from(path),
                template: None,
            },
            [path, template] => Command::New {
                path: PathBuf::from(path),
                template: Some(template.parse()?),
            },
            _ => return Err(usage("PATH [user|business]")),
        },
        "\\save" => {
            exact(0, "")?;
            Command::Save
        }
        "\\saveas" => {
            exact(1, "PATH")?;
            Command::SaveAs(PathBuf::from(&args[0]))
        }
        "\\undo" => Command::Undo,
        "\\redo" => Command::Redo,
        "\\whoami" => Command::WhoAmI,
        "\\help" | "\\?" => Command::Help,
        "\\quit" | "\\q" => Command::Quit,
        other => {
            return Err(Error::Usage(format!(
                "unknown command {other}; try \\help"
            )))
        }
    };
    Ok(command)
}

/// Convert a displayed 1-based row number to an index.
fn row_index(arg: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(Error::Usage(format!("not a row number: {arg}"))),
    }
}

/// Whether buffered SQL is complete and ready to run.
pub fn is_complete_sql(buffer: &str) -> bool {
    buffer.trim_end().ends_with(';')
}
