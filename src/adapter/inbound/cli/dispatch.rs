//! Execution of parsed shell commands against the editor.

use serde_json::json;

use crate::adapter::inbound::cli::grid;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::parser::{Command, META_COMMANDS};
use crate::application::editor::{EditorState, ScriptOutcome};
use crate::error::Result;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn show_view(state: &EditorState) {
    if let Some(view) = state.view() {
        grid::print_view(view, state.sort().current());
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Run one command, printing its result.
pub fn execute(state: &mut EditorState, command: Command) -> Result<Flow> {
    match command {
        Command::Sql(sql) => match state.execute_sql(&sql)? {
            ScriptOutcome::Rows(result) => {
                let columns: Vec<&str> = result.columns.iter().map(String::as_str).collect();
                grid::print_rows("rows", &columns, &result.rows);
            }
            ScriptOutcome::Executed => output::success("executed"),
        },
        Command::Tables => grid::print_tables(state.list_tables()?),
        Command::Show(Some(table)) => {
            state.load_table(&table)?;
            show_view(state);
        }
        Command::Show(None) => {
            state.reload()?;
            show_view(state);
        }
        Command::Sort(column) => {
            state.sort_by_column(&column)?;
            show_view(state);
        }
        Command::Edit { row, column, value } => {
            let changed = state.edit_cell(row, &column, value)?;
            output::success(&format!("updated {}", plural(changed, "row")));
            show_view(state);
        }
        Command::Add(values) => {
            state.add_row(values)?;
            show_view(state);
        }
        Command::AddEmpty(count) => {
            state.add_empty_rows(count)?;
            show_view(state);
        }
        Command::Delete(rows) => {
            let deleted = state.delete_rows(&rows)?;
            output::success(&format!("deleted {}", plural(deleted, "row")));
            show_view(state);
        }
        Command::NewTable { name, columns } => {
            state.new_table(&name, &columns)?;
            show_view(state);
        }
        Command::DropTable => {
            let dropped = state.drop_table()?;
            output::success(&format!("dropped {dropped}"));
        }
        Command::AddColumn {
            name,
            declared_type,
        } => {
            state.add_column(&name, &declared_type)?;
            show_view(state);
        }
        Command::RenameColumn { from, to } => {
            state.rename_column(&from, &to)?;
            show_view(state);
        }
        Command::DropColumn(name) => {
            state.drop_column(&name)?;
            show_view(state);
        }
        Command::SetColumn { column, value } => {
            let changed = state.set_column(&column, value)?;
            output::success(&format!("updated {}", plural(changed, "row")));
            show_view(state);
        }
        Command::Copy(row) => {
            state.copy_row(row)?;
            output::success(&format!("copied row {}", row + 1));
        }
        Command::Paste(id) => {
            state.paste_row(id)?;
            show_view(state);
        }
        Command::Find { column, value } => {
            state.find_in_column(&column, &value)?;
            show_view(state);
        }
        Command::Open(path) => {
            state.open_file(&path)?;
            output::success(&format!("opened {}", path.display()));
            grid::print_tables(state.tables());
        }
        Command::New { path, template } => {
            state.new_file(&path, template)?;
            output::success(&format!("created {}", path.display()));
            grid::print_tables(state.tables());
        }
        Command::Save => {
            state.save_file()?;
            output::success("saved");
        }
        Command::SaveAs(path) => {
            state.save_file_as(&path)?;
            output::success(&format!("saved as {}", path.display()));
        }
        Command::Undo => state.undo()?,
        Command::Redo => state.redo()?,
        Command::WhoAmI => whoami(state),
        Command::Help => help(),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn whoami(state: &EditorState) {
    let session = state.session();
    let database = state
        .database_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    if output::is_json() {
        output::json_output(
            "session",
            json!({
                "session": session,
                "capabilities": session.capabilities(),
                "database": database,
            }),
        );
        return;
    }

    let caps = session.capabilities();
    output::field("User", session.username());
    output::field("Role", session.role());
    output::field("Permission", session.permission());
    output::field("Database", output::highlight(database));
    output::field(
        "Access",
        match (caps.read, caps.write) {
            (_, true) => "read and write",
            (true, false) => "read only",
            (false, false) => "none",
        },
    );
    if caps.change_permissions {
        output::note("may change permissions");
    }
}

fn help() {
    let width = META_COMMANDS
        .iter()
        .map(|(name, args, _)| name.len() + args.len() + 1)
        .max()
        .unwrap_or(0);
    let mut text = String::new();
    for (name, args, about) in META_COMMANDS {
        let usage = format!("{name} {args}");
        text.push_str(&format!("{usage:<width$}  {}\n", output::muted(about)));
    }
    text.push_str("Anything else is SQL; end statements with ';'.");
    output::lines(&text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::editor::EditorSettings;
    use crate::domain::permission::{Permission, Role};
    use crate::domain::session::Session;
    use crate::domain::template::Template;
    use crate::error::Error;

    fn editor() -> (tempfile::TempDir, EditorState) {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new(
            Session::new("admin", Role::Admin, Permission::FullWrite),
            EditorSettings::default(),
        );
        state
            .new_file(&dir.path().join("shop.db"), Some(Template::Business))
            .unwrap();
        (dir, state)
    }

    #[test]
    fn quit_stops_the_shell() {
        let (_dir, mut state) = editor();
        assert_eq!(execute(&mut state, Command::Quit).unwrap(), Flow::Quit);
        assert_eq!(execute(&mut state, Command::Tables).unwrap(), Flow::Continue);
    }

    #[test]
    fn commands_drive_the_editor() {
        let (_dir, mut state) = editor();
        execute(&mut state, Command::Show(Some("Warehouse".into()))).unwrap();
        execute(&mut state, Command::AddEmpty(2)).unwrap();
        execute(&mut state, Command::Delete(vec![0])).unwrap();

        assert_eq!(state.view().unwrap().rows.len(), 1);
    }

    #[test]
    fn errors_are_returned_not_printed() {
        let (_dir, mut state) = editor();
        assert!(matches!(
            execute(&mut state, Command::Sort("id".into())),
            Err(Error::NoTableSelected)
        ));
        assert!(matches!(
            execute(&mut state, Command::Undo),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "row"), "1 row");
        assert_eq!(plural(0, "row"), "0 rows");
    }
}
