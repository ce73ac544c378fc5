//! Table grid operations.
//!
//! Row arguments are zero-based indices into the displayed rows. Column
//! arguments are names checked against the current [`TableDescriptor`]
//! before any SQL is built.

use tracing::{debug, info};

use super::{Access, EditorState, TableView};
use crate::domain::cell::{CellValue, DisplayRow};
use crate::domain::grid::{DeleteMatch, SortDirection};
use crate::domain::schema::{
    quote_identifier, validate_column_type, validate_new_identifier, ColumnInfo, TableDescriptor,
};
use crate::error::{Error, Result};

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_list<'a>(columns: impl IntoIterator<Item = &'a ColumnInfo>) -> String {
    columns
        .into_iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn known_column<'a>(table: &'a TableDescriptor, column: &str) -> Result<&'a ColumnInfo> {
    table.column(column).ok_or_else(|| Error::UnknownColumn {
        table: table.name.clone(),
        column: column.to_string(),
    })
}

fn insert_sql(table: &TableDescriptor, columns: &[&ColumnInfo]) -> String {
    let target = quote_identifier(&table.name);
    if columns.is_empty() {
        format!("INSERT INTO {target} DEFAULT VALUES")
    } else {
        format!(
            "INSERT INTO {target} ({}) VALUES ({})",
            column_list(columns.iter().copied()),
            placeholders(columns.len())
        )
    }
}

impl EditorState {
    fn current_table(&self) -> Result<TableDescriptor> {
        Ok(self.current()?.descriptor.clone())
    }

    fn displayed_row(&self, row: usize) -> Result<&DisplayRow> {
        let rows = &self.current()?.rows;
        rows.get(row).ok_or(Error::RowOutOfRange {
            row: row + 1,
            len: rows.len(),
        })
    }

    /// Select `name` and load its rows.
    ///
    /// Loading a different table forgets the sort; reloading the same
    /// table keeps it while the sorted column still exists.
    pub fn load_table(&mut self, name: &str) -> Result<&TableView> {
        self.require(Access::Read, "read a table")?;
        let name = self.known_table(name)?;
        let same_table = self
            .view
            .as_ref()
            .is_some_and(|view| view.descriptor.name == name);
        if !same_table {
            self.sort.reset();
        }

        let descriptor = self.handle()?.describe(&name)?;
        let sorted_column_gone = self
            .sort
            .current()
            .is_some_and(|(column, _)| descriptor.column(column).is_none());
        if sorted_column_gone {
            self.sort.reset();
        }
        let rows = self.handle()?.select_rows(
            &descriptor,
            self.sort.current(),
            self.settings.row_limit,
        )?;
        debug!(table = %name, rows = rows.len(), "table loaded");

        Ok(&*self.view.insert(TableView { descriptor, rows }))
    }

    /// Reload the current table from the engine.
    pub fn reload(&mut self) -> Result<&TableView> {
        let name = self.current()?.descriptor.name.clone();
        self.load_table(&name)
    }

    /// Re-read the table list, then reload the current table if it still
    /// exists or clear the grid if it does not.
    pub(super) fn refresh_view(&mut self) -> Result<()> {
        self.refresh_tables()?;
        let Some(name) = self.view.as_ref().map(|v| v.descriptor.name.clone()) else {
            return Ok(());
        };
        if self.tables.contains(&name) {
            self.load_table(&name)?;
        } else {
            self.view = None;
            self.sort.reset();
        }
        Ok(())
    }

    /// Sort the current table by `column`; returns the direction applied.
    pub fn sort_by_column(&mut self, column: &str) -> Result<SortDirection> {
        self.require(Access::Read, "sort a table")?;
        let table = &self.current()?.descriptor;
        let column = known_column(table, column)?.name.clone();
        let direction = self.sort.click(&column);
        self.reload()?;
        Ok(direction)
    }

    /// Write `value` into one cell of the displayed grid.
    ///
    /// The record is located by the value of the first column.
    pub fn edit_cell(&mut self, row: usize, column: &str, value: CellValue) -> Result<usize> {
        self.require(Access::Write, "edit a cell")?;
        let table = self.current_table()?;
        let target = known_column(&table, column)?;
        let key_column = table.first_column().ok_or(Error::NoTableSelected)?;
        let key = self
            .displayed_row(row)?
            .first()
            .cloned()
            .unwrap_or(CellValue::Null);

        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE {} IS ?2",
            quote_identifier(&table.name),
            quote_identifier(&target.name),
            quote_identifier(&key_column.name)
        );
        let changed = self.handle()?.execute(&sql, &[value, key])?;
        info!(table = %table.name, column, changed, "cell updated");
        self.reload()?;
        Ok(changed)
    }

    /// Insert one row; `values` follow the non-primary-key columns in order.
    pub fn add_row(&mut self, values: Vec<CellValue>) -> Result<()> {
        self.require(Access::Write, "add a row")?;
        let table = self.current_table()?;
        let columns = table.insertable_columns();
        if values.len() != columns.len() {
            return Err(Error::ValueCount {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        self.handle()?.execute(&insert_sql(&table, &columns), &values)?;
        info!(table = %table.name, "row added");
        self.reload()?;
        Ok(())
    }

    /// Insert `count` rows with every non-primary-key column NULL.
    pub fn add_empty_rows(&mut self, count: usize) -> Result<()> {
        self.require(Access::Write, "add rows")?;
        let table = self.current_table()?;
        if count == 0 {
            return Ok(());
        }
        let columns = table.insertable_columns();
        let sql = insert_sql(&table, &columns);
        let nulls = vec![CellValue::Null; columns.len()];

        self.handle()?.in_transaction(|h| {
            for _ in 0..count {
                h.execute(&sql, &nulls)?;
            }
            Ok(())
        })?;
        info!(table = %table.name, count, "empty rows added");
        self.reload()?;
        Ok(())
    }

    /// Delete the displayed rows at `selection`.
    ///
    /// With [`DeleteMatch::FullRow`] every column must match, so identical
    /// rows go together. Returns the number of records deleted.
    pub fn delete_rows(&mut self, selection: &[usize]) -> Result<usize> {
        self.require(Access::Write, "delete rows")?;
        let table = self.current_table()?;

        let mut selection = selection.to_vec();
        selection.sort_unstable();
        selection.dedup();
        let mut targets = Vec::with_capacity(selection.len());
        for &row in &selection {
            targets.push(self.displayed_row(row)?.clone());
        }

        let key_columns: Vec<(usize, &ColumnInfo)> = match self.settings.delete_match {
            DeleteMatch::FullRow => table.columns.iter().enumerate().collect(),
            DeleteMatch::PrimaryKey => table
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.primary_key)
                .collect(),
        };
        if key_columns.is_empty() {
            return Err(Error::NoPrimaryKey(table.name.clone()));
        }

        let conditions = key_columns
            .iter()
            .enumerate()
            .map(|(n, (_, c))| format!("{} IS ?{}", quote_identifier(&c.name), n + 1))
            .collect::<Vec<_>>()
            .join(" AND ");
        let sql = format!(
            "DELETE FROM {} WHERE {conditions}",
            quote_identifier(&table.name)
        );

        let deleted = self.handle()?.in_transaction(|h| {
            let mut deleted = 0;
            for row in &targets {
                let params: Vec<CellValue> = key_columns
                    .iter()
                    .map(|(i, _)| row.get(*i).cloned().unwrap_or(CellValue::Null))
                    .collect();
                deleted += h.execute(&sql, &params)?;
            }
            Ok(deleted)
        })?;
        info!(table = %table.name, deleted, "rows deleted");
        self.reload()?;
        Ok(deleted)
    }

    /// Create a table and select it.
    pub fn new_table(&mut self, name: &str, columns: &[ColumnInfo]) -> Result<&TableView> {
        self.require(Access::Write, "create a table")?;
        let name = validate_new_identifier(name)?.to_string();
        let mut definitions = Vec::with_capacity(columns.len());
        for column in columns {
            let mut definition = quote_identifier(validate_new_identifier(&column.name)?);
            if !column.declared_type.is_empty() {
                definition.push(' ');
                definition.push_str(validate_column_type(&column.declared_type)?);
            }
            if column.primary_key {
                definition.push_str(" PRIMARY KEY");
            }
            definitions.push(definition);
        }

        let sql = format!(
            "CREATE TABLE {} ({})",
            quote_identifier(&name),
            definitions.join(", ")
        );
        self.handle()?.execute(&sql, &[])?;
        info!(table = %name, "table created");
        self.load_table(&name)
    }

    /// Drop the current table and clear the grid.
    pub fn drop_table(&mut self) -> Result<String> {
        self.require(Access::Write, "drop a table")?;
        let table = self.current_table()?;
        let sql = format!("DROP TABLE {}", quote_identifier(&table.name));
        self.handle()?.execute(&sql, &[])?;
        info!(table = %table.name, "table dropped");

        self.view = None;
        self.sort.reset();
        self.refresh_tables()?;
        Ok(table.name)
    }

    pub fn add_column(&mut self, name: &str, declared_type: &str) -> Result<()> {
        self.require(Access::Write, "add a column")?;
        let table = self.current_table()?;
        let name = validate_new_identifier(name)?;
        let declared_type = validate_column_type(declared_type)?;

        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {declared_type}",
            quote_identifier(&table.name),
            quote_identifier(name)
        );
        self.handle()?.execute(&sql, &[])?;
        info!(table = %table.name, column = name, "column added");
        self.reload()?;
        Ok(())
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        self.require(Access::Write, "rename a column")?;
        let table = self.current_table()?;
        let old = &known_column(&table, old)?.name;
        let new = validate_new_identifier(new)?;

        let sql = format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            quote_identifier(&table.name),
            quote_identifier(old),
            quote_identifier(new)
        );
        self.handle()?.execute(&sql, &[])?;
        info!(table = %table.name, from = %old, to = new, "column renamed");
        self.reload()?;
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        self.require(Access::Write, "drop a column")?;
        let table = self.current_table()?;
        let column = &known_column(&table, name)?.name;

        let sql = format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_identifier(&table.name),
            quote_identifier(column)
        );
        self.handle()?.execute(&sql, &[])?;
        info!(table = %table.name, column = %column, "column dropped");
        self.reload()?;
        Ok(())
    }

    /// Set `column` to `value` in every row of the current table.
    pub fn set_column(&mut self, column: &str, value: CellValue) -> Result<usize> {
        self.require(Access::Write, "edit a column")?;
        let table = self.current_table()?;
        let column = &known_column(&table, column)?.name;

        let sql = format!(
            "UPDATE {} SET {} = ?1",
            quote_identifier(&table.name),
            quote_identifier(column)
        );
        let changed = self.handle()?.execute(&sql, &[value])?;
        info!(table = %table.name, column = %column, changed, "column set");
        self.reload()?;
        Ok(changed)
    }

    /// Remember a displayed row for [`EditorState::paste_row`].
    pub fn copy_row(&mut self, row: usize) -> Result<&DisplayRow> {
        self.require(Access::Read, "copy a row")?;
        let copied = self.displayed_row(row)?.clone();
        Ok(&*self.copied_row.insert(copied))
    }

    /// Insert the copied row with `new_id` as its first column.
    ///
    /// Rows whose first column is at least `new_id` move up by one first,
    /// highest value first.
    pub fn paste_row(&mut self, new_id: i64) -> Result<()> {
        self.require(Access::Write, "paste a row")?;
        let copied = self.copied_row.clone().ok_or(Error::NothingCopied)?;
        let table = self.current_table()?;
        if copied.len() != table.columns.len() {
            return Err(Error::ValueCount {
                expected: table.columns.len(),
                actual: copied.len(),
            });
        }
        let Some(id_column) = table.first_column() else {
            return Err(Error::NoTableSelected);
        };

        let target = quote_identifier(&table.name);
        let id = quote_identifier(&id_column.name);
        let to_shift = format!("SELECT {id} FROM {target} WHERE {id} >= ?1 ORDER BY {id} DESC");
        let shift = format!("UPDATE {target} SET {id} = {id} + 1 WHERE {id} = ?1");
        let all_columns: Vec<&ColumnInfo> = table.columns.iter().collect();
        let insert = insert_sql(&table, &all_columns);

        let mut values = copied;
        values[0] = CellValue::Integer(new_id);

        let shifted = self.handle()?.in_transaction(|h| {
            let ids = h.query(&to_shift, &[CellValue::Integer(new_id)])?.rows;
            for row in &ids {
                h.execute(&shift, &row[..1])?;
            }
            h.execute(&insert, &values)?;
            Ok(ids.len())
        })?;
        info!(table = %table.name, new_id, shifted, "row pasted");
        self.reload()?;
        Ok(())
    }

    /// Replace the displayed rows with those matching `value` in `column`.
    ///
    /// Text columns match by substring, others by equality.
    pub fn find_in_column(&mut self, column: &str, value: &str) -> Result<&TableView> {
        self.require(Access::Read, "search a table")?;
        let table = self.current_table()?;
        let target = known_column(&table, column)?;

        let (operator, pattern) = if target.is_textual() {
            ("LIKE", format!("%{value}%"))
        } else {
            ("=", value.to_string())
        };
        let mut sql = format!(
            "SELECT * FROM {} WHERE {} {operator} ?1",
            quote_identifier(&table.name),
            quote_identifier(&target.name)
        );
        let mut params = vec![CellValue::Text(pattern)];
        if let Some(limit) = self.settings.row_limit {
            sql.push_str(" LIMIT ?2");
            params.push(CellValue::Integer(i64::from(limit)));
        }

        let rows = self.handle()?.query(&sql, &params)?.rows;
        debug!(table = %table.name, column, matches = rows.len(), "search");
        Ok(&*self.view.insert(TableView {
            descriptor: table,
            rows,
        }))
    }

    pub fn undo(&mut self) -> Result<()> {
        Err(Error::Unsupported("undo"))
    }

    pub fn redo(&mut self) -> Result<()> {
        Err(Error::Unsupported("redo"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::editor::EditorSettings;
    use crate::domain::permission::{Permission, Role};
    use crate::domain::session::Session;

    fn people(permission: Permission, settings: EditorSettings) -> (tempfile::TempDir, EditorState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.db");
        {
            let mut setup = EditorState::new(
                Session::new("admin", Role::Admin, Permission::FullWrite),
                EditorSettings::default(),
            );
            setup.new_file(&path, None).unwrap();
            setup
                .execute_sql(
                    "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
                     INSERT INTO people VALUES (1, 'Ada', 36), (2, 'Alan', 41), (3, 'Grace', 85);",
                )
                .unwrap();
        }
        let mut state = EditorState::new(Session::new("kim", Role::from("clerk"), permission), settings);
        state.open_file(&path).unwrap();
        state.load_table("people").unwrap();
        (dir, state)
    }

    fn writer() -> (tempfile::TempDir, EditorState) {
        people(Permission::Write, EditorSettings::default())
    }

    fn names(state: &EditorState) -> Vec<String> {
        state
            .view()
            .unwrap()
            .rows
            .iter()
            .map(|r| r[1].to_string())
            .collect()
    }

    #[test]
    fn unknown_table_is_rejected() {
        let (_dir, mut state) = writer();
        assert!(matches!(state.load_table("ghosts"), Err(Error::UnknownTable(_))));
    }

    #[test]
    fn sort_toggles_and_orders() {
        let (_dir, mut state) = writer();
        assert_eq!(state.sort_by_column("age").unwrap(), SortDirection::Ascending);
        assert_eq!(names(&state), ["Ada", "Alan", "Grace"]);
        assert_eq!(state.sort_by_column("age").unwrap(), SortDirection::Descending);
        assert_eq!(names(&state), ["Grace", "Alan", "Ada"]);
        assert_eq!(state.sort_by_column("age").unwrap(), SortDirection::Ascending);
    }

    #[test]
    fn names_resolve_without_regard_to_case() {
        let (_dir, mut state) = writer();
        let view = state.load_table("PEOPLE").unwrap();
        assert_eq!(view.descriptor.name, "people");

        assert_eq!(state.sort_by_column("AGE").unwrap(), SortDirection::Ascending);
        assert_eq!(state.sort().current(), Some(("age", SortDirection::Ascending)));
        assert_eq!(state.sort_by_column("age").unwrap(), SortDirection::Descending);
        assert_eq!(names(&state), ["Grace", "Alan", "Ada"]);
    }

    #[test]
    fn sort_rejects_unknown_column() {
        let (_dir, mut state) = writer();
        assert!(matches!(
            state.sort_by_column("age; DROP TABLE people"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn row_limit_caps_loaded_rows() {
        let settings = EditorSettings {
            row_limit: Some(2),
            ..EditorSettings::default()
        };
        let (_dir, state) = people(Permission::Write, settings);
        assert_eq!(state.view().unwrap().rows.len(), 2);
    }

    #[test]
    fn edit_cell_writes_through() {
        let (_dir, mut state) = writer();
        state.edit_cell(1, "name", "Turing".into()).unwrap();
        assert_eq!(state.view().unwrap().rows[1][1], CellValue::from("Turing"));
    }

    #[test]
    fn edit_cell_out_of_range() {
        let (_dir, mut state) = writer();
        assert!(matches!(
            state.edit_cell(9, "name", CellValue::Null),
            Err(Error::RowOutOfRange { row: 10, len: 3 })
        ));
    }

    #[test]
    fn add_row_skips_primary_key() {
        let (_dir, mut state) = writer();
        state.add_row(vec!["Edsger".into(), CellValue::Integer(72)]).unwrap();
        let view = state.view().unwrap();
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.rows[3][0], CellValue::Integer(4));
    }

    #[test]
    fn add_row_checks_value_count() {
        let (_dir, mut state) = writer();
        assert!(matches!(
            state.add_row(vec!["only".into()]),
            Err(Error::ValueCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn add_empty_rows_inserts_nulls() {
        let (_dir, mut state) = writer();
        state.add_empty_rows(2).unwrap();
        let rows = &state.view().unwrap().rows;
        assert_eq!(rows.len(), 5);
        assert!(rows[4][1].is_null());
        assert!(rows[4][2].is_null());
    }

    #[test]
    fn full_row_delete_removes_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new(
            Session::new("admin", Role::Admin, Permission::FullWrite),
            EditorSettings::default(),
        );
        state.new_file(&dir.path().join("dupes.db"), None).unwrap();
        state
            .execute_sql(
                "CREATE TABLE tags (label TEXT, note TEXT);
                 INSERT INTO tags VALUES ('a', NULL), ('a', NULL), ('b', 'x');",
            )
            .unwrap();
        state.load_table("tags").unwrap();

        assert_eq!(state.delete_rows(&[0]).unwrap(), 2);
        assert_eq!(state.view().unwrap().rows.len(), 1);
    }

    #[test]
    fn primary_key_delete_removes_one() {
        let settings = EditorSettings {
            delete_match: DeleteMatch::PrimaryKey,
            ..EditorSettings::default()
        };
        let (_dir, mut state) = people(Permission::Write, settings);
        assert_eq!(state.delete_rows(&[2, 0, 2]).unwrap(), 2);
        assert_eq!(names(&state), ["Alan"]);
    }

    #[test]
    fn read_only_cannot_mutate_grid() {
        let (_dir, mut state) = people(Permission::ReadOnly, EditorSettings::default());
        assert!(matches!(
            state.edit_cell(0, "name", "x".into()),
            Err(Error::PermissionDenied { .. })
        ));
        assert!(matches!(state.add_empty_rows(1), Err(Error::PermissionDenied { .. })));
        assert!(matches!(state.delete_rows(&[0]), Err(Error::PermissionDenied { .. })));
        assert_eq!(state.view().unwrap().rows.len(), 3);
    }

    #[test]
    fn column_operations() {
        let (_dir, mut state) = writer();
        state.add_column("email", "TEXT").unwrap();
        state.rename_column("email", "mail").unwrap();
        assert_eq!(
            state.view().unwrap().descriptor.column_names(),
            ["id", "name", "age", "mail"]
        );

        assert_eq!(state.set_column("mail", "n/a".into()).unwrap(), 3);
        assert_eq!(state.view().unwrap().rows[0][3], CellValue::from("n/a"));

        state.drop_column("mail").unwrap();
        assert_eq!(state.view().unwrap().descriptor.columns.len(), 3);
    }

    #[test]
    fn new_column_names_are_validated() {
        let (_dir, mut state) = writer();
        assert!(matches!(
            state.add_column("x\" TEXT; --", "TEXT"),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn dropping_sorted_column_resets_sort() {
        let (_dir, mut state) = writer();
        state.add_column("rank", "INTEGER").unwrap();
        state.sort_by_column("rank").unwrap();
        state.drop_column("rank").unwrap();
        assert_eq!(state.sort().current(), None);
    }

    #[test]
    fn new_and_drop_table() {
        let (_dir, mut state) = writer();
        let columns = [
            ColumnInfo::new("id", "INTEGER", true),
            ColumnInfo::new("label", "TEXT", false),
        ];
        state.new_table("labels", &columns).unwrap();
        assert!(state.tables().contains(&"labels".to_string()));
        assert_eq!(state.view().unwrap().descriptor.name, "labels");

        assert_eq!(state.drop_table().unwrap(), "labels");
        assert!(state.view().is_none());
        assert!(!state.tables().contains(&"labels".to_string()));
    }

    #[test]
    fn paste_row_shifts_ids() {
        let (_dir, mut state) = writer();
        state.copy_row(2).unwrap();
        state.paste_row(2).unwrap();

        let rows = &state.view().unwrap().rows;
        let ids: Vec<&CellValue> = rows.iter().map(|r| &r[0]).collect();
        assert_eq!(ids.len(), 4);
        let grace_copy = rows
            .iter()
            .find(|r| r[0] == CellValue::Integer(2))
            .unwrap();
        assert_eq!(grace_copy[1], CellValue::from("Grace"));
        let alan = rows.iter().find(|r| r[1] == CellValue::from("Alan")).unwrap();
        assert_eq!(alan[0], CellValue::Integer(3));
    }

    #[test]
    fn paste_without_copy_fails() {
        let (_dir, mut state) = writer();
        assert!(matches!(state.paste_row(1), Err(Error::NothingCopied)));
    }

    #[test]
    fn find_uses_like_on_text() {
        let (_dir, mut state) = writer();
        state.find_in_column("name", "al").unwrap();
        assert_eq!(names(&state), ["Alan"]);

        state.find_in_column("age", "85").unwrap();
        assert_eq!(names(&state), ["Grace"]);
    }

    #[test]
    fn undo_and_redo_are_unsupported() {
        let (_dir, mut state) = writer();
        assert!(matches!(state.undo(), Err(Error::Unsupported("undo"))));
        assert!(matches!(state.redo(), Err(Error::Unsupported("redo"))));
    }
}
