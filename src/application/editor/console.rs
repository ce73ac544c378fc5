//! Free-text SQL console.

use tracing::info;

use super::{Access, EditorState};
use crate::adapter::outbound::sqlite::workspace::ScriptOutcome;
use crate::error::Result;

impl EditorState {
    /// Run `sql` as a script against the open database.
    ///
    /// Any transaction the script leaves open is committed, or rolled back
    /// when the script fails part way. The table list and the selected
    /// table are refreshed afterwards in both cases. Read-only sessions run on a `query_only`
    /// connection, so the engine rejects their writes.
    pub fn execute_sql(&mut self, sql: &str) -> Result<ScriptOutcome> {
        self.require(Access::Read, "run SQL")?;
        let outcome = self.handle()?.run_script(sql);
        let refreshed = self.refresh_view();

        let outcome = outcome?;
        refreshed?;
        info!(
            rows = match &outcome {
                ScriptOutcome::Rows(result) => result.rows.len(),
                ScriptOutcome::Executed => 0,
            },
            "script executed"
        );
        Ok(outcome)
    }
}
