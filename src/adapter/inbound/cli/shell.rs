//! Interactive shell.
//!
//! Lines starting with a backslash are meta-commands and run at once.
//! Anything else is buffered as SQL until a line ends with `;`.

use std::borrow::Cow;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use tracing::debug;

use crate::adapter::inbound::cli::dispatch::{self, Flow};
use crate::adapter::inbound::cli::parser::{self, Command, META_COMMANDS};
use crate::adapter::inbound::cli::{highlighter, output, paths};
use crate::application::editor::EditorState;
use crate::error::Result;

const PROMPT: &str = "opendoc> ";
const CONTINUATION_PROMPT: &str = "   ...> ";

/// Rustyline helper: highlights SQL and completes commands and tables.
pub struct ShellHelper {
    color: bool,
    tables: Vec<String>,
}

impl ShellHelper {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            tables: Vec::new(),
        }
    }

    /// Replace the cached table names used for completion.
    pub fn set_tables(&mut self, tables: Vec<String>) {
        self.tables = tables;
    }

    fn candidates(&self, word: &str) -> Vec<String> {
        if word.starts_with('\\') {
            return META_COMMANDS
                .iter()
                .map(|(name, _, _)| *name)
                .filter(|name| name.starts_with(word))
                .map(str::to_string)
                .collect();
        }
        let lower = word.to_lowercase();
        self.tables
            .iter()
            .filter(|table| table.to_lowercase().starts_with(&lower))
            .cloned()
            .collect()
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || c == '(' || c == ',')
            .map_or(0, |i| i + 1);
        let pairs = self
            .candidates(&line[start..pos])
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.color && !line.trim_start().starts_with('\\') {
            highlighter::paint(line)
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.color
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

fn report(result: Result<Flow>) -> Flow {
    match result {
        Ok(flow) => flow,
        Err(e) => {
            output::error(&e.to_string());
            Flow::Continue
        }
    }
}

fn banner(state: &EditorState) {
    output::header(env!("CARGO_PKG_VERSION"));
    let session = state.session();
    output::field("User", session.username());
    output::field("Permission", session.permission());
    if let Some(path) = state.database_path() {
        output::field("Database", output::highlight(path.display()));
    }
    output::hint("type \\help for commands, \\quit to leave");
}

/// Run the read-eval-print loop until `\quit` or end of input.
pub fn run(state: &mut EditorState) -> Result<()> {
    banner(state);

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .auto_add_history(false)
        .build();
    let mut rl = Editor::<ShellHelper, FileHistory>::with_config(config)?;
    let mut helper = ShellHelper::new(output::is_color());
    helper.set_tables(state.tables().to_vec());
    rl.set_helper(Some(helper));

    let history = paths::history_file();
    let history_enabled = paths::ensure_home_dir().is_ok();
    if history_enabled && rl.load_history(&history).is_err() {
        debug!(path = %history.display(), "no shell history yet");
    }

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                output::note("use \\quit to leave");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let flow = if buffer.is_empty() && line.trim_start().starts_with('\\') {
            let _ = rl.add_history_entry(line.trim());
            report(parser::parse(&line).and_then(|command| dispatch::execute(state, command)))
        } else {
            if line.trim().is_empty() && buffer.is_empty() {
                continue;
            }
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&line);
            if !parser::is_complete_sql(&buffer) {
                continue;
            }
            let sql = std::mem::take(&mut buffer);
            let _ = rl.add_history_entry(sql.as_str());
            report(dispatch::execute(state, Command::Sql(sql)))
        };

        if let Some(helper) = rl.helper_mut() {
            helper.set_tables(state.tables().to_vec());
        }
        if flow == Flow::Quit {
            break;
        }
    }

    if !buffer.trim().is_empty() {
        output::warning("discarded unterminated SQL (missing ';')");
    }
    if history_enabled {
        if let Err(e) = rl.save_history(&history) {
            debug!(error = %e, "could not save shell history");
        }
    }
    state.close()
}
