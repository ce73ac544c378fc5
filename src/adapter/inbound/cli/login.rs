//! Credential collection and session start-up.

use std::io::BufRead;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use tracing::debug;

use crate::adapter::inbound::cli::command::SessionArgs;
use crate::adapter::outbound::sqlite::credential::SqliteCredentialStore;
use crate::app::config::Config;
use crate::application::auth::Authenticator;
use crate::application::editor::EditorState;
use crate::domain::session::Session;
use crate::error::Result;

/// Collect a username and password from flags, stdin or prompts.
pub fn credentials(args: &SessionArgs) -> Result<(String, String)> {
    let theme = ColorfulTheme::default();
    let username = match &args.user {
        Some(user) => user.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Username")
            .interact_text()?,
    };

    let password = if args.password_stdin {
        read_password_line(&mut std::io::stdin().lock())?
    } else {
        Password::with_theme(&theme)
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?
    };
    Ok((username, password))
}

/// Read one line and drop its line ending.
fn read_password_line(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']);
    Ok(trimmed.to_string())
}

/// Log in against the configured credential store.
pub fn login(config: &Config, args: &SessionArgs) -> Result<Session> {
    let path = args
        .credentials
        .as_deref()
        .unwrap_or(config.database.credentials.as_path());
    debug!(path = %path.display(), "opening credential store");

    let (username, password) = credentials(args)?;
    let mut auth = Authenticator::new(SqliteCredentialStore::open(path)?);
    auth.login(&username, &password)
}

/// Log in and open the working database in a fresh editor.
pub fn open_editor(config: &Config, args: &SessionArgs) -> Result<EditorState> {
    let session = login(config, args)?;
    let mut state = EditorState::new(session, config.editor_settings());
    let database = args
        .database
        .as_deref()
        .unwrap_or(config.database.path.as_path());
    state.open_or_create_file(database)?;
    Ok(state)
}
