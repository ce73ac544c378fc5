//! Entry point for parsed command lines.

use std::io::{IsTerminal, Read};

use tracing::info;

use crate::adapter::inbound::cli::command::{Cli, ColorChoice, Commands, ExecArgs, NewArgs, ShowArgs};
use crate::adapter::inbound::cli::dispatch;
use crate::adapter::inbound::cli::grid;
use crate::adapter::inbound::cli::login;
use crate::adapter::inbound::cli::output::{self, OutputConfig};
use crate::adapter::inbound::cli::parser::Command;
use crate::adapter::inbound::cli::paths;
use crate::adapter::inbound::cli::shell;
use crate::app::config::Config;
use crate::application::editor::EditorState;
use crate::error::{Error, Result};

fn use_color(choice: &ColorChoice, json: bool) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            !json && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        }
    }
}

/// Configure output and logging, then run the selected command.
pub fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(
        cli.json,
        cli.quiet,
        use_color(&cli.color, cli.json),
    ));

    let config = Config::resolve(cli.config.as_deref(), &paths::default_config())?;
    config.init_logging(cli.verbose);
    info!(version = env!("CARGO_PKG_VERSION"), "opendoc starting");

    match cli.command {
        None | Some(Commands::Shell) => {
            let mut state = login::open_editor(&config, &cli.session)?;
            shell::run(&mut state)
        }
        Some(Commands::Tables) => {
            let mut state = login::open_editor(&config, &cli.session)?;
            grid::print_tables(state.list_tables()?);
            Ok(())
        }
        Some(Commands::Show(args)) => {
            let mut state = login::open_editor(&config, &cli.session)?;
            show(&mut state, &args)
        }
        Some(Commands::Exec(args)) => {
            let mut state = login::open_editor(&config, &cli.session)?;
            exec(&mut state, args)
        }
        Some(Commands::New(args)) => {
            let session = login::login(&config, &cli.session)?;
            let mut state = EditorState::new(session, config.editor_settings());
            new(&mut state, &args)
        }
    }
}

fn show(state: &mut EditorState, args: &ShowArgs) -> Result<()> {
    state.load_table(&args.table)?;
    if let Some(column) = &args.sort {
        state.sort_by_column(column)?;
        if args.desc {
            state.sort_by_column(column)?;
        }
    }
    if let Some(view) = state.view() {
        grid::print_view(view, state.sort().current());
    }
    state.close()
}

fn exec(state: &mut EditorState, args: ExecArgs) -> Result<()> {
    let sql = match args.sql {
        Some(sql) => sql,
        None => {
            let mut sql = String::new();
            std::io::stdin().read_to_string(&mut sql)?;
            sql
        }
    };
    if sql.trim().is_empty() {
        return Err(Error::Usage("no SQL given".into()));
    }
    dispatch::execute(state, Command::Sql(sql))?;
    state.close()
}

fn new(state: &mut EditorState, args: &NewArgs) -> Result<()> {
    state.new_file(&args.path, args.template)?;
    output::success(&format!("created {}", args.path.display()));
    grid::print_tables(state.tables());
    state.close()
}
