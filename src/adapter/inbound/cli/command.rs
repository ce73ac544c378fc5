//! Command-line interface definitions.
//!
//! Defines the CLI structure for opendoc using `clap`. Without a
//! subcommand the interactive shell starts.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::template::Template;

/// Terminal database browser and SQL editor for SQLite files
#[derive(Parser, Debug)]
#[command(name = "opendoc")]
#[command(version)]
pub struct Cli {
    /// Configuration file [default: ~/.opendoc/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Credentials and database selection shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Username to log in as (prompted when omitted)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long, global = true)]
    pub password_stdin: bool,

    /// Working database file, overriding the configured one
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Credential store file, overriding the configured one
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// List the tables of the working database
    Tables,

    /// Print the rows of a table
    Show(ShowArgs),

    /// Run a SQL script against the working database
    Exec(ExecArgs),

    /// Create a new database file
    New(NewArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Table to print
    pub table: String,

    /// Sort by this column (ascending)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// SQL text; read from stdin when omitted
    pub sql: Option<String>,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Path of the database to create
    pub path: PathBuf,

    /// Fill the database from a template [user, business]
    #[arg(short, long)]
    pub template: Option<Template>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "opendoc");
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["opendoc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_color_choice_default_is_auto() {
        assert!(matches!(ColorChoice::default(), ColorChoice::Auto));
    }

    #[test]
    fn test_parse_color_never() {
        let cli = Cli::try_parse_from(["opendoc", "--color", "never", "tables"]).unwrap();
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "opendoc", "tables", "--user", "kim", "--password-stdin", "-vv", "--json",
        ])
        .unwrap();
        assert_eq!(cli.session.user.as_deref(), Some("kim"));
        assert!(cli.session.password_stdin);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn test_show_sort_desc() {
        let cli =
            Cli::try_parse_from(["opendoc", "show", "people", "--sort", "age", "--desc"]).unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.table, "people");
                assert_eq!(args.sort.as_deref(), Some("age"));
                assert!(args.desc);
            }
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["opendoc", "show", "people", "--desc"]).is_err());
    }

    #[test]
    fn test_new_with_template() {
        let cli = Cli::try_parse_from(["opendoc", "new", "shop.db", "-t", "business"]).unwrap();
        match cli.command {
            Some(Commands::New(args)) => {
                assert_eq!(args.path, PathBuf::from("shop.db"));
                assert_eq!(args.template, Some(Template::Business));
            }
            other => panic!("expected new, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        assert!(Cli::try_parse_from(["opendoc", "new", "x.db", "-t", "school"]).is_err());
    }
}
