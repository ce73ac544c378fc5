use clap::Parser;
use opendoc::adapter::inbound::cli::command::Cli;
use opendoc::adapter::inbound::cli::{output, run};

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = run::execute(cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
