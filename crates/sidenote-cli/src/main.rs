use anyhow::Result;
use clap::Parser;

use sidenote_cli::{cli::Cli, commands, config, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: it may carry the default log level
    let config = config::load(&cli)?;
    logging::init(cli.log_level, cli.verbose, config.log_level.as_deref());

    commands::execute(cli, config)
}
