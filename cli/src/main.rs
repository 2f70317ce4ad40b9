mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use snmpscan_common::config::Config;
use snmpscan_common::error;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg: Config = match commands.to_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    if cfg.verbose {
        print::banner();
        print::header("polling targets");
    }

    match scan::scan(&commands.target, &cfg).await {
        Ok(summary) => {
            if cfg.verbose {
                print::summary(&summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
