mod cli;
mod config;
mod data;
mod driver;
mod error;
mod logging;
mod messages;
mod output;
mod template;

use clap::Parser;
use cli::Cli;
use error::{EXIT_FAILURE, EXIT_SUCCESS};
use messages::Messages;
use tracing::error;

fn main() {
    // Parse CLI arguments; --help and --version exit successfully
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            };
            std::process::exit(code);
        }
    };

    logging::init_logging(cli.verbose);

    // The message table is needed before anything else can be reported
    let messages = match Messages::load(cli.messages.as_deref()) {
        Ok(messages) => messages,
        Err(e) => {
            error!("{}", Messages::english().describe(&e));
            std::process::exit(e.exit_code());
        }
    };

    let result = cli
        .into_settings(&messages)
        .and_then(|settings| driver::run(&settings, &messages));

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            error!("{}", messages.describe(&e));
            std::process::exit(e.exit_code());
        }
    }
}
