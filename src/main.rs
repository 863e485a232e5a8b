mod config;
mod fragment;
mod gateway;
mod inspector;
mod session;

extern crate clap;
extern crate regex_automata;
extern crate regex_syntax;

use std::io::{stdin, stdout};
use std::process;

use config::{Config, ConfigError};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "RE_INSPECT_LOG";

fn init_logging(verbosity: u64) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    //  ____
    // |  _ \ __ _ _ __ ___  ___ _ __
    // | |_) / _` | '__/ __|/ _ \ '__|
    // |  __/ (_| | |  \__ \  __/ |
    // |_|   \__,_|_|  |___/\___|_|
    //
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(ConfigError::Usage(err)) => err.exit(),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(2);
        }
    };

    init_logging(config.verbosity);
    tracing::debug!(?config, "starting");

    //  ___                   _
    // |_ _|_ __  _ __  _   _| |_ ___
    //  | || '_ \| '_ \| | | | __/ __|
    //  | || | | | |_) | |_| | |_\__ \
    // |___|_| |_| .__/ \__,_|\__|___/
    //           |_|

    let stdin = stdin();
    let stdout = stdout();

    if let Err(err) = session::run(&config, stdin.lock(), &mut stdout.lock()) {
        tracing::error!("{:#}", err);
        process::exit(1);
    }
}
