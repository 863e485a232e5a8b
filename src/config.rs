use std::ffi::OsString;

use clap::{App, Arg, ArgMatches};
use thiserror::Error;

use super::fragment::Location;
use super::gateway::EngineOptions;
use super::inspector::DisplayFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Also carries `--help` and `--version`, which clap reports as errors.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("not a number for --{name}: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        source:  url::ParseError,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Where the initial pattern is read from, and echoed to on edit.
    pub address:   Location,
    /// Render the startup state and stop.
    pub once:      bool,
    pub format:    DisplayFormat,
    pub engine:    EngineOptions,
    pub verbosity: u64,
}

pub fn app() -> App<'static, 'static> {
    App::new("re-inspect")
        .version("0.1")
        .author("Rémi Dupré <remi.dupre@ens-paris-saclay.fr>")
        .about(
            "Inspect how a regular expression is compiled. Each line read from \
             STDIN replaces the pattern.",
        )
        .arg(
            Arg::with_name("address")
                .help("URL or #fragment holding the percent-encoded initial pattern."),
        )
        .arg(
            Arg::with_name("once")
                .long("once")
                .help("Render the initial pattern and exit without reading STDIN."),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .short("f")
                .takes_value(true)
                .default_value("text")
                .possible_value("text")
                .possible_value("json")
                .help("Output format of each render."),
        )
        .arg(
            Arg::with_name("color")
                .long("color")
                .takes_value(true)
                .default_value("auto")
                .possible_value("auto")
                .possible_value("always")
                .possible_value("never")
                .help("Colourize text output. `auto` only does so on a terminal."),
        )
        .arg(
            Arg::with_name("max_mem")
                .long("max-mem")
                .takes_value(true)
                .help("Size limit in bytes of a compiled program (default: 8MiB)."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log more, repeat for debug logs. RE_INSPECT_LOG overrides."),
        )
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;
        Config::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, ConfigError> {
        let address = match matches.value_of("address") {
            None => Location::blank(),
            Some(address) => Location::parse(address).map_err(|source| ConfigError::InvalidAddress {
                address: address.to_string(),
                source,
            })?,
        };

        let color = match matches.value_of("color") {
            Some("always") => true,
            Some("never") => false,
            _ => atty::is(atty::Stream::Stdout),
        };

        let format = match matches.value_of("format") {
            Some("json") => DisplayFormat::Json,
            _ => DisplayFormat::Text { color },
        };

        let mut engine = EngineOptions::default();
        if let Some(s) = matches.value_of("max_mem") {
            engine.max_mem = s.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                name:  "max-mem",
                value: s.to_string(),
            })?;
        }

        Ok(Config {
            address,
            once: matches.is_present("once"),
            format,
            engine,
            verbosity: matches.occurrences_of("verbose"),
        })
    }
}
