use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        match level.trim().to_lowercase().as_str() {
            "error" | "0" => Ok(0),
            "warn" | "1" => Ok(1),
            "info" | "2" => Ok(2),
            "debug" | "3" => Ok(3),
            "trace" | "4" => Ok(4),
            other => Err(format!(
                "invalid log level `{other}`, expected error, warn, info, debug or trace"
            )),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("VESTIBULE_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
