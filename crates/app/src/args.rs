use std::fmt;

use shapeville_core::model::TutorSettingsDraft;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play    [--seed <n>] [--time-limit <secs>] [--bonus-time-limit <secs>] [--json]");
    eprintln!("  cargo run -p app -- catalog");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --time-limit 180");
    eprintln!("  --bonus-time-limit 300");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SHAPEVILLE_SEED, SHAPEVILLE_TIME_LIMIT, SHAPEVILLE_BONUS_TIME_LIMIT, SHAPEVILLE_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Catalog,
}

impl Command {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "catalog" => Some(Self::Catalog),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub command: Command,
    pub settings: TutorSettingsDraft,
    pub json: bool,
    pub help: bool,
}

impl Args {
    /// Parses everything after the program name. No subcommand means `play`.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut argv = argv.into_iter().peekable();
        let command = match argv.peek().map(String::as_str) {
            None => Command::Play,
            Some(first) if first.starts_with('-') => Command::Play,
            Some(first) => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?;
                argv.next();
                command
            }
        };

        match command {
            Command::Play => Self::parse_play(&mut argv),
            Command::Catalog => Self::parse_catalog(&mut argv),
        }
    }

    fn parse_play(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut settings = TutorSettingsDraft::new();
        settings.seed = env_number("SHAPEVILLE_SEED");
        settings.time_limit_secs = env_number("SHAPEVILLE_TIME_LIMIT");
        settings.bonus_time_limit_secs = env_number("SHAPEVILLE_BONUS_TIME_LIMIT");
        let mut json = false;
        let mut help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    settings.seed = Some(parse_number("--seed", value)?);
                }
                "--time-limit" => {
                    let value = require_value(args, "--time-limit")?;
                    settings.time_limit_secs = Some(parse_number("--time-limit", value)?);
                }
                "--bonus-time-limit" => {
                    let value = require_value(args, "--bonus-time-limit")?;
                    settings.bonus_time_limit_secs =
                        Some(parse_number("--bonus-time-limit", value)?);
                }
                "--json" => json = true,
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command: Command::Play,
            settings,
            json,
            help,
        })
    }

    fn parse_catalog(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut help = false;
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Self {
            command: Command::Catalog,
            settings: TutorSettingsDraft::new(),
            json: false,
            help,
        })
    }
}
