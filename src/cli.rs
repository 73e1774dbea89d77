//! Command line surface
//!
//! Two optional subcommands, `clone` and `cleanup`, plus a global `--loglevel`.
//! The short forms `-fwd`, `-rev` and `-ll` are longer than one letter, which
//! clap cannot declare, so [`normalize_args`] rewrites them (and their
//! unambiguous prefixes) to their long spelling before parsing. Long options
//! may be abbreviated to any unambiguous prefix.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::config::CONFIG_FILE;
use crate::locator::{parse_chat_arg, ChatArg};

#[derive(Parser, Debug)]
#[command(name = "clone_chat")]
#[command(about = "Telegram Clone Chat", long_about = None)]
#[command(version)]
#[command(infer_long_args = true)]
pub struct Cli {
    /// Set the log level. Default: INFO
    #[arg(
        long = "loglevel",
        value_name = "LOGLEVEL",
        value_enum,
        default_value_t = LogLevel::Info,
        global = true
    )]
    pub loglevel: LogLevel,

    /// Path to the YAML configuration with Telegram credentials
    #[arg(long, value_name = "PATH", env = "CLONE_CHAT_CONFIG", default_value = CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// `None` when no subcommand is given
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Clone Chat
    #[command(infer_long_args = true)]
    Clone(CloneArgs),

    /// Cleanup Chats
    #[command(infer_long_args = true)]
    Cleanup,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Clone(_) => "clone",
            Commands::Cleanup => "cleanup",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CloneArgs {
    /// Target Chat ID like -100123456/@channelname or a dumpped chat folder containing dump.db file.
    #[arg(
        short,
        long,
        value_name = "INPUT",
        value_parser = parse_chat_arg,
        allow_negative_numbers = true
    )]
    pub input: ChatArg,

    /// Output Chat ID like -100123456/@channelname or a foldername to dump the chat into dump.db file.
    #[arg(
        short,
        long,
        value_name = "OUTPUT",
        value_parser = parse_chat_arg,
        allow_negative_numbers = true
    )]
    pub output: ChatArg,

    /// Forward the messages from input to outptut if the user is allowed to do. Default: False
    #[arg(long = "forward")]
    pub forward: bool,

    /// If set, the messages will be returned in reverse order (from oldest to newest, instead of
    /// the default newest to oldest). This also means that the meaning of `offset_id` and
    /// `offset_date` parameters is reversed, although they will still be exclusive. `min_id`
    /// becomes equivalent to `offset_id` instead of being `max_id` as well since messages are
    /// returned in ascending order. Default: False
    #[arg(long = "reverse")]
    pub reverse: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// tracing has no level above ERROR, so CRITICAL shares it
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite the multi-letter single-dash flags, or a prefix of one, to their
/// long form.
///
/// Everything after a bare `--` is passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg.to_str() == Some("--") {
                passthrough = true;
                return arg;
            }
            match arg.to_str() {
                Some("-f" | "-fw" | "-fwd") => OsString::from("--forward"),
                Some("-r" | "-re" | "-rev") => OsString::from("--reverse"),
                Some("-l" | "-ll") => OsString::from("--loglevel"),
                Some(s) if s.starts_with("-ll=") => {
                    OsString::from(format!("--loglevel={}", &s[4..]))
                }
                _ => arg,
            }
        })
        .collect()
}

/// Parse an argument vector (program name first) without touching process state.
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalize_args(args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn clone_args(cli: &Cli) -> &CloneArgs {
        match &cli.command {
            Some(Commands::Clone(args)) => args,
            other => panic!("expected clone, got {:?}", other),
        }
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_documented_example() {
        let cli = parse_from(["prog", "clone", "-i", "-100123456", "-o", "./archive", "-rev"]).unwrap();
        let args = clone_args(&cli);

        assert_eq!(cli.command.as_ref().map(Commands::name), Some("clone"));
        assert_eq!(args.input, ChatArg::Id(-100123456));
        assert_eq!(args.output, ChatArg::Path(PathBuf::from("./archive")));
        assert!(!args.forward);
        assert!(args.reverse);
        assert_eq!(cli.loglevel, LogLevel::Info);
    }

    #[test]
    fn long_flags_and_handles() {
        let cli = parse_from([
            "prog", "clone", "--input", "@source", "--output", "12345", "--forward",
        ])
        .unwrap();
        let args = clone_args(&cli);

        assert_eq!(args.input, ChatArg::Path(PathBuf::from("@source")));
        assert_eq!(args.output, ChatArg::Id(12345));
        assert!(args.forward);
        assert!(!args.reverse);
    }

    #[test]
    fn flags_are_independent() {
        let cases = [
            (vec![], false, false),
            (vec!["-fwd"], true, false),
            (vec!["-rev"], false, true),
            (vec!["-fwd", "-rev"], true, true),
            (vec!["--reverse", "--forward"], true, true),
        ];

        for (flags, forward, reverse) in cases {
            let mut argv = vec!["prog", "clone", "-i", "1", "-o", "2"];
            argv.extend(flags.iter().copied());
            let cli = parse_from(argv).unwrap();
            let args = clone_args(&cli);
            assert_eq!(args.forward, forward, "{:?}", flags);
            assert_eq!(args.reverse, reverse, "{:?}", flags);
        }
    }

    #[test]
    fn missing_input_or_output_is_rejected() {
        for argv in [
            vec!["prog", "clone", "-o", "2"],
            vec!["prog", "clone", "-i", "1"],
            vec!["prog", "clone"],
        ] {
            let err = parse_from(argv.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument, "{:?}", argv);
            assert_ne!(err.exit_code(), 0);
        }
    }

    #[test]
    fn loglevel_choices() {
        for (raw, level) in [
            ("DEBUG", LogLevel::Debug),
            ("INFO", LogLevel::Info),
            ("WARNING", LogLevel::Warning),
            ("ERROR", LogLevel::Error),
            ("CRITICAL", LogLevel::Critical),
        ] {
            let cli = parse_from(["prog", "--loglevel", raw, "cleanup"]).unwrap();
            assert_eq!(cli.loglevel, level);
            assert_eq!(cli.loglevel.to_string(), raw);
        }
    }

    #[test]
    fn unknown_loglevel_is_rejected() {
        for raw in ["FOO", "debug", "WARN"] {
            let err = parse_from(["prog", "-ll", raw, "cleanup"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "{raw}");
            assert_ne!(err.exit_code(), 0);
        }
    }

    #[test]
    fn short_loglevel_before_and_after_subcommand() {
        let before = parse_from(["prog", "-ll", "DEBUG", "cleanup"]).unwrap();
        assert_eq!(before.loglevel, LogLevel::Debug);

        let after = parse_from(["prog", "clone", "-i", "1", "-o", "x", "-ll", "ERROR"]).unwrap();
        assert_eq!(after.loglevel, LogLevel::Error);

        let joined = parse_from(["prog", "cleanup", "-ll=CRITICAL"]).unwrap();
        assert_eq!(joined.loglevel, LogLevel::Critical);
    }

    #[test]
    fn cleanup_rejects_clone_options() {
        let err = parse_from(["prog", "cleanup", "--input", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse_from(["prog", "cleanup", "-fwd"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn cleanup_parses_without_options() {
        let cli = parse_from(["prog", "cleanup"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Cleanup));
        assert_eq!(cli.command.as_ref().map(Commands::name), Some("cleanup"));
    }

    #[test]
    fn subcommand_is_optional() {
        let bare = parse_from(["prog"]).unwrap();
        assert_eq!(bare.command, None);
        assert_eq!(bare.loglevel, LogLevel::Info);

        let with_level = parse_from(["prog", "-ll", "DEBUG"]).unwrap();
        assert_eq!(with_level.command, None);
        assert_eq!(with_level.loglevel, LogLevel::Debug);
    }

    #[test]
    fn long_options_accept_unambiguous_prefixes() {
        let cli = parse_from(["prog", "clone", "--inp", "5", "--out", "x", "--rev", "--for"]).unwrap();
        let args = clone_args(&cli);
        assert_eq!(args.input, ChatArg::Id(5));
        assert_eq!(args.output, ChatArg::Path(PathBuf::from("x")));
        assert!(args.forward);
        assert!(args.reverse);

        let cli = parse_from(["prog", "--log", "DEBUG", "cleanup"]).unwrap();
        assert_eq!(cli.loglevel, LogLevel::Debug);

        let cli = parse_from(["prog", "cleanup", "--log", "ERROR"]).unwrap();
        assert_eq!(cli.loglevel, LogLevel::Error);
    }

    #[test]
    fn short_prefixes_of_multi_letter_flags() {
        for flags in [["-r", "-f"], ["-re", "-fw"]] {
            let mut argv = vec!["prog", "clone", "-i", "1", "-o", "2"];
            argv.extend(flags);
            let cli = parse_from(argv).unwrap();
            let args = clone_args(&cli);
            assert!(args.forward, "{:?}", flags);
            assert!(args.reverse, "{:?}", flags);
        }

        let cli = parse_from(["prog", "-l", "WARNING", "cleanup"]).unwrap();
        assert_eq!(cli.loglevel, LogLevel::Warning);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let err = parse_from(["prog", "restore"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn normalize_leaves_values_after_terminator() {
        let args = normalize_args(["prog", "-fwd", "-rev", "-ll", "--", "-fwd"]);
        let expected: Vec<OsString> = ["prog", "--forward", "--reverse", "--loglevel", "--", "-fwd"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn level_filters() {
        assert_eq!(LogLevel::Debug.as_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Warning.as_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Critical.as_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
