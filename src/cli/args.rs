//! Command-line argument parsing for assistant-chat.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use thiserror::Error;

/// Usage text printed by `--help` and after argument errors.
pub const USAGE: &str = "\
Usage: assistant-chat [OPTIONS]

Chat with an assistant service from the terminal.

Options:
  -a, --assistant <NAME>  Assistant to talk to
  -u, --url <URL>         Service base URL (default http://localhost:8000)
  -m, --message <TEXT>    Send one message, print the reply and exit
  -l, --list              List available assistants
  -V, --version           Print version
  -h, --help              Print this help

In the interactive chat, Ctrl+C cancels the reply in progress,
/new starts a new conversation and /quit exits.";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List the service's assistants
    ListAssistants,
    /// Chat interactively, or send one message with `--message` (default)
    Chat,
}

/// Command plus the options that modify it.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    pub assistant: Option<String>,
    pub url: Option<String>,
    pub message: Option<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: CliCommand::Chat,
            assistant: None,
            url: None,
            message: None,
        }
    }
}

/// Problems with the command line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

/// Parse command-line arguments, including the program name.
///
/// `--version` and `--help` win over everything else. Options accept both
/// `--flag value` and `--flag=value`.
///
/// # Examples
///
/// ```
/// use assistant_chat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["assistant-chat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut early: Option<CliCommand> = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        let mut value = |name: &str| -> Result<String, ArgsError> {
            match inline.clone() {
                Some(value) => Ok(value),
                None => args.next().ok_or_else(|| ArgsError::MissingValue(name.to_string())),
            }
        };

        match flag.as_str() {
            "--version" | "-V" => {
                early.get_or_insert(CliCommand::Version);
            }
            "--help" | "-h" => {
                early.get_or_insert(CliCommand::Help);
            }
            "--list" | "-l" => parsed.command = CliCommand::ListAssistants,
            "--assistant" | "-a" => parsed.assistant = Some(value("--assistant")?),
            "--url" | "-u" => parsed.url = Some(value("--url")?),
            "--message" | "-m" => parsed.message = Some(value("--message")?),
            _ => return Err(ArgsError::UnknownArgument(arg)),
        }
    }

    if let Some(command) = early {
        parsed.command = command;
    }
    Ok(parsed)
}
