//! CLI module for assistant-chat.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and help display
//! - Listing assistants
//! - One-shot and interactive chat
//!
//! # Usage
//!
//! ```ignore
//! use assistant_chat::cli::{parse_args, run, run_info_command};
//!
//! let args = parse_args(std::env::args())?;
//! if !run_info_command(&args.command) {
//!     runtime.block_on(run(args))?;
//! }
//! ```

pub mod args;
pub mod chat;
pub mod output;
pub mod version;

pub use args::{parse_args, ArgsError, CliArgs, CliCommand, USAGE};
pub use output::PrintSink;
pub use version::{version_line, VERSION};

use color_eyre::Result;

use crate::client::AssistantClient;
use crate::config::ClientConfig;
use crate::error::StreamError;
use crate::traits::HttpClient;

/// Handle commands that need neither the network nor a runtime.
///
/// Returns `true` if the command was handled.
pub fn run_info_command(command: &CliCommand) -> bool {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            true
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            true
        }
        CliCommand::ListAssistants | CliCommand::Chat => false,
    }
}

/// Layer command-line options over the loaded configuration.
pub fn apply_args(config: ClientConfig, args: &CliArgs) -> ClientConfig {
    let mut config = config;
    if let Some(url) = &args.url {
        config = config.with_base_url(url.clone());
    }
    if let Some(assistant) = &args.assistant {
        config = config.with_assistant(assistant.clone());
    }
    config
}

/// Pick the configured assistant, or the first one the service offers.
pub async fn resolve_assistant<C: HttpClient>(
    client: &AssistantClient<C>,
    config: &ClientConfig,
) -> Result<String> {
    if let Some(assistant) = &config.assistant {
        return Ok(assistant.clone());
    }

    let assistants = client.list_assistants().await?;
    match assistants.into_iter().next() {
        Some(first) => {
            eprintln!("Using assistant {}", first.summary());
            Ok(first.name)
        }
        None => Err(StreamError::NoAssistant.into()),
    }
}

/// Run a network command.
pub async fn run(args: CliArgs) -> Result<()> {
    if run_info_command(&args.command) {
        return Ok(());
    }

    let config = apply_args(ClientConfig::load()?, &args);
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");
    let client = AssistantClient::from_config(&config)?;

    match args.command {
        CliCommand::ListAssistants => {
            for assistant in client.list_assistants().await? {
                println!("{}", assistant.summary());
            }
            Ok(())
        }
        CliCommand::Chat => {
            let assistant = resolve_assistant(&client, &config).await?;
            let mut session = client.new_session(assistant);
            let mut interrupts = chat::ctrl_c_interrupts();

            match &args.message {
                Some(message) => {
                    chat::one_shot(&client, &mut session, message, &mut interrupts).await
                }
                None => {
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    let mut sink = PrintSink::stdio();
                    chat::chat_loop(&client, &mut session, stdin, &mut sink, &mut interrupts)
                        .await
                }
            }
        }
        CliCommand::Version | CliCommand::Help => Ok(()),
    }
}
