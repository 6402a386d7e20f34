//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - List and switch kernels
//! - Open the crisis resources and dismiss them
//! - Start a breathing exercise
//! - Reset the conversation or view its status
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything that
//! is not a command is sent to the kernel as-is.

use crate::error::OkuError;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

impl From<CommandError> for OkuError {
    fn from(err: CommandError) -> Self {
        OkuError::Command(err.to_string())
    }
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session rather than being sent to the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// List the available kernels
    ListKernels,

    /// Switch to another kernel, resetting the conversation
    SwitchKernel(String),

    /// Show the crisis resources overlay
    Sos,

    /// Dismiss the crisis resources overlay
    DismissCrisis,

    /// Run a breathing exercise, optionally with a cycle count
    Breathe(Option<u32>),

    /// Display kernel, session and transcript status
    ShowStatus,

    /// Restart the current kernel with an empty conversation
    Reset,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the kernel.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a valid command.
/// Returns `CommandError::UnsupportedArgument` if a command receives an invalid argument.
/// Returns `CommandError::MissingArgument` if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use oku::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/kernel zen-global").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchKernel("zen-global".to_string()));
///
/// let cmd = parse_special_command("/breathe 3").unwrap();
/// assert_eq!(cmd, SpecialCommand::Breathe(Some(3)));
///
/// let cmd = parse_special_command("bonjour").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match (command.as_str(), arg) {
        ("exit" | "quit" | "/exit" | "/quit", None) => Ok(SpecialCommand::Exit),

        ("/kernels", None) => Ok(SpecialCommand::ListKernels),
        ("/kernel", Some(id)) => Ok(SpecialCommand::SwitchKernel(id.to_string())),
        ("/kernel", None) => Err(CommandError::MissingArgument {
            command: "/kernel".to_string(),
            usage: "/kernel <id>".to_string(),
        }),

        ("/sos", None) => Ok(SpecialCommand::Sos),
        ("/ok", None) => Ok(SpecialCommand::DismissCrisis),

        ("/breathe", None) => Ok(SpecialCommand::Breathe(None)),
        ("/breathe", Some(n)) => match n.parse::<u32>() {
            Ok(cycles) if cycles > 0 => Ok(SpecialCommand::Breathe(Some(cycles))),
            _ => Err(CommandError::UnsupportedArgument {
                command: "/breathe".to_string(),
                arg: n.to_string(),
            }),
        },

        ("/status", None) => Ok(SpecialCommand::ShowStatus),
        ("/reset", None) => Ok(SpecialCommand::Reset),
        ("/help" | "/?", None) => Ok(SpecialCommand::Help),

        (
            "exit" | "quit" | "/exit" | "/quit" | "/kernels" | "/sos" | "/ok" | "/status"
            | "/reset" | "/help" | "/?",
            Some(arg),
        ) => Err(CommandError::UnsupportedArgument {
            command: command.clone(),
            arg: arg.to_string(),
        }),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help information for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
==========================================

KERNELS:
  /kernels        - List available kernels
  /kernel <id>    - Switch kernel (resets the conversation)

WELL-BEING:
  /breathe [n]    - Cardiac coherence exercise, n cycles (Ctrl-C stops it)
  /sos            - Show crisis resources
  /ok             - Dismiss the crisis resources

SESSION:
  /status         - Show kernel and session status
  /reset          - Restart the conversation with the current kernel
  /help           - Show this help message
  /?              - Same as /help
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the kernel
  - OKU is a meditation aid, not a substitute for professional care
"#
    );
}
