//! Command-line interface definition for OKU
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, kernel listing, crisis resources and
//! the breathing exercise.

use clap::{Parser, Subcommand};

/// OKU - meditation and well-being companion
///
/// Talk with a meditation persona ("kernel"), breathe, and find crisis
/// resources when you need them.
#[derive(Parser, Debug, Clone)]
#[command(name = "oku")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for OKU
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive conversation with a kernel
    Chat {
        /// Kernel to start with (defaults to chat.default_kernel)
        #[arg(short, long)]
        kernel: Option<String>,

        /// Override the provider from config (gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// List the available kernels
    Kernels {
        /// Print machine readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show crisis resources
    Sos,

    /// Run a cardiac coherence breathing session
    Breathe {
        /// Number of cycles (defaults to breathing.default_cycles)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        cycles: Option<u32>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                kernel: None,
                provider: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Chat {
                kernel: None,
                provider: None
            }
        ));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["oku", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_with_kernel_and_provider() {
        let cli =
            Cli::try_parse_from(["oku", "chat", "--kernel", "zen-global", "-p", "gemini"]).unwrap();
        if let Commands::Chat { kernel, provider } = cli.command {
            assert_eq!(kernel, Some("zen-global".to_string()));
            assert_eq!(provider, Some("gemini".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_kernels_json() {
        let cli = Cli::try_parse_from(["oku", "kernels", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Kernels { json: true }));

        let cli = Cli::try_parse_from(["oku", "kernels"]).unwrap();
        assert!(matches!(cli.command, Commands::Kernels { json: false }));
    }

    #[test]
    fn test_cli_parse_sos() {
        let cli = Cli::try_parse_from(["oku", "sos"]).unwrap();
        assert!(matches!(cli.command, Commands::Sos));
    }

    #[test]
    fn test_cli_parse_breathe() {
        let cli = Cli::try_parse_from(["oku", "breathe", "-n", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Breathe { cycles: Some(3) }));

        let cli = Cli::try_parse_from(["oku", "breathe"]).unwrap();
        assert!(matches!(cli.command, Commands::Breathe { cycles: None }));
    }

    #[test]
    fn test_cli_parse_breathe_rejects_negative_cycles() {
        assert!(Cli::try_parse_from(["oku", "breathe", "--cycles", "-1"]).is_err());
    }

    #[test]
    fn test_cli_parse_breathe_rejects_zero_cycles() {
        assert!(Cli::try_parse_from(["oku", "breathe", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["oku", "breathe", "-n", "1"]).is_ok());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["oku", "--config", "custom.yaml", "sos"]).unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["oku", "-v", "kernels"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["oku"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["oku", "invalid"]).is_err());
    }
}
