/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes four top-level command modules:

- `chat`     — Interactive conversation with a kernel
- `kernels`  — Kernel listing
- `sos`      — Crisis resources
- `breathe`  — Standalone breathing session
*/

use crate::breathing::{BreathingExercise, BreathingPattern};
use crate::chat::{ConversationController, SendOutcome};
use crate::commands::special_commands::{
    parse_special_command, print_help, CommandError, SpecialCommand,
};
use crate::config::Config;
use crate::error::{OkuError, Result};
use crate::kernel::{Kernel, KernelRegistry};
use crate::providers::{create_provider, Provider};
use crate::safety::crisis_resources;

use colored::{Color, Colorize};
use std::sync::Arc;
use tokio::sync::watch;

// Terminal rendering helpers
pub mod render;

// Special commands parser for the chat loop
pub mod special_commands;

/// Run a breathing session on stdout, interruptible with Ctrl-C
///
/// Returns the number of completed cycles.
async fn run_breathing(pattern: BreathingPattern, cycles: u32, accent: Color) -> Result<u32> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let mut out = std::io::stdout();
    let result = BreathingExercise::new(pattern)
        .with_accent(accent)
        .run(cycles, &mut out, cancel_rx)
        .await;

    ctrl_c.abort();
    result
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Creates the provider and the conversation controller, activates the
    //! initial kernel and runs a readline-based loop. Slash commands act on
    //! the session; everything else is sent to the kernel.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Whether the loop keeps going after a special command
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Flow {
        Continue,
        Exit,
    }

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `kernel_id` - Optional override for the configured default kernel
    /// * `provider_name` - Optional override for the configured provider
    ///
    /// # Errors
    ///
    /// Returns error if the kernel is unknown, the provider cannot be
    /// created or the terminal cannot be initialised. Remote failures are
    /// reported in the transcript and never end the loop.
    pub async fn run_chat(
        config: Config,
        kernel_id: Option<String>,
        provider_name: Option<String>,
    ) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let provider_type = provider_name
            .as_deref()
            .unwrap_or(&config.provider.provider_type);

        let registry = KernelRegistry::builtin();
        let kernel = registry.get(
            kernel_id
                .as_deref()
                .unwrap_or(&config.chat.default_kernel),
        )?;

        let provider: Arc<dyn Provider> =
            Arc::from(create_provider(provider_type, &config.provider)?);
        let controller = ConversationController::new(
            provider,
            config.provider.gemini.model.clone(),
            config.provider.gemini.sampling(),
        )?;
        let mut crisis_rx = controller.subscribe_crisis();

        let mut rl = DefaultEditor::new()?;

        if config.chat.show_disclaimer {
            println!("\n{}", render::format_disclaimer());
        }
        activate_kernel(&controller, kernel).await;
        println!("\nType '/help' for available commands, 'exit' to quit\n");

        loop {
            let prompt = format_prompt(controller.active_kernel());
            match rl.readline(&prompt) {
                Ok(line) => match classify_line(&line) {
                    Ok(LineKind::Blank) => continue,
                    Ok(LineKind::Command(command)) => {
                        let flow = handle_special_command(
                            command,
                            &controller,
                            &registry,
                            &config,
                            &mut crisis_rx,
                        )
                        .await?;
                        if flow == Flow::Exit {
                            break;
                        }
                    }
                    Ok(LineKind::Message(text)) => {
                        rl.add_history_entry(text.trim())?;
                        send_and_render(&controller, text, &mut crisis_rx).await;
                    }
                    Err(e) => {
                        eprintln!("{}\n", e.to_string().red());
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Namasté. À bientôt.");
        Ok(())
    }

    /// What a line read at the prompt asks for
    #[derive(Debug, PartialEq, Eq)]
    enum LineKind<'a> {
        Blank,
        Command(SpecialCommand),
        /// Text for the kernel, exactly as typed
        Message(&'a str),
    }

    fn classify_line(line: &str) -> std::result::Result<LineKind<'_>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(LineKind::Blank);
        }
        match parse_special_command(trimmed)? {
            SpecialCommand::None => Ok(LineKind::Message(line)),
            command => Ok(LineKind::Command(command)),
        }
    }

    fn format_prompt(kernel: Option<&'static Kernel>) -> String {
        match kernel {
            Some(k) => format!("{} > ", k.name.color(k.theme.accent()).bold()),
            None => "OKU > ".to_string(),
        }
    }

    /// Switch to `kernel` and print its banner and opening message, or the
    /// initialisation error banner
    async fn activate_kernel(controller: &ConversationController, kernel: &'static Kernel) {
        println!("{}", render::format_kernel_banner(kernel));
        match controller.switch_kernel(kernel).await {
            Ok(()) => {
                for message in controller.transcript() {
                    println!("\n{}", render::format_message(&message, Some(kernel)));
                }
            }
            Err(e) => {
                let error = controller.init_error().unwrap_or_else(|| e.to_string());
                println!("\n{}", render::format_init_error(&error));
            }
        }
    }

    /// Print the crisis overlay if visibility changed to shown
    fn render_crisis_change(crisis_rx: &mut watch::Receiver<bool>) {
        if crisis_rx.has_changed().unwrap_or(false) && *crisis_rx.borrow_and_update() {
            println!("{}", render::format_crisis_overlay(crisis_resources()));
        }
    }

    /// Send one user line, showing the crisis overlay as soon as it is
    /// raised and the reply once it arrives
    async fn send_and_render(
        controller: &ConversationController,
        text: &str,
        crisis_rx: &mut watch::Receiver<bool>,
    ) {
        let kernel = controller.active_kernel();
        let before = controller.transcript_len();

        println!(
            "{}",
            format!("{} écrit…", kernel.map_or("OKU", |k| k.name))
                .dimmed()
                .italic()
        );

        let send = controller.send_user_message(text);
        tokio::pin!(send);
        let outcome = loop {
            tokio::select! {
                outcome = &mut send => break outcome,
                Ok(()) = crisis_rx.changed() => {
                    if *crisis_rx.borrow_and_update() {
                        println!("{}", render::format_crisis_overlay(crisis_resources()));
                    }
                }
            }
        };
        render_crisis_change(crisis_rx);

        match outcome {
            SendOutcome::Ignored(reason) => {
                tracing::debug!("Message not sent: {:?}", reason);
            }
            SendOutcome::Replied | SendOutcome::Failed => {
                for message in controller.transcript().iter().skip(before) {
                    if message.role() != crate::chat::Role::User {
                        println!("\n{}\n", render::format_message(message, kernel));
                    }
                }
            }
        }
    }

    async fn handle_special_command(
        command: SpecialCommand,
        controller: &ConversationController,
        registry: &KernelRegistry,
        config: &Config,
        crisis_rx: &mut watch::Receiver<bool>,
    ) -> Result<Flow> {
        match command {
            SpecialCommand::ListKernels => {
                let active = controller.active_kernel().map(|k| k.id);
                println!("{}\n", render::format_kernel_list(registry, active));
            }
            SpecialCommand::SwitchKernel(id) => match registry.get(&id) {
                Ok(kernel) => {
                    if controller.active_kernel().map(|k| k.id) == Some(kernel.id)
                        && controller.init_error().is_none()
                    {
                        println!("{} is already active\n", kernel);
                    } else {
                        activate_kernel(controller, kernel).await;
                        println!();
                    }
                }
                Err(e) => eprintln!("{}\n", e.to_string().red()),
            },
            SpecialCommand::Sos => {
                controller.show_crisis();
                crisis_rx.borrow_and_update();
                println!("{}\n", render::format_crisis_overlay(crisis_resources()));
            }
            SpecialCommand::DismissCrisis => {
                if controller.crisis_visible() {
                    controller.dismiss_crisis();
                    crisis_rx.borrow_and_update();
                    println!("{}\n", "Prends soin de toi.".dimmed());
                } else {
                    println!("No crisis overlay to dismiss\n");
                }
            }
            SpecialCommand::Breathe(cycles) => {
                let accent = controller
                    .active_kernel()
                    .map_or(Color::Cyan, |k| k.theme.accent());
                let cycles = cycles.unwrap_or(config.breathing.default_cycles);
                if let Err(e) = run_breathing(
                    BreathingPattern::from_config(&config.breathing),
                    cycles,
                    accent,
                )
                .await
                {
                    eprintln!("{}\n", e.to_string().red());
                }
            }
            SpecialCommand::ShowStatus => {
                let view = render::StatusView {
                    kernel: controller.active_kernel(),
                    provider: controller.provider_name(),
                    model: controller.model(),
                    messages: controller.transcript_len(),
                    session: controller.session_status(),
                    crisis_visible: controller.crisis_visible(),
                    init_error: controller.init_error(),
                };
                println!("{}", render::format_status(&view));
            }
            SpecialCommand::Reset => match controller.active_kernel() {
                Some(kernel) => {
                    activate_kernel(controller, kernel).await;
                    println!();
                }
                None => eprintln!("{}\n", "No kernel is active".red()),
            },
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit => return Ok(Flow::Exit),
            SpecialCommand::None => {}
        }
        Ok(Flow::Continue)
    }

}

// Kernel listing handler
pub mod kernels {
    use super::*;

    /// Print the kernel table, or JSON with `json`
    ///
    /// # Errors
    ///
    /// Returns error if JSON serialization fails
    pub fn run_kernels(config: &Config, json: bool) -> Result<()> {
        let registry = KernelRegistry::builtin();
        if json {
            let summaries = render::kernel_summaries(&registry, &config.chat.default_kernel);
            let json = serde_json::to_string_pretty(&summaries).map_err(OkuError::Serialization)?;
            println!("{}", json);
        } else {
            println!(
                "{}",
                render::format_kernel_list(&registry, Some(config.chat.default_kernel.as_str()))
            );
        }
        Ok(())
    }
}

// Crisis resources handler
pub mod sos {
    use super::*;

    /// Print the crisis resources with their call links
    pub fn run_sos() -> Result<()> {
        println!("\n  {}", render::CRISIS_HEADING.red().bold());
        println!("  {}\n", render::CRISIS_BODY);
        print!("{}", render::format_resources(crisis_resources()));
        println!();
        Ok(())
    }
}

// Standalone breathing handler
pub mod breathe {
    use super::*;

    /// Run a breathing session with the configured pattern
    ///
    /// # Errors
    ///
    /// Returns error if the default kernel is unknown or writing fails
    pub async fn run_breathe(config: &Config, cycles: Option<u32>) -> Result<()> {
        let kernel = KernelRegistry::builtin().get(&config.chat.default_kernel)?;
        let cycles = cycles.unwrap_or(config.breathing.default_cycles);
        let completed = run_breathing(
            BreathingPattern::from_config(&config.breathing),
            cycles,
            kernel.theme.accent(),
        )
        .await?;
        tracing::debug!("Breathing session ended after {} cycles", completed);
        Ok(())
    }
}
