//! Terminal rendering of transcripts, banners and overlays
//!
//! Every function returns the text to print so the output can be checked
//! without a terminal.

use crate::chat::{Message, Role, SessionStatus};
use crate::kernel::{Kernel, KernelRegistry};
use crate::safety::CrisisResource;

use chrono::Local;
use colored::{Color, Colorize};
use serde::Serialize;
use std::fmt::Write;

pub const DISCLAIMER: &str = "Cet agent est une aide à la méditation et au bien-être. Il ne remplace pas un professionnel de la santé. En cas de crise, tapez /sos.";

pub const CRISIS_HEADING: &str = "Besoin d'aide immédiate?";
pub const CRISIS_BODY: &str =
    "Tu n'es pas seul(e). Des gens sont là pour t'écouter, gratuitement et confidentiellement.";
pub const CRISIS_DISMISS: &str = "Je vais bien, retourner à l'application";

pub const KERNEL_SWITCH_NOTE: &str =
    "Changer de Kernel réinitialise la conversation en cours pour adapter la persona.";

const RULE: &str = "══════════════════════════════════════════════════════════════";

/// One transcript entry: `[HH:MM] Author: text`
pub fn format_message(message: &Message, kernel: Option<&Kernel>) -> String {
    let time = message
        .timestamp()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let accent = kernel.map_or(Color::Cyan, |k| k.theme.accent());

    match message.role() {
        Role::User => format!(
            "{} {} {}",
            format!("[{}]", time).dimmed(),
            "Vous:".color(accent).bold(),
            message.content().color(accent)
        ),
        Role::Model => format!(
            "{} {} {}",
            format!("[{}]", time).dimmed(),
            format!("{}:", kernel.map_or("OKU", |k| k.name)).bold(),
            message.content()
        ),
        Role::System if message.is_error() => format!(
            "{} {}",
            format!("[{}]", time).dimmed(),
            format!("⚠ {}", message.content()).red()
        ),
        Role::System => format!(
            "{} {}",
            format!("[{}]", time).dimmed(),
            message.content().dimmed()
        ),
    }
}

/// Header shown after a kernel is activated
pub fn format_kernel_banner(kernel: &Kernel) -> String {
    let accent = kernel.theme.accent();
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", format!("╔{}╗", RULE).color(accent));
    let _ = writeln!(
        out,
        "  {}  {}",
        kernel.badge().to_string().color(accent).bold(),
        kernel.name.bold()
    );
    let _ = writeln!(out, "  {}", kernel.header_line().dimmed());
    let _ = writeln!(out, "  {} · {}", kernel.specialty, kernel.description);
    let _ = write!(out, "{}", format!("╚{}╝", RULE).color(accent));
    out
}

pub fn format_disclaimer() -> String {
    format!("{} {}", "ⓘ".yellow(), DISCLAIMER.yellow())
}

/// Visible banner for a failed session initialisation
pub fn format_init_error(error: &str) -> String {
    format!(
        "{}\n{}",
        "Impossible d'initialiser la conversation avec ce Kernel."
            .red()
            .bold(),
        format!("  {}", error).red()
    )
}

/// Crisis overlay: heading, reassurance, resources with call links
pub fn format_crisis_overlay(resources: &[CrisisResource]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", format!("╔{}╗", RULE).red());
    let _ = writeln!(out, "  {}", CRISIS_HEADING.red().bold());
    let _ = writeln!(out, "  {}", CRISIS_BODY);
    let _ = writeln!(out);
    out.push_str(&format_resources(resources));
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} {}", "/ok".bold(), CRISIS_DISMISS.dimmed());
    let _ = write!(out, "{}", format!("╚{}╝", RULE).red());
    out
}

/// Resource list with tap-to-call links
pub fn format_resources(resources: &[CrisisResource]) -> String {
    let mut out = String::new();
    for resource in resources {
        let name = if resource.urgent {
            resource.name.red().bold()
        } else {
            resource.name.bold()
        };
        let _ = writeln!(out, "  • {}", name);
        let _ = writeln!(
            out,
            "    {}  {}",
            resource.contact.bold(),
            resource.tel_link().underline()
        );
        let _ = writeln!(out, "    {}", resource.description.dimmed());
    }
    out
}

/// Kernel selector listing; the active kernel is marked
pub fn format_kernel_list(registry: &KernelRegistry, active: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "Kernels disponibles".bold());
    for kernel in registry.all() {
        let marker = if Some(kernel.id) == active { "▶" } else { " " };
        let _ = writeln!(
            out,
            "  {} {} {:<12} {} · {} · {}",
            marker,
            kernel.badge(),
            kernel.id.color(kernel.theme.accent()).bold(),
            kernel.name,
            kernel.specialty,
            kernel.audio.base_frequency
        );
        let _ = writeln!(out, "      {}", kernel.description.dimmed());
    }
    let _ = write!(out, "  {}", KERNEL_SWITCH_NOTE.italic().dimmed());
    out
}

/// Machine readable kernel listing entry
#[derive(Debug, Serialize)]
pub struct KernelSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub culture: &'a str,
    pub specialty: &'a str,
    pub description: &'a str,
    pub base_frequency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binaural_beat: Option<&'a str>,
    pub default: bool,
}

pub fn kernel_summaries<'a>(registry: &'a KernelRegistry, default_id: &str) -> Vec<KernelSummary<'a>> {
    registry
        .all()
        .iter()
        .map(|k| KernelSummary {
            id: k.id,
            name: k.name,
            culture: k.culture,
            specialty: k.specialty,
            description: k.description,
            base_frequency: k.audio.base_frequency,
            binaural_beat: k.audio.binaural_beat,
            default: k.id == default_id,
        })
        .collect()
}

/// Everything `/status` shows
#[derive(Debug, Clone)]
pub struct StatusView<'a> {
    pub kernel: Option<&'a Kernel>,
    pub provider: &'a str,
    pub model: &'a str,
    pub messages: usize,
    pub session: Option<SessionStatus>,
    pub crisis_visible: bool,
    pub init_error: Option<String>,
}

pub fn format_status(view: &StatusView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n╔{}╗", RULE);
    let _ = writeln!(out, "║{:^62}║", "OKU Session Status");
    let _ = writeln!(out, "╚{}╝\n", RULE);
    let _ = writeln!(
        out,
        "Kernel:            {}",
        view.kernel
            .map_or_else(|| "none".to_string(), |k| k.to_string())
    );
    let _ = writeln!(out, "Provider:          {} ({})", view.provider, view.model);
    let _ = writeln!(out, "Transcript:        {} messages", view.messages);
    match view.session {
        Some(s) => {
            let _ = writeln!(
                out,
                "Session:           {} (generation {}, {} history entries)",
                if s.live { "live" } else { "none" },
                s.generation,
                s.history_len
            );
        }
        None => {
            let _ = writeln!(out, "Session:           busy");
        }
    }
    let _ = writeln!(
        out,
        "Crisis overlay:    {}",
        if view.crisis_visible { "visible" } else { "hidden" }
    );
    if let Some(error) = &view.init_error {
        let _ = writeln!(out, "Last init error:   {}", error.red());
    }
    out
}
