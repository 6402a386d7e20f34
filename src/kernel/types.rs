//! Core types for kernels.

use colored::Color;
use serde::Serialize;
use std::fmt;

/// Visual theme of a kernel
///
/// Colour descriptors are `<family>-<shade>` names. Only the family is used
/// by the terminal renderer; the full descriptors are kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KernelTheme {
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub gradient: &'static str,
    pub avatar_url: &'static str,
}

impl KernelTheme {
    /// Terminal colour closest to the primary colour family
    ///
    /// # Examples
    ///
    /// ```
    /// use colored::Color;
    /// use oku::kernel::KernelTheme;
    ///
    /// let theme = KernelTheme {
    ///     primary_color: "blue-600",
    ///     secondary_color: "teal-500",
    ///     gradient: "blue-600 -> teal-400",
    ///     avatar_url: "",
    /// };
    /// assert_eq!(theme.accent(), Color::Blue);
    /// ```
    pub fn accent(&self) -> Color {
        color_family(self.primary_color)
    }
}

fn color_family(descriptor: &str) -> Color {
    let family = descriptor.split('-').next().unwrap_or(descriptor);
    match family {
        "blue" | "indigo" | "sky" => Color::Blue,
        "teal" | "cyan" => Color::Cyan,
        "green" | "emerald" | "lime" => Color::Green,
        "red" | "rose" => Color::Red,
        "yellow" | "amber" | "orange" => Color::Yellow,
        "purple" | "violet" | "fuchsia" | "pink" => Color::Magenta,
        _ => Color::White,
    }
}

/// Audio metadata of a kernel (display only, nothing is played)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioConfig {
    /// Base frequency label, e.g. "432Hz"
    pub base_frequency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binaural_beat: Option<&'static str>,
    pub description: &'static str,
}

/// A selectable persona configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Kernel {
    /// Stable identifier used on the command line, e.g. `genesis-qc`
    pub id: &'static str,
    pub name: &'static str,
    pub culture: &'static str,
    pub specialty: &'static str,
    pub description: &'static str,
    pub theme: KernelTheme,
    /// Sent once to the remote endpoint when a session is opened
    pub system_instruction: &'static str,
    /// First transcript entry after activation, authored as `model`
    pub opening_message: &'static str,
    pub audio: AudioConfig,
}

impl Kernel {
    /// Short header line: `OKU Kernel • <culture> • <frequency>`
    pub fn header_line(&self) -> String {
        format!(
            "OKU Kernel • {} • {}",
            self.culture, self.audio.base_frequency
        )
    }

    /// First character of the culture label, used as a selector badge
    pub fn badge(&self) -> char {
        self.culture.chars().next().unwrap_or('?')
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: KernelTheme = KernelTheme {
        primary_color: "stone-600",
        secondary_color: "teal-500",
        gradient: "stone-700 -> stone-500",
        avatar_url: "",
    };

    #[test]
    fn test_accent_maps_color_family() {
        assert_eq!(THEME.accent(), Color::White);
    }

    #[test]
    fn test_accent_unknown_descriptor_falls_back_to_white() {
        assert_eq!(color_family(""), Color::White);
        assert_eq!(color_family("chartreuse-100"), Color::White);
    }

    #[test]
    fn test_header_line_and_badge() {
        let kernel = Kernel {
            id: "test",
            name: "Test",
            culture: "Québec ⚜️",
            specialty: "Testing",
            description: "",
            theme: THEME,
            system_instruction: "be nice",
            opening_message: "hello",
            audio: AudioConfig {
                base_frequency: "432Hz",
                binaural_beat: None,
                description: "",
            },
        };
        assert_eq!(kernel.header_line(), "OKU Kernel • Québec ⚜️ • 432Hz");
        assert_eq!(kernel.badge(), 'Q');
        assert_eq!(kernel.to_string(), "Test (test)");
    }
}
