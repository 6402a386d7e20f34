//! Cardiac coherence breathing exercise
//!
//! A cycle is inhale, short hold, exhale. With the default 4s / 1s / 5s
//! pattern a cycle lasts 10 seconds, i.e. 6 breaths per minute.

use crate::config::BreathingConfig;
use crate::error::{OkuError, Result};

use colored::{Color, Colorize};
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub const TITLE: &str = "Cohérence Cardiaque";
pub const SUBTITLE: &str = "Synchronisation 6 cycles / minute";
pub const CLOSING_QUOTE: &str = "Laisse tes pensées passer comme des nuages. Reviens à ton souffle.";

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathingPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathingPhase {
    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inhale => "Inspire",
            Self::Hold => "Pause",
            Self::Exhale => "Expire",
        }
    }
}

impl fmt::Display for BreathingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase durations of one breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathingPattern {
    pub inhale: Duration,
    pub hold: Duration,
    pub exhale: Duration,
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self::from_config(&BreathingConfig::default())
    }
}

impl BreathingPattern {
    pub fn new(inhale: Duration, hold: Duration, exhale: Duration) -> Self {
        Self {
            inhale,
            hold,
            exhale,
        }
    }

    pub fn from_config(config: &BreathingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.inhale_seconds),
            Duration::from_secs(config.hold_seconds),
            Duration::from_secs(config.exhale_seconds),
        )
    }

    /// Length of one full cycle, saturating at `Duration::MAX`
    pub fn cycle(&self) -> Duration {
        self.inhale
            .saturating_add(self.hold)
            .saturating_add(self.exhale)
    }

    /// Breaths per minute
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::breathing::BreathingPattern;
    ///
    /// assert_eq!(BreathingPattern::default().cycles_per_minute(), 6.0);
    /// ```
    pub fn cycles_per_minute(&self) -> f64 {
        let cycle = self.cycle().as_secs_f64();
        if cycle == 0.0 {
            0.0
        } else {
            60.0 / cycle
        }
    }

    /// Phase at `elapsed` since the start, and the time left in it
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::breathing::{BreathingPattern, BreathingPhase};
    /// use std::time::Duration;
    ///
    /// let pattern = BreathingPattern::default();
    /// let (phase, left) = pattern.phase_at(Duration::from_millis(4500));
    /// assert_eq!(phase, BreathingPhase::Hold);
    /// assert_eq!(left, Duration::from_millis(500));
    /// ```
    pub fn phase_at(&self, elapsed: Duration) -> (BreathingPhase, Duration) {
        let cycle = self.cycle();
        if cycle.is_zero() {
            return (BreathingPhase::Inhale, Duration::ZERO);
        }

        let offset = Duration::from_nanos((elapsed.as_nanos() % cycle.as_nanos()) as u64);
        if offset < self.inhale {
            (BreathingPhase::Inhale, self.inhale - offset)
        } else if offset < self.inhale + self.hold {
            (BreathingPhase::Hold, self.inhale + self.hold - offset)
        } else {
            (BreathingPhase::Exhale, cycle - offset)
        }
    }

    /// Circle size in `0.0..=1.0`: grows on inhale, stays full on hold,
    /// shrinks on exhale
    pub fn fill_at(&self, elapsed: Duration) -> f64 {
        let (phase, left) = self.phase_at(elapsed);
        let ratio = |left: Duration, total: Duration| {
            if total.is_zero() {
                0.0
            } else {
                left.as_secs_f64() / total.as_secs_f64()
            }
        };
        match phase {
            BreathingPhase::Inhale => 1.0 - ratio(left, self.inhale),
            BreathingPhase::Hold => 1.0,
            BreathingPhase::Exhale => ratio(left, self.exhale),
        }
    }
}

/// Terminal animation of a [`BreathingPattern`]
#[derive(Debug, Clone)]
pub struct BreathingExercise {
    pattern: BreathingPattern,
    tick: Duration,
    accent: Color,
}

impl BreathingExercise {
    pub fn new(pattern: BreathingPattern) -> Self {
        Self {
            pattern,
            tick: Duration::from_millis(250),
            accent: Color::Cyan,
        }
    }

    /// Frame interval
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Colour of the circle, usually the active kernel's accent
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    /// Runs `cycles` breathing cycles, drawing frames to `out`
    ///
    /// Stops early when `cancel` becomes `true`. A closed cancel channel
    /// just means the exercise cannot be interrupted. Returns the number of
    /// fully completed cycles.
    ///
    /// # Errors
    ///
    /// Returns error if writing to `out` fails, or if `cycles` cycles of
    /// this pattern do not fit in a `Duration`
    pub async fn run<W: Write>(
        &self,
        cycles: u32,
        out: &mut W,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<u32> {
        let cycle = self.pattern.cycle();
        let total = cycle.checked_mul(cycles).ok_or_else(|| {
            OkuError::Config(format!(
                "{} breathing cycles of {:?} is too long",
                cycles, cycle
            ))
        })?;

        writeln!(out)?;
        writeln!(out, "  {}", TITLE.to_uppercase().bold())?;
        writeln!(out, "  {}", SUBTITLE.dimmed())?;
        writeln!(out)?;

        let start = Instant::now();
        let mut ticker = tokio::time::interval(self.tick);
        let mut cancel_open = true;
        let mut last_phase = None;
        let mut cancelled = *cancel.borrow();

        tracing::debug!("Breathing exercise started: {} cycles of {:?}", cycles, cycle);

        while !cancelled {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = cancel.changed(), if cancel_open => {
                    match changed {
                        Ok(()) => cancelled = *cancel.borrow(),
                        Err(_) => cancel_open = false,
                    }
                    continue;
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= total {
                break;
            }

            let (phase, left) = self.pattern.phase_at(elapsed);
            if last_phase.is_some() && last_phase != Some(phase) {
                writeln!(out)?;
            }
            last_phase = Some(phase);

            write!(
                out,
                "\r{}",
                render_frame(phase, left, self.pattern.fill_at(elapsed), self.accent)
            )?;
            out.flush()?;
        }

        let elapsed = start.elapsed().min(total);
        let completed = if cycle.is_zero() {
            cycles
        } else {
            (elapsed.as_nanos() / cycle.as_nanos()) as u32
        };

        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "  {}", format!("\"{}\"", CLOSING_QUOTE).italic())?;
        writeln!(out)?;
        out.flush()?;

        if cancelled {
            tracing::info!("Breathing exercise interrupted after {} cycles", completed);
        } else {
            tracing::info!("Breathing exercise completed: {} cycles", completed);
        }

        Ok(completed)
    }
}

/// One animation line: circle bar, phase label, seconds left
pub fn render_frame(phase: BreathingPhase, left: Duration, fill: f64, accent: Color) -> String {
    let filled = ((fill.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let bar = format!(
        "{}{}",
        "●".repeat(filled).color(accent),
        "·".repeat(BAR_WIDTH - filled).dimmed()
    );
    format!(
        "  [{}]  {:<8} {:>2}s",
        bar,
        phase.label().bold(),
        left.as_secs_f64().ceil() as u64
    )
}
