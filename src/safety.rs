//! Client-side safety trigger and crisis resources
//!
//! The trigger is a keyword heuristic run against every outgoing user
//! message. A match only raises the crisis overlay; it never blocks or
//! alters the message. It is best-effort and language-specific, and must
//! not be relied on as a safety guarantee.

use crate::error::{OkuError, Result};
use regex::Regex;
use serde::Serialize;

/// French stems match anywhere in the text, English stems are anchored at
/// a word start so that e.g. "diet" or "change" do not fire.
const DANGER_PATTERN: &str =
    r"(?i)suicid|tuer|mourir|mort|pendre|finir|\bkill|\bdie\b|\bdying\b|\bdead\b|\bhang(?:ing)?\b|\bend\s+it\b";

/// Keyword matcher for self-harm related text
#[derive(Debug, Clone)]
pub struct SafetyTrigger {
    pattern: Regex,
}

impl SafetyTrigger {
    /// Build the trigger with the bundled pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::safety::SafetyTrigger;
    ///
    /// let trigger = SafetyTrigger::new().unwrap();
    /// assert!(trigger.check("je veux mourir"));
    /// assert!(!trigger.check("je veux méditer"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns error if the pattern fails to compile
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(DANGER_PATTERN)
            .map_err(|e| OkuError::Config(format!("Invalid safety pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Returns true when the text contains any trigger token
    pub fn check(&self, text: &str) -> bool {
        let hit = self.pattern.is_match(text);
        if hit {
            tracing::warn!("Safety trigger matched outgoing message");
        }
        hit
    }
}

/// A crisis hotline or support service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrisisResource {
    pub name: &'static str,
    /// Contact as displayed, e.g. "1 800 363-9010"
    pub contact: &'static str,
    pub description: &'static str,
    pub urgent: bool,
}

impl CrisisResource {
    /// Contact reduced to its digits
    pub fn dial_digits(&self) -> String {
        self.contact.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Tap-to-call link
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::safety::crisis_resources;
    ///
    /// let sos = &crisis_resources()[1];
    /// assert_eq!(sos.tel_link(), "tel:18003639010");
    /// ```
    pub fn tel_link(&self) -> String {
        format!("tel:{}", self.dial_digits())
    }
}

static CRISIS_RESOURCES: [CrisisResource; 3] = [
    CrisisResource {
        name: "988 Suicide & Crisis Lifeline",
        contact: "988",
        description: "Appel ou SMS disponible 24/7 au Canada et USA.",
        urgent: true,
    },
    CrisisResource {
        name: "SOS Violence Conjugale",
        contact: "1 800 363-9010",
        description: "Soutien 24/7 pour victimes de violence conjugale.",
        urgent: true,
    },
    CrisisResource {
        name: "Tel-Jeunes",
        contact: "1 800 263-2266",
        description: "Pour les jeunes du Québec, 24/7.",
        urgent: false,
    },
];

/// Crisis resources, displayed verbatim
pub fn crisis_resources() -> &'static [CrisisResource] {
    &CRISIS_RESOURCES
}
