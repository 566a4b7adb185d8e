//! Poetic Personas
//!
//! A persona is a named instruction preset that conditions the tone of a
//! generated poem. The set is closed and fixed at compile time; lookups by
//! label never fail and fall back to a generic instruction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction used when a label matches none of the known personas.
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful poetic assistant.";

/// The four poetic personas the muse can write in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StylePersona {
    Shakespearean,
    Cyberpunk,
    #[serde(rename = "Haiku Master")]
    HaikuMaster,
    Surrealist,
}

impl StylePersona {
    /// All personas, in display order.
    pub const ALL: [StylePersona; 4] = [
        StylePersona::Shakespearean,
        StylePersona::Cyberpunk,
        StylePersona::HaikuMaster,
        StylePersona::Surrealist,
    ];

    /// The human-facing label, which is also the lookup key.
    pub fn label(self) -> &'static str {
        match self {
            StylePersona::Shakespearean => "Shakespearean",
            StylePersona::Cyberpunk => "Cyberpunk",
            StylePersona::HaikuMaster => "Haiku Master",
            StylePersona::Surrealist => "Surrealist",
        }
    }

    /// The instruction text sent ahead of the user's request.
    pub fn instruction(self) -> &'static str {
        match self {
            StylePersona::Shakespearean => {
                "You are a bard from the 16th century. Write in iambic pentameter using archaic English (thee/thou). Keep it under 10 lines."
            }
            StylePersona::Cyberpunk => {
                "You are a rogue AI in the year 2077. Write gritty, neon-soaked free verse about technology and decay. Use slang like 'chrome' and 'glitch'."
            }
            StylePersona::HaikuMaster => {
                "You are a Zen master. Respond ONLY in strict 5-7-5 syllable structure. Focus on nature and silence."
            }
            StylePersona::Surrealist => {
                "You are a dream weaver. Write bizarre, melting logic similar to Salvador Dali paintings. Use abstract metaphors."
            }
        }
    }

    /// Exact-match lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|persona| persona.label() == label)
    }
}

impl fmt::Display for StylePersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned by [`StylePersona::from_str`] for labels outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown style '{0}'. Expected one of: Shakespearean, Cyberpunk, Haiku Master, Surrealist")]
pub struct UnknownStyle(pub String);

impl FromStr for StylePersona {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Maps any persona label to its instruction text.
///
/// Unknown labels resolve to [`DEFAULT_INSTRUCTION`] rather than failing.
pub fn resolve(label: &str) -> &'static str {
    match StylePersona::from_label(label) {
        Some(persona) => persona.instruction(),
        None => {
            tracing::debug!(style = %label, "Unknown style, using default instruction");
            DEFAULT_INSTRUCTION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_personas() {
        assert!(resolve("Shakespearean").contains("iambic pentameter"));
        assert!(resolve("Cyberpunk").contains("2077"));
        assert!(resolve("Haiku Master").contains("5-7-5"));
        assert!(resolve("Surrealist").contains("Salvador Dali"));
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        for label in ["", "Romantic", "cyberpunk", "Haiku master", " Surrealist"] {
            assert_eq!(resolve(label), DEFAULT_INSTRUCTION, "label {:?}", label);
        }
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for persona in StylePersona::ALL {
            assert_eq!(persona.label().parse::<StylePersona>(), Ok(persona));
            assert_eq!(persona.to_string(), persona.label());
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "Baroque".parse::<StylePersona>().unwrap_err();
        assert_eq!(err, UnknownStyle("Baroque".to_string()));
        assert!(err.to_string().contains("Haiku Master"));
    }

    #[test]
    fn test_instructions_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for persona in StylePersona::ALL {
            assert!(seen.insert(persona.instruction()));
            assert_ne!(persona.instruction(), DEFAULT_INSTRUCTION);
        }
    }
}
