//! Writing persona folded into generation prompts.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Voice and preferences of the account owner.
///
/// Levels are on a 0..=1 scale. Any field missing from a persona file
/// keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub personal_brand: String,
    pub tone: String,
    pub writing_style: String,
    pub content_focus: Vec<String>,
    pub preferred_hashtags: Vec<String>,
    pub formality: f32,
    pub enthusiasm: f32,
    pub humor: f32,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            personal_brand: "Tech-savvy builder and AI enthusiast".to_string(),
            tone: "Professional yet approachable".to_string(),
            writing_style: "Clear, concise, and technically accurate".to_string(),
            content_focus: vec![
                "AI and machine learning developments".to_string(),
                "Tech industry insights".to_string(),
                "Learning and growth in tech".to_string(),
            ],
            preferred_hashtags: vec![
                "#AI".to_string(),
                "#MachineLearning".to_string(),
                "#Innovation".to_string(),
            ],
            formality: 0.7,
            enthusiasm: 0.8,
            humor: 0.5,
        }
    }
}

impl Persona {
    /// Load a persona from a JSON file.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let persona_error = |reason: String| ConfigError::Persona {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(&path).map_err(|e| persona_error(e.to_string()))?;
        let persona: Persona =
            serde_json::from_str(&raw).map_err(|e| persona_error(e.to_string()))?;

        tracing::info!(path = %path.display(), "Loaded persona");
        Ok(persona.clamped())
    }

    fn clamped(mut self) -> Self {
        self.formality = self.formality.clamp(0.0, 1.0);
        self.enthusiasm = self.enthusiasm.clamp(0.0, 1.0);
        self.humor = self.humor.clamp(0.0, 1.0);
        self
    }

    /// Render the persona as a prompt section.
    pub fn prompt_context(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "Author profile:");
        let _ = writeln!(out, "- Personal brand: {}", self.personal_brand);
        let _ = writeln!(out, "- Tone: {}", self.tone);
        let _ = writeln!(out, "- Writing style: {}", self.writing_style);
        if !self.content_focus.is_empty() {
            let _ = writeln!(out, "- Content focus: {}", self.content_focus.join(", "));
        }
        if !self.preferred_hashtags.is_empty() {
            let _ = writeln!(
                out,
                "- Preferred hashtags: {}",
                self.preferred_hashtags.join(" ")
            );
        }
        let _ = writeln!(
            out,
            "- Formality {:.1}, enthusiasm {:.1}, humor {:.1} (0 = none, 1 = maximum)",
            self.formality, self.enthusiasm, self.humor
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_persona_keeps_defaults() {
        let persona: Persona =
            serde_json::from_str(r#"{"tone": "Playful", "enthusiasm": 3.0}"#).unwrap();
        let persona = persona.clamped();

        assert_eq!(persona.tone, "Playful");
        assert_eq!(persona.enthusiasm, 1.0);
        assert_eq!(persona.writing_style, Persona::default().writing_style);
    }

    #[test]
    fn test_prompt_context_mentions_hashtags() {
        let context = Persona::default().prompt_context();
        assert!(context.contains("#AI"));
        assert!(context.contains("Professional yet approachable"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Persona::load(PathBuf::from("/nonexistent/persona.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Persona { .. }));
    }
}
