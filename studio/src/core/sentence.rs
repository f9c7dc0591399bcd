//! Sentence model shared by the editor and the assembler.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry;

/// Language of a freshly created sentence.
pub const DEFAULT_LANG: &str = "en-us";
/// Voice of a freshly created sentence.
pub const DEFAULT_VOICE: &str = "af_sarah";
/// Speed multiplier of a freshly created sentence.
pub const DEFAULT_SPEED: f32 = 1.0;

/// One line of speech: what to say and how to say it.
///
/// Fields missing from JSON input are filled from [`Sentence::default`], so
/// partially specified imports still produce complete sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentence {
    pub text: String,
    #[serde(alias = "language")]
    pub lang: String,
    pub voice: String,
    pub speed: f32,
}

impl Default for Sentence {
    fn default() -> Self {
        Self {
            text: String::new(),
            lang: DEFAULT_LANG.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            speed: DEFAULT_SPEED,
        }
    }
}

/// A single field update applied by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "field", content = "value")]
pub enum SentenceField {
    Text(String),
    #[serde(alias = "language")]
    Lang(String),
    Voice(String),
    Speed(f32),
}

/// A field value a sentence cannot hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Voice {voice} is not available for language {lang}")]
    VoiceNotInLanguage { voice: String, lang: String },
    #[error("Speed must be a positive number, got {0}")]
    InvalidSpeed(f32),
}

impl Sentence {
    pub fn new(
        text: impl Into<String>,
        lang: impl Into<String>,
        voice: impl Into<String>,
        speed: f32,
    ) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            voice: voice.into(),
            speed,
        }
    }

    /// Remap the voice to the language's first voice when it does not belong
    /// to the language. Returns `true` when the voice was changed.
    ///
    /// Languages without a registered voice list are left untouched.
    pub fn validate_voice(&mut self) -> bool {
        let voices = registry::voices_for_lang(&self.lang);
        match voices.first() {
            Some(first) if !voices.contains(&self.voice.as_str()) => {
                self.voice = (*first).to_string();
                true
            }
            _ => false,
        }
    }

    /// Apply a field update. Changing the language repairs the voice;
    /// returns `true` when that repair changed the voice.
    ///
    /// A voice outside a known language's list and a speed that is not a
    /// positive finite number are rejected, leaving the sentence unchanged.
    pub fn set_field(&mut self, field: SentenceField) -> Result<bool, FieldError> {
        match field {
            SentenceField::Text(text) => {
                self.text = text;
                Ok(false)
            }
            SentenceField::Lang(lang) => {
                self.lang = lang;
                Ok(self.validate_voice())
            }
            SentenceField::Voice(voice) => {
                let voices = registry::voices_for_lang(&self.lang);
                if !voices.is_empty() && !voices.contains(&voice.as_str()) {
                    return Err(FieldError::VoiceNotInLanguage {
                        voice,
                        lang: self.lang.clone(),
                    });
                }
                self.voice = voice;
                Ok(false)
            }
            SentenceField::Speed(speed) => {
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(FieldError::InvalidSpeed(speed));
                }
                self.speed = speed;
                Ok(false)
            }
        }
    }

    /// Blank-text sentence carrying over this sentence's language, voice and speed.
    pub fn follow_up(&self) -> Self {
        Self {
            text: String::new(),
            ..self.clone()
        }
    }
}
