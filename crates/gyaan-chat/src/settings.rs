use gyaan_config::{Config, MAX_WORD_TARGET, MIN_WORD_TARGET, WORD_TARGET_STEP};
use gyaan_core::AuxDirective;

use crate::error::{ChatError, Result};
use crate::prompts::UiStrings;

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f64 = 0.7;
/// Output token cap sent with every completion request.
pub const MAX_TOKENS: u32 = 800;

/// Per-turn knobs. Read fresh on every turn, so changes apply to the next
/// submitted message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub language: String,
    pub word_target: u32,
    pub moderation_enabled: bool,
    pub always_add_practice: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ChatSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.llm.model.clone(),
            language: config.chat.language.clone(),
            word_target: config.chat.word_target,
            moderation_enabled: config.chat.moderation_enabled,
            always_add_practice: config.chat.always_add_practice,
        }
    }
}

impl ChatSettings {
    pub fn set_word_target(&mut self, words: u32) -> Result<()> {
        check_word_target(words)?;
        self.word_target = words;
        Ok(())
    }

    pub fn directive(&self, strings: &UiStrings) -> AuxDirective {
        AuxDirective::new(self.word_target, self.always_add_practice, strings.language_hint)
    }
}

pub fn check_word_target(words: u32) -> Result<()> {
    if (MIN_WORD_TARGET..=MAX_WORD_TARGET).contains(&words) && words % WORD_TARGET_STEP == 0 {
        Ok(())
    } else {
        Err(ChatError::InvalidSetting(format!(
            "word target must be a multiple of {} between {} and {}",
            WORD_TARGET_STEP, MIN_WORD_TARGET, MAX_WORD_TARGET
        )))
    }
}
