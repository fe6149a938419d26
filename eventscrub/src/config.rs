//! Configuration for password and secret masking.

use thiserror::Error;

/// Default character used to build the mask token.
pub const MASK_CHAR: char = '*';

/// Number of mask characters substituted for every masked value.
///
/// The token has the same length whatever the original value was, so the
/// length of a secret is never disclosed.
pub const MASK_LEN: usize = 8;

/// Key fragments that mark a value as sensitive by default.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &["password", "secret"];

/// Errors produced while building a sanitizer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sensitive key pattern at index {index} is empty and would match every key")]
    EmptyKeyPattern { index: usize },

    #[error("mask character {0:?} is whitespace or a control character")]
    InvisibleMaskChar(char),

    #[cfg(feature = "json")]
    #[error("failed to parse sanitizer configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for [`crate::SanitizePasswordsProcessor`].
///
/// A key is sensitive when its lower-cased form contains any of
/// `sensitive_keys`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "json", serde(default, deny_unknown_fields))]
pub struct SanitizeConfig {
    pub mask_char: char,
    pub sensitive_keys: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            mask_char: MASK_CHAR,
            sensitive_keys: DEFAULT_SENSITIVE_KEYS
                .iter()
                .map(|key| (*key).to_owned())
                .collect(),
        }
    }
}

impl SanitizeConfig {
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Adds a key fragment to the sensitive set.
    #[must_use]
    pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sensitive_keys.push(key.into());
        self
    }

    /// Checks that the configuration can be used to build a sanitizer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mask_char.is_whitespace() || self.mask_char.is_control() {
            return Err(ConfigError::InvisibleMaskChar(self.mask_char));
        }
        if let Some(index) = self.sensitive_keys.iter().position(String::is_empty) {
            return Err(ConfigError::EmptyKeyPattern { index });
        }
        Ok(())
    }

    /// The fixed-length token substituted for masked values.
    pub fn mask(&self) -> String {
        std::iter::repeat_n(self.mask_char, MASK_LEN).collect()
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// Missing fields take their default values.
    #[cfg(feature = "json")]
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}
