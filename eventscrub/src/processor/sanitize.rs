//! Masking of password-like values in stack frames and HTTP data.
//!
//! A value is masked when the key it sits under contains one of the
//! configured fragments (`password` and `secret` by default), compared
//! case-insensitively. Masked values are replaced by a fixed-length token.

use tracing::trace;

use super::Processor;
use crate::{
    client::ClientHandle,
    config::{ConfigError, SanitizeConfig},
    event::{Event, Interface},
    traversal::{KeyVisitor, varmap},
    value::{Map, Value},
};

/// HTTP sub-record fields that are sanitized, in processing order.
pub const HTTP_FIELDS: [&str; 5] = ["body", "cookies", "headers", "env", "querystring"];

/// Masks values stored under password-like or secret-like keys.
#[derive(Clone, Debug)]
pub struct SanitizePasswordsProcessor {
    mask: String,
    sensitive_keys: Vec<String>,
    client: Option<ClientHandle>,
}

impl Default for SanitizePasswordsProcessor {
    fn default() -> Self {
        Self::from_valid_config(&SanitizeConfig::default())
    }
}

impl SanitizePasswordsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sanitizer from `config` after validating it.
    pub fn with_config(config: &SanitizeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &SanitizeConfig) -> Self {
        Self {
            mask: config.mask(),
            sensitive_keys: config
                .sensitive_keys
                .iter()
                .map(|key| key.to_lowercase())
                .collect(),
            client: None,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: ClientHandle) -> Self {
        self.client = Some(client);
        self
    }

    pub fn client(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }

    /// The token substituted for every masked value.
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// Returns `true` if values under `key` must be masked.
    ///
    /// A missing or empty key cannot be classified and is never sensitive.
    pub fn is_sensitive_key(&self, key: Option<&str>) -> bool {
        let Some(key) = key.filter(|key| !key.is_empty()) else {
            return false;
        };
        let key = key.to_lowercase();
        self.sensitive_keys
            .iter()
            .any(|fragment| key.contains(fragment.as_str()))
    }

    /// Masks `value` if `key` is sensitive, otherwise returns it unchanged.
    pub fn sanitize(&self, key: Option<&str>, value: Value) -> Value {
        if self.is_sensitive_key(key) {
            trace!(key, "masked value");
            Value::Text(self.mask.clone())
        } else {
            value
        }
    }

    /// Masks the values of sensitive pairs in a URL-encoded query string.
    ///
    /// Pairs keep their order and are split on the first `=` only. Percent
    /// escapes are left as they are. A pair without `=` is kept verbatim.
    pub fn sanitize_query(&self, query: &str) -> String {
        query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, _)) if self.is_sensitive_key(Some(key)) => {
                    trace!(key, "masked query parameter");
                    format!("{key}={}", self.mask)
                }
                _ => pair.to_owned(),
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Masks sensitive locals in every frame of a stacktrace sub-record.
    ///
    /// Frames that are not mappings are skipped. Frames and frame lists held
    /// in shared cells are rebuilt into new cells.
    pub fn filter_stacktrace(&self, stacktrace: &mut Map) {
        let Some(frames) = stacktrace.get_mut("frames") else {
            return;
        };
        frames.edit_seq(|frames| {
            for frame in frames {
                frame.edit_map(|frame| {
                    if let Some(vars) = frame.get_mut("vars") {
                        *vars = varmap(self, std::mem::take(vars));
                    }
                });
            }
        });
    }

    /// Masks sensitive data in the well-known fields of an HTTP sub-record.
    ///
    /// Text containing `=` is treated as a query string; anything else is
    /// traversed as a nested value.
    pub fn filter_http(&self, http: &mut Map) {
        for name in HTTP_FIELDS {
            let Some(field) = http.get_mut(name) else {
                continue;
            };
            *field = match std::mem::take(field) {
                Value::Text(text) if text.contains('=') => Value::Text(self.sanitize_query(&text)),
                other => varmap(self, other),
            };
        }
    }
}

impl KeyVisitor for SanitizePasswordsProcessor {
    fn visit(&self, key: Option<&str>, value: Value) -> Value {
        self.sanitize(key, value)
    }
}

impl Processor for SanitizePasswordsProcessor {
    fn process(&self, mut event: Event) -> Event {
        event.edit_interface(Interface::Stacktrace, |stacktrace| {
            self.filter_stacktrace(stacktrace);
        });
        event.edit_interface(Interface::Http, |http| self.filter_http(http));
        event
    }
}
