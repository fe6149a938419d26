//! Adapter for emitting scrubbed events through `tracing`.
//!
//! # Example
//!
//! ```
//! use eventscrub::{Event, Pipeline, tracing::TracingScrubbedExt};
//!
//! let pipeline = Pipeline::default_sanitizing();
//! let mut event = Event::new();
//! event.insert("message", "login failed");
//!
//! tracing::warn!(event = %event.tracing_scrubbed(&pipeline));
//! ```

use tracing::field::{DisplayValue, display};

use crate::{event::Event, processor::Processor};

/// Extension trait for logging an event only after it went through a pipeline.
pub trait TracingScrubbedExt {
    /// Runs a copy of the event through `processor` and wraps the resulting
    /// JSON for use as a `tracing` display field.
    ///
    /// If the scrubbed event cannot be serialized, the field holds a
    /// placeholder message instead.
    fn tracing_scrubbed<P: Processor + ?Sized>(&self, processor: &P) -> DisplayValue<String>;
}

impl TracingScrubbedExt for Event {
    fn tracing_scrubbed<P: Processor + ?Sized>(&self, processor: &P) -> DisplayValue<String> {
        let scrubbed = processor.process(self.clone());
        let text = serde_json::to_string(&scrubbed)
            .unwrap_or_else(|err| format!("Failed to serialize scrubbed event: {err}"));
        display(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pipeline;

    #[test]
    fn renders_scrubbed_json() {
        let mut event = Event::new();
        event.insert(
            "http",
            crate::Value::Map(
                [("querystring".to_owned(), "password=hunter2".into())]
                    .into_iter()
                    .collect(),
            ),
        );
        let rendered = format!("{:?}", event.tracing_scrubbed(&Pipeline::default_sanitizing()));
        assert_eq!(rendered, r#"{"http":{"querystring":"password=********"}}"#);
    }

    #[test]
    fn leaves_original_event_untouched() {
        let mut event = Event::new();
        event.insert(
            "http",
            crate::Value::Map([("body".to_owned(), "x".into())].into_iter().collect()),
        );
        let before = event.clone();
        let _ = event.tracing_scrubbed(&Pipeline::strict());
        assert_eq!(event, before);
    }
}
