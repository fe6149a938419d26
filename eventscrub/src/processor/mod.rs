//! Event processors and the pipeline that chains them.
//!
//! - **`Processor`**: the single-method contract every step implements
//! - **`pipeline`**: ordered composition of processors ([`Pipeline`])
//! - **`remove`**: processors that strip whole fields
//!   ([`RemovePostDataProcessor`], [`RemoveStackLocalsProcessor`])
//! - **`sanitize`**: masking of password-like values ([`SanitizePasswordsProcessor`])

mod pipeline;
mod remove;
mod sanitize;

pub use pipeline::Pipeline;
pub use remove::{RemovePostDataProcessor, RemoveStackLocalsProcessor};
pub use sanitize::{HTTP_FIELDS, SanitizePasswordsProcessor};

use crate::event::Event;

// =============================================================================
// Processor
// =============================================================================

/// A single scrubbing step applied to an event.
///
/// Processors are built once and reused for many events; they keep no state
/// between calls. Implementations either provide [`Processor::get_data`] to
/// return a replacement event, or override [`Processor::process`] to edit the
/// event they are handed.
///
/// A processor must not panic on an event that lacks optional keys, and it
/// always returns an event.
pub trait Processor: Send + Sync {
    /// Returns a replacement for `event`, or `None` to keep it unchanged.
    ///
    /// Any `Some` replaces the event, including `Some(Event::new())`: an
    /// empty replacement yields an empty event, it does not fall back to the
    /// input.
    fn get_data(&self, _event: &Event) -> Option<Event> {
        None
    }

    /// Runs the processor over `event`.
    ///
    /// The default returns the [`Processor::get_data`] replacement when there
    /// is one, however empty, and `event` otherwise.
    fn process(&self, event: Event) -> Event {
        self.get_data(&event).unwrap_or(event)
    }

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn get_data(&self, event: &Event) -> Option<Event> {
        (**self).get_data(event)
    }

    fn process(&self, event: Event) -> Event {
        (**self).process(event)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
