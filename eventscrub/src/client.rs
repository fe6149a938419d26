//! Handle to the monitoring client that owns a pipeline.
//!
//! Built-in processors keep the handle they were built with but never call
//! it. Custom processors can use it to look up settings or report what they
//! did.

use std::{fmt, sync::Arc};

/// The client a processor was built for.
pub trait Client: Send + Sync + fmt::Debug {
    /// Name used when the client shows up in diagnostics.
    fn name(&self) -> &str {
        "client"
    }
}

/// Shared handle to a [`Client`].
pub type ClientHandle = Arc<dyn Client>;
