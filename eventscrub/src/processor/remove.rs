//! Processors that strip whole fields from an event.

use tracing::trace;

use super::Processor;
use crate::{
    client::ClientHandle,
    event::{Event, Interface},
};

/// Removes the request body from the HTTP sub-record.
#[derive(Clone, Debug, Default)]
pub struct RemovePostDataProcessor {
    client: Option<ClientHandle>,
}

impl RemovePostDataProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(mut self, client: ClientHandle) -> Self {
        self.client = Some(client);
        self
    }

    pub fn client(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }
}

impl Processor for RemovePostDataProcessor {
    fn process(&self, mut event: Event) -> Event {
        event.edit_interface(Interface::Http, |http| {
            if http.remove("body").is_some() {
                trace!("removed http body");
            }
        });
        event
    }
}

/// Removes local variables from every stack frame.
#[derive(Clone, Debug, Default)]
pub struct RemoveStackLocalsProcessor {
    client: Option<ClientHandle>,
}

impl RemoveStackLocalsProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(mut self, client: ClientHandle) -> Self {
        self.client = Some(client);
        self
    }

    pub fn client(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }
}

impl Processor for RemoveStackLocalsProcessor {
    fn process(&self, mut event: Event) -> Event {
        event.edit_interface(Interface::Stacktrace, |stacktrace| {
            let Some(frames) = stacktrace.get_mut("frames") else {
                return;
            };
            let mut removed = 0_usize;
            frames.edit_seq(|frames| {
                for frame in frames {
                    frame.edit_map(|frame| {
                        if frame.remove("vars").is_some() {
                            removed += 1;
                        }
                    });
                }
            });
            trace!(removed, "removed frame locals");
        });
        event
    }
}
