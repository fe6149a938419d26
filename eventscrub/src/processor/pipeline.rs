//! Ordered composition of processors.

use std::fmt;

use tracing::{debug, trace};

use super::{
    Processor, RemovePostDataProcessor, RemoveStackLocalsProcessor, SanitizePasswordsProcessor,
};
use crate::event::Event;

/// An ordered chain of processors.
///
/// Each processor receives the event returned by the one before it. Order is
/// significant and decided by the caller; the same processor type may appear
/// more than once.
#[derive(Default)]
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual chain: mask passwords and secrets, keep everything else.
    pub fn default_sanitizing() -> Self {
        Self::new().with(SanitizePasswordsProcessor::new())
    }

    /// Strips request bodies and frame locals before masking what remains.
    pub fn strict() -> Self {
        Self::new()
            .with(RemovePostDataProcessor::new())
            .with(RemoveStackLocalsProcessor::new())
            .with(SanitizePasswordsProcessor::new())
    }

    /// Appends `processor`, returning the extended pipeline.
    #[must_use]
    pub fn with(mut self, processor: impl Processor + 'static) -> Self {
        self.push(processor);
        self
    }

    pub fn push(&mut self, processor: impl Processor + 'static) {
        self.processors.push(Box::new(processor));
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Names of the processors, in the order they run.
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Runs `event` through every processor in order.
    pub fn process(&self, event: Event) -> Event {
        let fields_before = event.len();
        let event = self
            .processors
            .iter()
            .enumerate()
            .fold(event, |event, (position, processor)| {
                trace!(position, processor = processor.name(), "running processor");
                processor.process(event)
            });
        debug!(
            processors = self.processors.len(),
            fields_before,
            fields_after = event.len(),
            "event processed"
        );
        event
    }
}

impl Processor for Pipeline {
    fn process(&self, event: Event) -> Event {
        Pipeline::process(self, event)
    }

    fn name(&self) -> &'static str {
        "Pipeline"
    }
}

impl FromIterator<Box<dyn Processor>> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Box<dyn Processor>>>(iter: I) -> Self {
        Self {
            processors: iter.into_iter().collect(),
        }
    }
}

impl Extend<Box<dyn Processor>> for Pipeline {
    fn extend<I: IntoIterator<Item = Box<dyn Processor>>>(&mut self, iter: I) {
        self.processors.extend(iter);
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    /// Appends its tag to the `trail` sequence.
    struct Tag(&'static str);

    impl Processor for Tag {
        fn process(&self, mut event: Event) -> Event {
            let mut trail = match event.remove("trail") {
                Some(Value::Seq(items)) => items,
                _ => Vec::new(),
            };
            trail.push(Value::from(self.0));
            event.insert("trail", trail);
            event
        }
    }

    fn trail(event: &Event) -> Vec<&str> {
        event
            .get("trail")
            .and_then(Value::as_seq)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let mut event = Event::new();
        event.insert("message", "hi");
        assert_eq!(Pipeline::new().process(event.clone()), event);
    }

    #[test]
    fn runs_in_insertion_order() {
        let pipeline = Pipeline::new().with(Tag("a")).with(Tag("b")).with(Tag("a"));
        let out = pipeline.process(Event::new());
        assert_eq!(trail(&out), vec!["a", "b", "a"]);
    }

    #[test]
    fn pipelines_nest() {
        let inner = Pipeline::new().with(Tag("x")).with(Tag("y"));
        let outer = Pipeline::new().with(Tag("start")).with(inner).with(Tag("end"));
        let out = outer.process(Event::new());
        assert_eq!(trail(&out), vec!["start", "x", "y", "end"]);
        assert_eq!(outer.len(), 3);
    }

    #[test]
    fn collects_boxed_processors() {
        let boxed: Vec<Box<dyn Processor>> = vec![Box::new(Tag("one")), Box::new(Tag("two"))];
        let mut pipeline: Pipeline = boxed.into_iter().collect();
        pipeline.extend([Box::new(Tag("three")) as Box<dyn Processor>]);
        assert_eq!(trail(&pipeline.process(Event::new())), vec!["one", "two", "three"]);
    }

    #[test]
    fn presets_list_their_processors() {
        assert_eq!(Pipeline::default_sanitizing().len(), 1);
        let names = Pipeline::strict().names();
        assert_eq!(names.len(), 3);
        assert!(names[0].ends_with("RemovePostDataProcessor"));
        assert!(names[1].ends_with("RemoveStackLocalsProcessor"));
        assert!(names[2].ends_with("SanitizePasswordsProcessor"));
        assert!(format!("{:?}", Pipeline::strict()).contains("RemovePostDataProcessor"));
    }
}
