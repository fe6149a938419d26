//! Scrubbing pipeline for error and event payloads.
//!
//! Events are scrubbed right before they leave the process. This crate
//! separates:
//! - **Processors**: single steps that strip or mask part of an event
//!   (`RemovePostDataProcessor`, `RemoveStackLocalsProcessor`,
//!   `SanitizePasswordsProcessor`, or your own [`Processor`]).
//! - **Pipelines**: ordered chains of processors, each fed the output of the
//!   one before it.
//! - **Traversal**: [`varmap`], the keyed leaf visitor processors use to
//!   reach values nested at any depth.
//!
//! What this crate does:
//! - defines the event and value model processors work on
//! - provides the built-in processors and the pipeline
//! - provides integrations behind feature flags (`json`, `tracing-ext`)
//!
//! What it does not do:
//! - capture, serialize for the wire, or send events
//! - decide which processors a client runs
//!
//! ```
//! use eventscrub::{Event, Pipeline, Value};
//!
//! let mut http = eventscrub::Map::new();
//! http.insert("querystring".into(), Value::from("password=hunter2&foo=bar"));
//! let mut event = Event::new();
//! event.insert("http", http);
//!
//! let event = Pipeline::default_sanitizing().process(event);
//! let http = event.get("http").and_then(Value::as_map).unwrap();
//! assert_eq!(http["querystring"], Value::from("password=********&foo=bar"));
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::return_self_not_must_use
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
pub mod client;
pub mod config;
pub mod event;
pub mod processor;
#[cfg(feature = "tracing-ext")]
pub mod tracing;
pub mod traversal;
pub mod value;

pub use client::{Client, ClientHandle};
pub use config::{ConfigError, DEFAULT_SENSITIVE_KEYS, MASK_CHAR, MASK_LEN, SanitizeConfig};
pub use event::{Event, Interface};
pub use processor::{
    HTTP_FIELDS, Pipeline, Processor, RemovePostDataProcessor, RemoveStackLocalsProcessor,
    SanitizePasswordsProcessor,
};
pub use traversal::{KeyVisitor, Visiting, varmap, varmap_with};
pub use value::{Map, SharedValue, Value};
