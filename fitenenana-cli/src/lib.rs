//! fitenenana CLI library
//!
//! Desktop export sinks and command-line edit parsing, shared by the
//! `fitenenana` binary and its tests.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod assignment;
pub mod sinks;

pub use assignment::{Assignment, FieldAssignment};
pub use sinks::{desktop_chain, ClipboardSink, CommandShareSink, FileSink};
