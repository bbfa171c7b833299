//! Track model: the immutable value describing one playable item.
//!
//! Tracks come from the local filesystem or from a remote provider; the
//! `locator` is a file path or a provider id, and resolution to something
//! the audio backend can actually open happens at load time, not here.

mod model;

pub use model::*;
