//! # reel_pulse
//!
//! Generates a vocabulary reel and publishes it: a language model picks a
//! word, an image model draws it, a speech model pronounces it, ffmpeg turns
//! both into a short video, which is hosted and then posted.
//!
//! Each external service sits behind a trait (see [`media`], [`publish`],
//! [`VocabularySource`]) so [`ReelProcessor`] can be driven by mocks.

mod error;
pub mod config;
pub mod media;
pub mod poll;
pub mod prompt;
mod processor;
pub mod publish;
pub mod scheduler;
pub mod tracing;
pub mod vocab;

pub use error::{Error, PipelineError, Stage};
pub use processor::{builder::ReelProcessorBuilder, ReelProcessor, RemoteCleanup, RunAssets, RunReport};
pub use vocab::openai;
pub use vocab::{VocabularyItem, VocabularySource};
