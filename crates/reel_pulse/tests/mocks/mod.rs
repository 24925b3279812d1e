#![allow(dead_code)]

pub mod audio_provider;
pub mod composer;
pub mod image_provider;
pub mod media_host;
pub mod publisher;
pub mod vocab_source;
