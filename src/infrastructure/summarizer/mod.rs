//! README summarization

mod service;

pub use service::{
    SummarizerService, SummarizerSettings, DEFAULT_MAX_README_CHARS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
