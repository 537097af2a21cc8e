//! AI-backed gift suggestion providers.

pub mod openai;

pub use openai::OpenAiSuggester;
