//! Gemini generative backend

pub mod client;
pub mod types;
pub mod utils;

pub use client::GeminiClient;
pub use types::WebSource;
