pub mod credentials;
pub mod gemini;
pub mod http_client;
pub mod prompts;

pub use credentials::*;
pub use gemini::GeminiClient;
