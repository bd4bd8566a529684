mod gemini;
mod handler;
mod model;

pub use gemini::GeminiClient;
pub use handler::educate;
