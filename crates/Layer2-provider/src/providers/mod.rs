//! LLM Provider implementations

pub mod anthropic;
pub mod gemini;
pub mod openai;
