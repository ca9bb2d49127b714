//! LLM provider implementations for Scout.
//!
//! All providers implement the `scout_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
