//! # docqa-model
//!
//! Language-model integration for the docqa pipeline.
//!
//! Provides [`OpenAiChatModel`], a chat completion client with deterministic
//! decoding (temperature 0.0), and [`EchoModel`], a network-free stand-in
//! for tests. Both implement [`docqa_core::ChatModel`].

mod mock;
mod openai;

pub use mock::EchoModel;
pub use openai::OpenAiChatModel;
