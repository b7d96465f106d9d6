//! # regchat
//!
//! A retrieval-augmented-generation (RAG) chat server for questions about
//! REN 1000/2021 and energy tariffs. A browser client opens a WebSocket,
//! sends one question per message, and receives exactly one answer back.
//!
//! Answering is a fixed linear pipeline:
//!
//! ```text
//!   question ─▶ embed ─▶ top-k similarity search ─▶ context block
//!            ─▶ prompt template ─▶ chat completion ─▶ answer
//! ```
//!
//! The document index is built offline and loaded wholesale at startup.
//! If the store artifact or the provider credential is missing, the server
//! still starts and serves the page, replying to every question with a
//! fixed unavailability message.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the store, server, and LLM
//! - [`models`] - Shared data types: `Document`, `ScoredDocument`, `ChatMessage`
//! - [`store`] - Read-only vector store loaded from a pre-built on-disk artifact
//! - [`llm::embeddings`] - Query embedding via Ollama or OpenAI-compatible APIs
//! - [`llm::completion`] - Single-turn, non-streaming chat completion
//! - [`pipeline`] - The retrieve → format → prompt → complete composition
//! - [`api`] - Axum routes: static chat page and the WebSocket endpoint
//! - [`state`] - Startup routine producing the ready/unavailable pipeline

pub mod api;
pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod state;
pub mod store;
