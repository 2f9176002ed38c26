//! Azure DeepSeek pipe
//!
//! Forwards chat completion requests from a hosting plugin framework to an
//! Azure-hosted, OpenAI-compatible inference endpoint.
//!
//! ## Architecture
//!
//! ```text
//! Body -> normalize user -> filter fields -> POST upstream
//!                                               |
//!                                               v
//!                          Completion | Stream of raw lines | Error string
//! ```
//!
//! ## Components
//!
//! - `pipe`: the adapter itself, field filtering and lifecycle hooks
//! - `config`: environment-sourced connection settings
//! - `client`: HTTP client utilities
//! - `stream`: lazy line sequence for streamed completions
//! - `error`: error types
//! - `logger`: tagged logging helpers

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod pipe;
pub mod stream;

pub use config::PipeConfig;
pub use error::{PipeError, PipeResult};
pub use pipe::{Pipe, PipeOutput, PIPE_NAME};
pub use stream::LineStream;
