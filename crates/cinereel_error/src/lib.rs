//! Error types for Cinereel.
//!
//! This crate provides the error types used throughout the Cinereel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use cinereel_error::{CinereelResult, GeminiError, GeminiErrorKind};
//!
//! fn render() -> CinereelResult<String> {
//!     Err(GeminiError::new(GeminiErrorKind::NoImageData))?
//! }
//!
//! match render() {
//!     Ok(image) => println!("Got: {}", image),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod json;
mod storage;
mod studio;

pub use config::ConfigError;
pub use error::{CinereelError, CinereelErrorKind, CinereelResult};
pub use gemini::{ENTITY_NOT_FOUND_MESSAGE, GeminiError, GeminiErrorKind, RetryableError};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use studio::{StudioError, StudioErrorKind};
