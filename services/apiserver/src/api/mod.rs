//! Reviewhub HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules plus shared error and payload types.
pub mod categories;
pub mod comments;
pub mod error;
pub mod lexicon;
pub mod openapi;
pub mod reviews;
pub mod system;
pub mod types;
