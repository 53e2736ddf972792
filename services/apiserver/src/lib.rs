//! Reviewhub API server library crate.
//!
//! # Purpose
//! Exposes the HTTP surface, gate middleware, configuration, and storage for
//! use by the binary and integration tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
pub mod validation;
