//! Request authentication and authorization wiring.
//!
//! # Purpose
//! Hosts the gate middleware, the per-route policy table and the remote
//! introspection verifier. The decision logic itself lives in
//! `reviewhub_gate`.
pub mod gate;
pub mod introspection;
pub mod policies;
