//! Networking for the browser build.
//!
//! SYSTEM CONTEXT
//! ==============
//! `config` resolves the API endpoint, `http` implements the core's
//! `Transport` seam over `fetch`.

pub mod config;
pub mod http;
