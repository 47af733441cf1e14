//! dealer-adapter-sigex - SIGEX remote signing adapter
//!
//! HTTPS client for the SIGEX document registry with:
//! - mutual TLS client identity loaded from PEM files
//! - per-call timeouts (JSON calls vs. document upload)
//! - fail-fast `NotConfigured` when the client identity is missing
//! - transport/status/decoding failures mapped to `UpstreamUnavailable`

pub mod client;
pub mod config;
pub mod error;

pub use client::SigexClient;
pub use config::{SigexSettings, SigexSettingsBuilder};
