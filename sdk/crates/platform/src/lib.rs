//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-512, Base64, AES-256-CTR)
//! - Zeroized secret strings
//! - HTTP client construction and URL helpers
//! - Tracing subscriber initialisation

pub mod client;
pub mod crypto;
pub mod secret;
pub mod telemetry;
