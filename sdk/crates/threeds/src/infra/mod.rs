//! Infrastructure Layer - External system implementations
//!
//! - `http` - reqwest implementation of the transport repository
//! - `dto` - wire formats of the 3DS endpoints
//! - `engine` - adapter from the vendor engine to the SDK service port

pub mod dto;
pub mod engine;
pub mod http;
