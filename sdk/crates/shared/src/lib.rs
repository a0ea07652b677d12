//! Shared Kernel - Minimal vocabulary shared by every SDK crate
//!
//! This crate contains the "smallest core" of cross-crate vocabulary:
//! - The unified error type and its classification
//! - Typed identifiers (flow ids, etc.)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all SDK components.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
