//! Application Layer - Flow orchestration
//!
//! This layer orchestrates domain logic and infrastructure:
//! - Configuration and the config crypto provider
//! - Active-challenge guard
//! - Flow coordinator, facade and view-state projection

pub mod challenge_guard;
pub mod config;
pub mod config_provider;
pub mod controller;
pub mod coordinator;
pub mod view_model;
