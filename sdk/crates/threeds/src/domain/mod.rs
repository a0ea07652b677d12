//! Domain Layer - 3DS vocabulary and ports
//!
//! This layer contains:
//! - Domain entities (ThreeDSConfig, EngineSession, FlowResult, FlowState)
//! - Domain value objects (Scheme, EngineConfiguration, PresentationContext)
//! - Challenge screen customization
//! - Domain services (outcome mapping, requestor URL)
//! - Ports (transport repository, vendor engine, SDK service)

pub mod engine;
pub mod entities;
pub mod repository;
pub mod services;
pub mod ui_customization;
pub mod value_objects;
