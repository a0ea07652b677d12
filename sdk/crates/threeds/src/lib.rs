//! 3DS2 Authentication Core
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, ports (repository, vendor engine, SDK service)
//! - `application/` - Config provider, challenge guard, coordinator, facade, view model
//! - `infra/` - HTTP repository and vendor engine adapter
//!
//! ## Flow
//! 1. Fetch the directory-server config next to the authorize URL
//! 2. Recover the engine API key (SHA-512 derived AES-256-CTR key) and start an engine session
//! 3. Send the authentication request
//! 4. Frictionless results finish immediately; challenges run through the engine,
//!    one at a time per adapter

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::FlowConfig;
pub use application::controller::ThreeDSFlowController;
pub use application::coordinator::{FlowCoordinator, FlowRequest};
pub use application::view_model::FlowViewModel;
pub use domain::entities::{FlowResult, FlowState};
pub use error::{ConfigError, EngineError, TransportError};
pub use infra::engine::EngineSdkService;
pub use infra::http::HttpThreeDSRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::ui_customization::*;
    pub use crate::domain::value_objects::*;
}

pub mod engine {
    //! Everything a vendor engine integration implements or consumes
    pub use crate::domain::engine::*;
}
