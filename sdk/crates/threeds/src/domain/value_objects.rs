//! Domain Value Objects

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use platform::secret::SecretString;
use tokio::sync::watch;

/// Card-scheme trust configuration handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub name: String,
    /// Directory server ids served by this scheme
    pub ids: Vec<String>,
    /// Certificate body used to encrypt device info
    pub encryption_key_value: String,
    /// Certificate body used as the trust root for ACS signed content
    pub root_certificate_value: String,
    /// JWE key management algorithm for device info, engine default when `None`
    pub device_info_encryption_alg: Option<String>,
    /// JWE content encryption algorithm for device info, engine default when `None`
    pub device_info_encryption_enc: Option<String>,
}

/// Verbosity of the vendor engine's own logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineLogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl EngineLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineLogLevel::Off => "off",
            EngineLogLevel::Error => "error",
            EngineLogLevel::Warn => "warn",
            EngineLogLevel::Info => "info",
            EngineLogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for EngineLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown engine log level: {0}")]
pub struct ParseLogLevelError(pub String);

impl FromStr for EngineLogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(EngineLogLevel::Off),
            "error" => Ok(EngineLogLevel::Error),
            "warn" | "warning" => Ok(EngineLogLevel::Warn),
            "info" => Ok(EngineLogLevel::Info),
            "debug" => Ok(EngineLogLevel::Debug),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Everything the engine needs to initialize for one session
#[derive(Debug)]
pub struct EngineConfiguration {
    pub schemes: Vec<Scheme>,
    pub api_key: SecretString,
    pub log_level: EngineLogLevel,
    pub locale: Option<String>,
}

/// Opaque capability to present the challenge UI
///
/// The surface is whatever the host's engine implementation needs (a
/// window handle, a view controller reference) and is recovered with
/// [`PresentationContext::surface`]. Dismissing the context cancels a
/// challenge that is still running on it.
#[derive(Clone)]
pub struct PresentationContext {
    surface: Arc<dyn Any + Send + Sync>,
    dismissed: Arc<watch::Sender<bool>>,
}

impl PresentationContext {
    pub fn new<T>(surface: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let (dismissed, _) = watch::channel(false);
        Self {
            surface: Arc::new(surface),
            dismissed: Arc::new(dismissed),
        }
    }

    /// Context with no surface, for headless engines
    pub fn detached() -> Self {
        Self::new(())
    }

    /// Downcast the surface to the engine's expected type
    pub fn surface<T: Any>(&self) -> Option<&T> {
        self.surface.downcast_ref::<T>()
    }

    /// Mark the presentation surface as gone
    pub fn dismiss(&self) {
        self.dismissed.send_replace(true);
    }

    pub fn is_dismissed(&self) -> bool {
        *self.dismissed.borrow()
    }

    /// Resolves once [`dismiss`](Self::dismiss) has been called
    pub async fn dismissed(&self) {
        let mut receiver = self.dismissed.subscribe();
        // The sender lives as long as `self`, so this only returns on dismissal.
        let _ = receiver.wait_for(|dismissed| *dismissed).await;
    }
}

impl fmt::Debug for PresentationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationContext")
            .field("dismissed", &self.is_dismissed())
            .finish_non_exhaustive()
    }
}
