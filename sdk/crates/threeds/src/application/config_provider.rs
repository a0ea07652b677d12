//! Config Crypto Provider
//!
//! Recovers the engine API key from the directory-server configuration and
//! builds the scheme trust configuration.

use platform::crypto::{AES_BLOCK_LEN, AES256_KEY_LEN, aes256_ctr_apply, from_base64, sha512};

use crate::domain::entities::ThreeDSConfig;
use crate::domain::services::pem_body;
use crate::domain::value_objects::{EngineLogLevel, Scheme};
use crate::error::{ConfigError, ConfigResult};

/// Source of engine initialization parameters
pub trait ConfigProvider: Send + Sync {
    fn log_level(&self) -> EngineLogLevel;

    fn locale(&self) -> Option<&str>;

    /// Decrypt the engine API key carried in `config`
    fn api_key(&self, config: &ThreeDSConfig) -> ConfigResult<String>;

    /// Trust configuration for the scheme described by `config`
    fn scheme(&self, config: &ThreeDSConfig) -> Option<Scheme>;
}

/// Provider deriving everything from the fetched configuration
#[derive(Debug, Clone, Default)]
pub struct DefaultConfigProvider {
    log_level: EngineLogLevel,
    locale: Option<String>,
}

impl DefaultConfigProvider {
    pub fn new(log_level: EngineLogLevel, locale: Option<String>) -> Self {
        Self { log_level, locale }
    }
}

impl ConfigProvider for DefaultConfigProvider {
    fn log_level(&self) -> EngineLogLevel {
        self.log_level
    }

    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn api_key(&self, config: &ThreeDSConfig) -> ConfigResult<String> {
        decrypt_api_key(&config.directory_server_id, &config.encrypted_key)
    }

    fn scheme(&self, config: &ThreeDSConfig) -> Option<Scheme> {
        let certificate = pem_body(&config.device_info_encryption_cert_pem);
        Some(Scheme {
            name: config.id.clone(),
            ids: vec![config.directory_server_id.clone()],
            // The same certificate serves as encryption key and trust root.
            encryption_key_value: certificate.clone(),
            root_certificate_value: certificate,
            device_info_encryption_alg: config.device_info_encryption_alg.clone(),
            device_info_encryption_enc: config.device_info_encryption_enc.clone(),
        })
    }
}

/// Decrypt `encrypted_key` with the key derived from `directory_server_id`
///
/// 1. key = SHA-512(directory_server_id)[0..32]
/// 2. payload = base64(encrypted_key), must be longer than one block
/// 3. iv = payload[0..16], ciphertext = payload[16..]
/// 4. AES-256-CTR, then UTF-8
pub fn decrypt_api_key(directory_server_id: &str, encrypted_key: &str) -> ConfigResult<String> {
    let digest = sha512(directory_server_id.as_bytes());
    let key = &digest[..AES256_KEY_LEN];

    let payload = from_base64(encrypted_key).map_err(|_| ConfigError::InvalidKeyEncoding)?;
    if payload.len() <= AES_BLOCK_LEN {
        return Err(ConfigError::InvalidKeyEncoding);
    }
    let (iv, ciphertext) = payload.split_at(AES_BLOCK_LEN);

    let plaintext = aes256_ctr_apply(key, iv, ciphertext)?;
    String::from_utf8(plaintext).map_err(|_| ConfigError::ApiKeyInvalid)
}
