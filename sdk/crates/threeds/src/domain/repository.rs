//! Repository Traits
//!
//! Interface to the merchant's 3DS endpoints. Implementation is in the
//! infrastructure layer.

use url::Url;

use crate::domain::entities::{AuthenticationRequest, AuthenticationStatus, ThreeDSConfig};
use crate::error::TransportResult;

/// 3DS transport repository trait
#[trait_variant::make(ThreeDSRepository: Send)]
pub trait LocalThreeDSRepository {
    /// Fetch the directory-server configuration belonging to `authorize_url`
    async fn fetch_config(&self, authorize_url: &Url) -> TransportResult<ThreeDSConfig>;

    /// Send the authentication request and decode the server verdict
    async fn perform_authentication(
        &self,
        authorize_url: &Url,
        request: &AuthenticationRequest,
    ) -> TransportResult<AuthenticationStatus>;
}
