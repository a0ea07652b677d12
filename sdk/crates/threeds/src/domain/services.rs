//! Domain Services - Pure 3DS logic
//!
//! Contains stateless domain logic:
//! - Challenge outcome mapping
//! - Requestor app URL construction
//! - PEM certificate body extraction

use url::Url;

use crate::domain::engine::ChallengeEvent;
use crate::domain::entities::FlowResult;

/// Transaction status the ACS reports for a successfully authenticated challenge
pub const AUTHENTICATED_STATUS: &str = "Y";

/// Query parameter carrying the transaction id back to the host app
pub const TRANSACTION_ID_QUERY_KEY: &str = "transID";

/// Map a raw engine event to a flow result
///
/// | Event | Result |
/// |---|---|
/// | completed `"Y"` | `Completed` |
/// | completed other | `Failed("incomplete: <status>")` |
/// | cancelled, timed out | `Cancelled` |
/// | protocol error | `Failed(<message or "Protocol error">)` |
/// | runtime error | `Failed(<message or "Runtime error">)` |
pub fn map_challenge_event(event: ChallengeEvent) -> FlowResult {
    match event {
        ChallengeEvent::Completed { transaction_status } => {
            if transaction_status == AUTHENTICATED_STATUS {
                FlowResult::Completed
            } else {
                FlowResult::Failed(format!("incomplete: {}", transaction_status))
            }
        }
        ChallengeEvent::Cancelled | ChallengeEvent::TimedOut => FlowResult::Cancelled,
        ChallengeEvent::ProtocolError { message } => {
            FlowResult::Failed(non_empty(message).unwrap_or_else(|| "Protocol error".to_string()))
        }
        ChallengeEvent::RuntimeError { message } => {
            FlowResult::Failed(non_empty(message).unwrap_or_else(|| "Runtime error".to_string()))
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Build the requestor app URL for a challenge
///
/// Returns `None` when `return_url` is absent, empty, or not an absolute URL
/// with a scheme. Otherwise appends `transID=<transaction_id>` to its query.
///
/// ## Examples
/// ```rust
/// use threeds::domain::services::requestor_app_url;
///
/// assert_eq!(
///     requestor_app_url(Some("app://x"), "abc-123").as_deref(),
///     Some("app://x?transID=abc-123")
/// );
/// assert_eq!(requestor_app_url(None, "abc-123"), None);
/// ```
pub fn requestor_app_url(return_url: Option<&str>, transaction_id: &str) -> Option<String> {
    let raw = return_url?.trim();
    if raw.is_empty() {
        return None;
    }

    let mut url = Url::parse(raw).ok()?;
    url.query_pairs_mut()
        .append_pair(TRANSACTION_ID_QUERY_KEY, transaction_id);
    Some(url.to_string())
}

/// Strip PEM armor and line breaks, leaving the base64 certificate body
pub fn pem_body(pem: &str) -> String {
    pem.replace("-----BEGIN CERTIFICATE-----", "")
        .replace("-----END CERTIFICATE-----", "")
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}
