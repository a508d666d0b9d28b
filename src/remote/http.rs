//! HTTP remote store adapter backed by `ureq`.
//!
//! Posts the whole batch as one JSON body to the store's bulk endpoint:
//!
//! ```json
//! { "ordered": false, "ops": [ { "id": "...", "mode": "replace", "document": { ... } } ] }
//! ```
//!
//! and expects a [`BulkOutcome`] body back. Transport and auth live here, at
//! the interface boundary; the sync engine never sees HTTP.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use crate::error::RemoteSyncError;
use crate::remote::{BulkOutcome, RemoteStore, UpsertOp};

/// HTTP remote store client.
pub struct HttpRemote {
    agent: ureq::Agent,
    endpoint: String,
    auth_header: Option<String>,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemote")
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth_header.as_ref().map(|_| "<basic>"))
            .finish()
    }
}

impl HttpRemote {
    /// Client for the named database on a remote server.
    ///
    /// `server` is a base URL (`https://host[:port]`); the bulk endpoint is
    /// derived from it and the database name.
    #[must_use]
    pub fn new(server: &str, database: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(60))
            .timeout_write(Duration::from_secs(60))
            .build();
        Self {
            agent,
            endpoint: format!("{}/api/{database}/titles/bulk", server.trim_end_matches('/')),
            auth_header: None,
        }
    }

    /// Attach basic-auth credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, user: &str, password: &str) -> Self {
        let token = BASE64.encode(format!("{user}:{password}"));
        self.auth_header = Some(format!("Basic {token}"));
        self
    }

    /// The derived bulk endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteStore for HttpRemote {
    fn bulk_upsert(&mut self, ops: &[UpsertOp]) -> Result<BulkOutcome, RemoteSyncError> {
        let mut request = self.agent.post(&self.endpoint);
        if let Some(header) = &self.auth_header {
            request = request.set("Authorization", header);
        }

        let response = request
            .send_json(json!({ "ordered": false, "ops": ops }))
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => RemoteSyncError::Rejected {
                    status,
                    message: response
                        .into_string()
                        .unwrap_or_else(|_| "<unreadable body>".to_string()),
                },
                ureq::Error::Transport(transport) => {
                    RemoteSyncError::Transport(transport.to_string())
                }
            })?;

        response
            .into_json::<BulkOutcome>()
            .map_err(|err| RemoteSyncError::InvalidResponse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_derivation() {
        let remote = HttpRemote::new("https://store.example.com/", "watched");
        assert_eq!(
            remote.endpoint(),
            "https://store.example.com/api/watched/titles/bulk"
        );
    }

    #[test]
    fn test_basic_auth_header_shape() {
        let remote = HttpRemote::new("http://localhost:8080", "db").with_basic_auth("user", "pass");
        // "user:pass" in base64
        assert_eq!(remote.auth_header.as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_transport_failure_is_batch_fatal() {
        // Nothing listens on this port; the whole batch errors out.
        let mut remote = HttpRemote::new("http://127.0.0.1:1", "db");
        let err = remote.bulk_upsert(&[]).unwrap_err();
        assert!(matches!(err, RemoteSyncError::Transport(_)));
    }
}
