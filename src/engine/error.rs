use thiserror::Error;

/// Every way a backend call can fail, as seen by the screens.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A local precondition failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    #[error("the game service rejected the request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("the game service is unreachable: {0}")]
    Unreachable(String),

    #[error("could not build the request: {0}")]
    Request(String),

    #[error("unexpected response from the game service: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GatewayError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            GatewayError::Request(e.to_string())
        } else if e.is_decode() {
            GatewayError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            GatewayError::Rejected {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            GatewayError::Unreachable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_carries_status_and_body() {
        let e = GatewayError::Rejected {
            status: 404,
            body: "Game not found".into(),
        };
        let text = e.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("Game not found"));
    }

    #[test]
    fn json_failure_maps_to_malformed() {
        let e: GatewayError = serde_json::from_str::<bool>("nope").unwrap_err().into();
        assert!(matches!(e, GatewayError::Malformed(_)));
    }
}
