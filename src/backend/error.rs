//! Failure causes at the HTTP seam. Only ever logged; users see fixed strings.

/// Why a backend call did not produce a usable answer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Status(status.as_u16())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        assert_eq!(BackendError::Status(500).to_string(), "backend returned status 500");
        assert_eq!(
            BackendError::Transport("connection refused".to_string()).to_string(),
            "request failed: connection refused"
        );
        assert_eq!(
            BackendError::Malformed("missing field `response`".to_string()).to_string(),
            "malformed response: missing field `response`"
        );
        assert_eq!(
            BackendError::Rejected("Missing text or target_lang".to_string()).to_string(),
            "backend rejected request: Missing text or target_lang"
        );
    }
}
