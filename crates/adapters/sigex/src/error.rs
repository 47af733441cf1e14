//! Error mapping for the SIGEX adapter

use dealer_errors::AppError;

/// Convert a reqwest failure into an upstream error
///
/// Every transport-level problem is retryable from the caller's point of view,
/// so all of them land in `UpstreamUnavailable` with a descriptive prefix.
pub fn map_transport_error(err: reqwest::Error, operation: &str) -> AppError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_status() {
        "rejected the request"
    } else if err.is_decode() {
        "returned a malformed response"
    } else {
        "request failed"
    };

    match err.status() {
        Some(status) => AppError::upstream_unavailable(format!(
            "SIGEX {} {} (HTTP {}): {}",
            operation, kind, status, err
        )),
        None => AppError::upstream_unavailable(format!("SIGEX {} {}: {}", operation, kind, err)),
    }
}

/// Response body could not be interpreted
pub fn malformed(operation: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::upstream_unavailable(format!(
        "SIGEX {} returned a malformed response: {}",
        operation, detail
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_is_upstream() {
        let err = malformed("register", "missing documentId");
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("missing documentId"));
    }
}
