//! Probe result record.

use serde::{Deserialize, Serialize};

/// The outcome of probing a single URL.
///
/// One record exists per submitted URL, whatever happened to the probe.
/// `probe_status` is true iff an HTTP response was received, regardless of
/// its status code; the remaining fields are filled only by the signals that
/// were requested and succeeded. Unset optional fields serialize as `null`
/// so every record carries the full field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The probed URL, exactly as submitted.
    pub url: String,
    /// HTTP status code of the response.
    pub status_code: Option<u16>,
    /// First `<title>` element text for HTML responses.
    pub title: Option<String>,
    /// Decoded body length in bytes.
    pub content_length: Option<u64>,
    /// Content-Type response header.
    pub content_type: Option<String>,
    /// Server response header.
    pub server: Option<String>,
    /// Wall-clock request time in seconds, set for every attempted request.
    pub response_time: Option<f64>,
    /// Resolved host address.
    pub ip: Option<String>,
    /// Body digest under the last requested hash algorithm.
    pub body_hash: Option<String>,
    /// MurmurHash3 fingerprint of `/favicon.ico`.
    pub favicon_hash: Option<i32>,
    /// Newline-delimited line count of the body.
    pub line_count: Option<usize>,
    /// Whitespace-delimited word count of the body.
    pub word_count: Option<usize>,
    /// Location response header.
    pub location: Option<String>,
    /// Whether an HTTP response was received.
    pub probe_status: bool,
    /// Human-readable failure description.
    pub error: Option<String>,
}

impl ProbeResult {
    /// Create an empty result for a URL about to be probed.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            title: None,
            content_length: None,
            content_type: None,
            server: None,
            response_time: None,
            ip: None,
            body_hash: None,
            favicon_hash: None,
            line_count: None,
            word_count: None,
            location: None,
            probe_status: false,
            error: None,
        }
    }

    /// Create a synthetic failed result, used when a probe never ran to
    /// completion (task timeout, worker failure).
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        let mut result = Self::new(url);
        result.error = Some(error.into());
        result
    }

    /// Whether the target responded.
    pub fn is_live(&self) -> bool {
        self.probe_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_empty() {
        let result = ProbeResult::new("http://example.com");
        assert_eq!(result.url, "http://example.com");
        assert!(!result.probe_status);
        assert!(result.status_code.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result() {
        let result = ProbeResult::failed("http://example.com", "probe timeout");
        assert!(!result.is_live());
        assert_eq!(result.error.as_deref(), Some("probe timeout"));
        assert!(result.response_time.is_none());
    }

    #[test]
    fn test_unset_fields_serialize_as_null() {
        let result = ProbeResult::new("http://example.com");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"status_code\":null"));
        assert!(json.contains("\"title\":null"));
        assert!(json.contains("\"error\":null"));
        assert!(json.contains("\"probe_status\":false"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut result = ProbeResult::new("http://example.com");
        result.probe_status = true;
        result.status_code = Some(200);
        result.title = Some("Hi".to_string());

        let json = serde_json::to_string(&result).unwrap();
        let parsed: ProbeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
