//! Optional enrichment steps over a successful response.
//!
//! Each enrichment is an independent side-computation: it either produces a
//! value for its field or returns `None`. A failure in one step never
//! records an error and never affects another step.

use crate::probe::prober::HashAlg;
use crate::probe::transport::Transport;
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};
use std::net::IpAddr;
use std::time::Duration;
use trust_dns_resolver::TokioAsyncResolver;

/// Timeout for the secondary favicon fetch.
const FAVICON_TIMEOUT: Duration = Duration::from_secs(5);

/// Extract the first `<title>` element's trimmed text from an HTML body.
///
/// The body is decoded best-effort; invalid byte sequences are replaced
/// rather than failing.
pub fn extract_title(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let document = Html::parse_document(&text);
    let selector = Selector::parse("title").ok()?;

    let element = document.select(&selector).next()?;
    let title = element.text().collect::<String>().trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Digest the raw body under the requested algorithms.
///
/// A single field holds the digest: when several algorithms are requested,
/// each overwrites the previous, so the last one listed wins.
pub fn body_hash(algorithms: &[HashAlg], body: &[u8]) -> Option<String> {
    let mut digest = None;

    for algorithm in algorithms {
        digest = Some(match algorithm {
            HashAlg::Md5 => format!("{:x}", md5::compute(body)),
            HashAlg::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(body);
                format!("{:x}", hasher.finalize())
            }
        });
    }

    digest
}

/// Fetch `/favicon.ico` relative to the probed URL and fingerprint it.
///
/// MurmurHash3 x86 32-bit with seed 0, reinterpreted as a signed integer —
/// the fingerprint format used by favicon search engines. Only an HTTP 200
/// with a non-empty body produces a hash; every failure mode leaves the
/// field unset.
pub async fn favicon_hash(transport: &dyn Transport, url: &str) -> Option<i32> {
    let favicon_url = url::Url::parse(url).ok()?.join("/favicon.ico").ok()?;

    let raw = transport
        .fetch_with_timeout(favicon_url.as_str(), FAVICON_TIMEOUT)
        .await
        .ok()?;
    if raw.status != 200 || raw.body.is_empty() {
        return None;
    }

    Some(murmurhash3::murmurhash3_x86_32(&raw.body, 0) as i32)
}

/// Resolve the URL's hostname to its first address.
pub async fn resolve_ip(resolver: &TokioAsyncResolver, url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    // Address literals need no lookup.
    if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
        return Some(ip.to_string());
    }

    let lookup = resolver.lookup_ip(host).await.ok()?;
    lookup.iter().next().map(|ip| ip.to_string())
}

/// Count newline-delimited lines and whitespace-delimited words in the body.
pub fn text_counts(body: &[u8]) -> (usize, usize) {
    let text = String::from_utf8_lossy(body);
    (text.lines().count(), text.split_whitespace().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let body = b"<html><head><title>Hi</title></head></html>";
        assert_eq!(extract_title(body).as_deref(), Some("Hi"));
    }

    #[test]
    fn test_extract_title_trims_and_flattens_nested_markup() {
        let body = b"<html><title>  My <b>Site</b>  </title></html>";
        assert_eq!(extract_title(body).as_deref(), Some("My Site"));
    }

    #[test]
    fn test_extract_title_absent() {
        assert!(extract_title(b"<html><body>no title</body></html>").is_none());
    }

    #[test]
    fn test_extract_title_empty_element() {
        assert!(extract_title(b"<html><title>   </title></html>").is_none());
    }

    #[test]
    fn test_extract_title_survives_invalid_utf8() {
        let body = b"<html><title>ok\xff\xfe</title></html>";
        assert!(extract_title(body).is_some());
    }

    #[test]
    fn test_body_hash_md5() {
        let digest = body_hash(&[HashAlg::Md5], b"hello").unwrap();
        assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_body_hash_sha256() {
        let digest = body_hash(&[HashAlg::Sha256], b"hello").unwrap();
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_body_hash_last_algorithm_wins() {
        let md5_then_sha = body_hash(&[HashAlg::Md5, HashAlg::Sha256], b"hello").unwrap();
        assert_eq!(md5_then_sha.len(), 64);

        let sha_then_md5 = body_hash(&[HashAlg::Sha256, HashAlg::Md5], b"hello").unwrap();
        assert_eq!(sha_then_md5.len(), 32);
    }

    #[test]
    fn test_body_hash_none_requested() {
        assert!(body_hash(&[], b"hello").is_none());
    }

    #[test]
    fn test_text_counts() {
        let (lines, words) = text_counts(b"one two\nthree four five\n");
        assert_eq!(lines, 2);
        assert_eq!(words, 5);
    }

    #[test]
    fn test_text_counts_empty_body() {
        assert_eq!(text_counts(b""), (0, 0));
    }
}
