//! CSV output.

use crate::output::include;
use crate::probe::ProbeResult;
use std::io::Write;

/// Column order mirrors the JSON field order; unset fields become empty
/// cells.
pub const FIELDS: [&str; 15] = [
    "url",
    "status_code",
    "title",
    "content_length",
    "content_type",
    "server",
    "response_time",
    "ip",
    "body_hash",
    "favicon_hash",
    "line_count",
    "word_count",
    "location",
    "probe_status",
    "error",
];

/// Write header and one row per included result.
pub fn print_csv<W: Write>(
    writer: W,
    results: &[ProbeResult],
    verbose: bool,
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(FIELDS)?;
    for result in results.iter().filter(|r| include(r, verbose)) {
        wtr.write_record(record(result))?;
    }

    wtr.flush()?;
    Ok(())
}

fn record(result: &ProbeResult) -> Vec<String> {
    fn cell<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(T::to_string).unwrap_or_default()
    }

    vec![
        result.url.clone(),
        cell(&result.status_code),
        result.title.clone().unwrap_or_default(),
        cell(&result.content_length),
        result.content_type.clone().unwrap_or_default(),
        result.server.clone().unwrap_or_default(),
        cell(&result.response_time),
        result.ip.clone().unwrap_or_default(),
        result.body_hash.clone().unwrap_or_default(),
        cell(&result.favicon_hash),
        cell(&result.line_count),
        cell(&result.word_count),
        result.location.clone().unwrap_or_default(),
        result.probe_status.to_string(),
        result.error.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_matches_field_count() {
        let result = ProbeResult::new("http://example.com");
        assert_eq!(record(&result).len(), FIELDS.len());
    }

    #[test]
    fn test_unset_fields_become_empty_cells() {
        let result = ProbeResult::new("http://example.com");
        let row = record(&result);
        assert_eq!(row[0], "http://example.com");
        assert_eq!(row[1], "");
        assert_eq!(row[13], "false");
    }

    #[test]
    fn test_print_csv_headers_and_rows() {
        let mut live = ProbeResult::new("http://live.test");
        live.probe_status = true;
        live.status_code = Some(301);
        live.location = Some("https://live.test/".to_string());
        let dead = ProbeResult::failed("http://dead.test", "Request timeout");

        let mut buf = Vec::new();
        print_csv(&mut buf, &[live, dead], true).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), FIELDS.join(","));
        assert!(lines.next().unwrap().contains("301"));
        assert!(lines.next().unwrap().contains("Request timeout"));
    }

    #[test]
    fn test_print_csv_hides_failures_without_verbose() {
        let dead = ProbeResult::failed("http://dead.test", "Connection failed");

        let mut buf = Vec::new();
        print_csv(&mut buf, &[dead], false).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1); // header only
    }
}
