//! Tabular record model shared by the pipeline stages.
//!
//! Rows are open-schema: the fields below are addressed by name through the
//! CSV header, and every other column passes through to the output unchanged.

use csv::StringRecord;

/// Dedup key column, matching a row across runs
pub const TITLE_FIELD: &str = "title";

/// Column holding the per-paper citation page URL
pub const URL_FIELD: &str = "bibtex_url";

/// Column receiving the fetched citation text
pub const BIBTEX_FIELD: &str = "bibtex_data";

/// Sentinel: a fetch was attempted and failed or found nothing
pub const NOT_AVAILABLE: &str = "Not Available";

/// Sentinel: the row carried no URL to fetch
pub const NO_URL: &str = "No URL";

/// Look up a column value by name under the given header.
pub fn field_value<'a>(
    headers: &StringRecord,
    record: &'a StringRecord,
    name: &str,
) -> Option<&'a str> {
    let idx = headers.iter().position(|h| h == name)?;
    record.get(idx)
}

/// True if `value` is real citation text rather than a sentinel or blank.
pub fn is_real_bibtex(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != NOT_AVAILABLE && value != NO_URL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_real_bibtex() {
        assert!(is_real_bibtex("@inproceedings{a, title={A}}"));
        assert!(is_real_bibtex("  @article{b}  "));
        assert!(!is_real_bibtex(""));
        assert!(!is_real_bibtex("   "));
        assert!(!is_real_bibtex(NOT_AVAILABLE));
        assert!(!is_real_bibtex(NO_URL));
    }

    #[test]
    fn test_field_value() {
        let headers = StringRecord::from(vec!["title", "bibtex_url"]);
        let record = StringRecord::from(vec!["Paper A", "http://x/a"]);

        assert_eq!(field_value(&headers, &record, "title"), Some("Paper A"));
        assert_eq!(field_value(&headers, &record, "bibtex_url"), Some("http://x/a"));
        assert_eq!(field_value(&headers, &record, "missing"), None);
    }
}
