//! Parses uploaded candidate lists: one record per line, comma-delimited,
//! optional header row.

use csv::{ReaderBuilder, StringRecord, Trim};

use super::batch::is_profile_url;
use super::IntakeError;

/// Lowercased first-row content containing one of these marks it as a header.
const HEADER_MARKERS: &[&str] = &["url", "profile", "link"];

/// Returns one identifier per non-blank data row: the first column that looks
/// like a profile URL, otherwise the first column verbatim.
pub fn parse_identifier_file(data: &[u8]) -> Result<Vec<String>, IntakeError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut identifiers = Vec::new();
    let mut first_row = true;

    for record in reader.records() {
        let record = record.map_err(|e| IntakeError::MalformedFile(e.to_string()))?;
        let fields = clean_fields(&record);
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }

        if std::mem::take(&mut first_row) && is_header(&fields) {
            continue;
        }

        let picked = fields
            .iter()
            .find(|f| is_profile_url(f))
            .unwrap_or(&fields[0]);
        if !picked.is_empty() {
            identifiers.push(picked.clone());
        }
    }

    Ok(identifiers)
}

fn clean_fields(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .collect()
}

fn is_header(fields: &[String]) -> bool {
    if fields.iter().any(|f| is_profile_url(f)) {
        return false;
    }
    let line = fields.join(",").to_lowercase();
    HEADER_MARKERS.iter().any(|m| line.contains(m))
}
