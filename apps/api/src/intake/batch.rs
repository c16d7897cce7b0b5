//! Profile identifiers and the `SubmissionBatch` unit of work.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::csv_parser::parse_identifier_file;
use super::{IntakeError, MAX_BATCH_SIZE, MAX_FILE_BYTES};

/// Recognized profile: `linkedin.com/in/<slug>` on any subdomain, any case,
/// optionally followed by a sub-path, query or fragment. No whitespace.
fn profile_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:https?://)?((?:[a-z0-9-]+\.)*linkedin\.com)/in/([^/?#\s]+)(?:[/?#]\S*)?$",
        )
        .expect("profile URL regex is valid")
    })
}

pub fn is_profile_url(candidate: &str) -> bool {
    profile_url_regex().is_match(candidate.trim())
}

/// The `<slug>` part of a profile URL.
pub fn profile_slug(url: &str) -> Option<String> {
    profile_url_regex()
        .captures(url.trim())
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().to_string())
}

/// Canonical form stored on the candidate: `https://<host>/in/<slug>`, host
/// lowercased, anything after the slug dropped. `None` when `raw` is not a
/// profile URL.
pub fn normalize_profile_url(raw: &str) -> Option<String> {
    let captures = profile_url_regex().captures(raw.trim())?;
    let host = captures.get(1)?.as_str().to_lowercase();
    let slug = captures.get(2)?.as_str();
    Some(format!("https://{host}/in/{slug}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMethod {
    Manual,
    FileUpload,
}

/// One submit action's identifiers, already validated and normalized.
/// Order is preserved; duplicates are kept.
#[derive(Debug, Clone)]
pub struct SubmissionBatch {
    pub identifiers: Vec<String>,
    pub method: SubmissionMethod,
    /// Rows dropped while parsing an upload because no column held a profile URL.
    pub skipped_rows: usize,
}

impl SubmissionBatch {
    /// Manually entered identifiers. Blank entries are ignored; every other
    /// entry must be a profile URL.
    pub fn manual<I, S>(entries: I) -> Result<Self, IntakeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        check_size(entries.len())?;

        let invalid: Vec<String> = entries
            .iter()
            .filter(|e| !is_profile_url(e))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(IntakeError::InvalidIdentifier(invalid));
        }

        Ok(Self {
            identifiers: entries
                .iter()
                .filter_map(|e| normalize_profile_url(e))
                .collect(),
            method: SubmissionMethod::Manual,
            skipped_rows: 0,
        })
    }

    /// A delimited-text upload. Size is enforced before parsing, count after.
    /// Rows without a profile URL are dropped rather than failing the upload.
    pub fn from_file(data: &[u8]) -> Result<Self, IntakeError> {
        if data.len() > MAX_FILE_BYTES {
            tracing::debug!("Upload rejected: {} bytes", data.len());
            return Err(IntakeError::FileTooLarge { max: MAX_FILE_BYTES });
        }

        let rows = parse_identifier_file(data)?;
        let total = rows.len();
        let identifiers: Vec<String> = rows
            .iter()
            .filter_map(|r| normalize_profile_url(r))
            .collect();
        let skipped_rows = total - identifiers.len();
        if skipped_rows > 0 {
            tracing::debug!("Upload: dropped {skipped_rows} rows without a profile URL");
        }

        check_size(identifiers.len())?;

        Ok(Self {
            identifiers,
            method: SubmissionMethod::FileUpload,
            skipped_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }
}

fn check_size(size: usize) -> Result<(), IntakeError> {
    if size == 0 {
        return Err(IntakeError::EmptyBatch);
    }
    if size > MAX_BATCH_SIZE {
        return Err(IntakeError::BatchTooLarge {
            size,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}
