//! Maps loosely-shaped provider JSON into `NormalizedCandidate`.

use serde_json::Value;

use super::{EducationItem, ExperienceItem, NormalizedCandidate, ScrapeError};

/// Accepts either a single profile object or a one-element array of them.
pub fn normalize_profile(body: &Value) -> Result<NormalizedCandidate, ScrapeError> {
    let profile = match body {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| ScrapeError::Malformed("empty profile array".to_string()))?,
        Value::Object(_) => body,
        _ => return Err(ScrapeError::Malformed("expected a JSON object".to_string())),
    };

    let (first_name, last_name) = extract_name(profile)
        .ok_or_else(|| ScrapeError::Malformed("profile has no name".to_string()))?;

    Ok(NormalizedCandidate {
        first_name,
        last_name,
        headline: first_str(profile, &["headline", "sub_title"]),
        location: first_str(profile, &["location", "geo_location"]),
        experience: extract_experience(profile),
        education: extract_education(profile),
        skills: extract_skills(profile),
        about: first_str(profile, &["about", "summary"]),
    })
}

/// Returns the first non-blank string among `keys`, trimmed.
fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

fn extract_name(profile: &Value) -> Option<(String, String)> {
    let first = first_str(profile, &["first_name", "firstName"]);
    let last = first_str(profile, &["last_name", "lastName"]);
    if let Some(first) = first {
        return Some((first, last.unwrap_or_default()));
    }

    let full = first_str(profile, &["fullName", "full_name", "name"])?;
    let mut parts = full.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().map(str::trim).unwrap_or_default().to_string();
    Some((first, last))
}

fn extract_experience(profile: &Value) -> Vec<ExperienceItem> {
    array_at(profile, &["experience", "experiences"])
        .iter()
        .filter_map(|item| {
            let title = first_str(item, &["position", "title"])?;
            Some(ExperienceItem {
                title,
                company: first_str(item, &["company_name", "company"]).unwrap_or_default(),
                duration: first_str(item, &["duration", "summary"]),
            })
        })
        .collect()
}

fn extract_education(profile: &Value) -> Vec<EducationItem> {
    array_at(profile, &["education", "educations"])
        .iter()
        .filter_map(|item| {
            Some(EducationItem {
                school: first_str(item, &["college_name", "school", "institution"])?,
                degree: first_str(item, &["college_degree", "degree"]),
            })
        })
        .collect()
}

/// Skills arrive as plain strings or as `{ "name": ... }` objects.
fn extract_skills(profile: &Value) -> Vec<String> {
    array_at(profile, &["skills"])
        .iter()
        .filter_map(|s| match s {
            Value::String(name) => Some(name.trim().to_string()),
            Value::Object(_) => first_str(s, &["name", "skill"]),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn array_at<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_array()))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
