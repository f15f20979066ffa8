// src/pipeline/extract.rs

//! Record extraction from raw source payloads.
//!
//! Handles two source shapes: a JSON listing feed (an array of objects
//! with drifting key names) and a markdown document with a tracked
//! section of tabular listing rows.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::{Listing, SourceConfig, SourceFormat};

/// Keys probed for the listing array when the payload is a JSON object.
const LIST_KEYS: &[&str] = &["listings", "jobs", "data", "items"];

/// Marker used by tabular sources for rows repeating the previous company.
const CONTINUATION_MARKER: &str = "↳";

/// Column-name tokens that mark a header row rather than a listing.
const HEADER_TOKENS: &[&str] = &[
    "company",
    "company name",
    "role",
    "title",
    "position",
    "location",
    "application",
    "application/link",
    "link",
    "date",
    "date posted",
    "terms",
];

fn link_regex() -> &'static Regex {
    static LINK_RE: OnceLock<Regex> = OnceLock::new();
    LINK_RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("link regex"))
}

/// Extract listings from a raw payload according to the configured format.
///
/// Order reflects source document order.
pub fn extract(raw: &str, source: &SourceConfig) -> Result<Vec<Listing>> {
    match source.format {
        SourceFormat::Json => extract_json(raw),
        SourceFormat::Markdown => Ok(extract_markdown(raw, &source.section_heading)),
        SourceFormat::Auto => {
            let head = raw.trim_start();
            if head.starts_with('[') || head.starts_with('{') {
                extract_json(raw)
            } else {
                Ok(extract_markdown(raw, &source.section_heading))
            }
        }
    }
}

// --- JSON feed shape ---

/// Extract listings from a JSON payload.
///
/// Accepts a top-level array, or an object wrapping the array under a
/// known key. Entries that are not objects are skipped silently.
pub fn extract_json(raw: &str) -> Result<Vec<Listing>> {
    let value: Value = serde_json::from_str(raw)?;

    let rows = match &value {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(|rows| rows.as_slice())
            .ok_or_else(|| AppError::parse("JSON payload contains no listing array"))?,
        _ => return Err(AppError::parse("JSON payload is not a listing array")),
    };

    let mut listings = Vec::new();
    for row in rows {
        let Some(obj) = row.as_object() else {
            log::debug!("Skipping non-object listing entry");
            continue;
        };
        listings.push(listing_from_object(obj));
    }
    Ok(listings)
}

/// Build a listing from a JSON object by probing alternative key names.
fn listing_from_object(obj: &Map<String, Value>) -> Listing {
    let locations = string_list(obj, &["locations"]).unwrap_or_else(|| {
        first_string(obj, &["location"])
            .map(|location| vec![location])
            .unwrap_or_default()
    });

    Listing {
        source_id: id_string(obj, &["id"]).unwrap_or_default(),
        title: first_string(obj, &["title", "role", "position", "job_title"]).unwrap_or_default(),
        company: first_string(obj, &["company_name", "company", "employer"]).unwrap_or_default(),
        locations,
        terms: string_list(obj, &["terms", "seasons"]).unwrap_or_default(),
        category: first_string(obj, &["category", "role_category", "type", "discipline"])
            .unwrap_or_default(),
        url: first_string(obj, &["url", "link", "application_link", "apply_url"])
            .unwrap_or_default(),
        active: first_bool(obj, &["active", "is_active"]),
        visible: first_bool(obj, &["is_visible", "visible"]),
        raw_seed: String::new(),
    }
}

/// First present, non-blank string value among the candidate keys.
fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Identifier value among the candidate keys, coercing numbers to strings.
fn id_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// First present boolean among the candidate keys, defaulting to false.
fn first_bool(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_bool))
        .unwrap_or(false)
}

/// String array under the first present candidate key.
fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter().find_map(|key| {
        obj.get(*key).and_then(Value::as_array).map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    })
}

// --- Markdown section shape ---

/// Extract listing rows from the tracked section of a markdown document.
///
/// The section opens at the first heading matching the configured prefix
/// and closes at the next heading of the same or higher level, or end of
/// document. A missing heading yields an empty sequence, not an error.
pub fn extract_markdown(raw: &str, section_heading: &str) -> Vec<Listing> {
    let lines: Vec<&str> = raw.lines().collect();
    let heading = section_heading.trim();

    let Some(start) = lines.iter().position(|line| line.trim().starts_with(heading)) else {
        return Vec::new();
    };
    let level = heading_level(lines[start].trim()).unwrap_or(usize::MAX);

    let mut listings = Vec::new();
    for line in lines.iter().skip(start + 1) {
        let trimmed = line.trim();
        if let Some(line_level) = heading_level(trimmed) {
            if line_level <= level {
                break;
            }
        }
        if let Some(listing) = parse_row(trimmed) {
            listings.push(listing);
        }
    }
    listings
}

/// Markdown heading level, when the line is a heading.
fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    match line[hashes..].chars().next() {
        Some(c) if c.is_whitespace() => Some(hashes),
        None => Some(hashes),
        _ => None,
    }
}

/// Parse one section line into a listing, when it is recognizable as a row.
///
/// Rows are pipe-delimited cells, markdown-link-prefixed lines, or
/// continuation-marker lines; separator and header rows are dropped.
/// Cells 0-3 map onto company/title/location/url.
fn parse_row(line: &str) -> Option<Listing> {
    if line.is_empty() || is_separator_row(line) {
        return None;
    }

    let delimited = line.contains('|');
    if !delimited && !line.starts_with('[') && !line.starts_with(CONTINUATION_MARKER) {
        return None;
    }

    let cells: Vec<&str> = if delimited {
        let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
        while cells.first().is_some_and(|cell| cell.is_empty()) {
            cells.remove(0);
        }
        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }
        cells
    } else {
        vec![line]
    };

    if cells.is_empty() || is_header_row(&cells) {
        return None;
    }

    let (company_text, company_link) = split_link(cells.first().copied().unwrap_or(""));
    let company_text = company_text
        .trim_start_matches(CONTINUATION_MARKER)
        .trim()
        .to_string();
    let company = if company_text.is_empty() {
        "Unknown".to_string()
    } else {
        company_text
    };

    let title = cells.get(1).map(|cell| split_link(cell).0).unwrap_or_default();
    let location = cells.get(2).map(|cell| split_link(cell).0).unwrap_or_default();
    let url = cells
        .get(3)
        .and_then(|cell| {
            let (text, link) = split_link(cell);
            link.or_else(|| (!text.is_empty()).then_some(text))
        })
        .or(company_link)
        .unwrap_or_default();

    Some(Listing {
        source_id: String::new(),
        title,
        company,
        locations: if location.is_empty() {
            Vec::new()
        } else {
            vec![location]
        },
        terms: Vec::new(),
        category: String::new(),
        url,
        // Presence in the tracked section implies the posting is live
        active: true,
        visible: true,
        raw_seed: line.to_string(),
    })
}

/// Whether the line is a markdown table separator (`| --- | --- |`).
fn is_separator_row(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | '=' | ' ' | '\t'))
}

/// Whether the cells spell out column names instead of listing data.
fn is_header_row(cells: &[&str]) -> bool {
    let named = cells
        .iter()
        .filter(|cell| HEADER_TOKENS.contains(&cell.trim().to_lowercase().as_str()))
        .count();
    named >= 2 || (cells.len() == 1 && named == 1)
}

/// Split a cell into its display text and the first markdown link target.
fn split_link(cell: &str) -> (String, Option<String>) {
    let re = link_regex();
    let href = re
        .captures(cell)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|href| !href.is_empty());
    let text = re.replace_all(cell, "$1").trim().to_string();
    (text, href)
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = r#"# Summer Internships

Intro text with no rows.

## Software Engineering Internship Roles

Company | Role | Location | Application | Date Posted
| ------- | ---- | -------- | ----------- | ----------- |
| [Stripe](https://stripe.com/careers/1) | Software Engineer Intern | SF | [Apply](https://stripe.com/apply/1) | Jun 01 |
| ↳ | Backend Engineer Intern | NYC | [Apply](https://stripe.com/apply/2) | Jun 02 |
[Datadog](https://datadoghq.com/jobs/7) | Software Engineer Intern | New York

Stray prose that is not a listing row.

## Data Science Internship Roles

| [Acme](https://acme.io) | Data Science Intern | Remote |
"#;

    #[test]
    fn test_markdown_section_rows() {
        let listings = extract_markdown(README, "## Software Engineering Internship Roles");
        assert_eq!(listings.len(), 3);

        assert_eq!(listings[0].company, "Stripe");
        assert_eq!(listings[0].title, "Software Engineer Intern");
        assert_eq!(listings[0].locations, vec!["SF".to_string()]);
        assert_eq!(listings[0].url, "https://stripe.com/apply/1");
        assert!(listings[0].is_open());

        // Continuation rows lose the company column
        assert_eq!(listings[1].company, "Unknown");
        assert_eq!(listings[1].title, "Backend Engineer Intern");

        // Rows without surrounding pipes still split on the delimiter,
        // and fall back to the company link for the URL
        assert_eq!(listings[2].company, "Datadog");
        assert_eq!(listings[2].url, "https://datadoghq.com/jobs/7");
    }

    #[test]
    fn test_markdown_section_ends_at_next_heading() {
        let listings = extract_markdown(README, "## Software Engineering Internship Roles");
        assert!(listings.iter().all(|l| !l.raw_seed.contains("Data Science")));
    }

    #[test]
    fn test_markdown_missing_section_is_empty() {
        let listings = extract_markdown(README, "## Hardware Internship Roles");
        assert!(listings.is_empty());
    }

    #[test]
    fn test_markdown_keeps_raw_line_as_seed() {
        let listings = extract_markdown(README, "## Software Engineering Internship Roles");
        assert!(listings[0].raw_seed.starts_with("| [Stripe]"));
    }

    #[test]
    fn test_markdown_section_to_end_of_document() {
        let listings = extract_markdown(README, "## Data Science Internship Roles");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].company, "Acme");
    }

    #[test]
    fn test_separator_and_header_rows_skipped() {
        assert!(is_separator_row("| --- | --- |"));
        assert!(is_separator_row("|----|----|"));
        assert!(!is_separator_row("| Acme | SWE |"));

        assert!(is_header_row(&["Company", "Role", "Location"]));
        assert!(!is_header_row(&["[Acme](https://acme.io)", "SWE Intern"]));
    }

    const FEED: &str = r#"[
        {
            "id": 101,
            "title": "Software Engineer Intern",
            "company_name": "Stripe",
            "locations": ["SF", "Remote"],
            "terms": ["Summer 2026"],
            "category": "Software Engineering",
            "url": "https://stripe.com/jobs/101",
            "active": true,
            "is_visible": true
        },
        "not-an-object",
        {
            "role": "Backend Intern",
            "employer": "Acme",
            "location": "NYC",
            "role_category": "Engineering",
            "active": true,
            "visible": true
        }
    ]"#;

    #[test]
    fn test_json_feed_rows() {
        let listings = extract_json(FEED).unwrap();
        assert_eq!(listings.len(), 2);

        // Numeric id is coerced to a string
        assert_eq!(listings[0].source_id, "101");
        assert_eq!(listings[0].company, "Stripe");
        assert_eq!(listings[0].locations.len(), 2);
        assert!(listings[0].is_open());

        // Alternative key names map onto the same fields
        assert_eq!(listings[1].title, "Backend Intern");
        assert_eq!(listings[1].company, "Acme");
        assert_eq!(listings[1].locations, vec!["NYC".to_string()]);
        assert_eq!(listings[1].category, "Engineering");
        assert!(listings[1].source_id.is_empty());
    }

    #[test]
    fn test_json_wrapped_array() {
        let raw = format!("{{\"listings\": {FEED}}}");
        let listings = extract_json(&raw).unwrap();
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn test_json_without_array_is_parse_error() {
        assert!(matches!(
            extract_json("{\"version\": 2}"),
            Err(AppError::Parse(_))
        ));
        assert!(matches!(extract_json("42"), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_json_invalid_syntax_is_error() {
        assert!(extract_json("[{").is_err());
    }

    #[test]
    fn test_auto_detection() {
        let config = SourceConfig::default();
        let from_feed = extract(FEED, &config).unwrap();
        assert_eq!(from_feed.len(), 2);

        let from_readme = extract(README, &config).unwrap();
        assert_eq!(from_readme.len(), 3);
    }

    #[test]
    fn test_inactive_flags_default_false() {
        let listings = extract_json(r#"[{"title": "SWE Intern"}]"#).unwrap();
        assert!(!listings[0].active);
        assert!(!listings[0].visible);
        assert!(!listings[0].is_open());
    }
}
