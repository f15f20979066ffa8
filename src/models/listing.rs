//! Listing data structure.

use serde::{Deserialize, Serialize};

/// One internship posting extracted from the upstream source.
///
/// Listings are rebuilt from scratch on every cycle and never persisted;
/// only the identity derived from them survives between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Upstream unique identifier, empty when the source provides none
    #[serde(default)]
    pub source_id: String,

    /// Posting title
    #[serde(default)]
    pub title: String,

    /// Company name ("Unknown" for tabular rows missing the column)
    #[serde(default)]
    pub company: String,

    /// Locations, in source order
    #[serde(default)]
    pub locations: Vec<String>,

    /// Terms or seasons the posting covers, in source order
    #[serde(default)]
    pub terms: Vec<String>,

    /// Upstream category label (free-form taxonomy)
    #[serde(default)]
    pub category: String,

    /// Application or posting URL
    #[serde(default)]
    pub url: String,

    /// Whether the posting is still accepting applications
    #[serde(default)]
    pub active: bool,

    /// Whether the source still displays the posting
    #[serde(default)]
    pub visible: bool,

    /// Raw source line, kept as the identity fallback for text-shaped sources
    #[serde(default)]
    pub raw_seed: String,
}

impl Listing {
    /// Whether the posting is both accepting applications and displayed.
    ///
    /// Listings failing this never reach the relevance classifier.
    pub fn is_open(&self) -> bool {
        self.active && self.visible
    }

    /// Format the listing for display using a template.
    ///
    /// Supported placeholders:
    /// - `{title}`, `{company}`, `{location}`, `{terms}`
    /// - `{category}`, `{url}`, `{line}`
    ///
    /// Lines left blank after substitution are dropped.
    pub fn format(&self, template: &str) -> String {
        let rendered = template
            .replace("{title}", &self.title)
            .replace("{company}", &self.company)
            .replace("{location}", &self.locations.join(", "))
            .replace("{terms}", &self.terms.join(", "))
            .replace("{category}", &self.category)
            .replace("{url}", &self.url)
            .replace("{line}", &self.raw_seed);

        rendered
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            source_id: "42".to_string(),
            title: "Software Engineer Intern".to_string(),
            company: "Acme".to_string(),
            locations: vec!["SF".to_string(), "NYC".to_string()],
            terms: vec!["Summer 2026".to_string()],
            category: "Software Engineering".to_string(),
            url: "https://example.com/jobs/42".to_string(),
            active: true,
            visible: true,
            raw_seed: String::new(),
        }
    }

    #[test]
    fn test_format() {
        let listing = sample_listing();
        let result = listing.format("{company}: {title}\n{location}");
        assert_eq!(result, "Acme: Software Engineer Intern\nSF, NYC");
    }

    #[test]
    fn test_format_drops_blank_lines() {
        let mut listing = sample_listing();
        listing.url = String::new();
        let result = listing.format("{title}\n{url}\n{location}");
        assert_eq!(result, "Software Engineer Intern\nSF, NYC");
    }

    #[test]
    fn test_is_open_requires_both_flags() {
        let mut listing = sample_listing();
        assert!(listing.is_open());

        listing.visible = false;
        assert!(!listing.is_open());

        listing.visible = true;
        listing.active = false;
        assert!(!listing.is_open());
    }
}
