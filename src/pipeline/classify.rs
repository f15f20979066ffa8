//! Relevance classification for extracted listings.
//!
//! Keyword rules are substring matches on lowercased text, with exclude
//! keywords taking precedence over include keywords. The category field
//! is consulted first; the title is the fallback when the category is
//! absent or matches nothing.

use crate::models::{FilterConfig, Listing};

/// Outcome of matching one text field against the keyword rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Include,
    Exclude,
    Inconclusive,
}

/// Keyword-based relevance filter.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl RelevanceFilter {
    /// Build a filter from keyword lists.
    ///
    /// Keywords are lowercased once here; empty keywords are dropped so
    /// they cannot match everything.
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        let normalize = |keywords: &[String]| {
            keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect()
        };

        Self {
            include: normalize(include),
            exclude: normalize(exclude),
        }
    }

    /// Build a filter from the configured keyword rules.
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(&config.include, &config.exclude)
    }

    /// Decide whether a listing belongs to the tracked category.
    ///
    /// An exclude match on either field always wins. Substring matching is
    /// intentional; "developer" inside a compound word still counts.
    pub fn is_relevant(&self, listing: &Listing) -> bool {
        if !listing.category.trim().is_empty() {
            match self.match_text(&listing.category) {
                Verdict::Exclude => return false,
                Verdict::Include => return true,
                Verdict::Inconclusive => {}
            }
        }

        self.match_text(&listing.title) == Verdict::Include
    }

    fn match_text(&self, text: &str) -> Verdict {
        let text = text.to_lowercase();
        if self.exclude.iter().any(|keyword| text.contains(keyword.as_str())) {
            return Verdict::Exclude;
        }
        if self.include.iter().any(|keyword| text.contains(keyword.as_str())) {
            return Verdict::Include;
        }
        Verdict::Inconclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelevanceFilter {
        RelevanceFilter::from_config(&FilterConfig::default())
    }

    fn listing(title: &str, category: &str) -> Listing {
        Listing {
            title: title.to_string(),
            category: category.to_string(),
            active: true,
            visible: true,
            ..Listing::default()
        }
    }

    #[test]
    fn test_category_include() {
        assert!(filter().is_relevant(&listing(
            "Summer Intern",
            "Software Engineering"
        )));
    }

    #[test]
    fn test_category_exclude_wins() {
        // Category matches both "data" (exclude) and "engineering" (include)
        assert!(!filter().is_relevant(&listing("Intern", "Data Engineering")));
    }

    #[test]
    fn test_title_fallback_without_category() {
        assert!(filter().is_relevant(&listing("Backend Engineer Intern", "")));
    }

    #[test]
    fn test_title_exclude_without_category() {
        assert!(!filter().is_relevant(&listing("Data Analyst Intern", "")));
    }

    #[test]
    fn test_inconclusive_category_falls_back_to_title() {
        assert!(filter().is_relevant(&listing("Software Engineer Intern", "Other")));
    }

    #[test]
    fn test_no_match_anywhere_is_irrelevant() {
        assert!(!filter().is_relevant(&listing("Culinary Intern", "")));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(filter().is_relevant(&listing("SOFTWARE ENGINEER INTERN", "")));
    }

    #[test]
    fn test_substring_matching_over_matches() {
        // "swe" inside another word still matches; this is intentional
        let f = RelevanceFilter::new(&["swe".to_string()], &[]);
        assert!(f.is_relevant(&listing("Awesweird Intern", "")));
    }

    #[test]
    fn test_empty_keywords_are_dropped() {
        let f = RelevanceFilter::new(&["".to_string()], &["  ".to_string()]);
        assert!(!f.is_relevant(&listing("Anything", "")));
    }
}
