//! Stable identity derivation for deduplication.
//!
//! Identities must be deterministic across runs for unchanged records;
//! incidental whitespace drift in the source must not produce new
//! identities.

use crate::models::Listing;

/// Derive the deduplication identity for a listing.
///
/// The upstream identifier wins when present. Text-shaped sources fall
/// back to the whitespace-collapsed raw line; structured sources without
/// an id fall back to a collapsed join of title, company, and locations.
pub fn identity_of(listing: &Listing) -> String {
    let id = listing.source_id.trim();
    if !id.is_empty() {
        return id.to_string();
    }

    if !listing.raw_seed.trim().is_empty() {
        return collapse_whitespace(&listing.raw_seed);
    }

    let mut parts = vec![listing.title.as_str(), listing.company.as_str()];
    parts.extend(listing.locations.iter().map(String::as_str));
    collapse_whitespace(&parts.join(" "))
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
