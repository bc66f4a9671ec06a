//! Listing record shapes for the livery marketplace.
//!
//! These structs use `#[serde(rename_all = "camelCase")]` to match the JSON
//! the TypeScript client exchanges with the list endpoint.

use serde::{Deserialize, Serialize};

/// The seller profile embedded in each listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Unique identifier of the creator account.
    pub id: String,
    /// Name shown on listing cards.
    pub display_name: String,
}

/// One livery offered on the marketplace.
///
/// Immutable from the query pipeline's point of view:
/// [`apply_filters`](crate::query::apply_filters) operates on clones and
/// never hands back aliases into caller-owned records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Unique listing id; also the pagination cursor token.
    pub id: String,
    /// Car model this livery fits, matched exactly by the `car` filter.
    pub car: String,
    /// Average review rating.
    pub rating: f64,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Lowercase tokens the search filter matches against (whole-token).
    pub search_helpers: Vec<String>,
    /// Preview image URLs.
    pub images: Vec<String>,
    /// Seller profile.
    pub creator: Creator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_record_serializes_camel_case() {
        let record = ListingRecord {
            id: "liv-1".to_string(),
            car: "GT3 RS".to_string(),
            rating: 4.5,
            created_at: 1_700_000_000_000,
            search_helpers: vec!["purple".to_string(), "tiger".to_string()],
            images: vec!["https://cdn.example/liv-1.png".to_string()],
            creator: Creator {
                id: "usr-9".to_string(),
                display_name: "WrapWorks".to_string(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(json["searchHelpers"][0], "purple");
        assert_eq!(json["creator"]["displayName"], "WrapWorks");

        let back: ListingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
