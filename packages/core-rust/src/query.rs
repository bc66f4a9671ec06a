//! Listing query pipeline: filter, sort, and paginate livery records.
//!
//! [`apply_filters`] is the normative contract for the marketplace list
//! endpoint. The TypeScript client currently evaluates it locally over a
//! mocked collection; a production backend must be observationally
//! equivalent, down to the comparator quirks documented below.
//!
//! The function is pure: it clones every record it touches, never mutates or
//! aliases its input, and reads no process-wide state, so it is safe to call
//! concurrently from any number of callers.

use serde::{Deserialize, Serialize};

use crate::listing::ListingRecord;

/// Fixed page size of the listing endpoint.
pub const PAGE_SIZE: usize = 12;

/// Separator of the `ids` allow-list (`"A&B&C"`).
const ID_LIST_SEPARATOR: char = '&';

/// Sort direction over `createdAt`.
///
/// The naming is inverted relative to natural language and is preserved as
/// the observed wire contract: `Asc` orders newest-first, `Desc` oldest-first.
/// Serializes lowercase to match the TypeScript query-string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Composable listing filter criteria.
///
/// Every criterion is optional; absent or empty criteria are skipped
/// entirely (they never mean "match nothing"). All present criteria are
/// AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// `&`-delimited allow-list of record ids.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ids: Option<String>,
    /// Exact car-model match.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub car: Option<String>,
    /// Inclusive rating floor; applied only when it parses as a positive
    /// number.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rating: Option<String>,
    /// Case-insensitive search; a record matches when any whitespace-split
    /// token of the query equals one of its search-helper tokens exactly.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub search: Option<String>,
    /// Sort direction over creation time.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created: Option<SortDirection>,
    /// Cursor: id of the last record seen on the previous page. The next
    /// page resumes immediately after it in the current filtered+sorted
    /// order. A cursor that no longer matches any record restarts at the top
    /// of the list.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_record_id: Option<String>,
}

/// Returns `Some(s)` only when the optional criterion is present and
/// non-empty. Empty strings come in from cleared query-string params and are
/// skipped like absent criteria.
fn present(criterion: Option<&str>) -> Option<&str> {
    criterion.filter(|s| !s.is_empty())
}

/// The rating criterion counts only when it parses as a positive number.
fn rating_floor(criteria: &FilterCriteria) -> Option<f64> {
    present(criteria.rating.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| *n > 0.0)
}

/// Filters, sorts, and paginates the collection per `criteria`.
///
/// Pipeline, in order:
///
/// 1. Clone — the input is never mutated or aliased.
/// 2. Filter — AND-combined: `ids` allow-list, `car` exact match, `rating`
///    inclusive floor (`record.rating >= floor`), `search` whole-token match.
/// 3. Sort — `created` orders by creation time (`Asc` newest-first, `Desc`
///    oldest-first; see [`SortDirection`]). When a rating floor was applied, a
///    stable descending-rating sort runs afterwards, so rating dominates and
///    creation time only breaks rating ties.
/// 4. Paginate — [`PAGE_SIZE`] records starting right after `last_record_id`
///    when it is found in the current order, from the top otherwise.
#[must_use]
pub fn apply_filters(records: &[ListingRecord], criteria: &FilterCriteria) -> Vec<ListingRecord> {
    let mut results: Vec<ListingRecord> = records.to_vec();

    if let Some(ids) = present(criteria.ids.as_deref()) {
        let allow: Vec<&str> = ids.split(ID_LIST_SEPARATOR).collect();
        results.retain(|r| allow.contains(&r.id.as_str()));
    }

    if let Some(car) = present(criteria.car.as_deref()) {
        results.retain(|r| r.car == car);
    }

    let floor = rating_floor(criteria);
    if let Some(floor) = floor {
        results.retain(|r| r.rating >= floor);
    }

    if let Some(search) = present(criteria.search.as_deref()) {
        let lowered = search.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        results.retain(|r| {
            tokens
                .iter()
                .any(|t| r.search_helpers.iter().any(|h| h == t))
        });
    }

    match criteria.created {
        Some(SortDirection::Asc) => results.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some(SortDirection::Desc) => results.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        None => {}
    }

    // Vec::sort_by is stable, so the date order survives within equal ratings.
    if floor.is_some() {
        results.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    }

    let offset = present(criteria.last_record_id.as_deref())
        .and_then(|cursor| results.iter().position(|r| r.id == cursor))
        .map_or(0, |pos| pos + 1);

    results.into_iter().skip(offset).take(PAGE_SIZE).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
