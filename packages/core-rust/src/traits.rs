//! Async seams between the core and its excluded collaborators.
//!
//! The core never performs I/O itself. The submission action and the list
//! endpoint are caller-supplied implementations of these traits; the engine
//! only exposes the validity/loading gates around them.

use async_trait::async_trait;

use crate::listing::ListingRecord;
use crate::query::FilterCriteria;
use crate::types::FormValues;

/// Terminal outcome of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the payload.
    Success,
    /// The backend rejected the payload; the caller may retry manually.
    Rejected,
}

/// The network/dispatch action a form runs on submit.
///
/// Invoked by the caller, never by the engine; the engine gates dispatch via
/// `can_submit`/`begin_submit` and records the result via `resolve_submit`.
/// Once a submission begins there is no cancellation primitive — timeout and
/// retry policy belong to the implementation.
#[async_trait]
pub trait SubmitAction: Send + Sync {
    /// Sends the form payload to the backend.
    async fn submit(&self, payload: FormValues) -> anyhow::Result<SubmitOutcome>;
}

/// The listing endpoint contract.
///
/// Implementations must be observationally equivalent to
/// [`apply_filters`](crate::query::apply_filters) over their backing
/// collection: same predicates, same comparator quirks, same page size, same
/// cursor semantics.
#[async_trait]
pub trait ListingEndpoint: Send + Sync {
    /// Returns one page of listings matching `criteria`.
    async fn list(&self, criteria: &FilterCriteria) -> anyhow::Result<Vec<ListingRecord>>;
}
