//! File-slot reconciliation for livery uploads.
//!
//! A livery submission requires a fixed set of file roles ("slots"): the
//! dynamically named definition file (matched by pattern) plus a list of
//! exact texture names. Users drop an arbitrary bag of files; reconciliation
//! assigns them to slots deterministically so the same upload always produces
//! the same review screen.
//!
//! # Assignment order
//!
//! Pattern slots are matched first, then exact-name slots in declaration
//! order; each slot consumes the first remaining file (in upload order) that
//! matches it. Files matching no slot then overflow into the lowest-indexed
//! still-empty slots, so an overflow file can never displace an exact-name
//! match — all exact matches are settled before overflow placement begins.

use regex::Regex;

use crate::types::UploadFile;

/// Errors raised while merging or reconciling uploads.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The upload does not fit: more files than slots (reconciliation) or a
    /// merged batch exceeding the cap. The whole batch is rejected; there is
    /// no partial acceptance.
    #[error("too many files: {count} exceeds the maximum of {max}")]
    TooManyFiles { count: usize, max: usize },
}

/// How a slot recognizes its file.
#[derive(Debug, Clone)]
pub enum SlotName {
    /// Exact file-name match.
    Exact(String),
    /// Pattern match, e.g. the livery definition file `^.+\.json$`.
    Pattern(Regex),
}

impl SlotName {
    /// Canonical label for display and assignment output.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            SlotName::Exact(name) => name,
            SlotName::Pattern(re) => re.as_str(),
        }
    }

    /// Whether the given file name satisfies this slot.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            SlotName::Exact(name) => name == file_name,
            SlotName::Pattern(re) => re.is_match(file_name),
        }
    }
}

/// One required file role in a livery upload.
#[derive(Debug, Clone)]
pub struct FileSlotRequirement {
    /// Canonical slot name or the single dynamic pattern.
    pub name: SlotName,
}

impl FileSlotRequirement {
    /// Requirement matched by exact file name.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: SlotName::Exact(name.into()),
        }
    }

    /// Requirement matched by pattern rather than exact name.
    #[must_use]
    pub fn pattern(re: Regex) -> Self {
        Self {
            name: SlotName::Pattern(re),
        }
    }
}

/// Result of binding one requirement to (at most) one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    /// Canonical label of the requirement this assignment is for.
    pub slot: String,
    /// Name of the file occupying the slot, if any.
    pub selected_name: Option<String>,
    /// True only when the occupying file matched the slot's own name or
    /// pattern. Overflow occupants and empty slots are not approved.
    pub approved: bool,
}

/// Matches uploaded files against the required slots.
///
/// Deterministic and order-stable: identical requirement and file lists
/// always yield identical assignments. Output is in requirement-declaration
/// order regardless of the pattern-first matching pass. A requirement left
/// unmatched is reported with `selected_name: None, approved: false`.
///
/// # Errors
///
/// [`UploadError::TooManyFiles`] when unmatched files remain after every slot
/// is occupied. Callers surface this as a rejection of the whole batch.
pub fn reconcile_file_slots(
    requirements: &[FileSlotRequirement],
    uploaded: &[UploadFile],
) -> Result<Vec<SlotAssignment>, UploadError> {
    let mut assignments: Vec<SlotAssignment> = requirements
        .iter()
        .map(|req| SlotAssignment {
            slot: req.name.label().to_string(),
            selected_name: None,
            approved: false,
        })
        .collect();

    // Upload order is preserved in the remaining pool.
    let mut remaining: Vec<&UploadFile> = uploaded.iter().collect();

    // Pattern slots first, then exact-name slots in declaration order.
    let visit_order = requirements
        .iter()
        .enumerate()
        .filter(|(_, req)| matches!(req.name, SlotName::Pattern(_)))
        .chain(
            requirements
                .iter()
                .enumerate()
                .filter(|(_, req)| matches!(req.name, SlotName::Exact(_))),
        );

    for (idx, req) in visit_order {
        if let Some(pos) = remaining.iter().position(|f| req.name.matches(&f.name)) {
            let file = remaining.remove(pos);
            assignments[idx].selected_name = Some(file.name.clone());
            assignments[idx].approved = true;
        }
    }

    // Leftover files occupy the lowest-indexed still-empty slots, upload order.
    for file in remaining {
        match assignments.iter_mut().find(|a| a.selected_name.is_none()) {
            Some(slot) => slot.selected_name = Some(file.name.clone()),
            None => {
                return Err(UploadError::TooManyFiles {
                    count: uploaded.len(),
                    max: requirements.len(),
                })
            }
        }
    }

    Ok(assignments)
}

/// Merges an incoming upload batch into the existing selection.
///
/// Files are identified by name: re-adding a name already present is a no-op,
/// not a duplicate entry. Acceptance is atomic — if the merged selection
/// would exceed `max`, the whole incoming batch is rejected and the existing
/// selection stands (unless the batch fits after dedup, in which case it is
/// accepted in full).
///
/// # Errors
///
/// [`UploadError::TooManyFiles`] when the deduplicated merge exceeds `max`.
pub fn dedupe_and_cap_uploads(
    existing: &[UploadFile],
    incoming: &[UploadFile],
    max: usize,
) -> Result<Vec<UploadFile>, UploadError> {
    let mut merged = existing.to_vec();
    for file in incoming {
        if !merged.iter().any(|f| f.name == file.name) {
            merged.push(file.clone());
        }
    }
    if merged.len() > max {
        return Err(UploadError::TooManyFiles {
            count: merged.len(),
            max,
        });
    }
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn livery_requirements() -> Vec<FileSlotRequirement> {
        vec![
            FileSlotRequirement::pattern(Regex::new(r"^.+\.json$").unwrap()),
            FileSlotRequirement::exact("body.dds"),
            FileSlotRequirement::exact("wheel.dds"),
        ]
    }

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names.iter().map(|n| UploadFile::new(*n, 100)).collect()
    }

    // ---- Reconciliation ----

    #[test]
    fn pattern_exact_and_overflow_assignment() {
        let reqs = livery_requirements();
        let uploaded = files(&["mycar-livery.json", "extra.png", "body.dds"]);
        let assignments = reconcile_file_slots(&reqs, &uploaded).unwrap();

        // Definition file matched the pattern slot.
        assert_eq!(
            assignments[0].selected_name.as_deref(),
            Some("mycar-livery.json")
        );
        assert!(assignments[0].approved);

        // body.dds matched its exact slot even though extra.png came first.
        assert_eq!(assignments[1].selected_name.as_deref(), Some("body.dds"));
        assert!(assignments[1].approved);

        // extra.png overflowed into the remaining empty slot, unapproved.
        assert_eq!(assignments[2].slot, "wheel.dds");
        assert_eq!(assignments[2].selected_name.as_deref(), Some("extra.png"));
        assert!(!assignments[2].approved);
    }

    #[test]
    fn overflow_never_displaces_exact_match() {
        let reqs = livery_requirements();
        // wheel.dds arrives last; extra.png must not squat its slot.
        let uploaded = files(&["car.json", "extra.png", "body.dds", "wheel.dds"]);
        let err = reconcile_file_slots(&reqs, &uploaded).unwrap_err();
        // All three slots got exact/pattern matches, leaving extra.png with
        // nowhere to go.
        assert!(matches!(err, UploadError::TooManyFiles { count: 4, max: 3 }));
    }

    #[test]
    fn unmatched_requirement_reports_empty_slot() {
        let reqs = livery_requirements();
        let uploaded = files(&["car.json", "body.dds"]);
        let assignments = reconcile_file_slots(&reqs, &uploaded).unwrap();
        assert_eq!(assignments[2].slot, "wheel.dds");
        assert_eq!(assignments[2].selected_name, None);
        assert!(!assignments[2].approved);
    }

    #[test]
    fn pattern_slot_consumes_first_matching_file_in_upload_order() {
        let reqs = livery_requirements();
        let uploaded = files(&["a.json", "b.json", "body.dds"]);
        let assignments = reconcile_file_slots(&reqs, &uploaded).unwrap();
        assert_eq!(assignments[0].selected_name.as_deref(), Some("a.json"));
        // b.json overflows into the empty wheel.dds slot.
        assert_eq!(assignments[2].selected_name.as_deref(), Some("b.json"));
        assert!(!assignments[2].approved);
    }

    #[test]
    fn empty_upload_yields_all_empty_slots() {
        let reqs = livery_requirements();
        let assignments = reconcile_file_slots(&reqs, &[]).unwrap();
        assert!(assignments.iter().all(|a| a.selected_name.is_none()));
        assert!(assignments.iter().all(|a| !a.approved));
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let reqs = livery_requirements();
        let uploaded = files(&["mycar-livery.json", "extra.png", "body.dds"]);
        let first = reconcile_file_slots(&reqs, &uploaded).unwrap();
        let second = reconcile_file_slots(&reqs, &uploaded).unwrap();
        assert_eq!(first, second);
    }

    // ---- Dedupe / cap ----

    #[test]
    fn readding_same_names_is_noop() {
        let batch = files(&["a.dds", "b.dds"]);
        let merged = dedupe_and_cap_uploads(&[], &batch, 5).unwrap();
        let again = dedupe_and_cap_uploads(&merged, &batch, 5).unwrap();
        assert_eq!(again, merged);
    }

    #[test]
    fn batch_dedupes_against_itself() {
        let batch = files(&["a.dds", "a.dds", "b.dds"]);
        let merged = dedupe_and_cap_uploads(&[], &batch, 5).unwrap();
        assert_eq!(merged, files(&["a.dds", "b.dds"]));
    }

    #[test]
    fn overflowing_batch_rejected_in_full() {
        let existing = files(&["a.dds", "b.dds"]);
        let batch = files(&["c.dds", "d.dds"]);
        let err = dedupe_and_cap_uploads(&existing, &batch, 3).unwrap_err();
        assert!(matches!(err, UploadError::TooManyFiles { count: 4, max: 3 }));
    }

    #[test]
    fn batch_that_fits_after_dedup_is_accepted() {
        let existing = files(&["a.dds", "b.dds"]);
        // Two of three names are already present; deduped merge fits.
        let batch = files(&["a.dds", "b.dds", "c.dds"]);
        let merged = dedupe_and_cap_uploads(&existing, &batch, 3).unwrap();
        assert_eq!(merged, files(&["a.dds", "b.dds", "c.dds"]));
    }

    // ---- Properties ----

    proptest! {
        #[test]
        fn reconcile_deterministic(names in proptest::collection::vec("[a-z]{1,8}\\.(dds|json|png)", 0..6)) {
            let reqs = livery_requirements();
            let uploaded: Vec<UploadFile> =
                names.iter().map(|n| UploadFile::new(n.clone(), 1)).collect();
            let first = reconcile_file_slots(&reqs, &uploaded);
            let second = reconcile_file_slots(&reqs, &uploaded);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(UploadError::TooManyFiles { .. }), Err(UploadError::TooManyFiles { .. })) => {}
                _ => prop_assert!(false, "runs diverged"),
            }
        }

        #[test]
        fn dedupe_merge_is_idempotent(names in proptest::collection::vec("[a-z]{1,6}\\.dds", 0..8)) {
            let batch: Vec<UploadFile> =
                names.iter().map(|n| UploadFile::new(n.clone(), 1)).collect();
            if let Ok(once) = dedupe_and_cap_uploads(&[], &batch, 8) {
                let twice = dedupe_and_cap_uploads(&once, &batch, 8).unwrap();
                prop_assert_eq!(twice, once);
            }
        }
    }
}
