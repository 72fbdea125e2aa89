//! Run-wide accumulation of probe results.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::ProbeOutcome;
use crate::config::SortOrder;

/// Total duration plus, for sorted reports, every per-file outcome.
///
/// Shared by reference between all handler tasks. The total only ever grows
/// through [`Aggregate::add`] and each task inserts its own key into the
/// detail map, so no task reads state that another is half-way through
/// changing.
#[derive(Debug)]
pub struct Aggregate {
    /// `f64` bit pattern, updated with compare-and-swap.
    total_bits: AtomicU64,
    detail: Option<DashMap<PathBuf, ProbeOutcome>>,
}

impl Aggregate {
    /// `track_detail` enables the per-file map needed by sorted reports.
    pub fn new(track_detail: bool) -> Self {
        Self {
            total_bits: AtomicU64::new(0f64.to_bits()),
            detail: track_detail.then(DashMap::new),
        }
    }

    /// Add `seconds` to the total without losing concurrent increments.
    pub fn add(&self, seconds: f64) {
        // The closure never returns None, so the update cannot fail.
        let _ = self
            .total_bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + seconds).to_bits())
            });
    }

    /// Sum of every duration added so far.
    pub fn total(&self) -> f64 {
        f64::from_bits(self.total_bits.load(Ordering::Acquire))
    }

    pub fn tracks_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// Remember the outcome for `path`. Ignored unless detail is tracked.
    pub fn record(&self, path: &Path, outcome: ProbeOutcome) {
        if let Some(detail) = &self.detail {
            detail.insert(path.to_path_buf(), outcome);
        }
    }

    /// Recorded outcomes ordered by duration.
    ///
    /// Failures and non-media files sort as zero. Equal durations are ordered
    /// by path so the report is deterministic.
    pub fn sorted(&self, order: SortOrder) -> Vec<(PathBuf, ProbeOutcome)> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };

        let mut entries: Vec<(PathBuf, ProbeOutcome)> = detail
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        entries.sort_by(|(a_path, a), (b_path, b)| {
            let by_duration = a.sort_key().total_cmp(&b.sort_key());
            let by_duration = match order {
                SortOrder::Descending => by_duration.reverse(),
                SortOrder::Ascending | SortOrder::Unsorted => by_duration,
            };
            by_duration.then_with(|| a_path.cmp(b_path))
        });

        entries
    }
}
