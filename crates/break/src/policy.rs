use crate::candidate::Candidate;
use folio_elements::Element;
use std::sync::atomic::{AtomicBool, Ordering};

/// Grouping key for active-set class partitioning. Small and totally
/// ordered so group snapshots iterate in a deterministic order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassKey {
    pub part: u32,
    pub signature: i64,
}

impl ClassKey {
    pub fn part_only(part: u32) -> ClassKey {
        ClassKey { part, signature: 0 }
    }
}

/// Ordered per-part capacities (page block extents, line inline
/// extents). Reading past the end repeats the last entry and latches an
/// exhaustion flag for the caller.
#[derive(Debug)]
pub struct CapacityTable {
    entries: Vec<i32>,
    exhausted: AtomicBool,
}

impl Clone for CapacityTable {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            exhausted: AtomicBool::new(self.exhausted.load(Ordering::Relaxed)),
        }
    }
}

impl CapacityTable {
    pub fn new(entries: Vec<i32>) -> Self {
        Self {
            entries,
            exhausted: AtomicBool::new(false),
        }
    }

    /// A table whose every part has the same extent.
    pub fn uniform(extent: i32) -> Self {
        Self::new(vec![extent])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity of the given part. Past the last entry the table repeats
    /// it, so breaking always has a target to work against.
    pub fn capacity_for(&self, part: u32) -> i32 {
        match self.entries.get(part as usize) {
            Some(extent) => *extent,
            None => {
                if self.entries.len() > 1 {
                    self.exhausted.store(true, Ordering::Relaxed);
                }
                self.entries.last().copied().unwrap_or(0)
            }
        }
    }

    /// True when `capacity_for` has been asked for a part beyond a
    /// multi-entry table and fell back to repeating the last entry.
    /// Single-entry tables mean "constant capacity" and never exhaust.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }

    pub fn reset_exhausted(&self) {
        self.exhausted.store(false, Ordering::Relaxed);
    }
}

/// Level-specific strategy: what "target capacity" means for a part, how
/// candidates group into equivalence classes, and which extra demerits
/// the level imposes on a break.
///
/// One concrete implementor exists per level; a page-level driver and
/// the line-level driver it wraps each carry their own.
pub trait LevelPolicy {
    /// Usable extent of the given part.
    fn target_capacity(&self, part: u32) -> i32;

    /// Upper bound on acceptable adjustment ratios. Pages stop at 1.0;
    /// lines may stretch noticeably further before looking broken.
    fn threshold(&self) -> f64;

    /// Key grouping candidates that would complete the same part.
    fn part_key(&self, candidate: &Candidate) -> ClassKey;

    /// Key grouping candidates with the same progress signature; this is
    /// the other level's notion of sameness, used to detect when a break
    /// at this level also closes a part one level up.
    fn progress_key(&self, candidate: &Candidate) -> ClassKey;

    /// Level-specific demerit surcharge for taking `element` as the
    /// break ending the part opened by `candidate`.
    fn demerits_offset(&self, candidate: &Candidate, element: &Element) -> f64 {
        let _ = (candidate, element);
        0.0
    }

    /// True when the capacity table ran out and repeated its last entry.
    fn capacity_exhausted(&self) -> bool {
        false
    }
}

/// Page-level policy: per-page block extents from a capacity table,
/// strict threshold, optional pending keep-together surcharge.
#[derive(Debug, Clone)]
pub struct PagePolicy {
    table: CapacityTable,
    threshold: f64,
    pending_keep_demerits: f64,
}

impl PagePolicy {
    pub const DEFAULT_THRESHOLD: f64 = 1.0;

    pub fn new(table: CapacityTable) -> Self {
        Self {
            table,
            threshold: Self::DEFAULT_THRESHOLD,
            pending_keep_demerits: 0.0,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Demerits added to every considered break while a keep-together or
    /// keep-with-next constraint is pending at this level.
    pub fn set_pending_keep_demerits(&mut self, demerits: f64) {
        self.pending_keep_demerits = demerits;
    }
}

impl LevelPolicy for PagePolicy {
    fn target_capacity(&self, part: u32) -> i32 {
        self.table.capacity_for(part)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn part_key(&self, candidate: &Candidate) -> ClassKey {
        ClassKey::part_only(candidate.progress.part)
    }

    fn progress_key(&self, candidate: &Candidate) -> ClassKey {
        // Page progress folds the consumed natural length in, so two
        // candidates on the same page with different heights compare as
        // different classes at line level.
        ClassKey {
            part: candidate.progress.part,
            signature: candidate.progress.total.natural as i64,
        }
    }

    fn demerits_offset(&self, _candidate: &Candidate, _element: &Element) -> f64 {
        self.pending_keep_demerits
    }

    fn capacity_exhausted(&self) -> bool {
        self.table.is_exhausted()
    }
}

/// Line-level policy: inline extents per line (usually uniform across a
/// paragraph) and the looser line threshold.
#[derive(Debug, Clone)]
pub struct LinePolicy {
    table: CapacityTable,
    threshold: f64,
}

impl LinePolicy {
    pub const DEFAULT_THRESHOLD: f64 = 7.6;

    pub fn new(table: CapacityTable) -> Self {
        Self {
            table,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// A paragraph whose every line has the same inline extent.
    pub fn uniform(extent: i32) -> Self {
        Self::new(CapacityTable::uniform(extent))
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

impl LevelPolicy for LinePolicy {
    fn target_capacity(&self, part: u32) -> i32 {
        self.table.capacity_for(part)
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn part_key(&self, candidate: &Candidate) -> ClassKey {
        ClassKey::part_only(candidate.progress.part)
    }

    fn progress_key(&self, candidate: &Candidate) -> ClassKey {
        // Line-level sameness is just the line count.
        ClassKey::part_only(candidate.progress.part)
    }

    fn capacity_exhausted(&self) -> bool {
        self.table.is_exhausted()
    }
}
