use crate::candidate::{CandidateArena, CandidateId};
use crate::policy::{ClassKey, LevelPolicy};
use std::collections::{BTreeMap, HashSet};

/// The pool of all still-viable candidate layouts for one level.
///
/// Two grouping views exist over the same pool because "sameness"
/// differs between levels: candidates filling the same target part, and
/// candidates with the same progress signature. Each view is computed as
/// a fresh snapshot when a break is considered instead of being patched
/// incrementally, so removing a candidate under one view can never leave
/// it visible under the other.
#[derive(Debug, Default)]
pub struct ActiveSet {
    order: Vec<CandidateId>,
    live: HashSet<CandidateId>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: CandidateId) {
        if self.live.insert(id) {
            self.order.push(id);
        }
    }

    /// Removes a candidate from the pool. Returns false when it was
    /// already gone, so double removal under the two views is harmless.
    pub fn remove(&mut self, id: CandidateId) -> bool {
        self.live.remove(&id)
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.live.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.live.clear();
    }

    /// Live candidates in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = CandidateId> + '_ {
        self.order.iter().copied().filter(|id| self.live.contains(id))
    }

    /// Live candidates grouped by the part they would complete.
    pub fn groups_by_part_class(
        &self,
        arena: &CandidateArena,
        policy: &dyn LevelPolicy,
    ) -> Vec<(ClassKey, Vec<CandidateId>)> {
        self.groups(|id| policy.part_key(&arena[id]))
    }

    /// Live candidates grouped by their progress signature.
    pub fn groups_by_progress_class(
        &self,
        arena: &CandidateArena,
        policy: &dyn LevelPolicy,
    ) -> Vec<(ClassKey, Vec<CandidateId>)> {
        self.groups(|id| policy.progress_key(&arena[id]))
    }

    fn groups(
        &self,
        key_of: impl Fn(CandidateId) -> ClassKey,
    ) -> Vec<(ClassKey, Vec<CandidateId>)> {
        let mut map: BTreeMap<ClassKey, Vec<CandidateId>> = BTreeMap::new();
        for id in self.ids() {
            map.entry(key_of(id)).or_default().push(id);
        }
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::policy::{CapacityTable, PagePolicy};
    use crate::progress::Progress;
    use folio_elements::FlexMeasure;

    fn candidate(part: u32, natural: i32) -> Candidate {
        Candidate {
            progress: Progress::new(FlexMeasure::from_natural(natural), part),
            ..Candidate::root(0)
        }
    }

    #[test]
    fn test_views_group_differently() {
        let policy = PagePolicy::new(CapacityTable::uniform(1000));
        let mut arena = CandidateArena::new();
        let mut active = ActiveSet::new();

        // Two candidates on the same part with different heights.
        let a = arena.alloc(candidate(1, 400));
        let b = arena.alloc(candidate(1, 700));
        active.add(a);
        active.add(b);

        let by_part = active.groups_by_part_class(&arena, &policy);
        assert_eq!(by_part.len(), 1);
        assert_eq!(by_part[0].1, vec![a, b]);

        let by_progress = active.groups_by_progress_class(&arena, &policy);
        assert_eq!(by_progress.len(), 2);
    }

    #[test]
    fn test_removed_last_member_leaves_no_group() {
        let policy = PagePolicy::new(CapacityTable::uniform(1000));
        let mut arena = CandidateArena::new();
        let mut active = ActiveSet::new();

        let a = arena.alloc(candidate(0, 0));
        let b = arena.alloc(candidate(1, 500));
        active.add(a);
        active.add(b);

        // Remove the sole member of part 1 while iterating the part view.
        for (_, members) in active.groups_by_part_class(&arena, &policy) {
            for id in members {
                if arena[id].progress.part == 1 {
                    assert!(active.remove(id));
                }
            }
        }

        // The emptied class is not visible under either view.
        assert_eq!(active.groups_by_part_class(&arena, &policy).len(), 1);
        assert_eq!(active.groups_by_progress_class(&arena, &policy).len(), 1);
        assert!(!active.contains(b));
        assert!(!active.remove(b));
        assert_eq!(active.len(), 1);
    }
}
