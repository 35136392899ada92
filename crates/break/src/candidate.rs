use crate::progress::Progress;
use std::fmt;
use std::ops::Index;

/// Quality band of a finished part, judged by its adjustment ratio.
/// Consecutive parts from very different bands read badly next to each
/// other and attract an extra demerit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fitness {
    VeryTight,
    Tight,
    Loose,
    VeryLoose,
}

impl Fitness {
    pub fn classify(ratio: f64) -> Fitness {
        if ratio < -0.5 {
            Fitness::VeryTight
        } else if ratio <= 0.5 {
            Fitness::Tight
        } else if ratio <= 1.0 {
            Fitness::Loose
        } else {
            Fitness::VeryLoose
        }
    }

    fn rank(self) -> i32 {
        match self {
            Fitness::VeryTight => 0,
            Fitness::Tight => 1,
            Fitness::Loose => 2,
            Fitness::VeryLoose => 3,
        }
    }

    /// True when the two bands are more than one step apart.
    pub fn incompatible_with(self, other: Fitness) -> bool {
        (self.rank() - other.rank()).abs() > 1
    }
}

/// Index of a candidate in its arena. Parent links are ids rather than
/// references, so candidate chains are cycle-free by construction and
/// carry no lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(u32);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A partial solution: the break it was forked at, the stream totals
/// recorded there, and the score accumulated along its parent chain.
/// Produced exactly once, at the moment its break is accepted, and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Element index of the accepted break (the first box for the root).
    pub position: usize,
    /// Totals of the stream consumed up to `position`, plus the number
    /// of the part this candidate opens.
    pub progress: Progress,
    /// Fitness of the part ending at `position`.
    pub fitness: Fitness,
    /// Adjustment ratio of the part ending at `position`.
    pub ratio: f64,
    /// Leftover capacity of the part ending at `position`.
    pub difference: i32,
    /// Demerits accumulated over the whole chain up to this break.
    pub demerits: f64,
    pub parent: Option<CandidateId>,
}

impl Candidate {
    /// The starting point of a breaking run: one empty part open at the
    /// first box of the stream.
    pub fn root(first_box: usize) -> Candidate {
        Candidate {
            position: first_box,
            progress: Progress::root(),
            fitness: Fitness::Tight,
            ratio: 0.0,
            difference: 0,
            demerits: 0.0,
            parent: None,
        }
    }
}

/// Append-only storage for every candidate produced during one breaking
/// run. Pruning only removes ids from the active set; the backing slots
/// stay alive so parent chains can be walked when the run finishes.
#[derive(Debug, Default)]
pub struct CandidateArena {
    slots: Vec<Candidate>,
}

impl CandidateArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, candidate: Candidate) -> CandidateId {
        let id = CandidateId(self.slots.len() as u32);
        self.slots.push(candidate);
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Walks parent links from `id` back to the root. The returned chain
    /// is ordered root-first and includes both endpoints.
    pub fn ancestry(&self, id: CandidateId) -> Vec<CandidateId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            chain.push(cid);
            current = self[cid].parent;
        }
        chain.reverse();
        chain
    }
}

impl Index<CandidateId> for CandidateArena {
    type Output = Candidate;

    fn index(&self, id: CandidateId) -> &Candidate {
        &self.slots[id.0 as usize]
    }
}
