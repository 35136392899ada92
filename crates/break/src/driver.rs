use crate::BreakError;
use crate::active_set::ActiveSet;
use crate::candidate::{Candidate, CandidateArena};
use crate::evaluator::{Alternative, BreakEvaluator};
use crate::policy::LevelPolicy;
use folio_elements::{Element, FlexMeasure, INFINITE_PENALTY, sequence};
use log::{debug, trace, warn};

/// One accepted part at a given level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartBoundary {
    /// Zero-based number of the finished part (line or page).
    pub part: u32,
    /// First element index of the part's content.
    pub start: usize,
    /// Index of the break element ending the part; one past the stream
    /// for the implicit break at the end.
    pub end: usize,
    /// Adjustment ratio chosen for the part.
    pub ratio: f64,
    /// Leftover capacity at the chosen break.
    pub difference: i32,
}

/// Result of breaking one element stream at one level.
#[derive(Debug, Clone, Default)]
pub struct BreakOutcome {
    pub parts: Vec<PartBoundary>,
    /// Total demerits of the chosen break sequence.
    pub demerits: f64,
    /// Number of breaks that had to be forced because every candidate in
    /// a class was pruned with no feasible break.
    pub forced_recoveries: usize,
    /// Set when more parts were produced than the capacity table holds
    /// and its last entry was repeated.
    pub capacity_exhausted: bool,
    /// Feasible breaks that lost their class to a better candidate.
    pub alternatives: Vec<Alternative>,
}

/// Walks one element stream, feeding boxes and glue into the running
/// totals and dispatching every legal break to the evaluator.
///
/// The walk alternates between two phases: collecting (accumulate
/// element sizes) and break-pending (a legal glue or penalty was met,
/// the evaluator runs, then collecting resumes with whatever candidates
/// survived or were forked).
pub struct StreamDriver<'a, P: LevelPolicy> {
    policy: &'a P,
    elements: &'a [Element],
    hyphenation_allowed: bool,
}

impl<'a, P: LevelPolicy> StreamDriver<'a, P> {
    pub fn new(policy: &'a P, elements: &'a [Element]) -> Self {
        Self {
            policy,
            elements,
            hyphenation_allowed: true,
        }
    }

    /// When disabled, flagged penalties (hyphenation points) are not
    /// considered as breaks.
    pub fn hyphenation_allowed(mut self, allowed: bool) -> Self {
        self.hyphenation_allowed = allowed;
        self
    }

    /// Breaks the whole stream.
    pub fn run(&self) -> Result<BreakOutcome, BreakError> {
        self.run_from(0)
    }

    /// Breaks the stream starting at `resume`, so a caller can pick up
    /// again after a forced structural break.
    pub fn run_from(&self, resume: usize) -> Result<BreakOutcome, BreakError> {
        self.validate(resume)?;

        let first_box = sequence::first_box_index(self.elements, resume);
        if first_box >= self.elements.len() {
            return Ok(BreakOutcome::default());
        }

        let mut arena = CandidateArena::new();
        let mut active = ActiveSet::new();
        let mut evaluator = BreakEvaluator::new(self.policy);
        active.add(arena.alloc(Candidate::root(first_box)));

        let mut running = FlexMeasure::zero();
        let mut previous_is_box = false;
        let mut last_forced: Option<usize> = None;
        let mut forced_recoveries = 0usize;

        // The index one past the stream stands for the implicit forced
        // break at the end; it is skipped when the stream already closes
        // with an explicit forced penalty.
        let end_index = self.elements.len();
        let implicit_end = !self
            .elements
            .last()
            .is_some_and(Element::is_forced_break);

        let mut index = first_box;
        while index <= end_index {
            if index == end_index {
                if implicit_end {
                    let end_break = Element::forced_break(0);
                    evaluator.consider_break(
                        self.elements,
                        &end_break,
                        index,
                        running,
                        &mut arena,
                        &mut active,
                    );
                }
            } else {
                let element = &self.elements[index];
                match element {
                    Element::Box { length } => {
                        running.natural += length;
                        previous_is_box = true;
                    }
                    Element::Glue(g) => {
                        // Glue is a legal break only right after a box.
                        if previous_is_box {
                            evaluator.consider_break(
                                self.elements,
                                element,
                                index,
                                running,
                                &mut arena,
                                &mut active,
                            );
                        }
                        running += *g;
                        previous_is_box = false;
                    }
                    Element::Penalty { value, flagged, .. } => {
                        if *value < INFINITE_PENALTY && (self.hyphenation_allowed || !flagged) {
                            evaluator.consider_break(
                                self.elements,
                                element,
                                index,
                                running,
                                &mut arena,
                                &mut active,
                            );
                        }
                        previous_is_box = false;
                    }
                }
            }

            if active.is_empty() {
                // No candidate stayed feasible. Reinstate the least-bad
                // reject with a clean score and rewind to its break.
                let Some(mut recovered) = evaluator.take_recovery(last_forced) else {
                    trace!("active set drained with nothing to recover at {index}");
                    break;
                };
                recovered.demerits = 0.0;
                debug!(
                    "no feasible break before {index}; forcing break at {}",
                    recovered.position
                );
                last_forced = Some(recovered.position);
                forced_recoveries += 1;
                running = recovered.progress.total;
                index = recovered.position;
                previous_is_box = false;
                active.add(arena.alloc(recovered));
            }
            index += 1;
        }

        Ok(self.finalize(arena, active, evaluator, forced_recoveries))
    }

    /// Picks the cheapest surviving candidate and walks its parent chain
    /// into the ordered part boundaries.
    fn finalize(
        &self,
        arena: CandidateArena,
        active: ActiveSet,
        mut evaluator: BreakEvaluator<'_>,
        forced_recoveries: usize,
    ) -> BreakOutcome {
        // Best per progress class first, then the global minimum, so the
        // cross-level grouping is what actually decides ties.
        let best = active
            .groups_by_progress_class(&arena, self.policy)
            .into_iter()
            .filter_map(|(_, members)| {
                members
                    .into_iter()
                    .min_by(|a, b| arena[*a].demerits.total_cmp(&arena[*b].demerits))
            })
            .min_by(|a, b| arena[*a].demerits.total_cmp(&arena[*b].demerits));

        let Some(best) = best else {
            return BreakOutcome {
                forced_recoveries,
                capacity_exhausted: self.policy.capacity_exhausted(),
                alternatives: evaluator.take_alternatives(),
                ..BreakOutcome::default()
            };
        };

        let chain = arena.ancestry(best);
        let mut parts = Vec::with_capacity(chain.len().saturating_sub(1));
        for pair in chain.windows(2) {
            let parent = &arena[pair[0]];
            let node = &arena[pair[1]];
            let start = if parent.parent.is_none() {
                parent.position
            } else {
                parent.position + 1
            };
            parts.push(PartBoundary {
                part: node.progress.part - 1,
                start,
                end: node.position.min(self.elements.len()),
                ratio: node.ratio,
                difference: node.difference,
            });
        }

        if self.policy.capacity_exhausted() {
            warn!(
                "capacity table exhausted after {} parts; last entry repeated",
                parts.len()
            );
        }

        BreakOutcome {
            parts,
            demerits: arena[best].demerits,
            forced_recoveries,
            capacity_exhausted: self.policy.capacity_exhausted(),
            alternatives: evaluator.take_alternatives(),
        }
    }

    fn validate(&self, resume: usize) -> Result<(), BreakError> {
        if resume > self.elements.len() {
            return Err(BreakError::Structural {
                index: resume,
                reason: "resumption index past the end of the stream",
            });
        }
        for (index, element) in self.elements.iter().enumerate().skip(resume) {
            if let Element::Glue(g) = element {
                if g.stretch < 0 || g.shrink < 0 {
                    return Err(BreakError::Structural {
                        index,
                        reason: "glue with negative flexibility",
                    });
                }
                // Glue that cannot act as a break point (no preceding
                // box) is tolerated as discardable; the driver simply
                // never offers it to the evaluator.
                if index == resume {
                    trace!("leading glue at {index} is discardable, not breakable");
                }
            }
        }
        Ok(())
    }
}
