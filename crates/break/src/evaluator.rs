use crate::active_set::ActiveSet;
use crate::candidate::{Candidate, CandidateArena, CandidateId, Fitness};
use crate::policy::LevelPolicy;
use crate::progress::Progress;
use folio_elements::{Element, FlexMeasure};
use log::trace;

/// Sentinel adjustment ratio used when no stretch (or shrink) is
/// available to absorb a difference. Keeps the ratio computation total:
/// never NaN, never a division by zero.
pub const INFINITE_RATIO: f64 = 1000.0;

/// Extra demerits for two consecutive parts ending at flagged penalties.
const REPEATED_FLAGGED_DEMERIT: f64 = 50.0;

/// Extra demerits for consecutive parts in incompatible fitness bands.
const INCOMPATIBLE_FITNESS_DEMERIT: f64 = 50.0;

/// A feasible candidate that lost its equivalence class to a better one.
/// Kept as a read-only snapshot for backtracking and graph inspection.
#[derive(Debug, Clone)]
pub struct Alternative {
    /// The surviving candidate this break would have forked from.
    pub from: CandidateId,
    /// Element index of the considered break.
    pub position: usize,
    pub ratio: f64,
    pub difference: i32,
    pub demerits: f64,
}

/// Winner bookkeeping for one equivalence class during a single sweep.
struct BestRecord {
    node: CandidateId,
    demerits: f64,
    ratio: f64,
    difference: i32,
    fitness: Fitness,
}

/// Evaluates legal breaks against the active set for one level:
/// computes adjustment ratios and demerits, prunes infeasible
/// candidates, and forks one new candidate per equivalence class.
pub struct BreakEvaluator<'a> {
    policy: &'a dyn LevelPolicy,
    /// Least-bad overfull reject since the last recovery; reset at every
    /// considered break.
    last_too_long: Option<Candidate>,
    /// Least-bad underfull reject; persists until a feasible break
    /// improves on it.
    last_too_short: Option<Candidate>,
    alternatives: Vec<Alternative>,
}

impl<'a> BreakEvaluator<'a> {
    pub fn new(policy: &'a dyn LevelPolicy) -> Self {
        Self {
            policy,
            last_too_long: None,
            last_too_short: None,
            alternatives: Vec::new(),
        }
    }

    /// Considers one legal break at `index` against every active
    /// candidate. `running` holds the stream totals accumulated up to
    /// (and excluding) the break element; `break_element` may be a
    /// synthetic forced penalty standing in for the end of the stream.
    ///
    /// Returns the number of new candidates added to the active set.
    pub fn consider_break(
        &mut self,
        elements: &[Element],
        break_element: &Element,
        index: usize,
        running: FlexMeasure,
        arena: &mut CandidateArena,
        active: &mut ActiveSet,
    ) -> usize {
        let forced = break_element.is_forced_break();
        let penalty_length = match break_element {
            Element::Penalty { length, .. } => *length,
            _ => 0,
        };

        self.last_too_long = None;

        // Totals carried by any candidate forked at this break: the
        // running totals plus the discardables that immediately follow.
        let forked_totals = totals_after_break(elements, index, running);

        let mut emitted = 0;
        for (key, members) in active.groups_by_part_class(arena, self.policy) {
            let mut best: Option<BestRecord> = None;
            let mut feasible: Vec<Alternative> = Vec::new();

            for id in members {
                let candidate = &arena[id];
                if candidate.position == index {
                    continue;
                }

                let capacity = self.policy.target_capacity(candidate.progress.part);
                let consumed = running.natural - candidate.progress.total.natural + penalty_length;
                let difference = capacity - consumed;
                let available_stretch = running.stretch - candidate.progress.total.stretch;
                let available_shrink = running.shrink - candidate.progress.total.shrink;
                let ratio = adjustment_ratio(difference, available_stretch, available_shrink);

                trace!(
                    "break@{index} class={key:?} candidate={id} diff={difference} r={ratio:.3}"
                );

                // The part would overflow beyond its shrink, or the
                // break is mandatory: this candidate cannot survive.
                if ratio < -1.0 || forced {
                    active.remove(id);
                }

                if (-1.0..=self.policy.threshold()).contains(&ratio) {
                    let fitness = Fitness::classify(ratio);
                    let demerits =
                        self.compute_demerits(elements, break_element, candidate, fitness, ratio);

                    match &best {
                        Some(record) if demerits >= record.demerits => {
                            feasible.push(Alternative {
                                from: id,
                                position: index,
                                ratio,
                                difference,
                                demerits,
                            });
                        }
                        _ => {
                            if let Some(record) = best.take() {
                                feasible.push(Alternative {
                                    from: record.node,
                                    position: index,
                                    ratio: record.ratio,
                                    difference: record.difference,
                                    demerits: record.demerits,
                                });
                            }
                            best = Some(BestRecord {
                                node: id,
                                demerits,
                                ratio,
                                difference,
                                fitness,
                            });
                            self.last_too_short = None;
                        }
                    }
                } else {
                    // Remember the least-bad reject on each side so a
                    // drained active set can be recovered by forcing.
                    let fitness = Fitness::classify(ratio);
                    let demerits =
                        self.compute_demerits(elements, break_element, candidate, fitness, ratio);
                    let reject = Candidate {
                        position: index,
                        progress: Progress::new(running, candidate.progress.part + 1),
                        fitness,
                        ratio,
                        difference,
                        demerits,
                        parent: Some(id),
                    };
                    if ratio <= -1.0 {
                        if self
                            .last_too_long
                            .as_ref()
                            .is_none_or(|prev| demerits < prev.demerits)
                        {
                            self.last_too_long = Some(reject);
                        }
                    } else if self
                        .last_too_short
                        .as_ref()
                        .is_none_or(|prev| demerits <= prev.demerits)
                    {
                        self.last_too_short = Some(reject);
                    }
                }
            }

            if let Some(record) = best {
                let parent = &arena[record.node];
                let forked = Candidate {
                    position: index,
                    progress: Progress::new(forked_totals, parent.progress.part + 1),
                    fitness: record.fitness,
                    ratio: record.ratio,
                    difference: record.difference,
                    demerits: record.demerits,
                    parent: Some(record.node),
                };
                let id = arena.alloc(forked);
                active.add(id);
                emitted += 1;
            }
            self.alternatives.append(&mut feasible);
        }
        emitted
    }

    /// Demerits of ending the part opened by `candidate` at
    /// `break_element`, including the candidate's accumulated score.
    fn compute_demerits(
        &self,
        elements: &[Element],
        break_element: &Element,
        candidate: &Candidate,
        fitness: Fitness,
        ratio: f64,
    ) -> f64 {
        let badness = 1.0 + 100.0 * ratio.abs().powi(3);
        let mut demerits = match break_element {
            Element::Penalty { value, .. } if *value > 0 => {
                let sum = badness + f64::from(*value);
                sum * sum
            }
            Element::Penalty { value, .. } if !break_element.is_forced_break() => {
                let penalty = f64::from(*value);
                badness * badness - penalty * penalty
            }
            _ => badness * badness,
        };
        // A rewarding penalty may outweigh the badness; demerits stay
        // non-negative so chains remain monotone.
        demerits = demerits.max(0.0);

        if is_flagged_penalty(break_element)
            && elements
                .get(candidate.position)
                .is_some_and(is_flagged_penalty)
        {
            demerits += REPEATED_FLAGGED_DEMERIT;
        }
        if fitness.incompatible_with(candidate.fitness) {
            demerits += INCOMPATIBLE_FITNESS_DEMERIT;
        }
        demerits += self.policy.demerits_offset(candidate, break_element);
        demerits + candidate.demerits
    }

    /// Takes the least-bad reject to restart from after the active set
    /// drained. Prefers the underfull side unless it was already used as
    /// the previous restart position.
    pub fn take_recovery(&mut self, last_forced_position: Option<usize>) -> Option<Candidate> {
        let too_short_reusable = match (&self.last_too_short, last_forced_position) {
            (Some(short), Some(pos)) => short.position != pos,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let picked = if too_short_reusable {
            self.last_too_short.take()
        } else {
            self.last_too_long.take()
        };
        self.last_too_short = None;
        self.last_too_long = None;
        picked
    }

    /// Hands over the alternatives collected so far.
    pub fn take_alternatives(&mut self) -> Vec<Alternative> {
        std::mem::take(&mut self.alternatives)
    }
}

/// The adjustment ratio for a part that misses its target by
/// `difference`: positive differences are absorbed by stretch, negative
/// ones by shrink, and missing flexibility yields the infinite sentinel
/// of the matching sign.
pub fn adjustment_ratio(difference: i32, available_stretch: i32, available_shrink: i32) -> f64 {
    if difference > 0 {
        if available_stretch > 0 {
            f64::from(difference) / f64::from(available_stretch)
        } else {
            INFINITE_RATIO
        }
    } else if difference < 0 {
        if available_shrink > 0 {
            f64::from(difference) / f64::from(available_shrink)
        } else {
            -INFINITE_RATIO
        }
    } else {
        0.0
    }
}

/// Totals carried into the part that starts after a break at `index`:
/// the running totals plus the discardable glue up to the next box or
/// the next forced break.
fn totals_after_break(elements: &[Element], index: usize, running: FlexMeasure) -> FlexMeasure {
    let mut totals = running;
    for (idx, element) in elements.iter().enumerate().skip(index) {
        match element {
            Element::Box { .. } => break,
            Element::Glue(g) => totals += *g,
            Element::Penalty { .. } => {
                if element.is_forced_break() && idx != index {
                    break;
                }
            }
        }
    }
    totals
}

fn is_flagged_penalty(element: &Element) -> bool {
    matches!(element, Element::Penalty { flagged: true, .. })
}
