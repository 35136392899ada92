use crate::active_set::ActiveSet;
use crate::candidate::{Candidate, CandidateArena};
use crate::evaluator::{BreakEvaluator, INFINITE_RATIO, adjustment_ratio};
use crate::policy::LinePolicy;
use crate::progress::Progress;
use folio_elements::{Element, FlexMeasure};

#[test]
fn test_adjustment_ratio_is_total() {
    assert_eq!(adjustment_ratio(0, 0, 0), 0.0);
    assert_eq!(adjustment_ratio(100, 50, 0), 2.0);
    assert_eq!(adjustment_ratio(-100, 0, 50), -2.0);

    // Missing flexibility yields the signed sentinel, never NaN or a
    // division by zero.
    assert_eq!(adjustment_ratio(100, 0, 0), INFINITE_RATIO);
    assert_eq!(adjustment_ratio(-100, 0, 0), -INFINITE_RATIO);
    assert!(adjustment_ratio(1, 0, 0).is_finite());
}

#[test]
fn test_exact_fit_forks_one_candidate() {
    let elements = [
        Element::Box { length: 900 },
        Element::glue(100, 50, 25),
        Element::Box { length: 900 },
    ];
    let policy = LinePolicy::uniform(900);
    let mut arena = CandidateArena::new();
    let mut active = ActiveSet::new();
    let root = arena.alloc(Candidate::root(0));
    active.add(root);

    let mut evaluator = BreakEvaluator::new(&policy);
    let running = FlexMeasure::from_natural(900);
    let emitted = evaluator.consider_break(
        &elements,
        &elements[1],
        1,
        running,
        &mut arena,
        &mut active,
    );

    assert_eq!(emitted, 1);
    assert_eq!(active.len(), 2);
    assert!(active.contains(root));

    let forked = active.ids().find(|id| *id != root).unwrap();
    let forked = &arena[forked];
    assert_eq!(forked.position, 1);
    assert_eq!(forked.progress.part, 1);
    assert_eq!(forked.ratio, 0.0);
    // The forked totals absorb the glue at the break.
    assert_eq!(forked.progress.total, FlexMeasure::new(1000, 50, 25));
    // Exact fit: badness 1, squared, nothing else.
    assert_eq!(forked.demerits, 1.0);
}

#[test]
fn test_best_candidate_wins_and_loser_becomes_alternative() {
    let elements = [
        Element::Box { length: 500 },
        Element::penalty(0, 0),
        Element::Box { length: 600 },
        Element::penalty(0, 0),
        Element::Box { length: 500 },
        Element::penalty(0, 0),
    ];
    let policy = LinePolicy::uniform(600);
    let mut arena = CandidateArena::new();
    let mut active = ActiveSet::new();

    // Two candidates filling the same part with different histories.
    let a = arena.alloc(Candidate {
        position: 1,
        progress: Progress::new(FlexMeasure::new(500, 100, 50), 1),
        demerits: 10.0,
        ..Candidate::root(0)
    });
    let b = arena.alloc(Candidate {
        position: 3,
        progress: Progress::new(FlexMeasure::new(600, 100, 50), 1),
        demerits: 0.0,
        ..Candidate::root(0)
    });
    active.add(a);
    active.add(b);

    let mut evaluator = BreakEvaluator::new(&policy);
    let running = FlexMeasure::new(1100, 200, 100);
    let emitted = evaluator.consider_break(
        &elements,
        &elements[5],
        5,
        running,
        &mut arena,
        &mut active,
    );

    // One class, one winner: the exact fit from `a` beats the stretched
    // line from `b` even though `a` carries more accumulated demerits.
    assert_eq!(emitted, 1);
    let forked = active
        .ids()
        .find(|id| arena[*id].position == 5)
        .map(|id| &arena[id])
        .unwrap();
    assert_eq!(forked.parent, Some(a));
    assert_eq!(forked.ratio, 0.0);
    assert_eq!(forked.demerits, 11.0);

    let alternatives = evaluator.take_alternatives();
    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0].from, b);
    assert_eq!(alternatives[0].position, 5);
    assert!(alternatives[0].demerits > forked.demerits);
}

#[test]
fn test_overfull_candidate_is_pruned_and_recoverable() {
    let elements = [
        Element::Box { length: 1500 },
        Element::glue(0, 0, 0),
        Element::Box { length: 1500 },
    ];
    let policy = LinePolicy::uniform(1000);
    let mut arena = CandidateArena::new();
    let mut active = ActiveSet::new();
    let root = arena.alloc(Candidate::root(0));
    active.add(root);

    let mut evaluator = BreakEvaluator::new(&policy);
    let emitted = evaluator.consider_break(
        &elements,
        &elements[1],
        1,
        FlexMeasure::from_natural(1500),
        &mut arena,
        &mut active,
    );

    assert_eq!(emitted, 0);
    assert!(active.is_empty());

    // The pruned break survives as the least-bad overfull reject.
    let recovered = evaluator.take_recovery(None).unwrap();
    assert_eq!(recovered.position, 1);
    assert_eq!(recovered.parent, Some(root));
    assert!(recovered.ratio <= -1.0);
}

#[test]
fn test_forced_break_prunes_every_candidate() {
    let elements = [Element::Box { length: 900 }, Element::forced_break(0)];
    let policy = LinePolicy::uniform(900);
    let mut arena = CandidateArena::new();
    let mut active = ActiveSet::new();
    let root = arena.alloc(Candidate::root(0));
    active.add(root);

    let mut evaluator = BreakEvaluator::new(&policy);
    let emitted = evaluator.consider_break(
        &elements,
        &elements[1],
        1,
        FlexMeasure::from_natural(900),
        &mut arena,
        &mut active,
    );

    // The feasible parent is consumed by the mandatory break; only the
    // forked candidate stays active.
    assert_eq!(emitted, 1);
    assert_eq!(active.len(), 1);
    assert!(!active.contains(root));
}

#[test]
fn test_rewarding_penalty_keeps_demerits_non_negative() {
    let elements = [
        Element::Box { length: 900 },
        Element::penalty(0, -900),
        Element::Box { length: 900 },
    ];
    let policy = LinePolicy::uniform(900);
    let mut arena = CandidateArena::new();
    let mut active = ActiveSet::new();
    active.add(arena.alloc(Candidate::root(0)));

    let mut evaluator = BreakEvaluator::new(&policy);
    evaluator.consider_break(
        &elements,
        &elements[1],
        1,
        FlexMeasure::from_natural(900),
        &mut arena,
        &mut active,
    );

    for id in active.ids() {
        assert!(arena[id].demerits >= 0.0);
    }
}
