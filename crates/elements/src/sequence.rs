//! Helpers over raw element slices.

use crate::element::{Element, INFINITE_PENALTY};

/// Returns true when a break may legally be taken at `idx`: a penalty
/// below the infinite sentinel, or a glue directly preceded by a box.
pub fn is_legal_break(elements: &[Element], idx: usize) -> bool {
    match elements.get(idx) {
        Some(Element::Penalty { value, .. }) => *value < INFINITE_PENALTY,
        Some(Element::Glue(_)) => idx > 0 && elements[idx - 1].is_box(),
        _ => false,
    }
}

/// Total natural length of the content in `elements`. Penalty lengths
/// are excluded; they count only at a taken break.
pub fn total_natural(elements: &[Element]) -> i32 {
    elements
        .iter()
        .map(|el| match el {
            Element::Box { length } => *length,
            Element::Glue(g) => g.natural,
            Element::Penalty { .. } => 0,
        })
        .sum()
}

/// Index of the first box at or after `from`, skipping the discardable
/// leading glue and penalties. Returns the slice length when the stream
/// holds no further box.
pub fn first_box_index(elements: &[Element], from: usize) -> usize {
    let mut idx = from;
    while idx < elements.len() && !elements[idx].is_box() {
        idx += 1;
    }
    idx
}
