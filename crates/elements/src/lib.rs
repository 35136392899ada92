//! Element model for the folio breaking engine.
//!
//! Content to be broken into lines or pages is expressed as a stream of
//! three primitive node kinds: boxes (fixed, unbreakable content), glue
//! (flexible whitespace) and penalties (explicit break opportunities).
//! This crate holds only the data model and slice-level helpers; the
//! breaking algorithms live in `folio-break`.

pub mod element;
pub mod measure;
pub mod sequence;

pub use element::{BreakClass, Element, INFINITE_PENALTY};
pub use measure::FlexMeasure;
pub use sequence::{first_box_index, is_legal_break, total_natural};
