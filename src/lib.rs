//! Optimal line and page breaking for document-formatting pipelines.
//!
//! Content enters as streams of boxes, glue and penalties
//! ([`Element`]); the breaking driver turns a stream into the cheapest
//! sequence of parts for its level. [`FlowBreaker`] composes the two
//! levels, breaking paragraphs into lines and the resulting flow into
//! pages, and [`StreamSynchronizer`] merges two parallel streams (a
//! list item's label and body) so they break together.

pub use folio_elements::{
    BreakClass, Element, FlexMeasure, INFINITE_PENALTY, first_box_index, is_legal_break,
    total_natural,
};

pub use folio_break::{
    Alternative, BreakError, BreakOutcome, CapacityTable, FlowBreaker, FlowItem, FlowOutcome,
    LevelPolicy, LinePolicy, PagePolicy, Paragraph, PartBoundary, StreamDriver,
    StreamSynchronizer, SyncBlock, SyncOptions, combined_elements,
};
