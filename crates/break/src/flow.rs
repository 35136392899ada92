use crate::BreakError;
use crate::driver::{BreakOutcome, StreamDriver};
use crate::policy::{CapacityTable, LinePolicy, PagePolicy};
use folio_elements::Element;
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One paragraph of inline content plus the measures needed to lift its
/// finished lines to the page level.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub elements: Vec<Element>,
    /// Inline extent available to every line of this paragraph.
    pub line_extent: i32,
    /// Block-progression height contributed by one finished line.
    pub line_height: i32,
}

/// An item of the page-level flow: either ready-made block content or a
/// paragraph whose lines the nested line-level driver produces.
#[derive(Debug, Clone)]
pub enum FlowItem {
    Block(Element),
    Paragraph(Paragraph),
}

/// Result of driving a whole flow: the page boundaries over the
/// assembled page-level stream, plus each paragraph's line boundaries.
#[derive(Debug, Clone, Default)]
pub struct FlowOutcome {
    pub pages: BreakOutcome,
    /// Line-breaking outcome per paragraph, in flow order.
    pub paragraph_lines: Vec<BreakOutcome>,
    /// The assembled page-level stream the page boundaries refer to.
    pub page_elements: Vec<Element>,
}

/// Drives page-level breaking over a flow, invoking the nested
/// line-level driver once per paragraph. The inner driver fully
/// finishes a paragraph before its lines are folded into the page
/// stream, so levels compose strictly in call/return order.
pub struct FlowBreaker {
    page_table: CapacityTable,
    line_threshold: f64,
}

impl FlowBreaker {
    pub fn new(page_table: CapacityTable) -> Self {
        Self {
            page_table,
            line_threshold: LinePolicy::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_line_threshold(mut self, threshold: f64) -> Self {
        self.line_threshold = threshold;
        self
    }

    pub fn break_flow(&self, items: &[FlowItem]) -> Result<FlowOutcome, BreakError> {
        let paragraph_lines = self.break_paragraphs(items)?;
        debug!(
            "line breaking finished for {} paragraph(s)",
            paragraph_lines.len()
        );

        // Lift finished lines into the page-level stream: one box per
        // line, a neutral break opportunity between lines and after each
        // paragraph that is not the last flow item.
        let mut page_elements = Vec::new();
        let mut lines = paragraph_lines.iter();
        for (item_idx, item) in items.iter().enumerate() {
            match item {
                FlowItem::Block(element) => page_elements.push(*element),
                FlowItem::Paragraph(paragraph) => {
                    let Some(outcome) = lines.next() else {
                        continue;
                    };
                    for (line_idx, _) in outcome.parts.iter().enumerate() {
                        if line_idx > 0 {
                            page_elements.push(Element::penalty(0, 0));
                        }
                        page_elements.push(Element::Box {
                            length: paragraph.line_height,
                        });
                    }
                    if !outcome.parts.is_empty() && item_idx + 1 < items.len() {
                        page_elements.push(Element::penalty(0, 0));
                    }
                }
            }
        }

        let policy = PagePolicy::new(self.page_table.clone());
        let pages = StreamDriver::new(&policy, &page_elements).run()?;

        Ok(FlowOutcome {
            pages,
            paragraph_lines,
            page_elements,
        })
    }

    fn break_paragraph(&self, paragraph: &Paragraph) -> Result<BreakOutcome, BreakError> {
        let policy = LinePolicy::uniform(paragraph.line_extent).with_threshold(self.line_threshold);
        StreamDriver::new(&policy, &paragraph.elements).run()
    }

    /// Breaks every paragraph of the flow into lines. Paragraphs are
    /// independent, so the `parallel` feature fans them out over a rayon
    /// pool; results come back in flow order either way.
    #[cfg(feature = "parallel")]
    fn break_paragraphs(&self, items: &[FlowItem]) -> Result<Vec<BreakOutcome>, BreakError> {
        items
            .par_iter()
            .filter_map(|item| match item {
                FlowItem::Paragraph(paragraph) => Some(self.break_paragraph(paragraph)),
                FlowItem::Block(_) => None,
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn break_paragraphs(&self, items: &[FlowItem]) -> Result<Vec<BreakOutcome>, BreakError> {
        items
            .iter()
            .filter_map(|item| match item {
                FlowItem::Paragraph(paragraph) => Some(self.break_paragraph(paragraph)),
                FlowItem::Block(_) => None,
            })
            .collect()
    }
}
