use folio::{Element, FlowItem, Paragraph};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Inline stream for a run of fixed-width words separated by flexible
/// spaces, finished so the last line may legally run short.
pub fn word_stream(word_widths: &[i32], space: (i32, i32, i32)) -> Vec<Element> {
    let mut elements = Vec::new();
    for (i, width) in word_widths.iter().enumerate() {
        if i > 0 {
            elements.push(Element::glue(space.0, space.1, space.2));
        }
        elements.push(Element::Box { length: *width });
    }
    elements.push(Element::glue(0, 100_000, 0));
    elements.push(Element::forced_break(0));
    elements
}

pub fn paragraph(word_widths: &[i32], line_extent: i32, line_height: i32) -> FlowItem {
    FlowItem::Paragraph(Paragraph {
        elements: word_stream(word_widths, (100, 100, 0)),
        line_extent,
        line_height,
    })
}
