mod common;

use common::{TestResult, paragraph};
use folio::{CapacityTable, Element, FlowBreaker, FlowItem};

#[test]
fn test_two_paragraphs_fill_two_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    // Each paragraph breaks into two lines of height 500; two lines
    // fill a page exactly.
    let flow = [
        paragraph(&[400, 400, 400], 900, 500),
        paragraph(&[400, 400, 400], 900, 500),
    ];
    let breaker = FlowBreaker::new(CapacityTable::uniform(1000));
    let outcome = breaker.break_flow(&flow)?;

    assert_eq!(outcome.paragraph_lines.len(), 2);
    for lines in &outcome.paragraph_lines {
        assert_eq!(lines.parts.len(), 2);
    }

    // Four line boxes with a break opportunity between each pair.
    assert_eq!(outcome.page_elements.len(), 7);
    assert_eq!(outcome.pages.parts.len(), 2);
    assert_eq!(outcome.pages.parts[0].ratio, 0.0);
    assert_eq!(outcome.pages.parts[1].ratio, 0.0);
    Ok(())
}

#[test]
fn test_blocks_pass_through_to_the_page_stream() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let flow = [
        FlowItem::Block(Element::Box { length: 1000 }),
        FlowItem::Block(Element::penalty(0, 0)),
        paragraph(&[400, 400, 400], 900, 500),
    ];
    let breaker = FlowBreaker::new(CapacityTable::uniform(1000));
    let outcome = breaker.break_flow(&flow)?;

    assert_eq!(outcome.paragraph_lines.len(), 1);
    assert_eq!(outcome.page_elements.len(), 5);
    assert_eq!(outcome.page_elements[0], Element::Box { length: 1000 });

    // Page one holds the block, page two the paragraph's lines.
    assert_eq!(outcome.pages.parts.len(), 2);
    assert_eq!(outcome.pages.parts[0].end, 1);
    Ok(())
}

#[test]
fn test_empty_flow() -> TestResult {
    let breaker = FlowBreaker::new(CapacityTable::uniform(1000));
    let outcome = breaker.break_flow(&[])?;

    assert!(outcome.pages.parts.is_empty());
    assert!(outcome.paragraph_lines.is_empty());
    assert!(outcome.page_elements.is_empty());
    Ok(())
}

#[test]
fn test_looser_line_threshold_changes_nothing_when_lines_fit() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let flow = [paragraph(&[400, 400, 400], 900, 500)];
    let strict = FlowBreaker::new(CapacityTable::uniform(1000))
        .with_line_threshold(1.0)
        .break_flow(&flow)?;
    let loose = FlowBreaker::new(CapacityTable::uniform(1000)).break_flow(&flow)?;

    assert_eq!(
        strict.paragraph_lines[0].parts.len(),
        loose.paragraph_lines[0].parts.len()
    );
    Ok(())
}
