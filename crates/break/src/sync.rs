use folio_elements::{BreakClass, Element, INFINITE_PENALTY, sequence};
use log::trace;
use std::ops::Range;

/// Tuning knobs for two-stream synchronization.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// The first combined step takes the larger of the two streams'
    /// increments, so the opening block holds at least one full unit of
    /// each stream. Later steps always take the smaller increment.
    pub first_step_takes_max: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            first_step_takes_max: true,
        }
    }
}

/// One synchronized block: the combined box emitted for a step, the
/// break opportunity after it, and the element ranges of both streams
/// it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncBlock {
    /// Box height of this step.
    pub height: i32,
    /// Extra height consumed only if the break after this block is
    /// taken: the taller stream's overhang plus any penalty lengths at
    /// the step's break elements.
    pub penalty_height: i32,
    /// Penalty value of the break opportunity after this block.
    pub penalty_value: i32,
    /// Strongest break class among the step's break elements.
    pub break_class: BreakClass,
    /// Half-open element ranges consumed from each stream.
    pub ranges: [Range<usize>; 2],
    /// False for the final block, which must not be broken after.
    pub breakable_after: bool,
}

/// Merges two parallel element streams into one sequence of combined
/// blocks, stepping both streams in lockstep so any break in the merged
/// sequence is legal in both.
///
/// Each round advances both streams to their next legal break, then
/// commits the chosen increment as one box; the stream that stepped too
/// far is rolled back and re-offered the same break next round.
pub struct StreamSynchronizer<'a> {
    streams: [&'a [Element]; 2],
    options: SyncOptions,
}

impl<'a> StreamSynchronizer<'a> {
    pub fn new(streams: [&'a [Element]; 2]) -> Self {
        Self {
            streams,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the synchronization to completion and returns the combined
    /// blocks in order. The block heights always sum to the taller
    /// stream's full natural height.
    pub fn run(&self) -> Vec<SyncBlock> {
        let full = [
            sequence::total_natural(self.streams[0]),
            sequence::total_natural(self.streams[1]),
        ];
        let total_height = full[0].max(full[1]);

        let mut start: [isize; 2] = [-1, -1];
        let mut end: [isize; 2] = [-1, -1];
        let mut partial: [i32; 2] = [0, 0];
        let mut added_box_height = 0;

        let mut blocks = Vec::new();
        while let Some(step) = self.next_step(&mut start, &mut end, &mut partial) {
            let max_remaining = (full[0] - partial[0]).max(full[1] - partial[1]);
            let mut penalty_height = step + max_remaining - total_height;

            // Fold in the break elements both streams stopped at.
            let mut extra_penalty_height = 0;
            let mut penalty_value = 0;
            let mut break_class = BreakClass::Auto;
            for i in 0..2 {
                let Some(element) = self.element_at(i, end[i]) else {
                    continue;
                };
                if let Element::Penalty {
                    length,
                    value,
                    class,
                    ..
                } = element
                {
                    extra_penalty_height = extra_penalty_height.max(*length);
                    penalty_value = if *value <= -INFINITE_PENALTY {
                        -INFINITE_PENALTY
                    } else {
                        penalty_value.max(*value)
                    };
                    break_class = break_class.combine(*class);
                }
            }

            let height = step - added_box_height - penalty_height;
            penalty_height += extra_penalty_height;
            added_box_height += height;

            let breakable_after = added_box_height < total_height;
            trace!(
                "sync step={step} box={height} penalty={penalty_height} \
                 remaining={max_remaining} breakable={breakable_after}"
            );
            blocks.push(SyncBlock {
                height,
                penalty_height,
                penalty_value,
                break_class,
                ranges: [
                    range_of(start[0], end[0]),
                    range_of(start[1], end[1]),
                ],
                breakable_after,
            });
        }
        blocks
    }

    /// Advances both streams to their next legal break and picks the
    /// step height. Returns None once both streams are exhausted.
    ///
    /// A stream whose increment exceeds the chosen step is rolled back
    /// to where this round started, so the skipped break is offered
    /// again on the next round.
    fn next_step(
        &self,
        start: &mut [isize; 2],
        end: &mut [isize; 2],
        partial: &mut [i32; 2],
    ) -> Option<i32> {
        let backup = *partial;
        let mut advanced = [false, false];

        for i in 0..2 {
            start[i] = end[i] + 1;
            let stream = self.streams[i];
            while ((end[i] + 1) as usize) < stream.len() {
                end[i] += 1;
                match &stream[end[i] as usize] {
                    Element::Penalty { value, .. } => {
                        if *value < INFINITE_PENALTY {
                            break;
                        }
                    }
                    Element::Glue(g) => {
                        if end[i] > 0 && stream[(end[i] - 1) as usize].is_box() {
                            break;
                        }
                        partial[i] += g.natural;
                    }
                    Element::Box { length } => partial[i] += length,
                }
            }
            if end[i] < start[i] {
                end[i] = start[i] - 1;
            } else {
                advanced[i] = true;
            }
        }

        if !advanced[0] && !advanced[1] {
            return None;
        }

        let first_step = backup == [0, 0];
        let step = if first_step && self.options.first_step_takes_max {
            (if advanced[0] { partial[0] } else { i32::MIN })
                .max(if advanced[1] { partial[1] } else { i32::MIN })
        } else {
            (if advanced[0] { partial[0] } else { i32::MAX })
                .min(if advanced[1] { partial[1] } else { i32::MAX })
        };

        for i in 0..2 {
            if partial[i] > step {
                partial[i] = backup[i];
                end[i] = start[i] - 1;
            }
        }
        Some(step)
    }

    fn element_at(&self, stream: usize, index: isize) -> Option<&Element> {
        if index < 0 {
            return None;
        }
        self.streams[stream].get(index as usize)
    }
}

/// Lowers combined blocks into a plain element stream a page-level
/// driver can break: one box per block, followed by the block's penalty
/// wherever a break after it is allowed.
pub fn combined_elements(blocks: &[SyncBlock]) -> Vec<Element> {
    let mut elements = Vec::with_capacity(blocks.len() * 2);
    for block in blocks {
        elements.push(Element::Box {
            length: block.height,
        });
        if block.breakable_after {
            elements.push(Element::Penalty {
                length: block.penalty_height,
                value: block.penalty_value,
                class: block.break_class,
                flagged: false,
            });
        }
    }
    elements
}

fn range_of(start: isize, end: isize) -> Range<usize> {
    if end < start {
        let at = start.max(0) as usize;
        return at..at;
    }
    start.max(0) as usize..(end + 1) as usize
}
