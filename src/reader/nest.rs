//! Subtree Nesting
//!
//! A mark records the depth at which `nest()` was called. While the reader's
//! resulting depth stays at or above the innermost mark, events flow normally.
//! The first event that drops below it releases the mark: `next()` reports
//! `false` once and arms a hold, so the following `next()` replays that same
//! event to the enclosing loop instead of consuming a new one.

use tracing::trace;

#[derive(Debug, Default)]
pub struct NestMarks {
    marks: Vec<usize>,
    hold: bool,
}

impl NestMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a bounded region at `depth`
    pub fn nest(&mut self, depth: usize) {
        trace!(depth, level = self.marks.len() + 1, "nest");
        self.marks.push(depth);
    }

    /// Arm a one-shot replay of the current event
    pub fn hold(&mut self) {
        self.hold = true;
    }

    /// Consume an armed hold; true if one was set
    pub fn take_hold(&mut self) -> bool {
        std::mem::take(&mut self.hold)
    }

    /// True if an event at `depth` belongs to the innermost region
    /// (always true with no region open)
    pub fn admits(&self, depth: usize) -> bool {
        self.marks.last().map_or(true, |&mark| depth >= mark)
    }

    /// Close the innermost region and arm the replay hold
    pub fn release(&mut self) {
        if let Some(mark) = self.marks.pop() {
            trace!(depth = mark, level = self.marks.len(), "nest released");
        }
        self.hold = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marks_admits_everything() {
        let marks = NestMarks::new();
        assert!(marks.admits(0));
        assert!(marks.admits(100));
    }

    #[test]
    fn test_admits_innermost_only() {
        let mut marks = NestMarks::new();
        marks.nest(2);
        marks.nest(4);
        assert!(marks.admits(4));
        assert!(marks.admits(5));
        assert!(!marks.admits(3));

        marks.release();
        assert!(marks.admits(3));
        assert!(!marks.admits(1));
    }

    #[test]
    fn test_release_arms_hold_once() {
        let mut marks = NestMarks::new();
        marks.nest(3);
        marks.release();
        assert!(marks.admits(0));
        assert!(marks.take_hold());
        assert!(!marks.take_hold());
    }

    #[test]
    fn test_explicit_hold() {
        let mut marks = NestMarks::new();
        marks.hold();
        assert!(marks.take_hold());
        assert!(!marks.take_hold());
    }
}
