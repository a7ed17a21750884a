use std::cmp::Ordering;

use crate::comparator::Comparator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Inclusive,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Descriptor {
    direction: Direction,
    start: Option<BoundKind>,
    stop: Option<BoundKind>,
}

const fn desc(
    direction: Direction,
    start: Option<BoundKind>,
    stop: Option<BoundKind>,
) -> Descriptor {
    Descriptor {
        direction,
        start,
        stop,
    }
}

/// The shape and direction of a [`KeyRange`](super::KeyRange).
///
/// Backward types mirror the forward ones: the start bound is the highest
/// key visited and the stop bound the lowest. `BackwardAtMost(5)` over
/// `{2, 4, 6, 8}` therefore visits `8, 6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRangeType {
    /// Every key, first to last.
    ForwardAll,
    /// Keys `>= start`.
    ForwardAtLeast,
    /// Keys `<= stop`.
    ForwardAtMost,
    /// Keys `>= start` and `<= stop`.
    ForwardClosed,
    /// Keys `>= start` and `< stop`.
    ForwardClosedOpen,
    /// Keys `> start`.
    ForwardGreaterThan,
    /// Keys `< stop`.
    ForwardLessThan,
    /// Keys `> start` and `< stop`.
    ForwardOpen,
    /// Keys `> start` and `<= stop`.
    ForwardOpenClosed,
    /// Every key, last to first.
    BackwardAll,
    /// Keys `<= start`, descending.
    BackwardAtLeast,
    /// Keys `>= stop`, descending.
    BackwardAtMost,
    /// Keys `<= start` and `>= stop`, descending.
    BackwardClosed,
    /// Keys `<= start` and `> stop`, descending.
    BackwardClosedOpen,
    /// Keys `< start`, descending.
    BackwardGreaterThan,
    /// Keys `> stop`, descending.
    BackwardLessThan,
    /// Keys `< start` and `> stop`, descending.
    BackwardOpen,
    /// Keys `< start` and `>= stop`, descending.
    BackwardOpenClosed,
}

impl KeyRangeType {
    pub const ALL: [KeyRangeType; 18] = [
        Self::ForwardAll,
        Self::ForwardAtLeast,
        Self::ForwardAtMost,
        Self::ForwardClosed,
        Self::ForwardClosedOpen,
        Self::ForwardGreaterThan,
        Self::ForwardLessThan,
        Self::ForwardOpen,
        Self::ForwardOpenClosed,
        Self::BackwardAll,
        Self::BackwardAtLeast,
        Self::BackwardAtMost,
        Self::BackwardClosed,
        Self::BackwardClosedOpen,
        Self::BackwardGreaterThan,
        Self::BackwardLessThan,
        Self::BackwardOpen,
        Self::BackwardOpenClosed,
    ];

    const fn descriptor(self) -> Descriptor {
        use BoundKind::*;
        use Direction::*;

        match self {
            Self::ForwardAll => desc(Forward, None, None),
            Self::ForwardAtLeast => desc(Forward, Some(Inclusive), None),
            Self::ForwardAtMost => desc(Forward, None, Some(Inclusive)),
            Self::ForwardClosed => desc(Forward, Some(Inclusive), Some(Inclusive)),
            Self::ForwardClosedOpen => desc(Forward, Some(Inclusive), Some(Exclusive)),
            Self::ForwardGreaterThan => desc(Forward, Some(Exclusive), None),
            Self::ForwardLessThan => desc(Forward, None, Some(Exclusive)),
            Self::ForwardOpen => desc(Forward, Some(Exclusive), Some(Exclusive)),
            Self::ForwardOpenClosed => desc(Forward, Some(Exclusive), Some(Inclusive)),
            Self::BackwardAll => desc(Backward, None, None),
            Self::BackwardAtLeast => desc(Backward, Some(Inclusive), None),
            Self::BackwardAtMost => desc(Backward, None, Some(Inclusive)),
            Self::BackwardClosed => desc(Backward, Some(Inclusive), Some(Inclusive)),
            Self::BackwardClosedOpen => desc(Backward, Some(Inclusive), Some(Exclusive)),
            Self::BackwardGreaterThan => desc(Backward, Some(Exclusive), None),
            Self::BackwardLessThan => desc(Backward, None, Some(Exclusive)),
            Self::BackwardOpen => desc(Backward, Some(Exclusive), Some(Exclusive)),
            Self::BackwardOpenClosed => desc(Backward, Some(Exclusive), Some(Inclusive)),
        }
    }

    pub const fn direction(self) -> Direction {
        self.descriptor().direction
    }

    pub const fn is_backward(self) -> bool {
        matches!(self.direction(), Direction::Backward)
    }

    pub const fn start_bound(self) -> Option<BoundKind> {
        self.descriptor().start
    }

    pub const fn stop_bound(self) -> Option<BoundKind> {
        self.descriptor().stop
    }

    pub const fn has_start(self) -> bool {
        self.start_bound().is_some()
    }

    pub const fn has_stop(self) -> bool {
        self.stop_bound().is_some()
    }

    /// Whether `key` comes before the start bound in this direction, i.e.
    /// the initial seek has to step over it.
    pub(crate) fn before_start<C: Comparator>(self, c: &C, key: &[u8], start: &[u8]) -> bool {
        let Some(kind) = self.start_bound() else {
            return false;
        };
        let ord = c.compare(key, start);
        match self.direction() {
            Direction::Forward => before(ord, kind),
            Direction::Backward => before(ord.reverse(), kind),
        }
    }

    /// Whether `key` lies past the stop bound in this direction.
    pub(crate) fn past_stop<C: Comparator>(self, c: &C, key: &[u8], stop: &[u8]) -> bool {
        let Some(kind) = self.stop_bound() else {
            return false;
        };
        let ord = c.compare(key, stop);
        match self.direction() {
            Direction::Forward => past(ord, kind),
            Direction::Backward => past(ord.reverse(), kind),
        }
    }
}

// `ord` compares the key against the bound in traversal order.
fn before(ord: Ordering, kind: BoundKind) -> bool {
    match kind {
        BoundKind::Inclusive => ord.is_lt(),
        BoundKind::Exclusive => ord.is_le(),
    }
}

fn past(ord: Ordering, kind: BoundKind) -> bool {
    match kind {
        BoundKind::Inclusive => ord.is_gt(),
        BoundKind::Exclusive => ord.is_ge(),
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::comparator::prelude::*;

    use super::{BoundKind::*, Direction::*, KeyRangeType};

    #[test]
    fn descriptor_table() {
        assert_eq!(KeyRangeType::ALL.iter().unique().count(), 18);
        assert_eq!(
            KeyRangeType::ALL.iter().filter(|t| t.is_backward()).count(),
            9
        );

        assert_eq!(KeyRangeType::ForwardAll.start_bound(), None);
        assert_eq!(KeyRangeType::ForwardAll.stop_bound(), None);
        assert_eq!(KeyRangeType::ForwardClosedOpen.start_bound(), Some(Inclusive));
        assert_eq!(KeyRangeType::ForwardClosedOpen.stop_bound(), Some(Exclusive));
        assert_eq!(KeyRangeType::BackwardOpenClosed.direction(), Backward);
        assert_eq!(KeyRangeType::BackwardOpenClosed.start_bound(), Some(Exclusive));
        assert_eq!(KeyRangeType::BackwardOpenClosed.stop_bound(), Some(Inclusive));
        assert_eq!(KeyRangeType::ForwardLessThan.direction(), Forward);
        assert!(!KeyRangeType::ForwardLessThan.has_start());
        assert!(KeyRangeType::ForwardLessThan.has_stop());
    }

    #[test]
    fn forward_predicates() {
        let c = BytewiseComparator;

        assert!(KeyRangeType::ForwardAtMost.past_stop(&c, b"6", b"5"));
        assert!(!KeyRangeType::ForwardAtMost.past_stop(&c, b"5", b"5"));
        assert!(KeyRangeType::ForwardLessThan.past_stop(&c, b"5", b"5"));
        assert!(!KeyRangeType::ForwardAtLeast.past_stop(&c, b"9", b"1"));

        assert!(KeyRangeType::ForwardGreaterThan.before_start(&c, b"4", b"4"));
        assert!(!KeyRangeType::ForwardAtLeast.before_start(&c, b"4", b"4"));
        assert!(!KeyRangeType::ForwardGreaterThan.before_start(&c, b"5", b"4"));
    }

    #[test]
    fn backward_predicates() {
        let c = BytewiseComparator;

        assert!(KeyRangeType::BackwardAtMost.past_stop(&c, b"4", b"5"));
        assert!(!KeyRangeType::BackwardAtMost.past_stop(&c, b"5", b"5"));
        assert!(KeyRangeType::BackwardLessThan.past_stop(&c, b"5", b"5"));
        assert!(!KeyRangeType::BackwardLessThan.past_stop(&c, b"6", b"5"));

        assert!(KeyRangeType::BackwardGreaterThan.before_start(&c, b"6", b"6"));
        assert!(KeyRangeType::BackwardAtLeast.before_start(&c, b"7", b"6"));
        assert!(!KeyRangeType::BackwardAtLeast.before_start(&c, b"6", b"6"));
    }
}
