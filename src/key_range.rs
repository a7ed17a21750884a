use bytes::Bytes;

use crate::{
    comparator::Comparator,
    error::{Error, Result},
};

mod range_type;

pub use range_type::{BoundKind, Direction, KeyRangeType};

/// A bounded, directed slice of the key space.
///
/// The bounds a range carries always match its [`KeyRangeType`]: a start key
/// exactly when the type has a start bound, a stop key exactly when it has a
/// stop bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRange {
    ty: KeyRangeType,
    start: Option<Bytes>,
    stop: Option<Bytes>,
}

impl Default for KeyRange {
    fn default() -> Self {
        Self::all()
    }
}

macro_rules! range_ctor {
    ($(#[$doc:meta])* $name:ident => $ty:ident) => {
        $(#[$doc])*
        pub fn $name() -> Self {
            Self::of(KeyRangeType::$ty, None, None)
        }
    };
    ($(#[$doc:meta])* $name:ident($start:ident) => $ty:ident) => {
        $(#[$doc])*
        pub fn $name($start: impl Into<Bytes>) -> Self {
            Self::of(KeyRangeType::$ty, Some($start.into()), None)
        }
    };
    ($(#[$doc:meta])* $name:ident(, $stop:ident) => $ty:ident) => {
        $(#[$doc])*
        pub fn $name($stop: impl Into<Bytes>) -> Self {
            Self::of(KeyRangeType::$ty, None, Some($stop.into()))
        }
    };
    ($(#[$doc:meta])* $name:ident($start:ident, $stop:ident) => $ty:ident) => {
        $(#[$doc])*
        pub fn $name($start: impl Into<Bytes>, $stop: impl Into<Bytes>) -> Self {
            Self::of(KeyRangeType::$ty, Some($start.into()), Some($stop.into()))
        }
    };
}

impl KeyRange {
    /// Builds a range, checking that the given bounds match `ty`.
    pub fn new(ty: KeyRangeType, start: Option<Bytes>, stop: Option<Bytes>) -> Result<Self> {
        if ty.has_start() != start.is_some() {
            return Err(Error::InvalidRange(format!(
                "{ty:?} {} a start key",
                if ty.has_start() { "requires" } else { "does not take" }
            )));
        }
        if ty.has_stop() != stop.is_some() {
            return Err(Error::InvalidRange(format!(
                "{ty:?} {} a stop key",
                if ty.has_stop() { "requires" } else { "does not take" }
            )));
        }
        Ok(Self::of(ty, start, stop))
    }

    // Arity is already guaranteed by the typed constructors.
    fn of(ty: KeyRangeType, start: Option<Bytes>, stop: Option<Bytes>) -> Self {
        debug_assert_eq!(ty.has_start(), start.is_some());
        debug_assert_eq!(ty.has_stop(), stop.is_some());
        Self { ty, start, stop }
    }

    range_ctor!(
        /// Every key, ascending.
        all => ForwardAll
    );
    range_ctor!(
        /// Every key, descending.
        all_backward => BackwardAll
    );
    range_ctor!(at_least(start) => ForwardAtLeast);
    range_ctor!(at_least_backward(start) => BackwardAtLeast);
    range_ctor!(at_most(, stop) => ForwardAtMost);
    range_ctor!(at_most_backward(, stop) => BackwardAtMost);
    range_ctor!(closed(start, stop) => ForwardClosed);
    range_ctor!(closed_backward(start, stop) => BackwardClosed);
    range_ctor!(closed_open(start, stop) => ForwardClosedOpen);
    range_ctor!(closed_open_backward(start, stop) => BackwardClosedOpen);
    range_ctor!(greater_than(start) => ForwardGreaterThan);
    range_ctor!(greater_than_backward(start) => BackwardGreaterThan);
    range_ctor!(less_than(, stop) => ForwardLessThan);
    range_ctor!(less_than_backward(, stop) => BackwardLessThan);
    range_ctor!(open(start, stop) => ForwardOpen);
    range_ctor!(open_backward(start, stop) => BackwardOpen);
    range_ctor!(open_closed(start, stop) => ForwardOpenClosed);
    range_ctor!(open_closed_backward(start, stop) => BackwardOpenClosed);

    pub fn range_type(&self) -> KeyRangeType {
        self.ty
    }

    pub fn start(&self) -> Option<&[u8]> {
        self.start.as_deref()
    }

    pub fn stop(&self) -> Option<&[u8]> {
        self.stop.as_deref()
    }

    pub fn direction(&self) -> Direction {
        self.ty.direction()
    }

    pub(crate) fn before_start<C: Comparator>(&self, c: &C, key: &[u8]) -> bool {
        self.start()
            .is_some_and(|start| self.ty.before_start(c, key, start))
    }

    pub(crate) fn past_stop<C: Comparator>(&self, c: &C, key: &[u8]) -> bool {
        self.stop()
            .is_some_and(|stop| self.ty.past_stop(c, key, stop))
    }

    /// Whether `key` satisfies both bounds under `c`.
    pub fn contains<C: Comparator>(&self, c: &C, key: &[u8]) -> bool {
        !self.before_start(c, key) && !self.past_stop(c, key)
    }
}
