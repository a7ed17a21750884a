//! Range-bounded, directional iteration over the ordered databases of
//! [`rangedb_store`].
//!
//! A [`KeyRange`](key_range::KeyRange) names one of eighteen range shapes
//! (nine forward, nine backward). A [`CursorIterable`](cursor_iterable::CursorIterable)
//! drives a cursor through it, yielding borrowed [`KeyVal`](cursor_iterable::KeyVal)
//! views and optionally deleting entries as it goes.

pub mod comparator;
pub mod cursor;
pub mod cursor_iterable;
pub mod error;
pub mod key_range;

#[cfg(test)]
mod test_utils;

pub use rangedb_store as store;

pub mod prelude {
    pub use super::{
        comparator::prelude::*,
        cursor::Cursor,
        cursor_iterable::{CursorIter, CursorIterable, DbExt, KeyVal, OwnedIter, Phase},
        error::{Error, Result},
        key_range::{BoundKind, Direction, KeyRange, KeyRangeType},
    };
}
