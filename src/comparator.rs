use std::cmp;

mod bytewise_comparator;
mod fn_comparator;

pub mod prelude {
    pub use super::{
        Comparator, bytewise_comparator::BytewiseComparator, fn_comparator::FnComparator,
        fn_comparator::from_fn,
    };
}

/// A total order over keys.
///
/// A comparator handed to a cursor iterable only decides where a range
/// stops; seeks still follow the store's own byte order. It must therefore
/// agree with that order, otherwise the produced sequence is unspecified.
pub trait Comparator: Send + Sync + Clone {
    fn compare(&self, a: &[u8], b: &[u8]) -> cmp::Ordering;
}
