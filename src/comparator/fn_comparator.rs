use std::cmp;

use super::Comparator;

/// Adapts a closure into a [`Comparator`].
#[derive(Clone, Copy)]
pub struct FnComparator<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnComparator").finish_non_exhaustive()
    }
}

pub fn from_fn<F>(f: F) -> FnComparator<F>
where
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + Clone,
{
    FnComparator { f }
}

impl<F> Comparator for FnComparator<F>
where
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + Clone,
{
    fn compare(&self, a: &[u8], b: &[u8]) -> cmp::Ordering {
        (self.f)(a, b)
    }
}
