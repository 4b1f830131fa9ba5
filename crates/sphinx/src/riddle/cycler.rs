//! Deterministic category rotation.

/// Walks the bank's categories in a fixed cyclic order.
///
/// Index `-1` is the "nothing issued yet" sentinel and maps to the first
/// category. Any integer input is accepted.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCycler<'a> {
    categories: &'a [String],
}

impl<'a> CategoryCycler<'a> {
    /// `categories` must be non-empty; [`super::RiddleBank`] guarantees it.
    pub fn new(categories: &'a [String]) -> Self {
        Self { categories }
    }

    /// Category after `last_index`, with its index.
    pub fn next(&self, last_index: i64) -> (&'a str, i64) {
        let n = self.categories.len().max(1) as i64;
        // (last + 1) mod n without overflowing at i64::MAX
        let index = (last_index.rem_euclid(n) + 1).rem_euclid(n);
        let category = self
            .categories
            .get(index as usize)
            .map(String::as_str)
            .unwrap_or_default();
        (category, index)
    }
}
