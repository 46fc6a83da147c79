//! Uniform sampling over identifier sets.
//!
//! All randomness flows through a [`ValueProvider`], so samples are
//! reproducible for a seeded provider.

use std::collections::HashMap;

use crate::error::GenerationError;
use crate::values::ValueProvider;

/// Picks one element uniformly, with replacement across calls.
///
/// Returns `None` when `items` is empty so callers can raise the error that
/// fits their context.
///
/// # Errors
///
/// Propagates provider failures.
pub fn pick_one<T: Copy>(
    provider: &mut dyn ValueProvider,
    items: &[T],
) -> Result<Option<T>, GenerationError> {
    if items.is_empty() {
        return Ok(None);
    }
    let index = provider.pick_index(items.len())?;
    Ok(items.get(index).copied())
}

/// Samples `k` distinct elements uniformly without replacement.
///
/// Runs a partial Fisher–Yates shuffle, drawing each swap index from the
/// provider. Swaps are recorded in a sparse map rather than applied to a
/// copy of `items`, so the cost depends on `k` alone. Asking for more
/// elements than exist returns every element in shuffled order.
///
/// # Errors
///
/// Propagates provider failures.
///
/// # Example
///
/// ```
/// use storefront_data::{FakeValueProvider, sample_distinct};
///
/// let mut provider = FakeValueProvider::from_seed(3);
/// let picked = sample_distinct(&mut provider, &[1, 2, 3, 4, 5], 3).expect("sample");
///
/// assert_eq!(picked.len(), 3);
/// assert!(picked.iter().all(|value| (1..=5).contains(value)));
/// ```
pub fn sample_distinct<T: Copy>(
    provider: &mut dyn ValueProvider,
    items: &[T],
    k: usize,
) -> Result<Vec<T>, GenerationError> {
    let take = k.min(items.len());
    // Positions whose element was displaced by an earlier swap.
    let mut displaced: HashMap<usize, usize> = HashMap::with_capacity(take);
    let mut picked = Vec::with_capacity(take);

    for position in 0..take {
        let remaining = items.len().saturating_sub(position);
        let target = position.saturating_add(provider.pick_index(remaining)?);
        let chosen = displaced.get(&target).copied().unwrap_or(target);
        let current = displaced.get(&position).copied().unwrap_or(position);
        displaced.insert(target, current);
        if let Some(item) = items.get(chosen) {
            picked.push(*item);
        }
    }

    Ok(picked)
}
