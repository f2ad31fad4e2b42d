//! Vote adjustment and vote ordering. Pure functions, no I/O.

use crate::jokes::Joke;

/// Return a copy of `items` where the joke with `id` has `delta` added to its votes.
/// Length, order, and every other joke are left untouched. A vote that would overflow
/// the tally is not applied; see [`vote_overflows`].
pub fn vote(items: &[Joke], id: &str, delta: i64) -> Vec<Joke> {
    items
        .iter()
        .map(|j| match j.votes.checked_add(delta) {
            Some(votes) if j.id == id => Joke {
                votes,
                ..j.clone()
            },
            _ => j.clone(),
        })
        .collect()
}

/// True when adding `delta` to joke `id` would leave the `i64` range.
pub fn vote_overflows(items: &[Joke], id: &str, delta: i64) -> bool {
    items
        .iter()
        .any(|j| j.id == id && j.votes.checked_add(delta).is_none())
}

/// Highest votes first; ties keep their arrival order.
pub fn sorted_by_votes(items: &[Joke]) -> Vec<Joke> {
    let mut out = items.to_vec();
    out.sort_by(|a, b| b.votes.cmp(&a.votes));
    out
}
