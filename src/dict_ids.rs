//! Id range arithmetic used by negated predicates.
//!
//! Scan operators only test positive membership, so "ids to exclude" have to
//! be turned into the ascending list of ids that remain.

use crate::dictionary::DictId;

/// Returns every id in `[0, length)` that is not in `dict_ids`.
///
/// `dict_ids` must be strictly ascending with every id below `length`; the
/// output is ascending and has `length - dict_ids.len()` entries. The
/// precondition is only checked in debug builds.
#[must_use]
pub fn flip_dict_ids(dict_ids: &[DictId], length: usize) -> Vec<DictId> {
    debug_assert!(
        dict_ids.windows(2).all(|w| w[0] < w[1]),
        "dict ids must be strictly ascending"
    );
    debug_assert!(
        dict_ids.last().map_or(true, |&last| (last as usize) < length),
        "dict ids must be below the dictionary length {length}"
    );
    let mut flipped = Vec::with_capacity(length.saturating_sub(dict_ids.len()));
    let mut excluded = dict_ids.iter().peekable();
    for dict_id in 0..length as DictId {
        if excluded.next_if_eq(&&dict_id).is_none() {
            flipped.push(dict_id);
        }
    }
    flipped
}

/// Returns `[0, length)` without `exclude_id`.
///
/// `None` stands for the "not found" sentinel and yields the full range. An
/// excluded id at or past `length` breaks the caller contract and is only
/// checked in debug builds.
#[must_use]
pub fn dict_ids_excluding(length: usize, exclude_id: Option<DictId>) -> Vec<DictId> {
    match exclude_id {
        Some(exclude_id) => {
            debug_assert!(
                (exclude_id as usize) < length,
                "excluded id {exclude_id} is not below the dictionary length {length}"
            );
            (0..length as DictId)
                .filter(|&dict_id| dict_id != exclude_id)
                .collect()
        }
        None => (0..length as DictId).collect(),
    }
}
