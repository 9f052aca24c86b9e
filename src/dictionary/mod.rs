//! Dictionary contract consumed by the id resolver.
//!
//! A dictionary maps each distinct stored value of a column segment to a
//! dense id in `[0, cardinality)`. Implementations are immutable once built
//! and shared read-only across every thread evaluating the segment.

mod sorted;

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;

pub use sorted::SortedDictionary;

use crate::{data_type::DataType, resolve::DictIdSet};

/// Dense identifier of a value inside a dictionary.
pub type DictId = u32;

/// Borrowed probe value handed to [`Dictionary::index_of`].
///
/// Booleans probe as [`LookupValue::Int`] and timestamps as
/// [`LookupValue::Long`], matching their stored form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LookupValue<'a> {
    /// 32-bit int probe.
    Int(i32),
    /// 64-bit int probe.
    Long(i64),
    /// 32-bit float probe.
    Float(f32),
    /// 64-bit float probe.
    Double(f64),
    /// Decimal probe.
    Decimal(&'a BigDecimal),
    /// Text probe.
    String(&'a str),
    /// Bytes probe.
    Bytes(&'a [u8]),
}

/// Strategy a dictionary uses to look up a batch of text values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LookupAlgorithm {
    /// Binary search the middle probe, then recurse into both halves with a
    /// narrowed dictionary window. Requires sorted probes.
    #[default]
    DivideBinarySearch,
    /// Single merge walk over dictionary and probes. Requires sorted probes.
    Scan,
    /// Independent binary search per probe. Accepts unsorted probes.
    PlainBinarySearch,
}

impl LookupAlgorithm {
    /// Returns true when the algorithm expects probes in ascending order.
    #[must_use]
    pub fn requires_sorted_input(self) -> bool {
        !matches!(self, LookupAlgorithm::PlainBinarySearch)
    }

    fn name(self) -> &'static str {
        match self {
            LookupAlgorithm::DivideBinarySearch => "DIVIDE_BINARY_SEARCH",
            LookupAlgorithm::Scan => "SCAN",
            LookupAlgorithm::PlainBinarySearch => "PLAIN_BINARY_SEARCH",
        }
    }
}

impl fmt::Display for LookupAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when text does not name a [`LookupAlgorithm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLookupAlgorithm(String);

impl fmt::Display for UnknownLookupAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lookup algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownLookupAlgorithm {}

impl FromStr for LookupAlgorithm {
    type Err = UnknownLookupAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            LookupAlgorithm::DivideBinarySearch,
            LookupAlgorithm::Scan,
            LookupAlgorithm::PlainBinarySearch,
        ]
        .into_iter()
        .find(|algorithm| algorithm.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownLookupAlgorithm(s.to_owned()))
    }
}

/// Read-only mapping between stored values and dictionary ids.
pub trait Dictionary: Send + Sync {
    /// Type the dictionary's values are stored as; see [`DataType::stored_type`].
    fn stored_type(&self) -> DataType;

    /// Number of distinct values, which is also one past the largest id.
    fn cardinality(&self) -> usize;

    /// Returns the id of `value`, or `None` when the dictionary does not
    /// contain it (or the probe has the wrong type).
    fn index_of(&self, value: LookupValue<'_>) -> Option<DictId>;

    /// Adds the ids of every text value present in the dictionary to
    /// `dict_ids`. Probes may arrive in any order.
    fn get_dict_ids(&self, values: &[String], dict_ids: &mut DictIdSet) {
        dict_ids.extend(
            values
                .iter()
                .filter_map(|value| self.index_of(LookupValue::String(value))),
        );
    }

    /// Batch lookup with an explicit strategy.
    ///
    /// Callers must pass `values` in ascending order whenever
    /// [`LookupAlgorithm::requires_sorted_input`] holds. Dictionaries without
    /// native batch strategies fall back to [`Dictionary::get_dict_ids`].
    fn get_dict_ids_with(
        &self,
        values: &[String],
        dict_ids: &mut DictIdSet,
        _algorithm: LookupAlgorithm,
    ) {
        self.get_dict_ids(values, dict_ids);
    }
}
