use std::cmp::Ordering;

use bigdecimal::BigDecimal;

use super::{DictId, Dictionary, LookupAlgorithm, LookupValue};
use crate::{data_type::DataType, resolve::DictIdSet};

#[derive(Clone, Debug)]
enum SortedValues {
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Decimal(Vec<BigDecimal>),
    String(Vec<String>),
    Bytes(Vec<Vec<u8>>),
}

/// In-memory dictionary over a sorted, de-duplicated value vector.
///
/// A value's id is its position in ascending order, so id order and value
/// order agree. Floats are ordered by IEEE 754 total order.
#[derive(Clone, Debug)]
pub struct SortedDictionary {
    values: SortedValues,
}

impl SortedDictionary {
    /// Builds an int dictionary; also used for boolean columns.
    pub fn from_ints(values: impl IntoIterator<Item = i32>) -> Self {
        Self::new(SortedValues::Int(sorted_dedup(values, Ord::cmp)))
    }

    /// Builds a long dictionary; also used for timestamp columns.
    pub fn from_longs(values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(SortedValues::Long(sorted_dedup(values, Ord::cmp)))
    }

    /// Builds a float dictionary.
    pub fn from_floats(values: impl IntoIterator<Item = f32>) -> Self {
        Self::new(SortedValues::Float(sorted_dedup(values, f32::total_cmp)))
    }

    /// Builds a double dictionary.
    pub fn from_doubles(values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(SortedValues::Double(sorted_dedup(values, f64::total_cmp)))
    }

    /// Builds a decimal dictionary. Numerically equal decimals share an id.
    pub fn from_decimals(values: impl IntoIterator<Item = BigDecimal>) -> Self {
        Self::new(SortedValues::Decimal(sorted_dedup(values, Ord::cmp)))
    }

    /// Builds a text dictionary.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(SortedValues::String(sorted_dedup(
            values.into_iter().map(Into::into),
            Ord::cmp,
        )))
    }

    /// Builds a bytes dictionary.
    pub fn from_bytes(values: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self::new(SortedValues::Bytes(sorted_dedup(values, Ord::cmp)))
    }

    fn new(values: SortedValues) -> Self {
        Self { values }
    }

    /// Returns the text value stored under `dict_id`, if this is a text
    /// dictionary and the id is in range.
    #[must_use]
    pub fn string_value(&self, dict_id: DictId) -> Option<&str> {
        match &self.values {
            SortedValues::String(values) => values.get(dict_id as usize).map(String::as_str),
            _ => None,
        }
    }
}

fn sorted_dedup<T>(
    values: impl IntoIterator<Item = T>,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
) -> Vec<T> {
    let mut values: Vec<T> = values.into_iter().collect();
    values.sort_unstable_by(&mut cmp);
    values.dedup_by(|a, b| cmp(&*a, &*b) == Ordering::Equal);
    debug_assert!(
        DictId::try_from(values.len()).is_ok(),
        "dictionary cardinality exceeds the id space"
    );
    values
}

fn search<T>(values: &[T], f: impl FnMut(&T) -> Ordering) -> Option<DictId> {
    values.binary_search_by(f).ok().map(|index| index as DictId)
}

impl Dictionary for SortedDictionary {
    fn stored_type(&self) -> DataType {
        match self.values {
            SortedValues::Int(_) => DataType::Int,
            SortedValues::Long(_) => DataType::Long,
            SortedValues::Float(_) => DataType::Float,
            SortedValues::Double(_) => DataType::Double,
            SortedValues::Decimal(_) => DataType::BigDecimal,
            SortedValues::String(_) => DataType::String,
            SortedValues::Bytes(_) => DataType::Bytes,
        }
    }

    fn cardinality(&self) -> usize {
        match &self.values {
            SortedValues::Int(v) => v.len(),
            SortedValues::Long(v) => v.len(),
            SortedValues::Float(v) => v.len(),
            SortedValues::Double(v) => v.len(),
            SortedValues::Decimal(v) => v.len(),
            SortedValues::String(v) => v.len(),
            SortedValues::Bytes(v) => v.len(),
        }
    }

    fn index_of(&self, value: LookupValue<'_>) -> Option<DictId> {
        match (&self.values, value) {
            (SortedValues::Int(v), LookupValue::Int(probe)) => search(v, |e| e.cmp(&probe)),
            (SortedValues::Long(v), LookupValue::Long(probe)) => search(v, |e| e.cmp(&probe)),
            (SortedValues::Float(v), LookupValue::Float(probe)) => {
                search(v, |e| e.total_cmp(&probe))
            }
            (SortedValues::Double(v), LookupValue::Double(probe)) => {
                search(v, |e| e.total_cmp(&probe))
            }
            (SortedValues::Decimal(v), LookupValue::Decimal(probe)) => search(v, |e| e.cmp(probe)),
            (SortedValues::String(v), LookupValue::String(probe)) => {
                search(v, |e| e.as_str().cmp(probe))
            }
            (SortedValues::Bytes(v), LookupValue::Bytes(probe)) => {
                search(v, |e| e.as_slice().cmp(probe))
            }
            _ => None,
        }
    }

    fn get_dict_ids_with(
        &self,
        values: &[String],
        dict_ids: &mut DictIdSet,
        algorithm: LookupAlgorithm,
    ) {
        let SortedValues::String(dictionary) = &self.values else {
            return;
        };
        debug_assert!(
            !algorithm.requires_sorted_input() || values.windows(2).all(|w| w[0] <= w[1]),
            "{algorithm} requires sorted probes"
        );
        match algorithm {
            LookupAlgorithm::PlainBinarySearch => self.get_dict_ids(values, dict_ids),
            LookupAlgorithm::Scan => scan(dictionary, values, dict_ids),
            LookupAlgorithm::DivideBinarySearch => {
                divide_binary_search(dictionary, 0, values, dict_ids)
            }
        }
    }
}

fn scan(dictionary: &[String], sorted_values: &[String], dict_ids: &mut DictIdSet) {
    let mut dict_index = 0;
    for value in sorted_values {
        while dict_index < dictionary.len() && dictionary[dict_index] < *value {
            dict_index += 1;
        }
        if dict_index == dictionary.len() {
            return;
        }
        if dictionary[dict_index] == *value {
            dict_ids.insert(dict_index as DictId);
        }
    }
}

// `offset` is the id of `dictionary[0]` within the full dictionary.
fn divide_binary_search(
    dictionary: &[String],
    offset: usize,
    sorted_values: &[String],
    dict_ids: &mut DictIdSet,
) {
    if sorted_values.is_empty() || dictionary.is_empty() {
        return;
    }
    let mid = sorted_values.len() / 2;
    let probe = sorted_values[mid].as_str();
    let (left_end, right_start) = match dictionary.binary_search_by(|e| e.as_str().cmp(probe)) {
        Ok(pos) => {
            dict_ids.insert((offset + pos) as DictId);
            (pos, pos + 1)
        }
        Err(pos) => (pos, pos),
    };
    divide_binary_search(
        &dictionary[..left_end],
        offset,
        &sorted_values[..mid],
        dict_ids,
    );
    divide_binary_search(
        &dictionary[right_start..],
        offset + right_start,
        &sorted_values[mid + 1..],
        dict_ids,
    );
}
