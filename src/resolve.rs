//! Resolution of IN / NOT-IN predicate values into dictionary ids.

use std::{collections::HashSet, fmt, str::FromStr};

use bigdecimal::BigDecimal;

use crate::{
    context::{QueryContext, SharedSlot},
    data_type::DataType,
    dictionary::{DictId, Dictionary, LookupAlgorithm, LookupValue},
    error::{Error, Result},
    normalize::stored_value,
    observability::log_debug,
    predicate::{InPredicate, TypedValues},
};

/// Unordered set of dictionary ids matched by a predicate.
pub type DictIdSet = HashSet<DictId>;

/// Upper bound on the initial capacity of a resolved [`DictIdSet`].
///
/// Large IN lists often hit only a handful of dictionary entries, so sizing
/// the set for every literal would over-allocate.
pub const MAX_INITIAL_DICT_ID_SET_SIZE: usize = 1000;

const MIN_HASH_SET_SIZE: usize = 16;

/// Capacity that holds `expected` entries below a 0.75 load factor.
#[must_use]
pub fn min_hash_set_size(expected: usize) -> usize {
    (expected.saturating_mul(4) / 3 + 1).max(MIN_HASH_SET_SIZE)
}

/// Returns the ids of every predicate value present in `dictionary`.
///
/// Values missing from the dictionary can never match a row and are dropped
/// silently. For text columns the query context, when given, selects the
/// batch lookup algorithm and memoizes a sorted copy of the values per
/// predicate, so each segment of the query reuses one sort.
///
/// # Errors
///
/// - [`Error::ValueFormat`] when a literal does not parse as `data_type`.
/// - [`Error::Configuration`] when the lookup algorithm option is unknown.
/// - [`Error::InternalState`] when `dictionary` does not store `data_type`.
pub fn get_dict_id_set(
    predicate: &InPredicate,
    dictionary: &dyn Dictionary,
    data_type: DataType,
    query_context: Option<&QueryContext>,
) -> Result<DictIdSet> {
    check_dictionary_type(dictionary, data_type)?;

    let values = predicate.values();
    let capacity = min_hash_set_size(values.len()).min(MAX_INITIAL_DICT_ID_SET_SIZE);
    let mut dict_ids = DictIdSet::with_capacity(capacity);

    match predicate.typed_values(data_type)? {
        TypedValues::Int(values) | TypedValues::Boolean(values) => insert_found(
            dictionary,
            values.iter().map(|v| LookupValue::Int(*v)),
            &mut dict_ids,
        ),
        TypedValues::Long(values) | TypedValues::Timestamp(values) => insert_found(
            dictionary,
            values.iter().map(|v| LookupValue::Long(*v)),
            &mut dict_ids,
        ),
        TypedValues::Float(values) => insert_found(
            dictionary,
            values.iter().map(|v| LookupValue::Float(*v)),
            &mut dict_ids,
        ),
        TypedValues::Double(values) => insert_found(
            dictionary,
            values.iter().map(|v| LookupValue::Double(*v)),
            &mut dict_ids,
        ),
        TypedValues::BigDecimal(values) => insert_found(
            dictionary,
            values.iter().map(LookupValue::Decimal),
            &mut dict_ids,
        ),
        TypedValues::Bytes(values) => insert_found(
            dictionary,
            values.iter().map(|v| LookupValue::Bytes(v)),
            &mut dict_ids,
        ),
        TypedValues::String(values) => {
            lookup_strings(predicate, values, dictionary, query_context, &mut dict_ids)?
        }
    }
    Ok(dict_ids)
}

/// Returns the id of a single literal, or `None` when the dictionary does
/// not contain it.
///
/// The literal is normalized to its stored form first, so boolean and
/// timestamp columns accept the same spellings as IN lists do.
pub fn get_dict_id(
    value: &str,
    dictionary: &dyn Dictionary,
    data_type: DataType,
) -> Result<Option<DictId>> {
    check_dictionary_type(dictionary, data_type)?;
    let stored = stored_value(value, data_type)?;
    Ok(match data_type {
        DataType::Int | DataType::Boolean => {
            dictionary.index_of(LookupValue::Int(parse_stored(&stored, value, data_type)?))
        }
        DataType::Long | DataType::Timestamp => {
            dictionary.index_of(LookupValue::Long(parse_stored(&stored, value, data_type)?))
        }
        DataType::Float => {
            dictionary.index_of(LookupValue::Float(parse_stored(&stored, value, data_type)?))
        }
        DataType::Double => {
            dictionary.index_of(LookupValue::Double(parse_stored(&stored, value, data_type)?))
        }
        DataType::BigDecimal => {
            let decimal: BigDecimal = parse_stored(&stored, value, data_type)?;
            dictionary.index_of(LookupValue::Decimal(&decimal))
        }
        DataType::String => dictionary.index_of(LookupValue::String(&stored)),
        DataType::Bytes => {
            let bytes = hex::decode(&stored)
                .map_err(|err| Error::value_format(data_type, value, err))?;
            dictionary.index_of(LookupValue::Bytes(&bytes))
        }
    })
}

fn check_dictionary_type(dictionary: &dyn Dictionary, data_type: DataType) -> Result<()> {
    if data_type.stored_type() == dictionary.stored_type() {
        return Ok(());
    }
    Err(Error::InternalState(format!(
        "Unsupported data type: {data_type} for a {} dictionary",
        dictionary.stored_type()
    )))
}

fn parse_stored<T>(stored: &str, value: &str, data_type: DataType) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    stored
        .parse()
        .map_err(|err| Error::value_format(data_type, value, err))
}

fn insert_found<'a>(
    dictionary: &dyn Dictionary,
    probes: impl Iterator<Item = LookupValue<'a>>,
    dict_ids: &mut DictIdSet,
) {
    dict_ids.extend(probes.filter_map(|probe| dictionary.index_of(probe)));
}

fn lookup_strings(
    predicate: &InPredicate,
    values: &[String],
    dictionary: &dyn Dictionary,
    query_context: Option<&QueryContext>,
    dict_ids: &mut DictIdSet,
) -> Result<()> {
    let Some(query_context) = query_context.filter(|_| values.len() > 1) else {
        dictionary.get_dict_ids(values, dict_ids);
        return Ok(());
    };

    let options = query_context.in_lookup_options()?;
    let algorithm = options.lookup_algorithm();
    if algorithm == LookupAlgorithm::PlainBinarySearch {
        dictionary.get_dict_ids(values, dict_ids);
        return Ok(());
    }

    if options.is_pre_sorted() {
        dictionary.get_dict_ids_with(values, dict_ids, algorithm);
    } else {
        let sorted_values = query_context.get_or_compute_shared_value(
            SharedSlot::SortedInValues,
            predicate.handle(),
            || {
                log_debug!(
                    component = "resolve",
                    event = "sorted_in_values_computed",
                    handle = %predicate.handle(),
                    num_values = values.len(),
                );
                let mut sorted_values = values.to_vec();
                sorted_values.sort_unstable();
                sorted_values
            },
        )?;
        dictionary.get_dict_ids_with(&sorted_values, dict_ids, algorithm);
    }
    Ok(())
}

/// Returns the resolved ids in ascending order.
#[must_use]
pub fn sorted_dict_ids(dict_ids: &DictIdSet) -> Vec<DictId> {
    let mut sorted: Vec<DictId> = dict_ids.iter().copied().collect();
    sorted.sort_unstable();
    sorted
}
