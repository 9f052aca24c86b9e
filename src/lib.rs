#![deny(missing_docs)]
//! Dictionary id resolution for filter predicates over dictionary-encoded
//! columns.
//!
//! A segment stores each column value once in a sorted dictionary and scans
//! compare dense integer ids instead of values. Before a scan can run, the
//! literals of an `IN`, `NOT IN`, `=` or `!=` predicate have to be turned into
//! the ids they map to in that segment's dictionary. This crate does that
//! conversion:
//!
//! - [`normalize`] maps literal text to the stored form of the column type.
//! - [`get_dict_id_set`] resolves an [`InPredicate`] against a [`Dictionary`],
//!   picking a batch lookup algorithm for text columns from the
//!   [`QueryContext`].
//! - [`flip_dict_ids`] and [`dict_ids_excluding`] turn excluded ids into the
//!   ascending list of ids a scan matches.
//! - [`DictIdPredicateEvaluator`] packages all of the above per segment.
//!
//! ```
//! use dictfilter::{
//!     get_dict_id_set, DataType, DictIdSet, InPredicate, QueryContext, SortedDictionary,
//! };
//!
//! let dictionary = SortedDictionary::from_strings(["a", "b", "c", "d"]);
//! let ctx = QueryContext::new();
//! let predicate = InPredicate::new(ctx.next_predicate_handle(), ["c", "x", "a"]);
//! let dict_ids = get_dict_id_set(&predicate, &dictionary, DataType::String, Some(&ctx))?;
//! assert_eq!(dict_ids, DictIdSet::from([0, 2]));
//! # Ok::<(), dictfilter::Error>(())
//! ```

/// Query-scoped options and memoization cache.
pub mod context;
/// Column data type tags.
pub mod data_type;
/// Complement and exclusion id ranges.
pub mod dict_ids;
/// Dictionary contract and the in-memory sorted dictionary.
pub mod dictionary;
mod error;
/// Per-segment predicate evaluators.
pub mod evaluator;
/// Literal normalization.
pub mod normalize;
mod observability;
/// Query option keys and resolved lookup settings.
pub mod option;
/// IN / NOT-IN predicates.
pub mod predicate;
/// Dictionary id resolution.
pub mod resolve;

pub use crate::{
    context::{QueryContext, SharedSlot},
    data_type::DataType,
    dict_ids::{dict_ids_excluding, flip_dict_ids},
    dictionary::{DictId, Dictionary, LookupAlgorithm, LookupValue, SortedDictionary},
    error::{Error, Result},
    evaluator::{DictIdPredicateEvaluator, PredicateKind},
    normalize::stored_value,
    option::{query_option_key, InLookupOptions},
    predicate::{InPredicate, PredicateHandle, TypedValues},
    resolve::{get_dict_id, get_dict_id_set, DictIdSet, MAX_INITIAL_DICT_ID_SET_SIZE},
};
